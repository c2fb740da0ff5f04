//! Command line behaviour: one envelope line on stdout, exit status on error.

use std::path::Path;
use std::process::{Command, Output};

use byteorder::{BigEndian, WriteBytesExt};

fn nisight(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nisight"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn envelope(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "expected one line, got {:?}", stdout);
    serde_json::from_str(lines[0]).unwrap()
}

fn write_curv(dir: &Path, name: &str, values: &[f32]) -> String {
    let mut bytes = Vec::new();
    bytes.write_u24::<BigEndian>(0xFF_FF_FF).unwrap();
    bytes.write_i32::<BigEndian>(values.len() as i32).unwrap();
    bytes.write_i32::<BigEndian>(0).unwrap();
    bytes.write_i32::<BigEndian>(1).unwrap();
    for value in values {
        bytes.write_f32::<BigEndian>(*value).unwrap();
    }
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_extract_map_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_curv(dir.path(), "lh.thickness", &[1.5, 2.5]);

    let output = nisight(&["--map", &map]);
    assert!(output.status.success());
    let value = envelope(&output);
    assert_eq!(value["status"], "OK");
    assert_eq!(value["content"]["mesh"], serde_json::Value::Null);
    assert_eq!(value["content"]["map"], serde_json::json!([[1.5], [2.5]]));
}

#[test]
fn test_extract_subcommand_matches_default() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_curv(dir.path(), "lh.curv", &[0.25]);

    let a = envelope(&nisight(&["--map", &map]));
    let b = envelope(&nisight(&["extract", "--map", &map]));
    assert_eq!(a, b);
}

#[test]
fn test_missing_file_fails_with_error_envelope() {
    let output = nisight(&["--mesh", "/nonexistent/lh.pial"]);
    assert!(!output.status.success());
    let value = envelope(&output);
    assert_eq!(value["status"], "ERROR");
    assert_eq!(value["content"]["exception"], "FileNotFound");
}

#[test]
fn test_vertices_prints_count() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_curv(dir.path(), "lh.area", &[1.0, 2.0, 3.0]);

    let output = nisight(&["vertices", "--file", &map]);
    assert!(output.status.success());
    assert_eq!(envelope(&output)["content"], 3);
}

#[test]
fn test_view_img_rejects_surface_data() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_curv(dir.path(), "lh.sulc", &[1.0]);

    let output = nisight(&["view", "--type", "img", "--file", &map]);
    assert!(!output.status.success());
    assert_eq!(envelope(&output)["content"]["exception"], "UnsupportedFormat");
}

#[test]
fn test_bad_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nisight.json");
    std::fs::write(&config, r#"{"version": 99}"#).unwrap();

    let output = nisight(&["--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
    assert_eq!(envelope(&output)["content"]["exception"], "ConfigError");
}

#[test]
fn test_logs_stay_off_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_curv(dir.path(), "lh.thickness", &[1.0]);

    let output = nisight(&["--log-level", "debug", "--map", &map]);
    assert!(output.status.success());
    envelope(&output);
    assert!(!output.stderr.is_empty());
}
