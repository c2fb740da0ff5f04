//! The extraction entry points.
//!
//! [`extract`] resolves and decodes an optional mesh and an optional data map
//! into one [`ExtractionResult`]. [`count_elements`], [`view_volume`] and
//! [`view_surface`] back the remaining command line operations.

use std::path::Path;

use crate::codec;
use crate::decode::{decode_map, decode_mesh, decode_volume_frame};
use crate::error::{ExtractError, Result};
use crate::format::{ensure_exists, mesh_format_of, resolve_map, resolve_mesh, MeshFormat};
use crate::model::{ExtractionResult, VolumeFrame};

/// Options controlling how files are decoded.
///
/// # Example
///
/// ```rust,ignore
/// let options = ExtractOptions::new().apply_cras(false);
/// let result = extract(Some(Path::new("lh.pial")), None, &options)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Shift FreeSurfer surface coordinates by the volume's `cras`
    pub apply_cras: bool,
    /// Reject faces that reference missing vertices
    pub validate_faces: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with both checks enabled.
    pub fn new() -> Self {
        Self {
            apply_cras: true,
            validate_faces: true,
        }
    }

    /// Set whether FreeSurfer coordinates are shifted by `cras`.
    pub fn apply_cras(mut self, apply: bool) -> Self {
        self.apply_cras = apply;
        self
    }

    /// Set whether face indices are range-checked.
    pub fn validate_faces(mut self, validate: bool) -> Self {
        self.validate_faces = validate;
        self
    }
}

/// Decode an optional mesh and an optional data map.
///
/// Both paths are checked for existence before anything is decoded. The mesh
/// is then resolved and decoded before the map, so a failing mesh is the
/// error reported even when the map is bad too. With neither path the result
/// holds two `None`s.
pub fn extract(
    mesh_path: Option<&Path>,
    map_path: Option<&Path>,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    for path in mesh_path.iter().chain(map_path.iter()) {
        ensure_exists(path)?;
    }

    let mut result = ExtractionResult::default();
    if let Some(path) = mesh_path {
        let format = resolve_mesh(path)?;
        result.mesh = Some(decode_mesh(path, format, options)?);
    }

    if let Some(path) = map_path {
        let format = resolve_map(path)?;
        result.map = Some(decode_map(path, format)?);
    }

    Ok(result)
}

/// Number of elements (vertices, voxels or rows) described by a file.
///
/// Mesh files report their vertex count. A GIFTI file reports the leading
/// dimension of its first data array, whichever role it plays. Other data
/// maps report their normalized row count.
pub fn count_elements(path: &Path, options: &ExtractOptions) -> Result<usize> {
    ensure_exists(path)?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    match mesh_format_of(name) {
        Some(MeshFormat::Gifti { compressed }) => {
            let image = codec::read_gifti(&codec::read_source(path, compressed)?)?;
            let first = image.data_arrays.first().ok_or_else(|| {
                ExtractError::unsupported_format(format!(
                    "GIFTI file '{}' contains no data arrays.",
                    path.display()
                ))
            })?;
            Ok(first.data.shape().first().copied().unwrap_or(1))
        }
        Some(format) => Ok(decode_mesh(path, format, options)?.vertex_count()),
        None => {
            let format = resolve_map(path)?;
            Ok(decode_map(path, format)?.element_count())
        }
    }
}

/// First 3-D frame of a volume, for an image viewer.
pub fn view_volume(path: &Path) -> Result<VolumeFrame> {
    decode_volume_frame(path)
}

/// A surface with an optional overlay, for a surface viewer.
pub fn view_surface(
    mesh_path: &Path,
    map_path: Option<&Path>,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    extract(Some(mesh_path), map_path, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope;
    use crate::test_fixtures::{self, GiftiArray, SurfaceFixture};

    fn pyramid() -> SurfaceFixture {
        SurfaceFixture {
            coords: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            faces: vec![[0, 1, 2], [0, 1, 3], [1, 2, 3]],
            cras: None,
        }
    }

    #[test]
    fn test_no_inputs_gives_empty_result() {
        let result = extract(None, None, &ExtractOptions::new()).unwrap();
        assert_eq!(
            envelope::render(&Ok(result)),
            r#"{"status":"OK","content":{"mesh":null,"map":null}}"#
        );
    }

    #[test]
    fn test_mesh_and_map_together() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = test_fixtures::write_file(dir.path(), "lh.pial", &pyramid().to_bytes());
        let map = test_fixtures::write_file(
            dir.path(),
            "lh.thickness",
            &test_fixtures::morph_new(&[1.0, 2.0, 3.0, 4.0]),
        );

        let result = extract(Some(&mesh), Some(&map), &ExtractOptions::new()).unwrap();
        let mesh = result.mesh.unwrap();
        let map = result.map.unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(map.element_count(), mesh.vertex_count());
    }

    #[test]
    fn test_map_only() {
        let dir = tempfile::tempdir().unwrap();
        let map = test_fixtures::write_file(dir.path(), "lh.curv", &test_fixtures::morph_new(&[0.5]));

        let result = extract(None, Some(&map), &ExtractOptions::new()).unwrap();
        assert!(result.mesh.is_none());
        let line = envelope::render(&Ok(result));
        assert_eq!(line, r#"{"status":"OK","content":{"mesh":null,"map":[[0.5]]}}"#);
    }

    #[test]
    fn test_mesh_error_reported_before_map_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad_map = test_fixtures::write_file(dir.path(), "points.xyz", b"");

        let err = extract(
            Some(Path::new("/nonexistent/lh.pial")),
            Some(&bad_map),
            &ExtractOptions::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind().name(), "FileNotFound");
    }

    #[test]
    fn test_missing_map_reported_before_bad_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = test_fixtures::write_file(dir.path(), "lh.pial", b"\x00\x00\x00 not a surface");

        let err = extract(
            Some(&mesh),
            Some(Path::new("/nonexistent/lh.thickness")),
            &ExtractOptions::new(),
        )
        .unwrap_err();
        assert_eq!(err.kind().name(), "FileNotFound");
        assert!(err.to_string().contains("lh.thickness"));
    }

    #[test]
    fn test_unknown_map_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_fixtures::write_file(dir.path(), "lh.thickness.txt", b"1 2 3");

        let err = extract(None, Some(&path), &ExtractOptions::new()).unwrap_err();
        assert_eq!(err.kind().name(), "UnsupportedFormat");
    }

    #[test]
    fn test_count_elements_by_role() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExtractOptions::new();

        let mesh = test_fixtures::write_file(dir.path(), "rh.white", &pyramid().to_bytes());
        assert_eq!(count_elements(&mesh, &options).unwrap(), 4);

        let xml = test_fixtures::gifti_document(&[GiftiArray::float32(
            "NIFTI_INTENT_SHAPE",
            &[6],
            &[0.0; 6],
        )]);
        let gifti = test_fixtures::write_file(dir.path(), "rh.sulc.shape.gii", xml.as_bytes());
        assert_eq!(count_elements(&gifti, &options).unwrap(), 6);

        let label = test_fixtures::write_file(
            dir.path(),
            "rh.BA1.label",
            &test_fixtures::label(&[(1, 0.0), (2, 0.0), (5, 0.0)]),
        );
        assert_eq!(count_elements(&label, &options).unwrap(), 3);
    }

    #[test]
    fn test_count_elements_missing_file() {
        let err = count_elements(Path::new("/nonexistent/lh.pial"), &ExtractOptions::new())
            .unwrap_err();
        assert_eq!(err.kind().name(), "FileNotFound");
    }

    #[test]
    fn test_view_surface_with_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = test_fixtures::write_file(dir.path(), "lh.inflated", &pyramid().to_bytes());
        let overlay = test_fixtures::write_file(
            dir.path(),
            "lh.sulc",
            &test_fixtures::morph_old(&[10, 20, 30, 40]),
        );

        let result = view_surface(&mesh, Some(&overlay), &ExtractOptions::new()).unwrap();
        assert!(result.mesh.is_some());
        assert_eq!(
            serde_json::to_string(&result.map).unwrap(),
            "[[0.1],[0.2],[0.3],[0.4]]"
        );
    }
}
