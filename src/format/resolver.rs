//! Suffix-based format resolution.
//!
//! Each role (mesh, data map) has a static table mapping a file-name suffix to
//! a format tag. Tables are ordered longest suffix first and the first match
//! wins, so `.gii.gz` is never mistaken for `.gii` and `.nii.gz` never for
//! `.nii`. Matching is case-sensitive.

use std::path::Path;

use crate::error::{ExtractError, Result};
use crate::format::kind::{MapFormat, MeshFormat};

/// Mesh suffixes, longest first.
pub(crate) const MESH_SUFFIXES: &[(&str, MeshFormat)] = &[
    (".inflated", MeshFormat::FreeSurferGeometry),
    (".gii.gz", MeshFormat::Gifti { compressed: true }),
    (".sphere", MeshFormat::FreeSurferGeometry),
    (".white", MeshFormat::FreeSurferGeometry),
    (".orig", MeshFormat::FreeSurferGeometry),
    (".pial", MeshFormat::FreeSurferGeometry),
    (".gii", MeshFormat::Gifti { compressed: false }),
];

/// Data map suffixes, longest first.
pub(crate) const MAP_SUFFIXES: &[(&str, MapFormat)] = &[
    (".thickness", MapFormat::Morphometry),
    (".gii.gz", MapFormat::Gifti { compressed: true }),
    (".nii.gz", MapFormat::Nifti { compressed: true }),
    (".annot", MapFormat::Annotation),
    (".label", MapFormat::Label),
    (".area", MapFormat::Morphometry),
    (".curv", MapFormat::Morphometry),
    (".sulc", MapFormat::Morphometry),
    (".nii", MapFormat::Nifti { compressed: false }),
    (".mgz", MapFormat::Mgz),
    (".gii", MapFormat::Gifti { compressed: false }),
];

/// Fail with `FileNotFound` unless `path` exists.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ExtractError::file_not_found(path))
    }
}

/// Resolve the mesh format of an existing file.
pub fn resolve_mesh(path: &Path) -> Result<MeshFormat> {
    ensure_exists(path)?;
    let format = mesh_format_of(file_name(path)?).ok_or_else(|| {
        ExtractError::unsupported_format(format!(
            "'{}' is not a supported surface mesh format (expected one of: {}).",
            path.display(),
            supported_mesh_suffixes().join(", ")
        ))
    })?;
    log::debug!("Resolved {:?} as {}", path, format.display_name());
    Ok(format)
}

/// Resolve the data map format of an existing file.
pub fn resolve_map(path: &Path) -> Result<MapFormat> {
    ensure_exists(path)?;
    let format = map_format_of(file_name(path)?).ok_or_else(|| {
        ExtractError::unsupported_format(format!(
            "'{}' is not a supported data map format (expected one of: {}).",
            path.display(),
            supported_map_suffixes().join(", ")
        ))
    })?;
    log::debug!("Resolved {:?} as {}", path, format.display_name());
    Ok(format)
}

/// Mesh format for a file name, without touching the filesystem.
pub fn mesh_format_of(name: &str) -> Option<MeshFormat> {
    match_suffix(name, MESH_SUFFIXES)
}

/// Data map format for a file name, without touching the filesystem.
pub fn map_format_of(name: &str) -> Option<MapFormat> {
    match_suffix(name, MAP_SUFFIXES)
}

/// All mesh suffixes, sorted alphabetically.
fn supported_mesh_suffixes() -> Vec<&'static str> {
    supported_suffixes(MESH_SUFFIXES)
}

/// All data map suffixes, sorted alphabetically.
fn supported_map_suffixes() -> Vec<&'static str> {
    supported_suffixes(MAP_SUFFIXES)
}

fn match_suffix<T: Copy>(name: &str, table: &[(&'static str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(suffix, _)| name.ends_with(suffix))
        .map(|(_, tag)| *tag)
}

fn supported_suffixes<T>(table: &[(&'static str, T)]) -> Vec<&'static str> {
    let mut suffixes: Vec<&'static str> = table.iter().map(|(suffix, _)| *suffix).collect();
    suffixes.sort();
    suffixes.dedup();
    suffixes
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ExtractError::unsupported_format(format!(
                "'{}' has no readable file name.",
                path.display()
            ))
        })
}
