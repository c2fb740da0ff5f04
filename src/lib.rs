//! nisight - neuroimaging surface and data map extraction
//!
//! Decodes surface meshes (FreeSurfer, GIFTI) and per-element data maps
//! (NIfTI, MGZ, FreeSurfer morphometry, annotations, labels, GIFTI) into a
//! small canonical record, and wraps results in single-line JSON envelopes.
//!
//! ```rust,ignore
//! use nisight::{extract, envelope, ExtractOptions};
//!
//! let result = extract(Some(Path::new("lh.pial")), Some(Path::new("lh.thickness")), &ExtractOptions::new());
//! println!("{}", envelope::render(&result));
//! ```

pub mod array;
pub mod codec;
pub mod config;
pub mod constants;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod format;
pub mod model;

#[cfg(test)]
mod test_fixtures;

pub use error::{ErrorKind, ExtractError, Result};
pub use extract::{count_elements, extract, view_surface, view_volume, ExtractOptions};
pub use model::{DataMap, ExtractionResult, SurfaceMesh, VolumeFrame};
