//! File format recognition.
//!
//! Formats are recognized purely by file-name suffix. A file can be valid in
//! both roles (`.gii` holds either a mesh or data arrays), so the caller picks
//! the role and the resolver picks the tag.
//!
//! ## Supported Formats
//!
//! - **Meshes**: FreeSurfer surfaces (`.orig`, `.pial`, `.white`, `.sphere`,
//!   `.inflated`) and GIFTI (`.gii`, `.gii.gz`)
//! - **Data maps**: NIfTI (`.nii`, `.nii.gz`), MGZ (`.mgz`), FreeSurfer
//!   morphometry (`.area`, `.curv`, `.sulc`, `.thickness`), annotation
//!   (`.annot`), label (`.label`) and GIFTI (`.gii`, `.gii.gz`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nisight::format::{resolve_mesh, MeshFormat};
//!
//! let format = resolve_mesh(Path::new("lh.pial"))?;
//! assert_eq!(format, MeshFormat::FreeSurferGeometry);
//! ```

mod kind;
mod resolver;

pub use kind::{MapFormat, MeshFormat};
pub use resolver::{ensure_exists, map_format_of, mesh_format_of, resolve_map, resolve_mesh};
