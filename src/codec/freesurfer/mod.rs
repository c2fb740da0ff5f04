//! FreeSurfer native file formats.
//!
//! All binary FreeSurfer formats are big-endian.

mod annot;
mod geometry;
mod label;
mod morph;

pub use annot::{read_annot, Annotation, ColorEntry};
pub use geometry::{read_geometry, Geometry, VolumeInfo};
pub use label::read_label;
pub use morph::read_morph_data;
