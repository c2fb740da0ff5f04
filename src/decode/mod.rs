//! Format-specific decoding into the canonical records.
//!
//! [`decode_mesh`] and [`decode_map`] sit between the codecs, which return
//! whatever the file holds, and [`crate::extract`], which only deals in
//! [`SurfaceMesh`](crate::model::SurfaceMesh) and
//! [`DataMap`](crate::model::DataMap) values.

mod map;
mod mesh;
mod normalize;
mod volume;

#[cfg(test)]
mod tests;

pub use map::{decode_map, decode_raw};
pub use mesh::{assemble_mesh, decode_mesh};
pub use normalize::{normalize, ElementLayout};
pub use volume::decode_volume_frame;
