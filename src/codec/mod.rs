//! Readers for the on-disk formats.
//!
//! Each codec turns the bytes of one format into plain arrays and metadata.
//! Codecs know nothing about the output shape contract; that lives in
//! [`crate::decode`].

pub mod binary;
pub mod freesurfer;
pub mod gifti;
pub mod mgh;
pub mod nifti;
pub mod source;

pub use gifti::{read_gifti, GiftiDataArray, GiftiImage};
pub use mgh::{read_mgh, MghImage};
pub use nifti::{read_nifti, NiftiImage};
pub use source::read_source;
