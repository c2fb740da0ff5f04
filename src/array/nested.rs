//! Nested-list encoding of n-dimensional arrays.
//!
//! JSON has no native array-of-numbers-with-shape type, so every array is
//! written as nested sequences: a flat list for 1-D, a list of lists for 2-D,
//! and so on. A 0-D array is written as its single scalar.

use ndarray::{ArrayViewD, Axis};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Serializable nested-sequence view over an array.
pub struct NestedSeq<'a, T>(pub ArrayViewD<'a, T>);

impl<T: Serialize> Serialize for NestedSeq<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = &self.0;
        match view.ndim() {
            0 => match view.first() {
                Some(value) => value.serialize(serializer),
                None => serializer.serialize_unit(),
            },
            1 => {
                let mut seq = serializer.serialize_seq(Some(view.len()))?;
                for value in view.iter() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            _ => {
                let mut seq = serializer.serialize_seq(Some(view.len_of(Axis(0))))?;
                for sub in view.outer_iter() {
                    seq.serialize_element(&NestedSeq(sub))?;
                }
                seq.end()
            }
        }
    }
}
