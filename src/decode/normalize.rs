//! Canonical `(n_elements, n_components)` shaping of decoded data maps.

use crate::array::NumericArray;
use crate::error::{ExtractError, Result};

/// What the leading axes of a decoded array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementLayout {
    /// One row per surface vertex
    Vertices,
    /// A voxel grid whose spatial axes collapse into one row axis
    Voxels,
}

/// Shape `array` into exactly two dimensions.
///
/// Length-1 axes are dropped first. Then:
///
/// - a scalar becomes `(1, 1)`
/// - a vector of `n` becomes `(n, 1)`
/// - a matrix is kept as is
/// - a `(x, y, z)` voxel grid becomes `(x*y*z, 1)`
/// - a `(x, y, z, t)` voxel series becomes `(x*y*z, t)`
///
/// Grid flattening is row-major over the spatial axes. Any other rank is a
/// dimension error.
pub fn normalize(array: NumericArray, layout: ElementLayout) -> Result<NumericArray> {
    let array = array.squeeze();
    let shape = array.shape().to_vec();
    match (shape.as_slice(), layout) {
        ([], _) => array.reshape(&[1, 1]),
        ([n], _) => array.reshape(&[*n, 1]),
        ([_, _], _) => Ok(array),
        ([x, y, z], ElementLayout::Voxels) => array.reshape(&[x * y * z, 1]),
        ([x, y, z, t], ElementLayout::Voxels) => array.reshape(&[x * y * z, *t]),
        (_, ElementLayout::Vertices) => Err(ExtractError::dimension(format!(
            "Per-vertex data of shape {:?} cannot be shaped into (vertices, components)",
            shape
        ))),
        (_, ElementLayout::Voxels) => Err(ExtractError::dimension(format!(
            "Volume of rank {} (shape {:?}) is not supported; expected at most 4 dimensions",
            shape.len(),
            shape
        ))),
    }
}
