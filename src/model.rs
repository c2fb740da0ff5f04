//! Canonical extraction records handed to the envelope writer.

use serde::Serialize;

use crate::array::NumericArray;

/// A triangulated surface, flattened for transport.
///
/// `vertices` holds `x, y, z` triples back to back and `faces` holds vertex
/// index triples back to back; both have a length divisible by 3.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceMesh {
    /// Flat vertex coordinates
    pub vertices: NumericArray,
    /// Flat triangle vertex indices
    pub faces: NumericArray,
}

impl SurfaceMesh {
    /// Number of vertices (coordinate triples).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.faces.len() / 3
    }
}

/// Per-element values, always shaped `(n_elements, n_components)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataMap(NumericArray);

impl DataMap {
    /// Wrap an array already normalized to rank 2.
    pub(crate) fn new(values: NumericArray) -> Self {
        debug_assert_eq!(values.ndim(), 2);
        Self(values)
    }

    /// Number of rows (vertices or voxels).
    pub fn element_count(&self) -> usize {
        self.0.shape()[0]
    }

    /// Number of values per row.
    pub fn component_count(&self) -> usize {
        self.0.shape()[1]
    }

    /// The normalized values.
    pub fn values(&self) -> &NumericArray {
        &self.0
    }
}

/// Result of one `extract` call. Either part may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtractionResult {
    pub mesh: Option<SurfaceMesh>,
    pub map: Option<DataMap>,
}

/// A single 3-D frame of a volume, as consumed by an image viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeFrame {
    /// Voxel grid dimensions
    pub shape: [usize; 3],
    /// Voxel values nested as `[x][y][z]`
    pub data: NumericArray,
}
