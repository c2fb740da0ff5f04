//! Type-preserving n-dimensional arrays.
//!
//! Codecs hand back data in whatever type the file stores it in. Rather than
//! widening everything to `f64`, [`NumericArray`] keeps the native element type
//! so the JSON output is lossless, and offers the handful of shape operations
//! the pipeline needs (squeeze, transpose, stack, reshape).

mod element;
mod nested;

use ndarray::{ArrayD, Axis, IxDyn};
use serde::{Serialize, Serializer};

use crate::error::{ExtractError, Result};

pub use element::{DataType, Element};
pub use nested::NestedSeq;

/// An n-dimensional array of one of the supported element types.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    UInt8(ArrayD<u8>),
    Int8(ArrayD<i8>),
    Int16(ArrayD<i16>),
    UInt16(ArrayD<u16>),
    Int32(ArrayD<i32>),
    UInt32(ArrayD<u32>),
    Int64(ArrayD<i64>),
    UInt64(ArrayD<u64>),
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
}

/// Run `$body` against the inner array, whatever its element type.
macro_rules! with_array {
    ($value:expr, $array:ident => $body:expr) => {
        match $value {
            NumericArray::UInt8($array) => $body,
            NumericArray::Int8($array) => $body,
            NumericArray::Int16($array) => $body,
            NumericArray::UInt16($array) => $body,
            NumericArray::Int32($array) => $body,
            NumericArray::UInt32($array) => $body,
            NumericArray::Int64($array) => $body,
            NumericArray::UInt64($array) => $body,
            NumericArray::Float32($array) => $body,
            NumericArray::Float64($array) => $body,
        }
    };
}

/// Like `with_array!`, but rewraps the result in the same variant.
macro_rules! map_array {
    ($value:expr, $array:ident => $body:expr) => {
        match $value {
            NumericArray::UInt8($array) => NumericArray::UInt8($body),
            NumericArray::Int8($array) => NumericArray::Int8($body),
            NumericArray::Int16($array) => NumericArray::Int16($body),
            NumericArray::UInt16($array) => NumericArray::UInt16($body),
            NumericArray::Int32($array) => NumericArray::Int32($body),
            NumericArray::UInt32($array) => NumericArray::UInt32($body),
            NumericArray::Int64($array) => NumericArray::Int64($body),
            NumericArray::UInt64($array) => NumericArray::UInt64($body),
            NumericArray::Float32($array) => NumericArray::Float32($body),
            NumericArray::Float64($array) => NumericArray::Float64($body),
        }
    };
}

macro_rules! impl_from_array {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<ArrayD<$ty>> for NumericArray {
                fn from(array: ArrayD<$ty>) -> Self {
                    NumericArray::$variant(array)
                }
            }
        )*
    };
}

impl_from_array! {
    u8 => UInt8,
    i8 => Int8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl NumericArray {
    /// Build a 1-D array from a vector.
    pub fn from_vec<T>(values: Vec<T>) -> Self
    where
        T: Element,
        ArrayD<T>: Into<NumericArray>,
    {
        ndarray::Array1::from(values).into_dyn().into()
    }

    /// Build an array of the given shape from values in row-major order.
    pub fn from_shape_vec<T>(shape: &[usize], values: Vec<T>) -> Result<Self>
    where
        T: Element,
        ArrayD<T>: Into<NumericArray>,
    {
        let len = values.len();
        ArrayD::from_shape_vec(IxDyn(shape), values)
            .map(Into::into)
            .map_err(|e| {
                ExtractError::dimension(format!(
                    "Cannot shape {} values as {:?}: {}",
                    len, shape, e
                ))
            })
    }

    /// Element type of the array.
    pub fn data_type(&self) -> DataType {
        match self {
            NumericArray::UInt8(_) => DataType::UInt8,
            NumericArray::Int8(_) => DataType::Int8,
            NumericArray::Int16(_) => DataType::Int16,
            NumericArray::UInt16(_) => DataType::UInt16,
            NumericArray::Int32(_) => DataType::Int32,
            NumericArray::UInt32(_) => DataType::UInt32,
            NumericArray::Int64(_) => DataType::Int64,
            NumericArray::UInt64(_) => DataType::UInt64,
            NumericArray::Float32(_) => DataType::Float32,
            NumericArray::Float64(_) => DataType::Float64,
        }
    }

    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every axis of length 1.
    pub fn squeeze(self) -> Self {
        map_array!(self, a => squeeze_array(a))
    }

    /// Reverse the order of the axes (a full transpose).
    pub fn reversed_axes(self) -> Self {
        map_array!(self, a => a.reversed_axes())
    }

    /// Flatten to 1-D in row-major (logical) order.
    pub fn flatten(self) -> Self {
        map_array!(self, a => ndarray::Array1::from_iter(a.iter().copied()).into_dyn())
    }

    /// Reshape into `shape`, reading elements in row-major (logical) order.
    pub fn reshape(self, shape: &[usize]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != self.len() {
            return Err(ExtractError::dimension(format!(
                "Cannot reshape array of shape {:?} into {:?}",
                self.shape(),
                shape
            )));
        }
        with_array!(self, a => {
            let values: Vec<_> = a.iter().copied().collect();
            NumericArray::from_shape_vec(shape, values)
        })
    }

    /// Keep only index 0 along `axis`, dropping that axis.
    pub fn first_along(self, axis: usize) -> Result<Self> {
        if axis >= self.ndim() || self.shape()[axis] == 0 {
            return Err(ExtractError::dimension(format!(
                "Cannot take the first slice along axis {} of shape {:?}",
                axis,
                self.shape()
            )));
        }
        Ok(map_array!(self, a => a.index_axis_move(Axis(axis), 0)))
    }

    /// Convert every element to `f64`.
    pub fn to_f64(&self) -> ArrayD<f64> {
        with_array!(self, a => a.mapv(Element::to_f64))
    }

    /// All elements as vertex indices, in row-major order.
    ///
    /// Returns `None` for floating-point arrays or values outside `i64`.
    pub fn indices(&self) -> Option<Vec<i64>> {
        with_array!(self, a => a.iter().map(|v| v.to_index()).collect())
    }

    /// Add `offsets[j]` to every element of column `j` of a 2-D array.
    ///
    /// Float arrays keep their precision; integer arrays are widened to `f64`.
    pub fn add_column_offsets(self, offsets: &[f64]) -> Result<Self> {
        if self.ndim() != 2 || self.shape()[1] != offsets.len() {
            return Err(ExtractError::dimension(format!(
                "Cannot apply {} column offsets to shape {:?}",
                offsets.len(),
                self.shape()
            )));
        }
        let shifted = match self {
            NumericArray::Float32(mut a) => {
                for mut row in a.lanes_mut(Axis(1)) {
                    for (value, offset) in row.iter_mut().zip(offsets) {
                        *value += *offset as f32;
                    }
                }
                NumericArray::Float32(a)
            }
            other => {
                let mut a = other.to_f64();
                for mut row in a.lanes_mut(Axis(1)) {
                    for (value, offset) in row.iter_mut().zip(offsets) {
                        *value += *offset;
                    }
                }
                NumericArray::Float64(a)
            }
        };
        Ok(shifted)
    }

    /// Stack equally-shaped arrays along a new leading axis.
    ///
    /// Arrays of one element type keep it; mixed types are widened to `f64`.
    pub fn stack(arrays: &[NumericArray]) -> Result<Self> {
        let Some(first) = arrays.first() else {
            return Err(ExtractError::dimension("Cannot stack an empty list of arrays"));
        };
        if let Some(other) = arrays.iter().find(|a| a.shape() != first.shape()) {
            return Err(ExtractError::dimension(format!(
                "Cannot stack arrays of shape {:?} and {:?}",
                first.shape(),
                other.shape()
            )));
        }

        let data_type = first.data_type();
        if arrays.iter().any(|a| a.data_type() != data_type) {
            log::debug!("Stacking mixed element types, widening to float64");
            let widened: Vec<ArrayD<f64>> = arrays.iter().map(NumericArray::to_f64).collect();
            return stack_views(widened.iter().map(|a| a.view()).collect()).map(Into::into);
        }

        macro_rules! stack_variant {
            ($variant:ident) => {{
                let views = arrays
                    .iter()
                    .filter_map(|a| match a {
                        NumericArray::$variant(inner) => Some(inner.view()),
                        _ => None,
                    })
                    .collect();
                stack_views(views).map(NumericArray::$variant)
            }};
        }

        match data_type {
            DataType::UInt8 => stack_variant!(UInt8),
            DataType::Int8 => stack_variant!(Int8),
            DataType::Int16 => stack_variant!(Int16),
            DataType::UInt16 => stack_variant!(UInt16),
            DataType::Int32 => stack_variant!(Int32),
            DataType::UInt32 => stack_variant!(UInt32),
            DataType::Int64 => stack_variant!(Int64),
            DataType::UInt64 => stack_variant!(UInt64),
            DataType::Float32 => stack_variant!(Float32),
            DataType::Float64 => stack_variant!(Float64),
        }
    }
}

fn squeeze_array<T>(mut array: ArrayD<T>) -> ArrayD<T> {
    for axis in (0..array.ndim()).rev() {
        if array.shape()[axis] == 1 {
            array = array.index_axis_move(Axis(axis), 0);
        }
    }
    array
}

fn stack_views<T: Clone>(views: Vec<ndarray::ArrayViewD<'_, T>>) -> Result<ArrayD<T>> {
    ndarray::stack(Axis(0), &views)
        .map_err(|e| ExtractError::dimension(format!("Cannot stack arrays: {}", e)))
}

impl Serialize for NumericArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        with_array!(self, a => NestedSeq(a.view()).serialize(serializer))
    }
}
