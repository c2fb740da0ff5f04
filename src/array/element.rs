//! Element types a [`NumericArray`](super::NumericArray) can hold.

use serde::Serialize;

/// Storage type of an array, named after the on-disk datatype it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    UInt8,
    Int8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl DataType {
    /// Lowercase name used in log and error messages (e.g. "float32").
    pub fn name(&self) -> &'static str {
        match self {
            DataType::UInt8 => "uint8",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        }
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> usize {
        match self {
            DataType::UInt8 | DataType::Int8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Float64 => 8,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait implemented by every scalar type an array may store.
pub trait Element: Copy + Serialize + PartialEq + std::fmt::Debug + 'static {
    /// Matching datatype tag.
    const DATA_TYPE: DataType;

    /// Widen to `f64` (exact for everything except 64-bit integers above 2^53).
    fn to_f64(self) -> f64;

    /// Interpret as a vertex index. `None` for floats and out-of-range values.
    fn to_index(self) -> Option<i64>;
}

macro_rules! impl_integer_element {
    ($($ty:ty => $tag:ident, $widen:expr);* $(;)?) => {
        $(
            impl Element for $ty {
                const DATA_TYPE: DataType = DataType::$tag;

                fn to_f64(self) -> f64 {
                    $widen(self)
                }

                fn to_index(self) -> Option<i64> {
                    i64::try_from(self).ok()
                }
            }
        )*
    };
}

impl_integer_element! {
    u8 => UInt8, f64::from;
    i8 => Int8, f64::from;
    i16 => Int16, f64::from;
    u16 => UInt16, f64::from;
    i32 => Int32, f64::from;
    u32 => UInt32, f64::from;
    i64 => Int64, |v: i64| v as f64;
    u64 => UInt64, |v: u64| v as f64;
}

impl Element for f32 {
    const DATA_TYPE: DataType = DataType::Float32;

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn to_index(self) -> Option<i64> {
        None
    }
}

impl Element for f64 {
    const DATA_TYPE: DataType = DataType::Float64;

    fn to_f64(self) -> f64 {
        self
    }

    fn to_index(self) -> Option<i64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_sizes() {
        assert_eq!(DataType::UInt8.size(), 1);
        assert_eq!(DataType::Int16.size(), 2);
        assert_eq!(DataType::Float32.size(), 4);
        assert_eq!(DataType::UInt64.size(), 8);
    }

    #[test]
    fn test_to_index() {
        assert_eq!(7i32.to_index(), Some(7));
        assert_eq!(u64::MAX.to_index(), None);
        assert_eq!(1.0f32.to_index(), None);
    }
}
