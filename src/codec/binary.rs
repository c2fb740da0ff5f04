//! Byte-level reading helpers shared by the binary codecs.

use std::io::Cursor;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use crate::array::{DataType, Element, NumericArray};
use crate::error::{ExtractError, Result};

/// Byte order of multi-byte values in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Memory layout of an n-dimensional array on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Last index varies fastest (C order)
    RowMajor,
    /// First index varies fastest (Fortran order)
    ColumnMajor,
}

impl Endian {
    /// Decode `shape`-many values of `data_type` from the start of `bytes`.
    pub fn decode_values(
        self,
        bytes: &[u8],
        data_type: DataType,
        shape: &[usize],
        order: Order,
        format: &'static str,
    ) -> Result<NumericArray> {
        match self {
            Endian::Little => decode_values::<LittleEndian>(bytes, data_type, shape, order, format),
            Endian::Big => decode_values::<BigEndian>(bytes, data_type, shape, order, format),
        }
    }
}

/// Decode a packed array of `data_type` values laid out in `order`.
pub fn decode_values<B: ByteOrder>(
    bytes: &[u8],
    data_type: DataType,
    shape: &[usize],
    order: Order,
    format: &'static str,
) -> Result<NumericArray> {
    let count = element_count(shape, format)?;
    let needed = count
        .checked_mul(data_type.size())
        .ok_or_else(|| ExtractError::decode(format, format!("array shape {:?} is too large", shape)))?;
    if bytes.len() < needed {
        return Err(ExtractError::decode(
            format,
            format!(
                "expected {} bytes of {} data, found {}",
                needed,
                data_type,
                bytes.len()
            ),
        ));
    }
    let src = &bytes[..needed];

    macro_rules! read_into {
        ($ty:ty, $read:ident) => {{
            let mut values = vec![<$ty>::default(); count];
            B::$read(src, &mut values);
            build_array(shape, order, values)
        }};
    }

    match data_type {
        DataType::UInt8 => build_array(shape, order, src.to_vec()),
        DataType::Int8 => build_array(shape, order, src.iter().map(|&b| b as i8).collect()),
        DataType::Int16 => read_into!(i16, read_i16_into),
        DataType::UInt16 => read_into!(u16, read_u16_into),
        DataType::Int32 => read_into!(i32, read_i32_into),
        DataType::UInt32 => read_into!(u32, read_u32_into),
        DataType::Int64 => read_into!(i64, read_i64_into),
        DataType::UInt64 => read_into!(u64, read_u64_into),
        DataType::Float32 => read_into!(f32, read_f32_into),
        DataType::Float64 => read_into!(f64, read_f64_into),
    }
}

/// Shape a vector of values, interpreting it in the given storage order.
pub fn build_array<T>(shape: &[usize], order: Order, values: Vec<T>) -> Result<NumericArray>
where
    T: Element,
    ArrayD<T>: Into<NumericArray>,
{
    let len = values.len();
    let array = match order {
        Order::RowMajor => ArrayD::from_shape_vec(IxDyn(shape), values),
        Order::ColumnMajor => ArrayD::from_shape_vec(IxDyn(shape).f(), values),
    };
    array.map(Into::into).map_err(|e| {
        ExtractError::dimension(format!("Cannot shape {} values as {:?}: {}", len, shape, e))
    })
}

/// Number of elements in `shape`, or a decode error when it overflows.
pub fn element_count(shape: &[usize], format: &'static str) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| ExtractError::decode(format, format!("array shape {:?} is too large", shape)))
}

/// Sequential reader over an in-memory file.
///
/// Every read reports truncation as a decode error naming the format.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
    format: &'static str,
}

impl<'a> ByteReader<'a> {
    /// Start reading `bytes` from the beginning.
    pub fn new(bytes: &'a [u8], format: &'static str) -> Self {
        Self {
            cursor: Cursor::new(bytes),
            format,
        }
    }

    /// Current offset from the start of the data.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    /// Whether every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread bytes, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        let data: &'a [u8] = self.cursor.get_ref();
        &data[self.position().min(data.len())..]
    }

    /// Build a decode error for this reader's format.
    pub fn error(&self, message: impl Into<String>) -> ExtractError {
        ExtractError::decode(self.format, message)
    }

    fn truncated(&self, what: &str) -> ExtractError {
        self.error(format!(
            "unexpected end of data reading {} at byte {}",
            what,
            self.position()
        ))
    }

    /// Big-endian 3-byte unsigned integer, as used by FreeSurfer.
    pub fn read_u24(&mut self) -> Result<u32> {
        self.cursor
            .read_u24::<BigEndian>()
            .map_err(|_| self.truncated("3-byte integer"))
    }

    pub fn read_i16<B: ByteOrder>(&mut self) -> Result<i16> {
        self.cursor
            .read_i16::<B>()
            .map_err(|_| self.truncated("int16"))
    }

    pub fn read_i32<B: ByteOrder>(&mut self) -> Result<i32> {
        self.cursor
            .read_i32::<B>()
            .map_err(|_| self.truncated("int32"))
    }

    pub fn read_i64<B: ByteOrder>(&mut self) -> Result<i64> {
        self.cursor
            .read_i64::<B>()
            .map_err(|_| self.truncated("int64"))
    }

    pub fn read_f32<B: ByteOrder>(&mut self) -> Result<f32> {
        self.cursor
            .read_f32::<B>()
            .map_err(|_| self.truncated("float32"))
    }

    pub fn read_f64<B: ByteOrder>(&mut self) -> Result<f64> {
        self.cursor
            .read_f64::<B>()
            .map_err(|_| self.truncated("float64"))
    }

    /// A count stored as a signed 32-bit integer; negative values are errors.
    pub fn read_count<B: ByteOrder>(&mut self, what: &str) -> Result<usize> {
        let value = self.read_i32::<B>()?;
        usize::try_from(value).map_err(|_| self.error(format!("negative {} ({})", what, value)))
    }

    /// Fail unless `count` records of at least `record_size` bytes each can
    /// still be read.
    pub fn ensure_records(&self, count: usize, record_size: usize, what: &str) -> Result<()> {
        match count.checked_mul(record_size) {
            Some(needed) if needed <= self.remaining() => Ok(()),
            _ => Err(self.error(format!(
                "{} {} do not fit in the remaining {} bytes",
                count,
                what,
                self.remaining()
            ))),
        }
    }

    /// Consume exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let rest = self.rest();
        if rest.len() < len {
            return Err(self.truncated(&format!("{} bytes", len)));
        }
        self.cursor.set_position((self.position() + len) as u64);
        Ok(&rest[..len])
    }

    /// Consume a line terminated by `\n` and return it without the terminator.
    ///
    /// At the end of the data the remaining bytes form the last line.
    pub fn read_line(&mut self) -> &'a [u8] {
        let rest = self.rest();
        let (line, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.cursor.set_position((self.position() + consumed) as u64);
        line
    }

    /// Consume `count` values of `data_type` as a 1-D array.
    pub fn read_array<B: ByteOrder>(
        &mut self,
        data_type: DataType,
        count: usize,
    ) -> Result<NumericArray> {
        let len = count
            .checked_mul(data_type.size())
            .ok_or_else(|| self.error(format!("array of {} values is too large", count)))?;
        let bytes = self.read_bytes(len)?;
        decode_values::<B>(bytes, data_type, &[count], Order::RowMajor, self.format)
    }

    /// Move to an absolute offset.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.cursor.get_ref().len() {
            return Err(self.error(format!("offset {} is past the end of the data", offset)));
        }
        self.cursor.set_position(offset as u64);
        Ok(())
    }
}
