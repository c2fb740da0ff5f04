//! FreeSurfer MGH volumes (the payload of `.mgz` after inflation).

use byteorder::BigEndian;

use crate::array::{DataType, NumericArray};
use crate::codec::binary::{ByteReader, Endian, Order};
use crate::constants::MGH_DATA_OFFSET;
use crate::error::Result;

const FORMAT: &str = "MGH";

/// Fixed header of an MGH volume.
#[derive(Debug, Clone, PartialEq)]
pub struct MghHeader {
    /// Width, height, depth and number of frames
    pub dims: [usize; 4],
    pub data_type: DataType,
}

#[derive(Debug, Clone)]
pub struct MghImage {
    pub header: MghHeader,
    /// Voxel values with shape `(width, height, depth, frames)`
    pub data: NumericArray,
}

/// Decode an uncompressed MGH volume.
pub fn read_mgh(bytes: &[u8]) -> Result<MghImage> {
    let mut reader = ByteReader::new(bytes, FORMAT);
    let version = reader.read_i32::<BigEndian>()?;
    if version != 1 {
        return Err(reader.error(format!("unsupported version {}", version)));
    }
    let mut dims = [0usize; 4];
    for (dim, name) in dims.iter_mut().zip(["width", "height", "depth", "frame count"]) {
        *dim = reader.read_count::<BigEndian>(name)?;
    }
    let type_code = reader.read_i32::<BigEndian>()?;
    let data_type = match type_code {
        0 => DataType::UInt8,
        1 => DataType::Int32,
        3 => DataType::Float32,
        4 => DataType::Int16,
        other => return Err(reader.error(format!("unknown data type code {}", other))),
    };
    let dof = reader.read_i32::<BigEndian>()?;
    let good_ras_flag = reader.read_i16::<BigEndian>()?;
    // Voxel geometry sits between here and the data; it plays no part in decoding.
    log::trace!("MGH dof {} good_ras_flag {}", dof, good_ras_flag);
    reader.seek(MGH_DATA_OFFSET)?;
    log::debug!("MGH volume {:?} of {}", dims, data_type);
    let data = Endian::Big.decode_values(
        reader.rest(),
        data_type,
        &dims,
        Order::ColumnMajor,
        FORMAT,
    )?;
    Ok(MghImage {
        header: MghHeader { dims, data_type },
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures;

    #[test]
    fn test_read_mgh_volume() {
        let bytes = test_fixtures::mgh_f32(&[2, 1, 1, 2], &[1.0, 2.0, 3.0, 4.0]);
        let image = read_mgh(&bytes).unwrap();
        assert_eq!(image.header.dims, [2, 1, 1, 2]);
        assert_eq!(image.data.data_type(), DataType::Float32);
        // Column-major: frame 0 holds [1, 2], frame 1 holds [3, 4].
        let frame = image.data.first_along(3).unwrap();
        assert_eq!(serde_json::to_string(&frame).unwrap(), "[[[1.0]],[[2.0]]]");
    }

    #[test]
    fn test_unknown_type_code() {
        let mut bytes = test_fixtures::mgh_f32(&[1, 1, 1, 1], &[0.0]);
        bytes[20..24].copy_from_slice(&9i32.to_be_bytes());
        let err = read_mgh(&bytes).unwrap_err();
        assert_eq!(err.kind().name(), "DecodeError");
    }

    #[test]
    fn test_truncated_voxels() {
        let bytes = test_fixtures::mgh_f32(&[2, 2, 2, 1], &[0.0; 8]);
        let err = read_mgh(&bytes[..bytes.len() - 4]).unwrap_err();
        assert_eq!(err.kind().name(), "DecodeError");
    }
}
