//! FreeSurfer per-vertex morphometry (`.curv`, `.sulc`, `.thickness`, `.area`).

use byteorder::BigEndian;

use crate::array::{DataType, NumericArray};
use crate::codec::binary::ByteReader;
use crate::constants::{FS_FIXED_POINT_SCALE, FS_NEW_CURV_MAGIC};
use crate::error::Result;

const FORMAT: &str = "FreeSurfer morphometry";

/// Decode a morphometry file into a 1-D array with one value per vertex.
///
/// New-style files hold `f32` values; old-style files hold `i16` values scaled
/// by 100 and decode to `f64`.
pub fn read_morph_data(bytes: &[u8]) -> Result<NumericArray> {
    let mut reader = ByteReader::new(bytes, FORMAT);
    let magic = reader.read_u24()?;
    if magic == FS_NEW_CURV_MAGIC {
        let vertex_count = reader.read_count::<BigEndian>("vertex count")?;
        let _face_count = reader.read_i32::<BigEndian>()?;
        let values_per_vertex = reader.read_i32::<BigEndian>()?;
        if values_per_vertex != 1 {
            log::warn!(
                "Morphometry file declares {} values per vertex, reading one",
                values_per_vertex
            );
        }
        log::debug!("New-style morphometry with {} vertices", vertex_count);
        reader.read_array::<BigEndian>(DataType::Float32, vertex_count)
    } else {
        let vertex_count = magic as usize;
        let _face_count = reader.read_u24()?;
        log::debug!("Old-style morphometry with {} vertices", vertex_count);
        reader.ensure_records(vertex_count, 2, "values")?;
        let mut values = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            values.push(f64::from(reader.read_i16::<BigEndian>()?) / FS_FIXED_POINT_SCALE);
        }
        Ok(NumericArray::from_vec(values))
    }
}
