//! FreeSurfer binary surface geometry (`lh.pial`, `rh.white`, ...).
//!
//! Three layouts share a 3-byte big-endian magic:
//!
//! - `0xFFFFFE` triangle surfaces: a creation stamp line, a blank line,
//!   `i32` vertex and face counts, `f32` coordinates, `i32` faces and an
//!   optional volume-info footer.
//! - `0xFFFFFF` quad surfaces with fixed-point `i16` coordinates.
//! - `0xFFFFFD` quad surfaces with `f32` coordinates.
//!
//! Quad surfaces store 3-byte counts and indices; each quad is split into two
//! triangles.

use byteorder::BigEndian;

use crate::array::{DataType, NumericArray};
use crate::codec::binary::ByteReader;
use crate::constants::{
    FS_FIXED_POINT_SCALE, FS_NEW_QUAD_MAGIC, FS_QUAD_MAGIC, FS_TRIANGLE_MAGIC,
    FS_VOLUME_INFO_KEYS,
};
use crate::error::Result;

const FORMAT: &str = "FreeSurfer surface";

/// Decoded surface geometry.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Vertex coordinates, shape `(n, 3)`
    pub coords: NumericArray,
    /// Triangle vertex indices, shape `(m, 3)`
    pub faces: NumericArray,
    /// Creation stamp of triangle surfaces
    pub created_by: Option<String>,
    /// Scanner geometry footer of triangle surfaces
    pub volume_info: Option<VolumeInfo>,
}

/// Volume geometry the surface was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeInfo {
    pub valid: String,
    pub filename: String,
    pub volume: [i64; 3],
    pub voxelsize: [f64; 3],
    pub xras: [f64; 3],
    pub yras: [f64; 3],
    pub zras: [f64; 3],
    /// Centre of the volume in RAS space
    pub cras: [f64; 3],
}

/// Decode a FreeSurfer surface file.
pub fn read_geometry(bytes: &[u8]) -> Result<Geometry> {
    let mut reader = ByteReader::new(bytes, FORMAT);
    let magic = reader.read_u24()?;
    match magic {
        FS_TRIANGLE_MAGIC => read_triangle_surface(&mut reader),
        FS_QUAD_MAGIC | FS_NEW_QUAD_MAGIC => read_quad_surface(&mut reader, magic),
        other => Err(reader.error(format!("unknown surface magic 0x{:06X}", other))),
    }
}

fn read_triangle_surface(reader: &mut ByteReader<'_>) -> Result<Geometry> {
    let created_by = String::from_utf8_lossy(reader.read_line()).trim().to_string();
    reader.read_line();

    let vertex_count = reader.read_count::<BigEndian>("vertex count")?;
    let face_count = reader.read_count::<BigEndian>("face count")?;
    reader.ensure_records(vertex_count, 12, "vertices")?;
    log::debug!(
        "Triangle surface with {} vertices and {} faces",
        vertex_count,
        face_count
    );

    let coords = reader
        .read_array::<BigEndian>(DataType::Float32, vertex_count * 3)?
        .reshape(&[vertex_count, 3])?;
    let faces = reader
        .read_array::<BigEndian>(DataType::Int32, face_count * 3)?
        .reshape(&[face_count, 3])?;
    let volume_info = read_volume_info(reader)?;

    Ok(Geometry {
        coords,
        faces,
        created_by: (!created_by.is_empty()).then_some(created_by),
        volume_info,
    })
}

fn read_quad_surface(reader: &mut ByteReader<'_>, magic: u32) -> Result<Geometry> {
    let vertex_count = reader.read_u24()? as usize;
    let quad_count = reader.read_u24()? as usize;
    let coord_size = if magic == FS_QUAD_MAGIC { 2 } else { 4 };
    reader.ensure_records(vertex_count, 3 * coord_size, "vertices")?;
    log::debug!(
        "Quad surface with {} vertices and {} quads",
        vertex_count,
        quad_count
    );

    let mut coords = Vec::with_capacity(vertex_count * 3);
    for _ in 0..vertex_count * 3 {
        let value = if magic == FS_QUAD_MAGIC {
            f64::from(reader.read_i16::<BigEndian>()?) / FS_FIXED_POINT_SCALE
        } else {
            f64::from(reader.read_f32::<BigEndian>()?)
        };
        coords.push(value);
    }

    reader.ensure_records(quad_count, 12, "quads")?;
    let mut faces = Vec::with_capacity(quad_count * 6);
    for _ in 0..quad_count {
        let mut quad = [0i32; 4];
        for corner in &mut quad {
            *corner = i32::try_from(reader.read_u24()?)
                .map_err(|_| reader.error("quad index out of range"))?;
        }
        faces.extend(split_quad(quad));
    }

    Ok(Geometry {
        coords: NumericArray::from_shape_vec(&[vertex_count, 3], coords)?,
        faces: NumericArray::from_shape_vec(&[quad_count * 2, 3], faces)?,
        created_by: None,
        volume_info: None,
    })
}

/// Split a quad into two triangles, alternating the diagonal on the parity
/// of the first corner.
fn split_quad(quad: [i32; 4]) -> [i32; 6] {
    let [q0, q1, q2, q3] = quad;
    if q0 % 2 == 0 {
        [q0, q1, q3, q2, q3, q1]
    } else {
        [q0, q1, q2, q0, q2, q3]
    }
}

/// Parse the optional footer after the face list.
///
/// An absent footer or an unrecognized tag yields `None`; a recognized tag
/// followed by malformed key/value lines is an error.
fn read_volume_info(reader: &mut ByteReader<'_>) -> Result<Option<VolumeInfo>> {
    if reader.is_at_end() {
        return Ok(None);
    }
    let head = match read_footer_tag(reader) {
        Some(head) => head,
        None => {
            log::warn!("Truncated volume info footer, ignoring it");
            return Ok(None);
        }
    };
    if !matches!(head.as_slice(), [20] | [2, 0, 20] | [2, 1, 20]) {
        log::warn!("Unknown extension code {:?}, ignoring volume info", head);
        return Ok(None);
    }

    let mut values: Vec<String> = Vec::with_capacity(FS_VOLUME_INFO_KEYS.len());
    for key in FS_VOLUME_INFO_KEYS {
        let line = String::from_utf8_lossy(reader.read_line()).into_owned();
        let pair: Vec<&str> = line.split('=').collect();
        match pair.as_slice() {
            [name, value] if name.trim() == key => values.push(value.trim().to_string()),
            _ => {
                return Err(reader.error(format!(
                    "error parsing volume info, expected '{} = ...' but found {:?}",
                    key, line
                )));
            }
        }
    }

    let info = VolumeInfo {
        valid: values[0].clone(),
        filename: values[1].clone(),
        volume: parse_triple(reader, "volume", &values[2])?,
        voxelsize: parse_triple(reader, "voxelsize", &values[3])?,
        xras: parse_triple(reader, "xras", &values[4])?,
        yras: parse_triple(reader, "yras", &values[5])?,
        zras: parse_triple(reader, "zras", &values[6])?,
        cras: parse_triple(reader, "cras", &values[7])?,
    };
    log::debug!("Volume info cras = {:?}", info.cras);
    Ok(Some(info))
}

/// The footer opens with `[20]` or a three-integer `[2, x, 20]` tag.
fn read_footer_tag(reader: &mut ByteReader<'_>) -> Option<Vec<i32>> {
    let first = reader.read_i32::<BigEndian>().ok()?;
    if first == 20 {
        return Some(vec![first]);
    }
    let second = reader.read_i32::<BigEndian>().ok()?;
    let third = reader.read_i32::<BigEndian>().ok()?;
    Some(vec![first, second, third])
}

fn parse_triple<T: std::str::FromStr + Copy + Default>(
    reader: &ByteReader<'_>,
    key: &str,
    value: &str,
) -> Result<[T; 3]> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(reader.error(format!("volume info '{}' needs three values", key)));
    }
    let mut out = [T::default(); 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| reader.error(format!("invalid '{}' value {:?}", key, part)))?;
    }
    Ok(out)
}
