//! Single-file NIfTI-1 and NIfTI-2 volumes (`.nii`, `.nii.gz`).
//!
//! Byte order is detected from `sizeof_hdr`, which must read 348 (NIfTI-1) or
//! 540 (NIfTI-2). Voxel data starts at `vox_offset` and is stored
//! column-major. When the header carries a non-trivial `scl_slope` the voxel
//! values are scaled into floating point.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::array::{DataType, NumericArray};
use crate::codec::binary::{ByteReader, Endian, Order};
use crate::constants::{NIFTI1_HEADER_SIZE, NIFTI2_HEADER_SIZE};
use crate::error::{ExtractError, Result};

const FORMAT: &str = "NIfTI";

/// The header fields needed to locate and interpret the voxel data.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// 1 or 2
    pub version: u8,
    pub endian: Endian,
    /// Grid size along each used dimension
    pub dims: Vec<usize>,
    pub data_type: DataType,
    pub vox_offset: usize,
    pub scl_slope: f64,
    pub scl_inter: f64,
}

/// A decoded volume.
#[derive(Debug, Clone)]
pub struct NiftiImage {
    pub header: NiftiHeader,
    /// Voxel values with shape `header.dims`, scaled when the header says so
    pub data: NumericArray,
}

impl NiftiHeader {
    /// Whether voxel values must be mapped through `slope * v + inter`.
    pub fn has_scaling(&self) -> bool {
        self.scl_slope.is_finite()
            && self.scl_slope != 0.0
            && !(self.scl_slope == 1.0 && self.effective_intercept() == 0.0)
    }

    fn effective_intercept(&self) -> f64 {
        if self.scl_inter.is_finite() {
            self.scl_inter
        } else {
            0.0
        }
    }
}

/// Decode a single-file NIfTI volume.
pub fn read_nifti(bytes: &[u8]) -> Result<NiftiImage> {
    let header = read_header(bytes)?;
    log::trace!("NIfTI header: {:?}", header);
    log::debug!(
        "NIfTI-{} {:?}-endian volume, dims {:?}, {}",
        header.version,
        header.endian,
        header.dims,
        header.data_type
    );
    let voxels = bytes.get(header.vox_offset..).ok_or_else(|| {
        ExtractError::decode(
            FORMAT,
            format!("vox_offset {} is past the end of the file", header.vox_offset),
        )
    })?;
    let data = header.endian.decode_values(
        voxels,
        header.data_type,
        &header.dims,
        Order::ColumnMajor,
        FORMAT,
    )?;
    let data = if header.has_scaling() {
        apply_scaling(&data, &header)
    } else {
        data
    };
    Ok(NiftiImage { header, data })
}

/// Parse and validate the header at the start of `bytes`.
pub fn read_header(bytes: &[u8]) -> Result<NiftiHeader> {
    let probe = bytes
        .get(..4)
        .ok_or_else(|| ExtractError::decode(FORMAT, "file is shorter than a header"))?;
    let as_size = |value: i32| usize::try_from(value).ok();
    match (
        as_size(LittleEndian::read_i32(probe)),
        as_size(BigEndian::read_i32(probe)),
    ) {
        (Some(NIFTI1_HEADER_SIZE), _) => read_nifti1::<LittleEndian>(bytes, Endian::Little),
        (_, Some(NIFTI1_HEADER_SIZE)) => read_nifti1::<BigEndian>(bytes, Endian::Big),
        (Some(NIFTI2_HEADER_SIZE), _) => read_nifti2::<LittleEndian>(bytes, Endian::Little),
        (_, Some(NIFTI2_HEADER_SIZE)) => read_nifti2::<BigEndian>(bytes, Endian::Big),
        _ => Err(ExtractError::decode(
            FORMAT,
            "sizeof_hdr is neither 348 nor 540",
        )),
    }
}

fn read_nifti1<B: ByteOrder>(bytes: &[u8], endian: Endian) -> Result<NiftiHeader> {
    if bytes.len() < NIFTI1_HEADER_SIZE {
        return Err(ExtractError::decode(FORMAT, "truncated NIfTI-1 header"));
    }
    check_magic(&bytes[344..348], b"n+1\0", b"ni1\0")?;

    let mut reader = ByteReader::new(bytes, FORMAT);
    reader.seek(40)?;
    let mut dim = [0i64; 8];
    for value in &mut dim {
        *value = i64::from(reader.read_i16::<B>()?);
    }
    reader.seek(70)?;
    let datatype = reader.read_i16::<B>()?;
    reader.seek(108)?;
    let vox_offset = f64::from(reader.read_f32::<B>()?);
    let scl_slope = f64::from(reader.read_f32::<B>()?);
    let scl_inter = f64::from(reader.read_f32::<B>()?);

    Ok(NiftiHeader {
        version: 1,
        endian,
        dims: used_dims(&dim)?,
        data_type: parse_datatype(datatype)?,
        vox_offset: data_offset(vox_offset, NIFTI1_HEADER_SIZE)?,
        scl_slope,
        scl_inter,
    })
}

fn read_nifti2<B: ByteOrder>(bytes: &[u8], endian: Endian) -> Result<NiftiHeader> {
    if bytes.len() < NIFTI2_HEADER_SIZE {
        return Err(ExtractError::decode(FORMAT, "truncated NIfTI-2 header"));
    }
    check_magic(&bytes[4..8], b"n+2\0", b"ni2\0")?;

    let mut reader = ByteReader::new(bytes, FORMAT);
    reader.seek(12)?;
    let datatype = reader.read_i16::<B>()?;
    let _bitpix = reader.read_i16::<B>()?;
    let mut dim = [0i64; 8];
    for value in &mut dim {
        *value = reader.read_i64::<B>()?;
    }
    reader.seek(168)?;
    let vox_offset = reader.read_i64::<B>()?;
    let scl_slope = reader.read_f64::<B>()?;
    let scl_inter = reader.read_f64::<B>()?;

    let vox_offset = usize::try_from(vox_offset)
        .map_err(|_| ExtractError::decode(FORMAT, format!("negative vox_offset {}", vox_offset)))?;
    Ok(NiftiHeader {
        version: 2,
        endian,
        dims: used_dims(&dim)?,
        data_type: parse_datatype(datatype)?,
        vox_offset: vox_offset.max(NIFTI2_HEADER_SIZE + 4),
        scl_slope,
        scl_inter,
    })
}

fn check_magic(magic: &[u8], single: &[u8; 4], pair: &[u8; 4]) -> Result<()> {
    if magic == single {
        Ok(())
    } else if magic == pair {
        Err(ExtractError::unsupported_format(
            "NIfTI header/image pairs (.hdr/.img) are not supported",
        ))
    } else {
        Err(ExtractError::decode(
            FORMAT,
            format!("unrecognized magic {:?}", String::from_utf8_lossy(magic)),
        ))
    }
}

/// `dim[0]` is the rank; `dim[1..=rank]` are the sizes.
fn used_dims(dim: &[i64; 8]) -> Result<Vec<usize>> {
    let rank = dim[0];
    if !(1..=7).contains(&rank) {
        return Err(ExtractError::decode(FORMAT, format!("invalid dim[0] = {}", rank)));
    }
    dim[1..=rank as usize]
        .iter()
        .map(|&size| {
            usize::try_from(size)
                .map_err(|_| ExtractError::decode(FORMAT, format!("negative dimension {}", size)))
        })
        .collect()
}

fn data_offset(vox_offset: f64, header_size: usize) -> Result<usize> {
    if !vox_offset.is_finite() || vox_offset < 0.0 {
        return Err(ExtractError::decode(
            FORMAT,
            format!("invalid vox_offset {}", vox_offset),
        ));
    }
    // Single-file volumes place data after the header and its 4-byte extension flag.
    Ok((vox_offset as usize).max(header_size + 4))
}

fn parse_datatype(code: i16) -> Result<DataType> {
    let data_type = match code {
        2 => DataType::UInt8,
        4 => DataType::Int16,
        8 => DataType::Int32,
        16 => DataType::Float32,
        64 => DataType::Float64,
        256 => DataType::Int8,
        512 => DataType::UInt16,
        768 => DataType::UInt32,
        1024 => DataType::Int64,
        1280 => DataType::UInt64,
        other => {
            return Err(ExtractError::unsupported_format(format!(
                "NIfTI datatype code {} is not supported",
                other
            )));
        }
    };
    Ok(data_type)
}

/// NIfTI-1 stores `float32` scale factors, so small integer and `float32`
/// volumes scale to `float32`. NIfTI-2 factors are `float64` and every
/// volume scales to `float64`, as do wider types in either version.
fn apply_scaling(data: &NumericArray, header: &NiftiHeader) -> NumericArray {
    let (slope, inter) = (header.scl_slope, header.effective_intercept());
    let scaled = data.to_f64().mapv(|v| v * slope + inter);
    let narrow = matches!(
        data.data_type(),
        DataType::UInt8 | DataType::Int8 | DataType::Int16 | DataType::UInt16 | DataType::Float32
    );
    if header.version == 1 && narrow {
        NumericArray::Float32(scaled.mapv(|v| v as f32))
    } else {
        NumericArray::Float64(scaled)
    }
}
