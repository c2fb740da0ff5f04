//! Data map decoding: one dispatch arm per map format.

use std::path::Path;

use crate::array::NumericArray;
use crate::codec::{self, freesurfer};
use crate::decode::normalize::{normalize, ElementLayout};
use crate::error::{ExtractError, Result};
use crate::format::MapFormat;
use crate::model::DataMap;

/// Decode the values stored at `path` without shaping them.
///
/// Volumes keep their grid shape; per-vertex formats come back 1-D, except
/// GIFTI whose arrays are stacked as columns.
pub fn decode_raw(path: &Path, format: MapFormat) -> Result<NumericArray> {
    let raw = match format {
        MapFormat::Nifti { compressed } => {
            let bytes = codec::read_source(path, compressed)?;
            codec::read_nifti(&bytes)?.data
        }
        MapFormat::Mgz => {
            let bytes = codec::read_source(path, true)?;
            codec::read_mgh(&bytes)?.data
        }
        MapFormat::Morphometry => freesurfer::read_morph_data(&codec::read_source(path, false)?)?,
        MapFormat::Annotation => {
            let annotation = freesurfer::read_annot(&codec::read_source(path, false)?)?;
            NumericArray::from_vec(annotation.labels)
        }
        MapFormat::Label => {
            let vertices = freesurfer::read_label(&codec::read_source(path, false)?)?;
            NumericArray::from_vec(vertices)
        }
        MapFormat::Gifti { compressed } => {
            let bytes = codec::read_source(path, compressed)?;
            let image = codec::read_gifti(&bytes)?;
            if image.data_arrays.is_empty() {
                return Err(ExtractError::unsupported_format(format!(
                    "GIFTI file '{}' contains no data arrays.",
                    path.display()
                )));
            }
            let arrays: Vec<NumericArray> =
                image.data_arrays.into_iter().map(|array| array.data).collect();
            NumericArray::stack(&arrays)?.reversed_axes()
        }
    };
    log::debug!(
        "Decoded {:?} as {}: {} {:?}",
        path,
        format.display_name(),
        raw.data_type(),
        raw.shape()
    );
    Ok(raw)
}

/// Decode the map at `path` and shape it into `(elements, components)`.
pub fn decode_map(path: &Path, format: MapFormat) -> Result<DataMap> {
    let layout = if format.is_volume() {
        ElementLayout::Voxels
    } else {
        ElementLayout::Vertices
    };
    let values = normalize(decode_raw(path, format)?, layout)?;
    log::info!(
        "Decoded {:?}: {} elements x {} components",
        path,
        values.shape()[0],
        values.shape()[1]
    );
    Ok(DataMap::new(values))
}
