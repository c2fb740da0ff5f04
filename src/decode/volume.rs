//! Single-frame volume views.

use std::path::Path;

use crate::decode::map::decode_raw;
use crate::error::{ExtractError, Result};
use crate::format::resolve_map;
use crate::model::VolumeFrame;

/// Decode a NIfTI or MGZ volume and keep only its first 3-D frame.
///
/// Trailing axes beyond the third are reduced to their first index. Volumes
/// with fewer than three axes are padded with unit axes.
pub fn decode_volume_frame(path: &Path) -> Result<VolumeFrame> {
    let format = resolve_map(path)?;
    if !format.is_volume() {
        return Err(ExtractError::unsupported_format(format!(
            "'{}' is a {} file, not a volume.",
            path.display(),
            format.display_name()
        )));
    }

    let mut data = decode_raw(path, format)?;
    while data.ndim() > 3 {
        let last = data.ndim() - 1;
        log::debug!("Taking frame 0 of {} along axis {}", data.shape()[last], last);
        data = data.first_along(last)?;
    }
    if data.ndim() < 3 {
        let mut padded = data.shape().to_vec();
        padded.resize(3, 1);
        data = data.reshape(&padded)?;
    }

    let shape = [data.shape()[0], data.shape()[1], data.shape()[2]];
    Ok(VolumeFrame { shape, data })
}
