//! Reading raw file contents, transparently inflating gzip members.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::{MultiGzDecoder, ZlibDecoder};

use crate::constants::GZIP_MAGIC;
use crate::error::{ExtractError, Result};

/// Read a whole file, decompressing it when `compressed` is set.
///
/// The decoder is drained and dropped before returning, so no stream outlives
/// the call.
pub fn read_source(path: &Path, compressed: bool) -> Result<Vec<u8>> {
    if compressed {
        read_gzip(path)
    } else {
        Ok(std::fs::read(path)?)
    }
}

/// Read and inflate a gzip file.
pub fn read_gzip(path: &Path) -> Result<Vec<u8>> {
    let mut file = BufReader::new(File::open(path)?);
    let mut magic = [0u8; 2];
    let peeked = file.read(&mut magic)?;
    if !is_gzip(&magic[..peeked]) {
        return Err(ExtractError::decode(
            "gzip",
            format!("{} does not start with a gzip header", path.display()),
        ));
    }
    let mut decoder = MultiGzDecoder::new((&magic[..peeked]).chain(file));
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::decode("gzip", format!("{}: {}", path.display(), e)))?;
    log::debug!("Inflated {:?} to {} bytes", path, bytes.len());
    Ok(bytes)
}

/// Inflate an in-memory zlib stream.
pub fn inflate_zlib(data: &[u8], format: &'static str) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::decode(format, format!("zlib stream: {}", e)))?;
    Ok(bytes)
}

/// Whether `bytes` start with a gzip member header.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}
