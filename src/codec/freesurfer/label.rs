//! FreeSurfer ASCII labels (`.label`).
//!
//! After a comment line and a row-count line, every row reads
//! `vertex x y z value`. Only the vertex column is kept.

use crate::error::{ExtractError, Result};

const FORMAT: &str = "FreeSurfer label";

/// Decode a label file into the vertex indices it covers, in file order.
pub fn read_label(bytes: &[u8]) -> Result<Vec<i64>> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = text.lines();
    let _comment = lines.next();
    let declared = lines.next().and_then(|line| line.trim().parse::<usize>().ok());

    let mut vertices = Vec::new();
    for (row, line) in lines.enumerate() {
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        let vertex = first.parse::<i64>().map_err(|_| {
            ExtractError::decode(
                FORMAT,
                format!("row {} has a non-integer vertex {:?}", row + 1, first),
            )
        })?;
        vertices.push(vertex);
    }

    if let Some(declared) = declared {
        if declared != vertices.len() {
            log::warn!(
                "Label header declares {} vertices but {} rows were read",
                declared,
                vertices.len()
            );
        }
    }
    log::debug!("Label with {} vertices", vertices.len());
    Ok(vertices)
}
