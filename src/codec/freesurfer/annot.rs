//! FreeSurfer parcellation annotations (`.annot`).
//!
//! An annotation stores one packed RGB value per vertex plus a colour table.
//! Decoding maps each packed value to the index of the matching colour table
//! row, with `-1` for unlabelled vertices.

use std::collections::BTreeMap;

use byteorder::BigEndian;

use crate::codec::binary::ByteReader;
use crate::constants::FS_ANNOT_CTAB_VERSION;
use crate::error::Result;

const FORMAT: &str = "FreeSurfer annotation";

/// One row of an annotation colour table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    /// Row of the structure in the colour table
    pub index: usize,
    pub name: String,
    /// Red, green, blue and alpha (transparency) components
    pub rgba: [i32; 4],
}

impl ColorEntry {
    /// Packed RGB value vertices of this structure are tagged with.
    pub fn annotation(&self) -> i32 {
        let [r, g, b, _] = self.rgba;
        r + (g << 8) + (b << 16)
    }
}

/// A decoded annotation.
#[derive(Debug, Clone)]
pub struct Annotation {
    /// Colour table row per vertex, `-1` when unlabelled or unmatched
    pub labels: Vec<i32>,
    /// Defined rows in ascending index order
    pub color_table: Vec<ColorEntry>,
}

/// Decode an annotation file.
pub fn read_annot(bytes: &[u8]) -> Result<Annotation> {
    let mut reader = ByteReader::new(bytes, FORMAT);
    let vertex_count = reader.read_count::<BigEndian>("vertex count")?;
    reader.ensure_records(vertex_count, 8, "vertex labels")?;
    let mut packed = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let _vertex = reader.read_i32::<BigEndian>()?;
        packed.push(reader.read_i32::<BigEndian>()?);
    }

    let has_color_table = reader.read_i32::<BigEndian>()?;
    if has_color_table == 0 {
        return Err(reader.error("color table not found in annotation file"));
    }
    let entry_count = reader.read_i32::<BigEndian>()?;
    let color_table = if entry_count > 0 {
        read_old_color_table(&mut reader, entry_count as usize)?
    } else {
        let version = -entry_count;
        if version != FS_ANNOT_CTAB_VERSION {
            return Err(reader.error(format!(
                "unrecognised color table version {}",
                version
            )));
        }
        read_color_table_v2(&mut reader)?
    };

    let labels = packed
        .iter()
        .map(|&value| lookup_label(&color_table, value))
        .collect::<Vec<_>>();
    let unmatched = packed
        .iter()
        .zip(&labels)
        .filter(|&(&value, &label)| value != 0 && label == -1)
        .count();
    if unmatched > 0 {
        log::debug!("{} vertices carry a value missing from the color table", unmatched);
    }
    log::debug!(
        "Annotation with {} vertices and {} structures",
        labels.len(),
        color_table.len()
    );
    Ok(Annotation {
        labels,
        color_table,
    })
}

/// Row index of the lowest entry whose packed value equals `value`.
fn lookup_label(color_table: &[ColorEntry], value: i32) -> i32 {
    if value == 0 {
        return -1;
    }
    color_table
        .iter()
        .find(|entry| entry.annotation() == value)
        .and_then(|entry| i32::try_from(entry.index).ok())
        .unwrap_or(-1)
}

fn read_string(reader: &mut ByteReader<'_>, what: &str) -> Result<String> {
    let len = reader.read_count::<BigEndian>(what)?;
    let raw = reader.read_bytes(len)?;
    let text = raw.split(|&b| b == 0).next().unwrap_or_default();
    Ok(String::from_utf8_lossy(text).into_owned())
}

fn read_rgba(reader: &mut ByteReader<'_>) -> Result<[i32; 4]> {
    let mut rgba = [0i32; 4];
    for component in &mut rgba {
        *component = reader.read_i32::<BigEndian>()?;
    }
    Ok(rgba)
}

fn read_old_color_table(reader: &mut ByteReader<'_>, entry_count: usize) -> Result<Vec<ColorEntry>> {
    let _source = read_string(reader, "color table file name length")?;
    // Name length plus four colour components.
    reader.ensure_records(entry_count, 20, "color table entries")?;
    let mut table = Vec::with_capacity(entry_count);
    for index in 0..entry_count {
        let name = read_string(reader, "structure name length")?;
        let rgba = read_rgba(reader)?;
        table.push(ColorEntry { index, name, rgba });
    }
    Ok(table)
}

/// Version 2 tables list `entries` rows addressed by explicit index below
/// `max_index`. Only written rows are kept; a repeated index keeps the last.
fn read_color_table_v2(reader: &mut ByteReader<'_>) -> Result<Vec<ColorEntry>> {
    let max_index = reader.read_count::<BigEndian>("color table size")?;
    let _source = read_string(reader, "color table file name length")?;
    let entries = reader.read_count::<BigEndian>("color table entry count")?;
    // Index, name length and four colour components.
    reader.ensure_records(entries, 24, "color table entries")?;

    let mut table = BTreeMap::new();
    for _ in 0..entries {
        let index = reader.read_count::<BigEndian>("structure index")?;
        if index >= max_index {
            return Err(reader.error(format!(
                "structure index {} outside a table of {} rows",
                index, max_index
            )));
        }
        let name = read_string(reader, "structure name length")?;
        let rgba = read_rgba(reader)?;
        table.insert(index, ColorEntry { index, name, rgba });
    }
    Ok(table.into_values().collect())
}
