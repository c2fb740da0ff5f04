//! Synthetic neuroimaging files for tests.
//!
//! Every writer produces the exact on-disk bytes of a small, valid file so
//! tests can exercise the decoders without shipping binary fixtures.

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use crate::constants::{FS_NEW_CURV_MAGIC, FS_TRIANGLE_MAGIC, MGH_DATA_OFFSET};

/// Write `bytes` to `dir/name` and return the full path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Gzip-compress `bytes` as a single member.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Compress `bytes` as a zlib stream.
pub fn zlib(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// Typed values shared by the array-carrying fixtures.
#[derive(Debug, Clone)]
pub enum Values {
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
}

impl Values {
    fn encode<B: ByteOrder>(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Values::Int16(values) => values.iter().for_each(|v| out.write_i16::<B>(*v).unwrap()),
            Values::Int32(values) => values.iter().for_each(|v| out.write_i32::<B>(*v).unwrap()),
            Values::Float32(values) => values.iter().for_each(|v| out.write_f32::<B>(*v).unwrap()),
        }
        out
    }

    fn to_ascii(&self) -> String {
        let tokens: Vec<String> = match self {
            Values::Int16(values) => values.iter().map(ToString::to_string).collect(),
            Values::Int32(values) => values.iter().map(ToString::to_string).collect(),
            Values::Float32(values) => values.iter().map(ToString::to_string).collect(),
        };
        tokens.join(" ")
    }
}

// --- FreeSurfer ---

/// A triangle surface, optionally with a volume-info footer.
#[derive(Debug, Clone)]
pub struct SurfaceFixture {
    pub coords: Vec<[f32; 3]>,
    pub faces: Vec<[i32; 3]>,
    pub cras: Option<[f64; 3]>,
}

impl SurfaceFixture {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u24::<BigEndian>(FS_TRIANGLE_MAGIC).unwrap();
        out.extend_from_slice(b"created by nisight\n\n");
        out.write_i32::<BigEndian>(self.coords.len() as i32).unwrap();
        out.write_i32::<BigEndian>(self.faces.len() as i32).unwrap();
        for coord in self.coords.iter().flatten() {
            out.write_f32::<BigEndian>(*coord).unwrap();
        }
        for index in self.faces.iter().flatten() {
            out.write_i32::<BigEndian>(*index).unwrap();
        }
        if let Some([x, y, z]) = self.cras {
            for tag in [2, 0, 20] {
                out.write_i32::<BigEndian>(tag).unwrap();
            }
            let footer = format!(
                "valid = 1  # volume info valid\n\
                 filename = /subjects/bert/mri/orig.mgz\n\
                 volume = 256 256 256\n\
                 voxelsize = 1.0 1.0 1.0\n\
                 xras   = -1.0 0.0 0.0\n\
                 yras   = 0.0 0.0 -1.0\n\
                 zras   = 0.0 1.0 0.0\n\
                 cras   = {} {} {}\n",
                x, y, z
            );
            out.extend_from_slice(footer.as_bytes());
        }
        out
    }
}

/// A quad surface with fixed-point coordinates (`magic` 0xFFFFFF).
pub fn quad_surface(magic: u32, coords: &[[i16; 3]], quads: &[[u32; 4]]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u24::<BigEndian>(magic).unwrap();
    out.write_u24::<BigEndian>(coords.len() as u32).unwrap();
    out.write_u24::<BigEndian>(quads.len() as u32).unwrap();
    for coord in coords.iter().flatten() {
        out.write_i16::<BigEndian>(*coord).unwrap();
    }
    for index in quads.iter().flatten() {
        out.write_u24::<BigEndian>(*index).unwrap();
    }
    out
}

/// New-style morphometry with `f32` values.
pub fn morph_new(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u24::<BigEndian>(FS_NEW_CURV_MAGIC).unwrap();
    out.write_i32::<BigEndian>(values.len() as i32).unwrap();
    out.write_i32::<BigEndian>(0).unwrap();
    out.write_i32::<BigEndian>(1).unwrap();
    out.extend(Values::Float32(values.to_vec()).encode::<BigEndian>());
    out
}

/// Old-style morphometry with `i16` values scaled by 100.
pub fn morph_old(values: &[i16]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u24::<BigEndian>(values.len() as u32).unwrap();
    out.write_u24::<BigEndian>(0).unwrap();
    out.extend(Values::Int16(values.to_vec()).encode::<BigEndian>());
    out
}

/// An annotation with a colour table in either layout.
#[derive(Debug, Clone)]
pub struct AnnotFixture {
    /// Packed RGB value per vertex
    pub values: Vec<i32>,
    pub entries: Vec<(String, [i32; 4])>,
    pub old_table: bool,
}

fn write_string(out: &mut Vec<u8>, text: &str) {
    out.write_i32::<BigEndian>(text.len() as i32 + 1).unwrap();
    out.extend_from_slice(text.as_bytes());
    out.push(0);
}

fn annot_vertices(values: &[i32]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_i32::<BigEndian>(values.len() as i32).unwrap();
    for (vertex, value) in values.iter().enumerate() {
        out.write_i32::<BigEndian>(vertex as i32).unwrap();
        out.write_i32::<BigEndian>(*value).unwrap();
    }
    out
}

impl AnnotFixture {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = annot_vertices(&self.values);
        out.write_i32::<BigEndian>(1).unwrap();
        if self.old_table {
            out.write_i32::<BigEndian>(self.entries.len() as i32).unwrap();
            write_string(&mut out, "colortable.txt");
            for (name, rgba) in &self.entries {
                write_string(&mut out, name);
                rgba.iter().for_each(|c| out.write_i32::<BigEndian>(*c).unwrap());
            }
        } else {
            out.write_i32::<BigEndian>(-2).unwrap();
            out.write_i32::<BigEndian>(self.entries.len() as i32).unwrap();
            write_string(&mut out, "/usr/local/freesurfer/FreeSurferColorLUT.txt");
            out.write_i32::<BigEndian>(self.entries.len() as i32).unwrap();
            for (index, (name, rgba)) in self.entries.iter().enumerate() {
                out.write_i32::<BigEndian>(index as i32).unwrap();
                write_string(&mut out, name);
                rgba.iter().for_each(|c| out.write_i32::<BigEndian>(*c).unwrap());
            }
        }
        out
    }
}

/// An annotation whose colour table flag is zero.
pub fn annot_without_color_table(values: &[i32]) -> Vec<u8> {
    let mut out = annot_vertices(values);
    out.write_i32::<BigEndian>(0).unwrap();
    out
}

/// An ASCII label with one `(vertex, value)` per row.
pub fn label(rows: &[(i64, f64)]) -> Vec<u8> {
    let mut text = format!(
        "#!ascii label  , from subject bert vox2ras=TkReg\n{}\n",
        rows.len()
    );
    for (vertex, value) in rows {
        text.push_str(&format!("{}  -41.250  12.500  30.000 {}\n", vertex, value));
    }
    text.into_bytes()
}

// --- GIFTI ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftiEncoding {
    Ascii,
    Base64,
    GzipBase64,
}

/// One `DataArray` of a GIFTI document.
#[derive(Debug, Clone)]
pub struct GiftiArray {
    intent: String,
    shape: Vec<usize>,
    values: Values,
    encoding: GiftiEncoding,
    big_endian: bool,
    column_major: bool,
}

impl GiftiArray {
    fn new(intent: &str, shape: &[usize], values: Values) -> Self {
        Self {
            intent: intent.to_string(),
            shape: shape.to_vec(),
            values,
            encoding: GiftiEncoding::Base64,
            big_endian: false,
            column_major: false,
        }
    }

    pub fn float32(intent: &str, shape: &[usize], values: &[f32]) -> Self {
        Self::new(intent, shape, Values::Float32(values.to_vec()))
    }

    pub fn int32(intent: &str, shape: &[usize], values: &[i32]) -> Self {
        Self::new(intent, shape, Values::Int32(values.to_vec()))
    }

    pub fn encoded(mut self, encoding: GiftiEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    /// Mark `values` as stored column-major.
    pub fn column_major(mut self) -> Self {
        self.column_major = true;
        self
    }

    fn to_xml(&self) -> String {
        let data_type = match self.values {
            Values::Int16(_) => "NIFTI_TYPE_INT16",
            Values::Int32(_) => "NIFTI_TYPE_INT32",
            Values::Float32(_) => "NIFTI_TYPE_FLOAT32",
        };
        let raw = if self.big_endian {
            self.values.encode::<BigEndian>()
        } else {
            self.values.encode::<LittleEndian>()
        };
        let (encoding, payload) = match self.encoding {
            GiftiEncoding::Ascii => ("ASCII", self.values.to_ascii()),
            GiftiEncoding::Base64 => (
                "Base64Binary",
                base64::engine::general_purpose::STANDARD.encode(raw),
            ),
            GiftiEncoding::GzipBase64 => (
                "GZipBase64Binary",
                base64::engine::general_purpose::STANDARD.encode(zlib(&raw)),
            ),
        };
        let dims: String = self
            .shape
            .iter()
            .enumerate()
            .map(|(axis, size)| format!(" Dim{}=\"{}\"", axis, size))
            .collect();
        format!(
            "  <DataArray Intent=\"{intent}\" DataType=\"{data_type}\" \
             ArrayIndexingOrder=\"{order}\" Dimensionality=\"{rank}\"{dims} \
             Encoding=\"{encoding}\" Endian=\"{endian}\" ExternalFileName=\"\" \
             ExternalFileOffset=\"\">\n\
             \x20   <MetaData>\n\
             \x20     <MD><Name><![CDATA[AnatomicalStructurePrimary]]></Name>\
             <Value><![CDATA[CortexLeft]]></Value></MD>\n\
             \x20   </MetaData>\n\
             \x20   <Data>{payload}</Data>\n\
             \x20 </DataArray>\n",
            intent = self.intent,
            data_type = data_type,
            order = if self.column_major { "ColumnMajorOrder" } else { "RowMajorOrder" },
            rank = self.shape.len(),
            dims = dims,
            encoding = encoding,
            endian = if self.big_endian { "BigEndian" } else { "LittleEndian" },
            payload = payload,
        )
    }
}

/// A complete GIFTI document holding `arrays` in order.
pub fn gifti_document(arrays: &[GiftiArray]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <!DOCTYPE GIFTI SYSTEM \"http://www.nitrc.org/frs/download.php/115/gifti.dtd\">\n\
         <GIFTI Version=\"1.0\" NumberOfDataArrays=\"{}\">\n\
         \x20 <MetaData/>\n\
         \x20 <LabelTable/>\n",
        arrays.len()
    );
    for array in arrays {
        xml.push_str(&array.to_xml());
    }
    xml.push_str("</GIFTI>\n");
    xml
}

// --- Volumes ---

/// A single-file NIfTI volume; `values` are in column-major order.
#[derive(Debug, Clone)]
pub struct NiftiFixture {
    dims: Vec<usize>,
    values: Values,
    big_endian: bool,
    version2: bool,
    scaling: (f64, f64),
}

impl NiftiFixture {
    fn new(dims: &[usize], values: Values) -> Self {
        Self {
            dims: dims.to_vec(),
            values,
            big_endian: false,
            version2: false,
            scaling: (0.0, 0.0),
        }
    }

    pub fn int16(dims: &[usize], values: &[i16]) -> Self {
        Self::new(dims, Values::Int16(values.to_vec()))
    }

    pub fn float32(dims: &[usize], values: &[f32]) -> Self {
        Self::new(dims, Values::Float32(values.to_vec()))
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn version2(mut self) -> Self {
        self.version2 = true;
        self
    }

    pub fn scaled(mut self, slope: f64, inter: f64) -> Self {
        self.scaling = (slope, inter);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        if self.big_endian {
            self.encode::<BigEndian>()
        } else {
            self.encode::<LittleEndian>()
        }
    }

    fn datatype(&self) -> (i16, i16) {
        match self.values {
            Values::Int16(_) => (4, 16),
            Values::Int32(_) => (8, 32),
            Values::Float32(_) => (16, 32),
        }
    }

    fn encode<B: ByteOrder>(&self) -> Vec<u8> {
        let (datatype, bitpix) = self.datatype();
        let (slope, inter) = self.scaling;
        let mut dim = [1i64; 8];
        dim[0] = self.dims.len() as i64;
        for (slot, size) in dim[1..].iter_mut().zip(&self.dims) {
            *slot = *size as i64;
        }

        let mut header = if self.version2 {
            let mut h = vec![0u8; 544];
            B::write_i32(&mut h[0..4], 540);
            h[4..12].copy_from_slice(b"n+2\0\r\n\x1a\n");
            B::write_i16(&mut h[12..14], datatype);
            B::write_i16(&mut h[14..16], bitpix);
            for (i, value) in dim.iter().enumerate() {
                B::write_i64(&mut h[16 + i * 8..24 + i * 8], *value);
            }
            B::write_i64(&mut h[168..176], 544);
            B::write_f64(&mut h[176..184], slope);
            B::write_f64(&mut h[184..192], inter);
            h
        } else {
            let mut h = vec![0u8; 352];
            B::write_i32(&mut h[0..4], 348);
            for (i, value) in dim.iter().enumerate() {
                B::write_i16(&mut h[40 + i * 2..42 + i * 2], *value as i16);
            }
            B::write_i16(&mut h[70..72], datatype);
            B::write_i16(&mut h[72..74], bitpix);
            B::write_f32(&mut h[108..112], 352.0);
            B::write_f32(&mut h[112..116], slope as f32);
            B::write_f32(&mut h[116..120], inter as f32);
            h[344..348].copy_from_slice(b"n+1\0");
            h
        };
        header.extend(self.values.encode::<B>());
        header
    }
}

/// An uncompressed MGH volume of `f32` values in column-major order.
pub fn mgh_f32(dims: &[usize], values: &[f32]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_i32::<BigEndian>(1).unwrap();
    for axis in 0..4 {
        let size = dims.get(axis).copied().unwrap_or(1);
        out.write_i32::<BigEndian>(size as i32).unwrap();
    }
    out.write_i32::<BigEndian>(3).unwrap();
    out.write_i32::<BigEndian>(0).unwrap();
    out.write_i16::<BigEndian>(1).unwrap();
    let identity = [1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    for value in [1.0f32, 1.0, 1.0].iter().chain(&identity).chain(&[0.0f32; 3]) {
        out.write_f32::<BigEndian>(*value).unwrap();
    }
    out.resize(MGH_DATA_OFFSET, 0);
    out.extend(Values::Float32(values.to_vec()).encode::<BigEndian>());
    out
}
