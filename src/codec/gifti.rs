//! GIFTI (`.gii`) surface containers.
//!
//! A GIFTI file is XML holding a sequence of `DataArray` elements. Each array
//! declares its intent, element type, shape, storage order, byte order and
//! encoding in attributes and carries its payload in a `Data` child:
//!
//! | Encoding           | Payload                                  |
//! |--------------------|------------------------------------------|
//! | `ASCII`            | whitespace-separated numbers             |
//! | `Base64Binary`     | base64 of the raw values                 |
//! | `GZipBase64Binary` | base64 of a zlib stream of the raw values |
//! | `ExternalFileBinary` | values stored in another file (unsupported) |

use std::str::FromStr;

use base64::Engine;
use ndarray::ArrayD;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::array::{DataType, Element, NumericArray};
use crate::codec::binary::{build_array, element_count, Endian, Order};
use crate::codec::source::inflate_zlib;
use crate::constants::GIFTI_MAX_RANK;
use crate::error::{ExtractError, Result};

const FORMAT: &str = "GIFTI";

/// A parsed GIFTI document.
#[derive(Debug, Clone)]
pub struct GiftiImage {
    /// `Version` attribute of the root element
    pub version: Option<String>,
    /// Data arrays in file order
    pub data_arrays: Vec<GiftiDataArray>,
}

/// One decoded `DataArray`.
#[derive(Debug, Clone)]
pub struct GiftiDataArray {
    /// Intent name, e.g. `NIFTI_INTENT_POINTSET`
    pub intent: String,
    pub data: NumericArray,
}

impl GiftiImage {
    /// Number of arrays carrying `intent`.
    pub fn count_intent(&self, intent: &str) -> usize {
        self.data_arrays.iter().filter(|a| a.intent == intent).count()
    }

    /// Remove and return the first array carrying `intent`.
    pub fn take_first_with_intent(&mut self, intent: &str) -> Option<GiftiDataArray> {
        let position = self.data_arrays.iter().position(|a| a.intent == intent)?;
        Some(self.data_arrays.remove(position))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    Base64,
    GzipBase64,
    External,
}

#[derive(Debug, Clone)]
struct ArrayAttributes {
    intent: String,
    data_type: DataType,
    shape: Vec<usize>,
    order: Order,
    encoding: Encoding,
    endian: Endian,
}

/// Parse a GIFTI document and decode every data array.
pub fn read_gifti(bytes: &[u8]) -> Result<GiftiImage> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| ExtractError::decode(FORMAT, format!("not valid UTF-8 XML: {}", e)))?;
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut version = None;
    let mut data_arrays = Vec::new();
    let mut seen_root = false;

    // Attributes of the DataArray being read and its accumulated payload.
    let mut current: Option<(ArrayAttributes, Option<String>)> = None;
    let mut in_data = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"GIFTI" => {
                    seen_root = true;
                    version = attribute(e, b"Version")?;
                }
                b"DataArray" => current = Some((parse_attributes(e)?, None)),
                b"Data" if current.is_some() => {
                    in_data = true;
                    if let Some((_, data)) = current.as_mut() {
                        data.get_or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"DataArray" => {
                    return Err(ExtractError::decode(FORMAT, "DataArray without a Data element"));
                }
                b"Data" => {
                    if let Some((_, data)) = current.as_mut() {
                        data.get_or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_data => {
                let text = e.unescape()?;
                if let Some((_, Some(data))) = current.as_mut() {
                    data.push_str(&text);
                }
            }
            Ok(Event::CData(e)) if in_data => {
                let raw = e.into_inner();
                if let Some((_, Some(data))) = current.as_mut() {
                    data.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"Data" => in_data = false,
                b"DataArray" => {
                    if let Some((attrs, data)) = current.take() {
                        let data = data.ok_or_else(|| {
                            ExtractError::decode(FORMAT, "DataArray without a Data element")
                        })?;
                        let decoded = decode_payload(&attrs, &data)?;
                        log::debug!(
                            "DataArray {} ({}): {} {:?}",
                            data_arrays.len(),
                            attrs.intent,
                            attrs.data_type,
                            attrs.shape
                        );
                        data_arrays.push(GiftiDataArray {
                            intent: attrs.intent,
                            data: decoded,
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Xml(e)),
            _ => {}
        }
    }

    if !seen_root {
        return Err(ExtractError::decode(FORMAT, "missing <GIFTI> root element"));
    }
    Ok(GiftiImage {
        version,
        data_arrays,
    })
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_attributes(e: &BytesStart<'_>) -> Result<ArrayAttributes> {
    let mut intent = "NIFTI_INTENT_NONE".to_string();
    let mut data_type = None;
    let mut rank = None;
    let mut dims: Vec<(usize, usize)> = Vec::new();
    let mut order = Order::RowMajor;
    let mut encoding = Encoding::Ascii;
    let mut endian = Endian::Little;

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        match key.as_str() {
            "Intent" => intent = value,
            "DataType" => data_type = Some(parse_data_type(&value)?),
            "Dimensionality" => rank = Some(parse_number(&key, &value)?),
            "ArrayIndexingOrder" => {
                order = match value.as_str() {
                    "RowMajorOrder" => Order::RowMajor,
                    "ColumnMajorOrder" => Order::ColumnMajor,
                    other => return Err(invalid_attribute(&key, other)),
                }
            }
            "Encoding" => {
                encoding = match value.as_str() {
                    "ASCII" => Encoding::Ascii,
                    "Base64Binary" => Encoding::Base64,
                    "GZipBase64Binary" => Encoding::GzipBase64,
                    "ExternalFileBinary" => Encoding::External,
                    other => return Err(invalid_attribute(&key, other)),
                }
            }
            "Endian" => {
                endian = match value.as_str() {
                    "LittleEndian" => Endian::Little,
                    "BigEndian" => Endian::Big,
                    other => return Err(invalid_attribute(&key, other)),
                }
            }
            _ => {
                if let Some(axis) = key.strip_prefix("Dim").and_then(|n| n.parse::<usize>().ok()) {
                    dims.push((axis, parse_number(&key, &value)?));
                }
            }
        }
    }

    let data_type = data_type
        .ok_or_else(|| ExtractError::decode(FORMAT, "DataArray is missing its DataType"))?;
    let rank = rank
        .ok_or_else(|| ExtractError::decode(FORMAT, "DataArray is missing its Dimensionality"))?;
    if rank > GIFTI_MAX_RANK {
        return Err(ExtractError::decode(
            FORMAT,
            format!("Dimensionality {} exceeds {}", rank, GIFTI_MAX_RANK),
        ));
    }
    let mut shape = Vec::with_capacity(rank);
    for axis in 0..rank {
        let size = dims
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|(_, size)| *size)
            .ok_or_else(|| ExtractError::decode(FORMAT, format!("DataArray is missing Dim{}", axis)))?;
        shape.push(size);
    }

    Ok(ArrayAttributes {
        intent,
        data_type,
        shape,
        order,
        encoding,
        endian,
    })
}

fn parse_data_type(value: &str) -> Result<DataType> {
    let data_type = match value {
        "NIFTI_TYPE_UINT8" => DataType::UInt8,
        "NIFTI_TYPE_INT8" => DataType::Int8,
        "NIFTI_TYPE_INT16" => DataType::Int16,
        "NIFTI_TYPE_UINT16" => DataType::UInt16,
        "NIFTI_TYPE_INT32" => DataType::Int32,
        "NIFTI_TYPE_UINT32" => DataType::UInt32,
        "NIFTI_TYPE_INT64" => DataType::Int64,
        "NIFTI_TYPE_UINT64" => DataType::UInt64,
        "NIFTI_TYPE_FLOAT32" => DataType::Float32,
        "NIFTI_TYPE_FLOAT64" => DataType::Float64,
        other => {
            return Err(ExtractError::unsupported_format(format!(
                "GIFTI data type '{}' is not supported",
                other
            )));
        }
    };
    Ok(data_type)
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid_attribute(key, value))
}

fn invalid_attribute(key: &str, value: &str) -> ExtractError {
    ExtractError::decode(FORMAT, format!("invalid {} attribute {:?}", key, value))
}

fn decode_payload(attrs: &ArrayAttributes, data: &str) -> Result<NumericArray> {
    match attrs.encoding {
        Encoding::Ascii => decode_ascii(attrs, data),
        Encoding::Base64 => {
            let raw = decode_base64(data)?;
            attrs
                .endian
                .decode_values(&raw, attrs.data_type, &attrs.shape, attrs.order, FORMAT)
        }
        Encoding::GzipBase64 => {
            let raw = inflate_zlib(&decode_base64(data)?, FORMAT)?;
            attrs
                .endian
                .decode_values(&raw, attrs.data_type, &attrs.shape, attrs.order, FORMAT)
        }
        Encoding::External => Err(ExtractError::unsupported_format(
            "GIFTI arrays stored in external files are not supported",
        )),
    }
}

fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ExtractError::decode(FORMAT, format!("invalid base64 payload: {}", e)))
}

fn decode_ascii(attrs: &ArrayAttributes, data: &str) -> Result<NumericArray> {
    match attrs.data_type {
        DataType::UInt8 => parse_ascii::<u8>(attrs, data),
        DataType::Int8 => parse_ascii::<i8>(attrs, data),
        DataType::Int16 => parse_ascii::<i16>(attrs, data),
        DataType::UInt16 => parse_ascii::<u16>(attrs, data),
        DataType::Int32 => parse_ascii::<i32>(attrs, data),
        DataType::UInt32 => parse_ascii::<u32>(attrs, data),
        DataType::Int64 => parse_ascii::<i64>(attrs, data),
        DataType::UInt64 => parse_ascii::<u64>(attrs, data),
        DataType::Float32 => parse_ascii::<f32>(attrs, data),
        DataType::Float64 => parse_ascii::<f64>(attrs, data),
    }
}

fn parse_ascii<T>(attrs: &ArrayAttributes, data: &str) -> Result<NumericArray>
where
    T: Element + FromStr,
    ArrayD<T>: Into<NumericArray>,
{
    let values = data
        .split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                ExtractError::decode(
                    FORMAT,
                    format!("{:?} is not a valid {} value", token, attrs.data_type),
                )
            })
        })
        .collect::<Result<Vec<T>>>()?;
    let expected = element_count(&attrs.shape, FORMAT)?;
    if values.len() != expected {
        return Err(ExtractError::decode(
            FORMAT,
            format!(
                "expected {} ASCII values for shape {:?}, found {}",
                expected,
                attrs.shape,
                values.len()
            ),
        ));
    }
    build_array(&attrs.shape, attrs.order, values)
}
