//! Vendor raw binary dumps.
//!
//! A dump is a fixed-size header starting with magic bytes, a little-endian
//! `u32` record count, and `count` records of little-endian `f32`s. Sampled
//! dumps store one y value per record and derive x from a start/step pair
//! in the header; interleaved dumps store explicit (x, y) pairs.

use super::{FormatId, FormatParser, Parsed, RawBuffer, RawHeader};
use crate::data::error::ParseError;
use crate::data::recipe::{ScaleSpec, SeriesPlan};
use crate::data::record::SourceInput;
use serde::{Deserialize, Serialize};

/// How records following the header are encoded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleEncoding {
    /// One `f32` y per record, x = start + i * step
    SampledF32,
    /// Two `f32`s per record: x then y
    InterleavedF32Pairs,
}

impl SampleEncoding {
    pub fn record_size(&self) -> usize {
        match self {
            SampleEncoding::SampledF32 => 4,
            SampleEncoding::InterleavedF32Pairs => 8,
        }
    }
}

/// Byte layout of one binary dialect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinaryLayout {
    pub magic: Vec<u8>,
    pub header_len: usize,
    /// Offset of the `u32` record count
    pub count_offset: usize,
    /// Offset of the `f32` x start (sampled layouts)
    pub x_start_offset: Option<usize>,
    /// Offset of the `f32` x step (sampled layouts)
    pub x_step_offset: Option<usize>,
    pub encoding: SampleEncoding,
    pub x_label: String,
    pub x_unit: String,
    pub y_label: String,
    pub y_unit: String,
}

impl BinaryLayout {
    /// Spectrophotometer dump: evenly spaced absorbance samples
    pub fn sampled_default() -> Self {
        Self {
            magic: b"DUF\x1a".to_vec(),
            header_len: 32,
            count_offset: 8,
            x_start_offset: Some(12),
            x_step_offset: Some(16),
            encoding: SampleEncoding::SampledF32,
            x_label: "Wavelength".to_string(),
            x_unit: "nm".to_string(),
            y_label: "Absorbance".to_string(),
            y_unit: "AU".to_string(),
        }
    }

    /// Chromatography dump: (volume, UV) pairs
    pub fn interleaved_default() -> Self {
        Self {
            magic: b"FPLC".to_vec(),
            header_len: 16,
            count_offset: 4,
            x_start_offset: None,
            x_step_offset: None,
            encoding: SampleEncoding::InterleavedF32Pairs,
            x_label: "Volume".to_string(),
            x_unit: "ml".to_string(),
            y_label: "UV".to_string(),
            y_unit: "mAU".to_string(),
        }
    }
}

pub struct RawBinaryParser {
    format: FormatId,
    layout: BinaryLayout,
}

impl RawBinaryParser {
    pub fn new(format: FormatId, layout: BinaryLayout) -> Self {
        Self { format, layout }
    }

    fn header_f32(&self, bytes: &[u8], offset: Option<usize>) -> Result<f64, ParseError> {
        let Some(offset) = offset else {
            return Ok(0.0);
        };
        let value = read_le_f32(bytes, offset)
            .ok_or_else(|| ParseError::Truncated(format!("header field at byte {}", offset)))?;
        if !value.is_finite() {
            return Err(ParseError::UnrecognizedHeader(format!(
                "non-finite header field at byte {}",
                offset
            )));
        }
        Ok(f64::from(value))
    }
}

impl FormatParser for RawBinaryParser {
    fn format(&self) -> FormatId {
        self.format
    }

    fn try_parse(&self, input: &SourceInput<'_>) -> Result<Parsed, ParseError> {
        let layout = &self.layout;
        let bytes = input.bytes();

        if layout.magic.is_empty() {
            return Err(ParseError::UnrecognizedHeader("layout has no magic".to_string()));
        }
        if bytes.len() < layout.header_len.max(layout.magic.len()) {
            return Err(ParseError::Truncated(format!(
                "{} bytes, header needs {}",
                bytes.len(),
                layout.header_len
            )));
        }
        if !bytes.starts_with(&layout.magic) {
            return Err(ParseError::UnrecognizedHeader("magic bytes do not match".to_string()));
        }

        let count = read_le_u32(bytes, layout.count_offset)
            .ok_or_else(|| ParseError::Truncated("record count".to_string()))?
            as usize;
        if count == 0 {
            return Err(ParseError::Truncated("header announces no records".to_string()));
        }

        let x_start = self.header_f32(bytes, layout.x_start_offset)?;
        let x_step = self.header_f32(bytes, layout.x_step_offset)?;
        if layout.encoding == SampleEncoding::SampledF32 && x_step == 0.0 {
            return Err(ParseError::UnrecognizedHeader("zero sample step".to_string()));
        }

        let payload = &bytes[layout.header_len..];
        let expected = count.saturating_mul(layout.encoding.record_size());
        if payload.len() < expected {
            return Err(ParseError::Truncated(format!(
                "{} payload bytes, header announces {}",
                payload.len(),
                expected
            )));
        }
        if payload.len() > expected {
            return Err(ParseError::ColumnMismatch {
                row: count,
                expected,
                found: payload.len(),
            });
        }

        let raw = RawBuffer {
            bytes: payload.to_vec(),
            count,
            header: RawHeader { x_start, x_step },
        };
        // every sample must be usable
        decode_points(&raw, layout.encoding)?;
        Ok(Parsed::Raw(raw))
    }

    fn plan(&self, parsed: &Parsed, title: &str) -> Result<SeriesPlan, ParseError> {
        let Parsed::Raw(raw) = parsed else {
            return Err(ParseError::UnrecognizedHeader(
                "expected binary content, found text".to_string(),
            ));
        };
        let layout = &self.layout;
        let points = decode_points(raw, layout.encoding)?;

        let mut plan = SeriesPlan::new();
        let x = plan.add_scale(ScaleSpec::horizontal(&layout.x_label, &layout.x_unit));
        let y = plan.add_scale(ScaleSpec::vertical(&layout.y_label, &layout.y_unit));
        plan.add_series(title, x, y, points);
        Ok(plan)
    }
}

fn decode_points(raw: &RawBuffer, encoding: SampleEncoding) -> Result<Vec<(f64, f64)>, ParseError> {
    let size = encoding.record_size();
    (0..raw.count)
        .map(|i| {
            let base = i * size;
            let sample = |offset: usize, column: usize| -> Result<f64, ParseError> {
                let value = raw
                    .f32_at(base + offset)
                    .ok_or_else(|| ParseError::Truncated(format!("record {}", i)))?;
                if value.is_finite() {
                    Ok(f64::from(value))
                } else {
                    Err(ParseError::NotNumeric {
                        row: i,
                        column,
                        cell: value.to_string(),
                    })
                }
            };
            match encoding {
                SampleEncoding::SampledF32 => Ok((
                    raw.header.x_start + i as f64 * raw.header.x_step,
                    sample(0, 0)?,
                )),
                SampleEncoding::InterleavedF32Pairs => Ok((sample(0, 0)?, sample(4, 1)?)),
            }
        })
        .collect()
}

fn read_le_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}

fn read_le_f32(bytes: &[u8], offset: usize) -> Option<f32> {
    let raw: [u8; 4] = bytes.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
    Some(f32::from_le_bytes(raw))
}
