//! Instrument file dialects.
//!
//! Each dialect is a [`FormatParser`]: it validates and decodes its own
//! layout and knows how to turn the result into a [`SeriesPlan`]. Dialects
//! never choose between each other; ordering is the detector's job.
//!
//! ## Dialects (priority order)
//!
//! - `fixed_layout` - photometer and fluorimeter text exports
//! - `binary` - vendor raw binary dumps (sampled and interleaved layouts)
//! - `paired_csv` - vendor CSV with one (x, y) column pair per curve
//! - `xy_pair` - generic numeric columns, the fallback

mod binary;
mod fixed_layout;
mod paired_csv;
mod xy_pair;

pub use binary::{BinaryLayout, RawBinaryParser, SampleEncoding};
pub use fixed_layout::{FixedLayoutParser, TextSignature};
pub use paired_csv::{PairedCsvParser, PairedCsvRules};
pub use xy_pair::XyPairParser;

use crate::data::error::ParseError;
use crate::data::recipe::SeriesPlan;
use crate::data::record::{SourceInput, TabularRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a detected file dialect
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatId {
    /// Fixed-layout photometer export
    Photometer,
    /// Fixed-layout fluorimeter export
    Fluorimeter,
    /// Vendor raw binary dump (evenly sampled)
    RawBinary,
    /// Vendor alternate binary dump (interleaved x/y)
    AltBinary,
    /// Vendor CSV with paired columns
    VendorCsv,
    /// Generic numeric XY columns
    XyPair,
}

impl FormatId {
    /// Detection priority, most specific first
    pub const PRIORITY: [FormatId; 6] = [
        FormatId::Photometer,
        FormatId::Fluorimeter,
        FormatId::RawBinary,
        FormatId::AltBinary,
        FormatId::VendorCsv,
        FormatId::XyPair,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormatId::Photometer => "photometer",
            FormatId::Fluorimeter => "fluorimeter",
            FormatId::RawBinary => "raw-binary",
            FormatId::AltBinary => "alt-binary",
            FormatId::VendorCsv => "vendor-csv",
            FormatId::XyPair => "xy-pair",
        }
    }

    /// Human-readable name for format pickers
    pub fn display_name(&self) -> &'static str {
        match self {
            FormatId::Photometer => "Photometer export",
            FormatId::Fluorimeter => "Fluorimeter export",
            FormatId::RawBinary => "Raw binary (sampled)",
            FormatId::AltBinary => "Raw binary (XY pairs)",
            FormatId::VendorCsv => "Vendor CSV (paired columns)",
            FormatId::XyPair => "XY pairs",
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, FormatId::RawBinary | FormatId::AltBinary)
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormatId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FormatId::PRIORITY
            .iter()
            .copied()
            .find(|f| f.label() == wanted)
            .ok_or_else(|| format!("unknown format '{}'", s))
    }
}

/// Header values decoded from a binary dump
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RawHeader {
    pub x_start: f64,
    pub x_step: f64,
}

/// Payload of a binary dump: record bytes plus what the header said
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RawBuffer {
    /// Record bytes following the header
    pub bytes: Vec<u8>,
    /// Number of records announced by the header
    pub count: usize,
    pub header: RawHeader,
}

impl RawBuffer {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Little-endian `f32` at record-relative byte offset
    pub fn f32_at(&self, offset: usize) -> Option<f32> {
        let raw: [u8; 4] = self.bytes.get(offset..offset + 4)?.try_into().ok()?;
        Some(f32::from_le_bytes(raw))
    }
}

/// What a parser produced
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Parsed {
    Table(TabularRecord),
    Raw(RawBuffer),
}

/// One file dialect
pub trait FormatParser {
    fn format(&self) -> FormatId;

    /// Validate and decode the input, or explain why it is not this dialect
    fn try_parse(&self, input: &SourceInput<'_>) -> Result<Parsed, ParseError>;

    /// Default series construction for a successful parse
    fn plan(&self, parsed: &Parsed, title: &str) -> Result<SeriesPlan, ParseError>;
}

/// Validation rules for every dialect.
///
/// Signatures and binary layouts are data: they are loaded with the settings
/// so they can be checked against real sample files without code changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectRules {
    pub photometer: TextSignature,
    pub fluorimeter: TextSignature,
    pub raw_binary: BinaryLayout,
    pub alt_binary: BinaryLayout,
    pub vendor_csv: PairedCsvRules,
    /// Leading non-numeric rows the generic XY dialect skips as headers
    pub xy_max_header_rows: usize,
}

impl Default for DialectRules {
    fn default() -> Self {
        Self {
            photometer: TextSignature::photometer(),
            fluorimeter: TextSignature::fluorimeter(),
            raw_binary: BinaryLayout::sampled_default(),
            alt_binary: BinaryLayout::interleaved_default(),
            vendor_csv: PairedCsvRules::default(),
            xy_max_header_rows: crate::constants::MAX_PREAMBLE_ROWS,
        }
    }
}

/// Build every dialect in detection priority order
pub fn parsers_in_priority(rules: &DialectRules) -> Vec<Box<dyn FormatParser>> {
    FormatId::PRIORITY
        .iter()
        .map(|&format| parser_for(format, rules))
        .collect()
}

/// Build the parser for one dialect
pub fn parser_for(format: FormatId, rules: &DialectRules) -> Box<dyn FormatParser> {
    match format {
        FormatId::Photometer => Box::new(FixedLayoutParser::new(
            FormatId::Photometer,
            rules.photometer.clone(),
        )),
        FormatId::Fluorimeter => Box::new(FixedLayoutParser::new(
            FormatId::Fluorimeter,
            rules.fluorimeter.clone(),
        )),
        FormatId::RawBinary => Box::new(RawBinaryParser::new(
            FormatId::RawBinary,
            rules.raw_binary.clone(),
        )),
        FormatId::AltBinary => Box::new(RawBinaryParser::new(
            FormatId::AltBinary,
            rules.alt_binary.clone(),
        )),
        FormatId::VendorCsv => Box::new(PairedCsvParser::new(rules.vendor_csv.clone())),
        FormatId::XyPair => Box::new(XyPairParser::new(rules.xy_max_header_rows)),
    }
}

/// Fetch the table from a parse result or report a dialect mix-up
pub(crate) fn expect_table(parsed: &Parsed) -> Result<&TabularRecord, ParseError> {
    match parsed {
        Parsed::Table(record) => Ok(record),
        Parsed::Raw(_) => Err(ParseError::UnrecognizedHeader(
            "expected text content, found binary".to_string(),
        )),
    }
}
