//! The grid-of-strings record shared by all text dialects.
//!
//! Text is decoded once per input, the delimiter is sniffed from the first
//! lines, and each line becomes one row of trimmed, unquoted cells. Rows are
//! not required to be rectangular.

use crate::constants::{DELIMITER_SAMPLE_LINES, TEXT_SNIFF_BYTES};
use crate::data::error::ParseError;
use once_cell::unsync::OnceCell;
use serde::Serialize;

/// Cell separator detected for a text input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
    /// Runs of spaces and tabs
    Whitespace,
}

impl Delimiter {
    fn as_char(&self) -> Option<char> {
        match self {
            Delimiter::Comma => Some(','),
            Delimiter::Semicolon => Some(';'),
            Delimiter::Tab => Some('\t'),
            Delimiter::Whitespace => None,
        }
    }
}

/// Ordered rows of string cells
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TabularRecord {
    rows: Vec<Vec<String>>,
}

impl TabularRecord {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Split text using the delimiter sniffed from its first lines
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with(text, detect_delimiter(text))
    }

    pub fn from_text_with(text: &str, delimiter: Delimiter) -> Self {
        let rows = text
            .lines()
            .map(|line| split_line(line, delimiter))
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Cell text, `None` for cells past the end of a short row
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(|c| c.as_str())
    }

    /// Numeric value of a cell, `None` when missing or not a finite number
    pub fn number(&self, row: usize, column: usize) -> Option<f64> {
        self.cell(row, column).and_then(parse_number)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the row is missing or every cell is empty
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map(|cells| cells.iter().all(|c| c.is_empty()))
            .unwrap_or(true)
    }
}

// ============================================================================
// Source input
// ============================================================================

/// Raw bytes of one input plus a lazily decoded record.
///
/// Every text dialect reads the same record, so decoding and splitting
/// happen at most once per detection run.
pub struct SourceInput<'a> {
    bytes: &'a [u8],
    record: OnceCell<Result<TabularRecord, ParseError>>,
}

impl<'a> SourceInput<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            record: OnceCell::new(),
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The decoded record, or the reason the bytes are not text
    pub fn record(&self) -> Result<&TabularRecord, ParseError> {
        self.record
            .get_or_init(|| decode_text(self.bytes).map(|text| TabularRecord::from_text(&text)))
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Decode instrument text: UTF-8 when valid, Latin-1 otherwise.
///
/// Inputs with NUL bytes near the start are binary dumps and are rejected.
pub fn decode_text(bytes: &[u8]) -> Result<String, ParseError> {
    let sniff = &bytes[..bytes.len().min(TEXT_SNIFF_BYTES)];
    if sniff.contains(&0) {
        return Err(ParseError::UnrecognizedHeader("binary content".to_string()));
    }
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Ok(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Detect the delimiter to use for parsing
///
/// Counts tabs, semicolons and commas over the first lines that start like
/// a number, so titles and preambles do not decide the split. Text without
/// such lines is sampled from its first non-blank lines instead. When no
/// delimiter occurs the text is treated as whitespace separated.
pub fn detect_delimiter(text: &str) -> Delimiter {
    let data_lines: Vec<&str> = text
        .lines()
        .filter(|l| starts_numeric(l))
        .take(DELIMITER_SAMPLE_LINES)
        .collect();
    let sample = if data_lines.is_empty() {
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .take(DELIMITER_SAMPLE_LINES)
            .collect()
    } else {
        data_lines
    };

    let count = |c: char| sample.iter().map(|l| l.matches(c).count()).sum::<usize>();
    let comma_count = count(',');
    let tab_count = count('\t');
    let semicolon_count = count(';');

    if tab_count == 0 && comma_count == 0 && semicolon_count == 0 {
        Delimiter::Whitespace
    } else if tab_count > comma_count && tab_count > semicolon_count {
        Delimiter::Tab
    } else if semicolon_count > comma_count {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

fn starts_numeric(line: &str) -> bool {
    let mut chars = line.trim_start().trim_start_matches(['+', '-', '.']).chars();
    chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Split a line respecting quoted fields
fn split_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    let Some(sep) = delimiter.as_char() else {
        return line.split_whitespace().map(|s| unquote(s).to_string()).collect();
    };
    if line.trim().is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            result.push(unquote(&line[start..i]).to_string());
            start = i + c.len_utf8();
        }
    }
    result.push(unquote(&line[start..]).to_string());
    result
}

/// Remove surrounding quotes from a field
fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Parse a cell as a finite number.
///
/// Accepts a single decimal comma (`"1,5"`) when no decimal point is present,
/// as written by instruments running in European locales.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned = cell.trim();
    if cleaned.is_empty() || !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = match cleaned.parse::<f64>() {
        Ok(v) => v,
        Err(_) if cleaned.matches(',').count() == 1 && !cleaned.contains('.') => {
            cleaned.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    value.is_finite().then_some(value)
}

/// Lower-cased alphanumeric words of a cell, used for token matching
pub fn words(cell: &str) -> impl Iterator<Item = String> + '_ {
    cell.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// True when any whole word of `cell` equals one of `tokens` (case-insensitive)
pub fn has_token(cell: &str, tokens: &[String]) -> bool {
    words(cell).any(|w| tokens.iter().any(|t| t.eq_ignore_ascii_case(&w)))
}
