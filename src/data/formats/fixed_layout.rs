//! Fixed-layout instrument exports (photometer, fluorimeter).
//!
//! Both share one layout: an optional preamble of `key, value` lines, a
//! header row whose first cell names the wavelength column, then numeric
//! rows with one value column per measured sample. A dialect is told apart
//! by its header tokens and required preamble keys.

use super::{FormatId, FormatParser, Parsed, expect_table};
use crate::constants::MAX_PREAMBLE_ROWS;
use crate::data::error::ParseError;
use crate::data::recipe::{ScaleSpec, SeriesPlan};
use crate::data::record::{SourceInput, TabularRecord, has_token, parse_number, words};
use serde::{Deserialize, Serialize};

/// Header conventions of one fixed-layout dialect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSignature {
    /// Words that mark the first header cell (the X column)
    pub x_tokens: Vec<String>,
    /// Words of which at least one value column header must contain one
    pub y_tokens: Vec<String>,
    /// Preamble keys of which one must appear before the header, if any
    pub preamble_keys: Vec<String>,
    pub max_preamble_rows: usize,
    pub x_label: String,
    pub x_unit: String,
    pub y_label: String,
    pub y_unit: String,
}

impl TextSignature {
    pub fn photometer() -> Self {
        Self {
            x_tokens: tokens(&["nm", "wavelength", "lambda"]),
            y_tokens: tokens(&["abs", "absorbance", "od"]),
            preamble_keys: Vec::new(),
            max_preamble_rows: MAX_PREAMBLE_ROWS,
            x_label: "Wavelength".to_string(),
            x_unit: "nm".to_string(),
            y_label: "Absorbance".to_string(),
            y_unit: "AU".to_string(),
        }
    }

    pub fn fluorimeter() -> Self {
        Self {
            x_tokens: tokens(&["nm", "wavelength", "lambda", "em", "emission"]),
            y_tokens: tokens(&["int", "intensity", "rfu", "fluorescence", "counts"]),
            preamble_keys: tokens(&["ex", "excitation"]),
            max_preamble_rows: MAX_PREAMBLE_ROWS,
            x_label: "Emission".to_string(),
            x_unit: "nm".to_string(),
            y_label: "Intensity".to_string(),
            y_unit: "RFU".to_string(),
        }
    }
}

impl Default for TextSignature {
    fn default() -> Self {
        Self::photometer()
    }
}

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Where things are in a validated export
#[derive(Debug)]
struct Layout {
    header_row: usize,
    value_columns: Vec<usize>,
    data_rows: Vec<usize>,
    /// Number read from the required preamble line
    preamble_value: Option<f64>,
}

pub struct FixedLayoutParser {
    format: FormatId,
    signature: TextSignature,
}

impl FixedLayoutParser {
    pub fn new(format: FormatId, signature: TextSignature) -> Self {
        Self { format, signature }
    }

    fn analyze(&self, record: &TabularRecord) -> Result<Layout, ParseError> {
        let sig = &self.signature;
        if (0..record.len()).all(|r| record.is_blank_row(r)) {
            return Err(ParseError::Truncated("empty input".to_string()));
        }

        let search_rows = record.len().min(sig.max_preamble_rows.saturating_add(1));
        let header_row = (0..search_rows)
            .find(|&r| self.is_header_row(record, r))
            .ok_or_else(|| {
                ParseError::UnrecognizedHeader(format!(
                    "no header row with a {} column and a {} column",
                    sig.x_tokens.join("/"),
                    sig.y_tokens.join("/")
                ))
            })?;

        let preamble_value = if sig.preamble_keys.is_empty() {
            None
        } else {
            let key_row = (0..header_row)
                .find(|&r| {
                    record
                        .cell(r, 0)
                        .is_some_and(|c| has_token(c, &sig.preamble_keys))
                })
                .ok_or_else(|| {
                    ParseError::UnrecognizedHeader(format!(
                        "missing {} line before header",
                        sig.preamble_keys.join("/")
                    ))
                })?;
            Some(first_number(record.row(key_row).unwrap_or_default()).ok_or_else(|| {
                ParseError::NotNumeric {
                    row: key_row,
                    column: 0,
                    cell: record.cell(key_row, 0).unwrap_or_default().to_string(),
                }
            })?)
        };

        let header = record.row(header_row).unwrap_or_default();
        let value_columns: Vec<usize> = (1..header.len())
            .filter(|&c| !header[c].is_empty())
            .collect();

        let mut data_rows = Vec::new();
        for r in header_row + 1..record.len() {
            if record.is_blank_row(r) {
                continue;
            }
            let first = record.cell(r, 0).unwrap_or_default();
            if parse_number(first).is_none() {
                if data_rows.is_empty() {
                    return Err(ParseError::NotNumeric {
                        row: r,
                        column: 0,
                        cell: first.to_string(),
                    });
                }
                // trailing footer
                break;
            }
            let width = record.row(r).map(|cells| cells.len()).unwrap_or(0);
            if width < 2 {
                return Err(ParseError::ColumnMismatch {
                    row: r,
                    expected: 2,
                    found: width,
                });
            }
            for &c in &value_columns {
                let cell = record.cell(r, c).unwrap_or_default();
                if !cell.is_empty() && parse_number(cell).is_none() {
                    return Err(ParseError::NotNumeric {
                        row: r,
                        column: c,
                        cell: cell.to_string(),
                    });
                }
            }
            data_rows.push(r);
        }

        if data_rows.is_empty() {
            return Err(ParseError::Truncated("no data rows after header".to_string()));
        }

        Ok(Layout {
            header_row,
            value_columns,
            data_rows,
            preamble_value,
        })
    }

    fn is_header_row(&self, record: &TabularRecord, row: usize) -> bool {
        let Some(cells) = record.row(row) else {
            return false;
        };
        cells
            .first()
            .is_some_and(|c| has_token(c, &self.signature.x_tokens))
            && cells
                .iter()
                .skip(1)
                .any(|c| has_token(c, &self.signature.y_tokens))
    }
}

impl FormatParser for FixedLayoutParser {
    fn format(&self) -> FormatId {
        self.format
    }

    fn try_parse(&self, input: &SourceInput<'_>) -> Result<Parsed, ParseError> {
        let record = input.record()?;
        self.analyze(record)?;
        Ok(Parsed::Table(record.clone()))
    }

    fn plan(&self, parsed: &Parsed, _title: &str) -> Result<SeriesPlan, ParseError> {
        let record = expect_table(parsed)?;
        let layout = self.analyze(record)?;
        let sig = &self.signature;

        let mut plan = SeriesPlan::new();
        let x = plan.add_scale(ScaleSpec::horizontal(&sig.x_label, &sig.x_unit));
        let y = plan.add_scale(ScaleSpec::vertical(&sig.y_label, &sig.y_unit));

        for &column in &layout.value_columns {
            let points: Vec<(f64, f64)> = layout
                .data_rows
                .iter()
                .filter_map(|&r| Some((record.number(r, 0)?, record.number(r, column)?)))
                .collect();
            let mut name = record
                .cell(layout.header_row, column)
                .unwrap_or_default()
                .to_string();
            if let Some(value) = layout.preamble_value {
                name.push_str(&format!(" (Ex {} nm)", value));
            }
            plan.add_series(name, x, y, points);
        }

        let plan = plan.without_empty_series();
        if plan.series.is_empty() {
            return Err(ParseError::Truncated("no values in any column".to_string()));
        }
        Ok(plan)
    }
}

/// First number on a preamble line, looking at whole cells before words
fn first_number(cells: &[String]) -> Option<f64> {
    cells
        .iter()
        .skip(1)
        .find_map(|c| parse_number(c))
        .or_else(|| cells.iter().flat_map(|c| words(c)).find_map(|w| parse_number(&w)))
}
