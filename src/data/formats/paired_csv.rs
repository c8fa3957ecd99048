//! Vendor CSV with one (x, y) column pair per curve.
//!
//! Chromatography systems export every recorded curve (UV, conductivity,
//! pH, ...) as its own pair of columns, since each curve is sampled at its
//! own rate. Row 0 names the curves, row 1 gives units, and the curves may
//! end at different rows.

use super::{FormatId, FormatParser, Parsed, expect_table};
use crate::data::error::ParseError;
use crate::data::recipe::{ScaleSpec, SeriesPlan};
use crate::data::record::{SourceInput, TabularRecord, has_token, parse_number};
use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Header conventions of the paired-column dialect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairedCsvRules {
    /// Units allowed for the x column of every pair
    pub x_unit_tokens: Vec<String>,
    pub x_label: String,
}

impl Default for PairedCsvRules {
    fn default() -> Self {
        Self {
            x_unit_tokens: vec!["ml".to_string(), "min".to_string()],
            x_label: "Volume".to_string(),
        }
    }
}

pub struct PairedCsvParser {
    rules: PairedCsvRules,
}

const NAME_ROW: usize = 0;
const UNIT_ROW: usize = 1;

impl PairedCsvParser {
    pub fn new(rules: PairedCsvRules) -> Self {
        Self { rules }
    }

    /// Validate headers and data, returning the number of curves
    fn analyze(&self, record: &TabularRecord) -> Result<usize, ParseError> {
        let units = record
            .row(UNIT_ROW)
            .ok_or_else(|| ParseError::Truncated("missing unit row".to_string()))?;
        // trailing empty cells are common in spreadsheet exports
        let width = units.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        let width = width + width % 2;
        if width < 2 || units.len() < width {
            return Err(ParseError::ColumnMismatch {
                row: UNIT_ROW,
                expected: width.max(2),
                found: units.len(),
            });
        }
        for c in (0..width).step_by(2) {
            if !has_token(&units[c], &self.rules.x_unit_tokens) {
                return Err(ParseError::UnrecognizedHeader(format!(
                    "unit {:?} in column {} is not one of {}",
                    units[c],
                    c,
                    self.rules.x_unit_tokens.join("/")
                )));
            }
        }

        let mut data_rows = 0;
        for r in UNIT_ROW + 1..record.len() {
            if record.is_blank_row(r) {
                continue;
            }
            for c in 0..width {
                let cell = record.cell(r, c).unwrap_or_default();
                if !cell.is_empty() && parse_number(cell).is_none() {
                    return Err(ParseError::NotNumeric {
                        row: r,
                        column: c,
                        cell: cell.to_string(),
                    });
                }
            }
            data_rows += 1;
        }
        if data_rows == 0 {
            return Err(ParseError::Truncated("no data rows after unit row".to_string()));
        }
        Ok(width / 2)
    }
}

impl FormatParser for PairedCsvParser {
    fn format(&self) -> FormatId {
        FormatId::VendorCsv
    }

    fn try_parse(&self, input: &SourceInput<'_>) -> Result<Parsed, ParseError> {
        let record = input.record()?;
        self.analyze(record)?;
        Ok(Parsed::Table(record.clone()))
    }

    fn plan(&self, parsed: &Parsed, _title: &str) -> Result<SeriesPlan, ParseError> {
        let record = expect_table(parsed)?;
        let curves = self.analyze(record)?;

        let mut plan = SeriesPlan::new();
        let x_unit = record.cell(UNIT_ROW, 0).unwrap_or_default();
        let x = plan.add_scale(ScaleSpec::horizontal(&self.rules.x_label, x_unit));

        for curve in 0..curves {
            let (xc, yc) = (curve * 2, curve * 2 + 1);
            let name = match record.cell(NAME_ROW, xc).filter(|n| !n.is_empty()) {
                Some(name) => name.to_string(),
                None => format!("Curve {}", curve + 1),
            };
            let unit = record.cell(UNIT_ROW, yc).unwrap_or_default();
            let side = if curve % 2 == 0 { Side::Near } else { Side::Far };
            let y = plan.add_scale(ScaleSpec::vertical(&name, unit).on_side(side));

            let points = (UNIT_ROW + 1..record.len())
                .filter_map(|r| Some((record.number(r, xc)?, record.number(r, yc)?)))
                .collect();
            plan.add_series(name, x, y, points);
        }

        let plan = plan.without_empty_series();
        if plan.series.is_empty() {
            return Err(ParseError::Truncated("every curve is empty".to_string()));
        }
        Ok(plan)
    }
}
