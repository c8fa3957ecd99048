//! Generic numeric columns, the fallback dialect.
//!
//! Accepts anything whose data lines split into at least two numbers. The
//! first column is x; every further numeric column of the first data line
//! becomes a series. Non-numeric lines before the data are headers, and the
//! last of them names the columns.

use super::{FormatId, FormatParser, Parsed, expect_table};
use crate::data::error::ParseError;
use crate::data::recipe::{ScaleSpec, SeriesPlan};
use crate::data::record::{SourceInput, TabularRecord, parse_number};

#[derive(Debug)]
struct Layout {
    header_row: Option<usize>,
    first_data_row: usize,
    /// Number of numeric columns, x included
    columns: usize,
}

pub struct XyPairParser {
    max_header_rows: usize,
}

impl XyPairParser {
    pub fn new(max_header_rows: usize) -> Self {
        Self { max_header_rows }
    }

    fn analyze(&self, record: &TabularRecord) -> Result<Layout, ParseError> {
        let leading_numeric = |r: usize| {
            record
                .row(r)
                .map(|cells| cells.iter().take_while(|c| parse_number(c).is_some()).count())
                .unwrap_or(0)
        };

        let mut header_row = None;
        let mut headers_seen = 0;
        let mut first_data_row = None;
        for r in 0..record.len() {
            if record.is_blank_row(r) {
                continue;
            }
            if leading_numeric(r) >= 2 {
                first_data_row = Some(r);
                break;
            }
            headers_seen += 1;
            if headers_seen > self.max_header_rows {
                return Err(ParseError::UnrecognizedHeader(format!(
                    "no numeric pair within the first {} lines",
                    self.max_header_rows
                )));
            }
            header_row = Some(r);
        }
        let first_data_row = first_data_row
            .ok_or_else(|| ParseError::Truncated("no line with two numbers".to_string()))?;
        let columns = leading_numeric(first_data_row);

        for r in first_data_row + 1..record.len() {
            if record.is_blank_row(r) {
                continue;
            }
            let width = record.row(r).map(|cells| cells.len()).unwrap_or(0);
            if width < 2 {
                return Err(ParseError::ColumnMismatch {
                    row: r,
                    expected: 2,
                    found: width,
                });
            }
            for c in 0..columns {
                let cell = record.cell(r, c).unwrap_or_default();
                let optional = c >= 2 && cell.is_empty();
                if !optional && parse_number(cell).is_none() {
                    return Err(ParseError::NotNumeric {
                        row: r,
                        column: c,
                        cell: cell.to_string(),
                    });
                }
            }
        }

        Ok(Layout {
            header_row,
            first_data_row,
            columns,
        })
    }
}

impl FormatParser for XyPairParser {
    fn format(&self) -> FormatId {
        FormatId::XyPair
    }

    fn try_parse(&self, input: &SourceInput<'_>) -> Result<Parsed, ParseError> {
        let record = input.record()?;
        self.analyze(record)?;
        Ok(Parsed::Table(record.clone()))
    }

    fn plan(&self, parsed: &Parsed, title: &str) -> Result<SeriesPlan, ParseError> {
        let record = expect_table(parsed)?;
        let layout = self.analyze(record)?;
        let header = |c: usize| {
            layout
                .header_row
                .and_then(|r| record.cell(r, c))
                .filter(|name| !name.is_empty())
        };

        let mut plan = SeriesPlan::new();
        let single = layout.columns == 2;
        let x = plan.add_scale(ScaleSpec::horizontal(header(0).unwrap_or("X"), ""));
        let y_label = if single { header(1).unwrap_or("Y") } else { "Y" };
        let y = plan.add_scale(ScaleSpec::vertical(y_label, ""));

        for c in 1..layout.columns {
            let name = match header(c) {
                Some(name) => name.to_string(),
                None if single && !title.is_empty() => title.to_string(),
                None => format!("Column {}", c + 1),
            };
            let points = (layout.first_data_row..record.len())
                .filter_map(|r| Some((record.number(r, 0)?, record.number(r, c)?)))
                .collect();
            plan.add_series(name, x, y, points);
        }
        Ok(plan.without_empty_series())
    }
}
