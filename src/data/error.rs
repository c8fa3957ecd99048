//! Error types for data operations
//!
//! Two layers: [`ParseError`] disqualifies one dialect for one input and is
//! recovered by the detector; [`DataError`] is what an ingestion request
//! surfaces to its caller.

use crate::data::formats::FormatId;
use std::fmt::Write as _;
use thiserror::Error;

/// Why a single parser rejected its input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Signature, magic bytes or header row not found
    #[error("unrecognized header: {0}")]
    UnrecognizedHeader(String),

    /// A row or byte layout did not have the expected shape
    #[error("column mismatch at row {row}: expected {expected}, found {found}")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell that must hold a number does not
    #[error("non-numeric value {cell:?} at row {row}, column {column}")]
    NotNumeric {
        row: usize,
        column: usize,
        cell: String,
    },

    /// Input ended before the dialect's minimum content
    #[error("truncated input: {0}")]
    Truncated(String),
}

/// Errors that can occur during ingestion
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is too large to load
    #[error("File too large: {size_mb}MB (max {max_mb}MB)")]
    TooLarge { size_mb: u64, max_mb: u64 },

    /// File is empty
    #[error("Empty file")]
    EmptyFile,

    /// Every dialect rejected the input
    #[error("Unrecognized format ({})", summarize(.attempts))]
    UnrecognizedFormat { attempts: Vec<(FormatId, ParseError)> },

    /// A forced dialect rejected the input
    #[error("Cannot read as {format}: {source}")]
    Parse {
        format: FormatId,
        #[source]
        source: ParseError,
    },

    /// Generic error message
    #[error("{0}")]
    Other(String),
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

impl From<String> for DataError {
    fn from(s: String) -> Self {
        DataError::Other(s)
    }
}

impl From<&str> for DataError {
    fn from(s: &str) -> Self {
        DataError::Other(s.to_string())
    }
}

fn summarize(attempts: &[(FormatId, ParseError)]) -> String {
    let mut out = String::new();
    for (i, (format, err)) in attempts.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(out, "{}: {}", format, err);
    }
    out
}
