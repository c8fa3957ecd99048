//! Error types for scale and series operations

use thiserror::Error;

/// Errors that can occur while laying out, rendering or querying a plot
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Visible width or pixel span is zero or not finite
    #[error("Scale '{0}' is degenerate: zero visible width or pixel span")]
    DegenerateScale(String),

    /// The scale has no plot rectangle yet
    #[error("Scale '{0}' has not been laid out")]
    NotLaidOut(String),

    /// The series is missing an X or Y scale
    #[error("Series '{0}' is not bound to both scales")]
    UnboundSeries(String),

    #[error("Unknown scale id {0}")]
    UnknownScale(usize),

    #[error("Unknown series id {0}")]
    UnknownSeries(usize),
}

/// Result type alias for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
