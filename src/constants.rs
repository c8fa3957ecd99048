//! Crate-wide constants.
//!
//! Centralizes layout sizes, limits and defaults so the settings defaults,
//! scales and parsers agree on the same numbers.

// ============================================================================
// Layout Constants
// ============================================================================

/// Width of a vertical scale strip (tick labels + axis title) in pixels
pub const VERTICAL_SCALE_WIDTH: f64 = 56.0;

/// Height of a horizontal scale strip in pixels
pub const HORIZONTAL_SCALE_HEIGHT: f64 = 36.0;

/// Maximum pixel distance at which a click still selects a curve
pub const HIT_TOLERANCE_PX: f64 = 8.0;

/// Number of ticks a scale aims for along its visible window
pub const TICK_TARGET: usize = 6;

// ============================================================================
// Zoom
// ============================================================================

/// Zoom factor (percent) at which the visible window equals the full extent
pub const ZOOM_FIT_PERCENT: u32 = 100;

/// Maximum zoom factor (percent)
pub const MAX_ZOOM_PERCENT: u32 = 10_000;

// ============================================================================
// Colors (default hex values)
// ============================================================================

/// Series palette, assigned in order as series are added
pub const SERIES_PALETTE: [&str; 8] = [
    "#1f5fbf", // Blue
    "#2e9e44", // Green
    "#e07b10", // Orange
    "#7a3fc0", // Violet
    "#d02a2a", // Red
    "#1aa3a3", // Teal
    "#c9a400", // Yellow
    "#c23a91", // Magenta
];

// ============================================================================
// Data Loading
// ============================================================================

/// Maximum instrument file size in MB
pub const MAX_FILE_SIZE_MB: u64 = 64;

/// Number of leading rows searched for a header before a dialect gives up
pub const MAX_PREAMBLE_ROWS: usize = 32;

/// Number of leading lines sampled for delimiter detection
pub const DELIMITER_SAMPLE_LINES: usize = 5;

/// Number of leading bytes inspected when deciding whether content is text
pub const TEXT_SNIFF_BYTES: usize = 4096;
