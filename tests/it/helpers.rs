//! Test helpers and fixtures.
//!
//! This module provides:
//! - Instrument export fixtures for every dialect
//! - Binary dump builders
//! - `TestDisplayBuilder` for laid-out displays

use labgraph::geom::PixelRect;
use labgraph::graph::DisplaySurface;
use labgraph::settings::GraphSettings;
use std::path::{Path, PathBuf};

// ============================================================================
// Text fixtures
// ============================================================================

pub const XY_TEXT: &str = "x,y\n0,0\n1,1\n2,4\n";

pub const PHOTOMETER_EXPORT: &str = "\
Instrument,UV-1800
Operator,lab
Wavelength (nm),Abs sample A,Abs sample B
260,0.512,0.431
270,0.480,0.402
280,0.301,0.250
";

pub const FLUORIMETER_EXPORT: &str = "\
Excitation,350 nm
Slit,5
Emission (nm),Intensity
400,120.5
410,180.25
420,150.0
";

pub const VENDOR_CSV_EXPORT: &str = "\
UV1_280nm,,Cond,,
ml,mAU,ml,mS/cm,
0.0,1.5,0.0,10.2
0.5,2.5,1.0,10.4
1.0,40.0,,
1.5,12.0,,
";

/// Vendor export whose second curve never leaves zero
pub const FLAT_NEIGHBOUR: &str = "\
UV,,Cond,,
ml,mAU,ml,mS/cm,
0,1,0,0
1,5,1,0
2,3,2,0
";

pub const PROSE: &str = "Meeting notes\nnothing numeric here\n";

// ============================================================================
// Binary fixtures
// ============================================================================

/// Sampled dump in the default raw binary layout
pub fn sampled_dump(samples: &[f32], start: f32, step: f32) -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    bytes[..4].copy_from_slice(b"DUF\x1a");
    bytes[8..12].copy_from_slice(&(samples.len() as u32).to_le_bytes());
    bytes[12..16].copy_from_slice(&start.to_le_bytes());
    bytes[16..20].copy_from_slice(&step.to_le_bytes());
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    bytes
}

/// Interleaved dump in the default alternate binary layout
pub fn interleaved_dump(pairs: &[(f32, f32)]) -> Vec<u8> {
    let mut bytes = vec![0u8; 16];
    bytes[..4].copy_from_slice(b"FPLC");
    bytes[4..8].copy_from_slice(&(pairs.len() as u32).to_le_bytes());
    for (x, y) in pairs {
        bytes.extend_from_slice(&x.to_le_bytes());
        bytes.extend_from_slice(&y.to_le_bytes());
    }
    bytes
}

/// Write a fixture file and return its path
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

// ============================================================================
// TestDisplayBuilder
// ============================================================================

/// Plot area used by most tests: 456x336 leaves a 400x300 plot rectangle
/// with one default-sized scale on each axis.
pub const OUTER: PixelRect = PixelRect::new(0.0, 0.0, 456.0, 336.0);

/// Builder for displays with loaded data.
///
/// # Example
/// ```ignore
/// let display = TestDisplayBuilder::new()
///     .with_text(XY_TEXT, "demo")
///     .laid_out()
///     .build();
/// ```
pub struct TestDisplayBuilder {
    settings: GraphSettings,
    inputs: Vec<(Vec<u8>, String)>,
    outer: Option<PixelRect>,
}

impl Default for TestDisplayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDisplayBuilder {
    pub fn new() -> Self {
        Self {
            settings: GraphSettings::default(),
            inputs: Vec::new(),
            outer: None,
        }
    }

    pub fn with_settings(mut self, settings: GraphSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_text(self, text: &str, title: &str) -> Self {
        self.with_bytes(text.as_bytes(), title)
    }

    pub fn with_bytes(mut self, bytes: &[u8], title: &str) -> Self {
        self.inputs.push((bytes.to_vec(), title.to_string()));
        self
    }

    /// Lay out against [`OUTER`]
    pub fn laid_out(mut self) -> Self {
        self.outer = Some(OUTER);
        self
    }

    pub fn build(self) -> DisplaySurface {
        let mut display = DisplaySurface::new(&self.settings);
        for (bytes, title) in &self.inputs {
            display.load_bytes(bytes, title).unwrap();
        }
        if let Some(outer) = self.outer {
            display.layout(outer);
        }
        display
    }
}

// ============================================================================
// Assertions
// ============================================================================

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
