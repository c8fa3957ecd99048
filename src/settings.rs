//! User settings.
//!
//! Layout sizes, hit tolerance, zoom limit, dialect rules and the series
//! palette, stored as pretty JSON in the platform config directory. Every
//! field has a default, so partial or older files still load.

use crate::constants::{
    HIT_TOLERANCE_PX, HORIZONTAL_SCALE_HEIGHT, MAX_FILE_SIZE_MB, MAX_ZOOM_PERCENT, SERIES_PALETTE,
    TICK_TARGET, VERTICAL_SCALE_WIDTH,
};
use crate::data::DialectRules;
use crate::types::Color;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const APP_DIR: &str = "labgraph";
const SETTINGS_FILE: &str = "settings.json";

/// Pixel sizes and interaction limits of a display
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub vertical_scale_width: f64,
    pub horizontal_scale_height: f64,
    /// Maximum pixel distance for selecting a curve
    pub hit_tolerance_px: f64,
    pub tick_target: usize,
    pub max_zoom_percent: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            vertical_scale_width: VERTICAL_SCALE_WIDTH,
            horizontal_scale_height: HORIZONTAL_SCALE_HEIGHT,
            hit_tolerance_px: HIT_TOLERANCE_PX,
            tick_target: TICK_TARGET,
            max_zoom_percent: MAX_ZOOM_PERCENT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub layout: LayoutSettings,
    pub dialects: DialectRules,
    pub max_file_size_mb: u64,
    /// Series colors, handed out in order
    pub palette: Vec<Color>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            dialects: DialectRules::default(),
            max_file_size_mb: MAX_FILE_SIZE_MB,
            palette: SERIES_PALETTE
                .iter()
                .filter_map(|hex| Color::from_hex(hex))
                .collect(),
        }
    }
}

impl GraphSettings {
    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = default_settings_path() else {
            warn!("No config directory on this platform, using default settings");
            return Self::default();
        };
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Palette color for the `n`th series, cycling
    pub fn series_color(&self, n: usize) -> Color {
        if self.palette.is_empty() {
            return Color::PRETTY_BLUE;
        }
        self.palette[n % self.palette.len()]
    }
}

/// `<config dir>/labgraph/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}
