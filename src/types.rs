//! Core value types shared by scales, series and settings.
//!
//! Colors, point styles and the orientation/side tags of an axis scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Color
// ============================================================================

/// An opaque RGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Default scale color
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Color of a new series, and the fallback when the palette is empty
    pub const PRETTY_BLUE: Color = Color::rgb(0x1f, 0x5f, 0xbf);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ============================================================================
// Point Styles
// ============================================================================

/// Symbol drawn at each data point of a series
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStyle {
    /// Line only, no symbol
    #[default]
    None,
    Circle,
    Square,
    Triangle,
    Cross,
}

impl PointStyle {
    pub fn label(&self) -> &'static str {
        match self {
            PointStyle::None => "none",
            PointStyle::Circle => "circle",
            PointStyle::Square => "square",
            PointStyle::Triangle => "triangle",
            PointStyle::Cross => "cross",
        }
    }

    pub fn all() -> &'static [PointStyle] {
        &[
            PointStyle::None,
            PointStyle::Circle,
            PointStyle::Square,
            PointStyle::Triangle,
            PointStyle::Cross,
        ]
    }
}

impl fmt::Display for PointStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PointStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PointStyle::all()
            .iter()
            .copied()
            .find(|style| style.label() == wanted)
            .ok_or_else(|| format!("unknown point style '{}'", s))
    }
}

// ============================================================================
// Scale Placement
// ============================================================================

/// Direction along which a scale measures values
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

/// Which side of the plot area a scale sits on.
///
/// `Near` is the left side for vertical scales and the bottom for horizontal
/// ones; `Far` is right or top.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Near,
    Far,
}

impl Side {
    pub fn flipped(&self) -> Side {
        match self {
            Side::Near => Side::Far,
            Side::Far => Side::Near,
        }
    }
}
