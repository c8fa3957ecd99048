//! Series construction recipes.
//!
//! A [`SeriesPlan`] is what a dialect hands to the display: which scales to
//! create and which points go into which series. Building the whole plan
//! before touching the display keeps ingestion all-or-nothing.

use crate::types::{Orientation, Side};
use serde::Serialize;

/// A scale to create for a plan
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScaleSpec {
    pub label: String,
    pub unit: String,
    pub orientation: Orientation,
    pub side: Side,
}

impl ScaleSpec {
    pub fn horizontal(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            orientation: Orientation::Horizontal,
            side: Side::Near,
        }
    }

    pub fn vertical(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
            orientation: Orientation::Vertical,
            side: Side::Near,
        }
    }

    pub fn on_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }
}

/// A series to create; scale fields index into [`SeriesPlan::scales`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesSpec {
    pub name: String,
    pub x_scale: usize,
    pub y_scale: usize,
    pub points: Vec<(f64, f64)>,
}

/// Scales and series produced from one parsed input
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeriesPlan {
    pub scales: Vec<ScaleSpec>,
    pub series: Vec<SeriesSpec>,
}

impl SeriesPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scale and return its plan-local index
    pub fn add_scale(&mut self, spec: ScaleSpec) -> usize {
        self.scales.push(spec);
        self.scales.len() - 1
    }

    pub fn add_series(
        &mut self,
        name: impl Into<String>,
        x_scale: usize,
        y_scale: usize,
        points: Vec<(f64, f64)>,
    ) {
        self.series.push(SeriesSpec {
            name: name.into(),
            x_scale,
            y_scale,
            points,
        });
    }

    /// Total number of points over all series
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Drop series without points, then scales no remaining series uses.
    /// Scale indices of the kept series are renumbered to match.
    pub fn without_empty_series(mut self) -> Self {
        self.series.retain(|s| !s.points.is_empty());

        let used: Vec<bool> = (0..self.scales.len())
            .map(|i| self.series.iter().any(|s| s.x_scale == i || s.y_scale == i))
            .collect();
        let mut remap = vec![None; self.scales.len()];
        let mut kept = 0;
        for (i, &is_used) in used.iter().enumerate() {
            if is_used {
                remap[i] = Some(kept);
                kept += 1;
            }
        }

        let mut index = 0;
        self.scales.retain(|_| {
            let keep = used[index];
            index += 1;
            keep
        });
        for series in &mut self.series {
            series.x_scale = remap[series.x_scale].unwrap_or(series.x_scale);
            series.y_scale = remap[series.y_scale].unwrap_or(series.y_scale);
        }
        self
    }
}
