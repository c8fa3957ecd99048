//! Axis scales.
//!
//! An [`AxisScale`] maps values in its visible window onto the pixel span of
//! the plot rectangle it was laid out against. Only linear scales exist.
//! Horizontal scales grow rightwards; vertical scales grow upwards, against
//! the downward pixel axis.
//!
//! Every change to the visible window or the plot rectangle bumps the
//! scale's revision, which is how rendered series notice they are stale.

use crate::constants::{HORIZONTAL_SCALE_HEIGHT, VERTICAL_SCALE_WIDTH, ZOOM_FIT_PERCENT};
use crate::geom::PixelRect;
use crate::graph::error::{GraphError, GraphResult};
use crate::types::{Color, Orientation, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on ticks produced for one scale
const MAX_TICKS: usize = 1000;

/// Stable handle of a scale inside a [`ScaleSet`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScaleId(usize);

impl ScaleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ScaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happens to the visible window when the extent is fitted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitMode {
    /// Visible window becomes the new full extent
    ResetView,
    /// Visible window is left alone (append-only live data)
    KeepView,
}

/// One labelled tick along a scale
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub pixel: f64,
    pub label: String,
}

#[derive(Clone, Debug)]
pub struct AxisScale {
    full_min: f64,
    full_max: f64,
    visible_bottom: f64,
    visible_top: f64,
    orientation: Orientation,
    side: Side,
    label: String,
    unit: String,
    scale_type: String,
    color: Color,
    mark: Option<f64>,
    selected: bool,
    /// Strip size taken from the plot rectangle, in pixels
    thickness: f64,
    last_inner: Option<PixelRect>,
    outline: Option<PixelRect>,
    revision: u64,
}

impl AxisScale {
    pub fn new(orientation: Orientation, label: impl Into<String>, unit: impl Into<String>) -> Self {
        let thickness = match orientation {
            Orientation::Horizontal => HORIZONTAL_SCALE_HEIGHT,
            Orientation::Vertical => VERTICAL_SCALE_WIDTH,
        };
        Self {
            full_min: 0.0,
            full_max: 0.0,
            visible_bottom: 0.0,
            visible_top: 0.0,
            orientation,
            side: Side::Near,
            label: label.into(),
            unit: unit.into(),
            scale_type: "linear".to_string(),
            color: Color::BLACK,
            mark: None,
            selected: false,
            thickness,
            last_inner: None,
            outline: None,
            revision: 0,
        }
    }

    pub fn horizontal(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(Orientation::Horizontal, label, unit)
    }

    pub fn vertical(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::new(Orientation::Vertical, label, unit)
    }

    /// Explicit initial bounds; the visible window starts at the full extent
    pub fn with_extent(mut self, min: f64, max: f64) -> Self {
        if min.is_finite() && max.is_finite() {
            let (min, max) = ordered(min, max);
            self.full_min = min;
            self.full_max = max;
            self.reset_view();
        }
        self
    }

    pub fn on_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.set_thickness(thickness);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Axis title as drawn, with the unit in parentheses when known
    pub fn title(&self) -> String {
        if self.unit.is_empty() {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, self.unit)
        }
    }

    pub fn scale_type(&self) -> &str {
        &self.scale_type
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn full_min(&self) -> f64 {
        self.full_min
    }

    pub fn full_max(&self) -> f64 {
        self.full_max
    }

    pub fn visible_bottom(&self) -> f64 {
        self.visible_bottom
    }

    pub fn visible_top(&self) -> f64 {
        self.visible_top
    }

    pub fn total_width(&self) -> f64 {
        self.full_max - self.full_min
    }

    pub fn visible_width(&self) -> f64 {
        self.visible_top - self.visible_bottom
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        if thickness.is_finite() {
            self.thickness = thickness.max(0.0);
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Plot rectangle from the last layout
    pub fn last_inner(&self) -> Option<PixelRect> {
        self.last_inner
    }

    /// Strip the scale occupies, from the last layout
    pub fn outline(&self) -> Option<PixelRect> {
        self.outline
    }

    /// True when the visible window cannot be mapped to pixels
    pub fn is_degenerate(&self) -> bool {
        let width = self.visible_width();
        !(width > 0.0 && width.is_finite())
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ------------------------------------------------------------------------
    // Window and extent
    // ------------------------------------------------------------------------

    /// Set the visible window; reversed bounds are swapped, non-finite ignored
    pub fn set_visible(&mut self, bottom: f64, top: f64) {
        if !(bottom.is_finite() && top.is_finite()) {
            return;
        }
        let (bottom, top) = ordered(bottom, top);
        if bottom != self.visible_bottom || top != self.visible_top {
            self.visible_bottom = bottom;
            self.visible_top = top;
            self.bump();
        }
    }

    /// Show the whole fitted extent
    pub fn reset_view(&mut self) {
        self.set_visible(self.full_min, self.full_max);
    }

    /// Widen the full extent to cover `[data_min, data_max]`. Never shrinks.
    pub fn fit_extent(&mut self, data_min: f64, data_max: f64, mode: FitMode) {
        if !(data_min.is_finite() && data_max.is_finite()) {
            return;
        }
        let (lo, hi) = ordered(data_min, data_max);
        self.full_min = self.full_min.min(lo);
        self.full_max = self.full_max.max(hi);
        if mode == FitMode::ResetView {
            self.reset_view();
        }
    }

    /// Zoom around the current center. 100 shows the full extent; larger
    /// values zoom in, and the window is kept inside the full extent.
    pub fn set_zoom(&mut self, percent: u32) {
        let percent = percent.max(ZOOM_FIT_PERCENT);
        if percent == ZOOM_FIT_PERCENT {
            self.reset_view();
            return;
        }
        let width = self.total_width() * f64::from(ZOOM_FIT_PERCENT) / f64::from(percent);
        let center = (self.visible_bottom + self.visible_top) / 2.0;
        let bottom = (center - width / 2.0)
            .min(self.full_max - width)
            .max(self.full_min);
        self.set_visible(bottom, bottom + width);
    }

    // ------------------------------------------------------------------------
    // Transform
    // ------------------------------------------------------------------------

    fn span(&self, inner: &PixelRect) -> f64 {
        match self.orientation {
            Orientation::Horizontal => inner.width,
            Orientation::Vertical => inner.height,
        }
    }

    /// Visible width and pixel span, both usable as divisors
    fn transform_params(&self, inner: &PixelRect) -> GraphResult<(f64, f64)> {
        let span = self.span(inner);
        if self.is_degenerate() || !(span > 0.0 && span.is_finite()) {
            return Err(GraphError::DegenerateScale(self.label.clone()));
        }
        Ok((self.visible_width(), span))
    }

    /// Pixel position of `value` inside `inner`
    pub fn real_coord(&self, value: f64, inner: &PixelRect) -> GraphResult<f64> {
        let (width, span) = self.transform_params(inner)?;
        let offset = (value - self.visible_bottom) / width * span;
        Ok(match self.orientation {
            Orientation::Horizontal => inner.left() + offset,
            Orientation::Vertical => inner.bottom() - offset,
        })
    }

    /// Value under pixel position `pixel` inside `inner`
    pub fn virtual_coord(&self, pixel: f64, inner: &PixelRect) -> GraphResult<f64> {
        let (width, span) = self.transform_params(inner)?;
        let offset = match self.orientation {
            Orientation::Horizontal => pixel - inner.left(),
            Orientation::Vertical => inner.bottom() - pixel,
        };
        Ok(self.visible_bottom + offset / span * width)
    }

    pub fn laid_out_rect(&self) -> GraphResult<PixelRect> {
        self.last_inner
            .ok_or_else(|| GraphError::NotLaidOut(self.label.clone()))
    }

    /// Plot rectangle, once the scale is laid out and not degenerate
    pub fn ensure_drawable(&self) -> GraphResult<PixelRect> {
        let inner = self.laid_out_rect()?;
        self.transform_params(&inner)?;
        Ok(inner)
    }

    /// Pixel position of `value` in the last plot rectangle
    pub fn pixel(&self, value: f64) -> GraphResult<f64> {
        self.real_coord(value, &self.laid_out_rect()?)
    }

    /// Value under `pixel` in the last plot rectangle
    pub fn value_at(&self, pixel: f64) -> GraphResult<f64> {
        self.virtual_coord(pixel, &self.laid_out_rect()?)
    }

    /// Pan by a pixel delta along the axis. Width and extent are unchanged.
    pub fn drag(&mut self, delta_px: f64) -> GraphResult<()> {
        let inner = self.laid_out_rect()?;
        let (width, span) = self.transform_params(&inner)?;
        let delta = delta_px * width / span;
        if delta.is_finite() && delta != 0.0 {
            self.visible_bottom += delta;
            self.visible_top += delta;
            self.bump();
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Plot rectangle left after this scale takes its strip from `outer`
    pub fn calc_internal_rect(&self, outer: &PixelRect) -> PixelRect {
        let t = self.thickness;
        let mut inner = *outer;
        match (self.orientation, self.side) {
            (Orientation::Vertical, Side::Near) => {
                inner.x += t;
                inner.width -= t;
            }
            (Orientation::Vertical, Side::Far) => inner.width -= t,
            (Orientation::Horizontal, Side::Near) => inner.height -= t,
            (Orientation::Horizontal, Side::Far) => {
                inner.y += t;
                inner.height -= t;
            }
        }
        inner.width = inner.width.max(0.0);
        inner.height = inner.height.max(0.0);
        inner
    }

    /// Claim the scale strip inside `inner` and return what is left
    pub fn drawit(&mut self, inner: &PixelRect) -> PixelRect {
        let t = self.thickness;
        let strip = match (self.orientation, self.side) {
            (Orientation::Vertical, Side::Near) => PixelRect::new(inner.left(), inner.top(), t, inner.height),
            (Orientation::Vertical, Side::Far) => {
                PixelRect::new(inner.right() - t, inner.top(), t, inner.height)
            }
            (Orientation::Horizontal, Side::Near) => {
                PixelRect::new(inner.left(), inner.bottom() - t, inner.width, t)
            }
            (Orientation::Horizontal, Side::Far) => PixelRect::new(inner.left(), inner.top(), inner.width, t),
        };
        self.outline = Some(strip);
        self.calc_internal_rect(inner)
    }

    /// Bind the final plot rectangle that transforms run against
    pub fn attach(&mut self, plot: PixelRect) {
        if self.last_inner != Some(plot) {
            self.last_inner = Some(plot);
            self.bump();
        }
    }

    /// Move to the opposite side of the plot; the layout must be redone
    pub fn swap_side(&mut self) {
        self.side = self.side.flipped();
        self.outline = None;
    }

    // ------------------------------------------------------------------------
    // Cursor marker
    // ------------------------------------------------------------------------

    pub fn set_mark(&mut self, value: f64) {
        if value.is_finite() {
            self.mark = Some(value);
        }
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    pub fn mark(&self) -> Option<f64> {
        self.mark
    }

    /// Pixel position of the marker, when set and drawable
    pub fn mark_pixel(&self) -> Option<f64> {
        self.mark.and_then(|m| self.pixel(m).ok())
    }

    // ------------------------------------------------------------------------
    // Ticks
    // ------------------------------------------------------------------------

    /// Ticks at a 1/2/5 step over the visible window, about `target` of them
    pub fn ticks(&self, target: usize) -> GraphResult<Vec<Tick>> {
        let inner = self.ensure_drawable()?;
        let step = nice_step(self.visible_width(), target);
        let decimals = if step >= 1.0 {
            0
        } else {
            (-step.log10().floor()) as usize
        };

        let first = (self.visible_bottom / step).ceil();
        let limit = self.visible_top + step * 1e-9;
        let mut ticks = Vec::new();
        for k in 0..MAX_TICKS {
            let mut value = (first + k as f64) * step;
            if value > limit {
                break;
            }
            if value.abs() < step * 1e-9 {
                value = 0.0;
            }
            ticks.push(Tick {
                value,
                pixel: self.real_coord(value, &inner)?,
                label: format!("{:.*}", decimals, value),
            });
        }
        Ok(ticks)
    }
}

/// Step of the form {1, 2, 5} x 10^n giving about `target` intervals
fn nice_step(range: f64, target: usize) -> f64 {
    let raw = range / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

// ============================================================================
// Scale arena
// ============================================================================

/// Owner of every scale of a display. Scales are never removed, so a
/// [`ScaleId`] stays valid for the lifetime of the set.
#[derive(Clone, Debug, Default)]
pub struct ScaleSet {
    scales: Vec<AxisScale>,
}

impl ScaleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, scale: AxisScale) -> ScaleId {
        self.scales.push(scale);
        ScaleId(self.scales.len() - 1)
    }

    pub fn get(&self, id: ScaleId) -> Option<&AxisScale> {
        self.scales.get(id.0)
    }

    pub fn get_mut(&mut self, id: ScaleId) -> Option<&mut AxisScale> {
        self.scales.get_mut(id.0)
    }

    pub fn scale(&self, id: ScaleId) -> GraphResult<&AxisScale> {
        self.get(id).ok_or(GraphError::UnknownScale(id.0))
    }

    pub fn scale_mut(&mut self, id: ScaleId) -> GraphResult<&mut AxisScale> {
        self.get_mut(id).ok_or(GraphError::UnknownScale(id.0))
    }

    /// Current revision of a scale, `None` for unknown ids
    pub fn revision_of(&self, id: ScaleId) -> Option<u64> {
        self.get(id).map(|s| s.revision())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScaleId, &AxisScale)> {
        self.scales.iter().enumerate().map(|(i, s)| (ScaleId(i), s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ScaleId, &mut AxisScale)> {
        self.scales
            .iter_mut()
            .enumerate()
            .map(|(i, s)| (ScaleId(i), s))
    }

    pub fn ids(&self) -> Vec<ScaleId> {
        (0..self.scales.len()).map(ScaleId).collect()
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}
