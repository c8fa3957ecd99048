//! Data series.
//!
//! A [`DataSeries`] holds XY points bound to one horizontal and one vertical
//! scale. Rendering maps every point to pixels and keeps the result, with an
//! R-tree over the polyline, until the points or either scale change. Hit
//! tests only ever answer from a current render.

use crate::geom::PixelPoint;
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::hit_index::HitIndex;
use crate::graph::scale::{FitMode, ScaleId, ScaleSet};
use crate::types::{Color, PointStyle};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One sample in value space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Scale revisions a render was computed against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RenderStamp {
    x: (ScaleId, u64),
    y: (ScaleId, u64),
}

#[derive(Debug)]
struct RenderCache {
    /// One pixel per point, index for index
    pixels: Vec<PixelPoint>,
    index: HitIndex,
    stamp: RenderStamp,
}

#[derive(Debug)]
pub struct DataSeries {
    name: String,
    point_style: PointStyle,
    color: Color,
    points: Vec<DataPoint>,
    scale_x: Option<ScaleId>,
    scale_y: Option<ScaleId>,
    selected: bool,
    cache: Option<RenderCache>,
}

impl DataSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            point_style: PointStyle::default(),
            color: Color::PRETTY_BLUE,
            points: Vec::new(),
            scale_x: None,
            scale_y: None,
            selected: false,
            cache: None,
        }
    }

    pub fn with_points<I, P>(name: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<DataPoint>,
    {
        let mut series = Self::new(name);
        series.points = points.into_iter().map(Into::into).collect();
        series
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn point_style(&self) -> PointStyle {
        self.point_style
    }

    pub fn set_point_style(&mut self, style: PointStyle) {
        self.point_style = style;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Append a point. The render is dropped; scales are not touched.
    pub fn add(&mut self, x: f64, y: f64) {
        self.points.push(DataPoint::new(x, y));
        self.cache = None;
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    // ------------------------------------------------------------------------
    // Scale binding
    // ------------------------------------------------------------------------

    pub fn bind(&mut self, scale_x: ScaleId, scale_y: ScaleId) {
        self.scale_x = Some(scale_x);
        self.scale_y = Some(scale_y);
        self.cache = None;
    }

    pub fn scale_x(&self) -> Option<ScaleId> {
        self.scale_x
    }

    pub fn scale_y(&self) -> Option<ScaleId> {
        self.scale_y
    }

    fn bindings(&self) -> GraphResult<(ScaleId, ScaleId)> {
        match (self.scale_x, self.scale_y) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(GraphError::UnboundSeries(self.name.clone())),
        }
    }

    // ------------------------------------------------------------------------
    // Extents and fitting
    // ------------------------------------------------------------------------

    /// Finite min/max of the x values
    pub fn extent_x(&self) -> Option<(f64, f64)> {
        finite_extent(self.points.iter().map(|p| p.x))
    }

    /// Finite min/max of the y values
    pub fn extent_y(&self) -> Option<(f64, f64)> {
        finite_extent(self.points.iter().map(|p| p.y))
    }

    /// Widen the bound scales to this series. Unbound series are left alone.
    pub fn auto_scale(&self, scales: &mut ScaleSet, mode: FitMode) -> GraphResult<()> {
        let (Some(x), Some(y)) = (self.scale_x, self.scale_y) else {
            return Ok(());
        };
        if let Some((lo, hi)) = self.extent_x() {
            scales.scale_mut(x)?.fit_extent(lo, hi, mode);
        }
        if let Some((lo, hi)) = self.extent_y() {
            scales.scale_mut(y)?.fit_extent(lo, hi, mode);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Render cache
    // ------------------------------------------------------------------------

    /// Map every point to pixels against the scales' last layout
    pub fn drawit(&mut self, scales: &ScaleSet) -> GraphResult<&[PixelPoint]> {
        let (x_id, y_id) = self.bindings()?;
        let sx = scales.scale(x_id)?;
        let sy = scales.scale(y_id)?;
        let x_inner = sx.ensure_drawable()?;
        let y_inner = sy.ensure_drawable()?;

        let pixels = self
            .points
            .iter()
            .map(|p| {
                Ok(PixelPoint::new(
                    sx.real_coord(p.x, &x_inner)?,
                    sy.real_coord(p.y, &y_inner)?,
                ))
            })
            .collect::<GraphResult<Vec<_>>>()?;
        trace!(series = %self.name, points = pixels.len(), "Rendered series");

        let cache = RenderCache {
            index: HitIndex::from_polyline(&pixels),
            pixels,
            stamp: RenderStamp {
                x: (x_id, sx.revision()),
                y: (y_id, sy.revision()),
            },
        };
        Ok(&self.cache.insert(cache).pixels)
    }

    fn current_stamp(&self, scales: &ScaleSet) -> Option<RenderStamp> {
        let (x, y) = self.bindings().ok()?;
        Some(RenderStamp {
            x: (x, scales.revision_of(x)?),
            y: (y, scales.revision_of(y)?),
        })
    }

    fn current_cache(&self, scales: &ScaleSet) -> Option<&RenderCache> {
        let cache = self.cache.as_ref()?;
        (Some(cache.stamp) == self.current_stamp(scales)).then_some(cache)
    }

    /// True when the last render still matches the points and scales
    pub fn is_render_current(&self, scales: &ScaleSet) -> bool {
        self.current_cache(scales).is_some()
    }

    /// Pixels of the last render, if still current
    pub fn rendered(&self, scales: &ScaleSet) -> Option<&[PixelPoint]> {
        self.current_cache(scales).map(|c| c.pixels.as_slice())
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    // ------------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------------

    /// Distance from `pt` to the rendered polyline, `None` without a current
    /// non-empty render
    pub fn distance(&self, pt: PixelPoint, scales: &ScaleSet) -> Option<f64> {
        self.current_cache(scales)?.index.distance(pt)
    }

    /// Index of the rendered point nearest `pt`, with its pixel distance
    pub fn nearest_point(&self, pt: PixelPoint, scales: &ScaleSet) -> Option<(usize, f64)> {
        self.current_cache(scales)?.index.nearest_point(pt)
    }
}

fn finite_extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
