//! Display surface.
//!
//! Owns the scales and series of one plot and orchestrates them: loading
//! files through the detector, fitting, layout, rendering and the pointer
//! interactions (pan, rubber-band zoom, cursor marker, selection). It holds
//! no parsing or transform logic of its own.

use crate::constants::ZOOM_FIT_PERCENT;
use crate::data::{DataError, DataResult, FormatDetector, FormatId, SeriesPlan};
use crate::geom::{PixelPoint, PixelRect};
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::scale::{AxisScale, FitMode, ScaleId, ScaleSet, Tick};
use crate::graph::series::DataSeries;
use crate::perf::INTERACTIVE_PASS_MS;
use crate::time_pass;
use crate::settings::{GraphSettings, LayoutSettings};
use crate::types::Orientation;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, trace};

/// Stable handle of a series inside a [`DisplaySurface`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(usize);

impl SeriesId {
    pub fn index(&self) -> usize {
        self.0
    }
}

pub struct DisplaySurface {
    scales: ScaleSet,
    series: Vec<DataSeries>,
    outer: Option<PixelRect>,
    inner: Option<PixelRect>,
    laid_out: bool,
    /// Percent zoom of horizontal and vertical scales
    zoom: (u32, u32),
    settings: GraphSettings,
    detector: FormatDetector,
}

impl DisplaySurface {
    pub fn new(settings: &GraphSettings) -> Self {
        Self {
            scales: ScaleSet::new(),
            series: Vec::new(),
            outer: None,
            inner: None,
            laid_out: false,
            zoom: (ZOOM_FIT_PERCENT, ZOOM_FIT_PERCENT),
            settings: settings.clone(),
            detector: FormatDetector::new(&settings.dialects)
                .with_max_file_size_mb(settings.max_file_size_mb),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn scales(&self) -> &ScaleSet {
        &self.scales
    }

    pub fn scale_at(&self, id: ScaleId) -> Option<&AxisScale> {
        self.scales.get(id)
    }

    pub fn scale_at_mut(&mut self, id: ScaleId) -> Option<&mut AxisScale> {
        self.scales.get_mut(id)
    }

    pub fn series_at(&self, id: SeriesId) -> Option<&DataSeries> {
        self.series.get(id.0)
    }

    /// Mutable access; the series' render is dropped
    pub fn series_at_mut(&mut self, id: SeriesId) -> Option<&mut DataSeries> {
        let series = self.series.get_mut(id.0)?;
        series.invalidate();
        Some(series)
    }

    pub fn series(&self) -> impl Iterator<Item = (SeriesId, &DataSeries)> {
        self.series.iter().enumerate().map(|(i, s)| (SeriesId(i), s))
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn detector(&self) -> &FormatDetector {
        &self.detector
    }

    pub fn layout_settings(&self) -> &LayoutSettings {
        &self.settings.layout
    }

    pub fn zoom(&self) -> (u32, u32) {
        self.zoom
    }

    /// Plot rectangle of the last layout
    pub fn inner_rect(&self) -> Option<PixelRect> {
        self.inner
    }

    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    /// Laid out, with at least one scale and none degenerate
    pub fn is_setup_complete(&self) -> bool {
        self.laid_out
            && !self.scales.is_empty()
            && self.scales.iter().all(|(_, s)| !s.is_degenerate())
    }

    // ------------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------------

    pub fn add_scale(&mut self, mut scale: AxisScale) -> ScaleId {
        scale.set_thickness(match scale.orientation() {
            Orientation::Horizontal => self.settings.layout.horizontal_scale_height,
            Orientation::Vertical => self.settings.layout.vertical_scale_width,
        });
        self.laid_out = false;
        self.scales.add(scale)
    }

    /// Add a series bound to scales of this display
    pub fn add_series(&mut self, series: DataSeries) -> GraphResult<SeriesId> {
        let (Some(x), Some(y)) = (series.scale_x(), series.scale_y()) else {
            return Err(GraphError::UnboundSeries(series.name().to_string()));
        };
        self.scales.scale(x)?;
        self.scales.scale(y)?;
        self.series.push(series);
        Ok(SeriesId(self.series.len() - 1))
    }

    pub fn load_file(&mut self, path: &Path) -> DataResult<Vec<SeriesId>> {
        let detection = self.detector.detect_file(path)?;
        self.apply_plan(&detection.plan)
    }

    pub fn load_bytes(&mut self, bytes: &[u8], title: &str) -> DataResult<Vec<SeriesId>> {
        let detection = self.detector.detect_bytes(bytes, title)?;
        self.apply_plan(&detection.plan)
    }

    /// Load with a chosen dialect, skipping detection
    pub fn load_file_as(&mut self, path: &Path, format: FormatId) -> DataResult<Vec<SeriesId>> {
        let detection = self.detector.parse_file_as(path, format)?;
        self.apply_plan(&detection.plan)
    }

    /// Create the plan's scales and series, then fit everything.
    ///
    /// The plan is checked first, so a bad plan leaves the display untouched.
    pub fn apply_plan(&mut self, plan: &SeriesPlan) -> DataResult<Vec<SeriesId>> {
        for spec in &plan.series {
            for index in [spec.x_scale, spec.y_scale] {
                if index >= plan.scales.len() {
                    return Err(DataError::Other(format!(
                        "Series '{}' refers to missing scale {}",
                        spec.name, index
                    )));
                }
            }
        }

        let scale_ids: Vec<ScaleId> = plan
            .scales
            .iter()
            .map(|spec| {
                self.add_scale(
                    AxisScale::new(spec.orientation, spec.label.clone(), spec.unit.clone())
                        .on_side(spec.side),
                )
            })
            .collect();

        let mut ids = Vec::with_capacity(plan.series.len());
        for spec in &plan.series {
            let mut series = DataSeries::with_points(spec.name.clone(), spec.points.iter().copied());
            series.set_color(self.settings.series_color(self.series.len()));
            series.bind(scale_ids[spec.x_scale], scale_ids[spec.y_scale]);
            self.series.push(series);
            ids.push(SeriesId(self.series.len() - 1));
        }

        self.auto_scale();
        info!(
            scales = scale_ids.len(),
            series = ids.len(),
            points = plan.point_count(),
            "Applied series plan"
        );
        Ok(ids)
    }

    // ------------------------------------------------------------------------
    // Fitting and zoom
    // ------------------------------------------------------------------------

    /// Fit every scale to the union of its series' extents and show it all
    pub fn auto_scale(&mut self) {
        for (id, scale) in self.scales.iter_mut() {
            let mut union: Option<(f64, f64)> = None;
            for series in &self.series {
                let extent = if series.scale_x() == Some(id) {
                    series.extent_x()
                } else if series.scale_y() == Some(id) {
                    series.extent_y()
                } else {
                    None
                };
                if let Some((lo, hi)) = extent {
                    union = Some(match union {
                        Some((a, b)) => (a.min(lo), b.max(hi)),
                        None => (lo, hi),
                    });
                }
            }
            if let Some((lo, hi)) = union {
                scale.fit_extent(lo, hi, FitMode::ResetView);
            }
        }
        self.zoom = (ZOOM_FIT_PERCENT, ZOOM_FIT_PERCENT);
    }

    /// Percent zoom per orientation; 100 fits, larger zooms in
    pub fn set_zoom(&mut self, zx: u32, zy: u32) {
        let max = self.settings.layout.max_zoom_percent.max(ZOOM_FIT_PERCENT);
        let clamp = |z: u32| z.clamp(ZOOM_FIT_PERCENT, max);
        let (zx, zy) = (clamp(zx), clamp(zy));
        for (_, scale) in self.scales.iter_mut() {
            scale.set_zoom(if scale.orientation().is_horizontal() { zx } else { zy });
        }
        self.zoom = (zx, zy);
        debug!(zx, zy, "Zoom set");
    }

    // ------------------------------------------------------------------------
    // Layout and rendering
    // ------------------------------------------------------------------------

    /// Let every scale take its strip from `outer`, in insertion order, and
    /// bind them all to the remaining plot rectangle
    pub fn layout(&mut self, outer: PixelRect) -> PixelRect {
        time_pass!("display.layout", INTERACTIVE_PASS_MS);
        let mut inner = outer;
        for (_, scale) in self.scales.iter_mut() {
            inner = scale.drawit(&inner);
        }
        for (_, scale) in self.scales.iter_mut() {
            scale.attach(inner);
        }
        self.outer = Some(outer);
        self.inner = Some(inner);
        self.laid_out = true;
        inner
    }

    /// Re-render every stale series and return how many were redrawn.
    ///
    /// Series bound to a degenerate scale are skipped; their distance stays
    /// unknown while the others remain drawable and hit-testable.
    pub fn render(&mut self) -> GraphResult<usize> {
        time_pass!("display.render", INTERACTIVE_PASS_MS);
        if !self.laid_out {
            let outer = self
                .outer
                .ok_or_else(|| GraphError::NotLaidOut("display".to_string()))?;
            self.layout(outer);
        }
        let mut redrawn = 0;
        for series in &mut self.series {
            if series.is_render_current(&self.scales) {
                continue;
            }
            match series.drawit(&self.scales) {
                Ok(_) => redrawn += 1,
                Err(GraphError::DegenerateScale(scale)) => {
                    debug!(series = %series.name(), %scale, "Skipped series on degenerate scale");
                }
                Err(e) => return Err(e),
            }
        }
        trace!(redrawn, "Render pass");
        Ok(redrawn)
    }

    pub fn ticks(&self, id: ScaleId) -> GraphResult<Vec<Tick>> {
        self.scales.scale(id)?.ticks(self.settings.layout.tick_target)
    }

    // ------------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------------

    /// Series closest to `pt`, rendering stale series first
    pub fn nearest_series(&mut self, pt: PixelPoint) -> Option<(SeriesId, f64)> {
        if let Err(e) = self.render() {
            debug!("No hit test, render failed: {}", e);
            return None;
        }
        self.series
            .iter()
            .enumerate()
            .filter_map(|(i, s)| Some((SeriesId(i), s.distance(pt, &self.scales)?)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Select the series under `pt` within the hit tolerance, deselecting
    /// every other one
    pub fn select_at(&mut self, pt: PixelPoint) -> Option<SeriesId> {
        let hit = self
            .nearest_series(pt)
            .filter(|&(_, d)| d <= self.settings.layout.hit_tolerance_px)
            .map(|(id, _)| id);
        for (i, series) in self.series.iter_mut().enumerate() {
            series.set_selected(hit == Some(SeriesId(i)));
        }
        hit
    }

    pub fn selected_series(&self) -> Option<SeriesId> {
        self.series.iter().position(|s| s.is_selected()).map(SeriesId)
    }

    /// Select the scale whose strip contains `pt`
    pub fn scale_hit(&mut self, pt: PixelPoint) -> Option<ScaleId> {
        let hit = self
            .scales
            .iter()
            .find(|(_, s)| s.outline().is_some_and(|o| o.contains(pt)))
            .map(|(id, _)| id);
        for (id, scale) in self.scales.iter_mut() {
            scale.set_selected(hit == Some(id));
        }
        hit
    }

    // ------------------------------------------------------------------------
    // Pointer interactions
    // ------------------------------------------------------------------------

    /// Scales that can map pixels to values. Degenerate scales are left out;
    /// any other layout error is returned.
    fn drawable_scales(&self) -> GraphResult<Vec<ScaleId>> {
        let mut ids = Vec::with_capacity(self.scales.len());
        for (id, scale) in self.scales.iter() {
            match scale.ensure_drawable() {
                Ok(_) => ids.push(id),
                Err(GraphError::DegenerateScale(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(ids)
    }

    /// Pan so the plot content follows a pointer moved by `(dx, dy)` pixels
    pub fn pan(&mut self, dx: f64, dy: f64) -> GraphResult<()> {
        for id in self.drawable_scales()? {
            let scale = self.scales.scale_mut(id)?;
            let delta = if scale.orientation().is_horizontal() { -dx } else { dy };
            scale.drag(delta)?;
        }
        Ok(())
    }

    /// Show exactly the values under a pixel rectangle on every drawable scale
    pub fn zoom_to_pixel_rect(&mut self, rect: PixelRect) -> GraphResult<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let mut windows = Vec::new();
        for id in self.drawable_scales()? {
            let s = self.scales.scale(id)?;
            let (a, b) = match s.orientation() {
                Orientation::Horizontal => (rect.left(), rect.right()),
                Orientation::Vertical => (rect.bottom(), rect.top()),
            };
            windows.push((id, s.value_at(a)?, s.value_at(b)?));
        }
        for (id, bottom, top) in windows {
            self.scales.scale_mut(id)?.set_visible(bottom, top);
        }
        Ok(())
    }

    /// Put every drawable scale's cursor marker at the value under `pt`
    pub fn mark_at(&mut self, pt: PixelPoint) -> GraphResult<()> {
        let mut values = Vec::new();
        for id in self.drawable_scales()? {
            let s = self.scales.scale(id)?;
            values.push((id, s.value_at(if s.orientation().is_horizontal() { pt.x } else { pt.y })?));
        }
        for (id, value) in values {
            self.scales.scale_mut(id)?.set_mark(value);
        }
        Ok(())
    }

    pub fn clear_marks(&mut self) {
        for (_, scale) in self.scales.iter_mut() {
            scale.clear_mark();
        }
    }

    /// Move a scale to the opposite side; the next render lays out again
    pub fn swap_sides(&mut self, id: ScaleId) -> GraphResult<()> {
        self.scales.scale_mut(id)?.swap_side();
        self.laid_out = false;
        Ok(())
    }
}

impl Default for DisplaySurface {
    fn default() -> Self {
        Self::new(&GraphSettings::default())
    }
}
