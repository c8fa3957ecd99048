//! Unit tests for data series rendering and hit testing.

use crate::helpers::assert_close;
use labgraph::geom::{PixelPoint, PixelRect};
use labgraph::graph::{AxisScale, DataSeries, FitMode, GraphError, ScaleId, ScaleSet};

const PLOT: PixelRect = PixelRect::new(0.0, 0.0, 100.0, 100.0);

fn scales() -> (ScaleSet, ScaleId, ScaleId) {
    let mut set = ScaleSet::new();
    let x = set.add(AxisScale::horizontal("x", "").with_extent(0.0, 10.0));
    let y = set.add(AxisScale::vertical("y", "").with_extent(0.0, 10.0));
    for id in [x, y] {
        set.scale_mut(id).unwrap().attach(PLOT);
    }
    (set, x, y)
}

fn flat_line(x: ScaleId, y: ScaleId) -> DataSeries {
    // y = 5 runs across the middle of the plot at pixel row 50
    let mut series = DataSeries::with_points("flat", [(0.0, 5.0), (5.0, 5.0), (10.0, 5.0)]);
    series.bind(x, y);
    series
}

#[test]
fn test_render_maps_points_to_pixels() {
    let (set, x, y) = scales();
    let mut series = flat_line(x, y);
    let pixels = series.drawit(&set).unwrap().to_vec();
    assert_eq!(
        pixels,
        vec![
            PixelPoint::new(0.0, 50.0),
            PixelPoint::new(50.0, 50.0),
            PixelPoint::new(100.0, 50.0)
        ]
    );
    assert!(series.is_render_current(&set));
}

#[test]
fn test_distance_grows_away_from_curve() {
    let (set, x, y) = scales();
    let mut series = flat_line(x, y);
    series.drawit(&set).unwrap();
    let mut last = -1.0;
    for offset in [0.0, 2.0, 7.5, 20.0, 45.0] {
        let d = series.distance(PixelPoint::new(30.0, 50.0 + offset), &set).unwrap();
        assert_close(d, offset);
        assert!(d > last);
        last = d;
    }
}

#[test]
fn test_nearest_point_reports_index() {
    let (set, x, y) = scales();
    let mut series = flat_line(x, y);
    series.drawit(&set).unwrap();
    let (index, d) = series.nearest_point(PixelPoint::new(90.0, 50.0), &set).unwrap();
    assert_eq!(index, 2);
    assert_close(d, 10.0);
}

#[test]
fn test_stale_render_gives_no_distance() {
    let (mut set, x, y) = scales();
    let mut series = flat_line(x, y);
    assert_eq!(series.distance(PixelPoint::new(0.0, 0.0), &set), None);

    series.drawit(&set).unwrap();
    set.scale_mut(y).unwrap().set_visible(0.0, 20.0);
    assert!(!series.is_render_current(&set));
    assert_eq!(series.distance(PixelPoint::new(30.0, 50.0), &set), None);

    // the old pixels are not reused after a redraw
    series.drawit(&set).unwrap();
    assert_close(series.distance(PixelPoint::new(30.0, 50.0), &set).unwrap(), 25.0);

    series.add(12.0, 5.0);
    assert!(series.rendered(&set).is_none());
}

#[test]
fn test_unbound_series_cannot_render() {
    let (set, _, _) = scales();
    let mut series = DataSeries::with_points("loose", [(1.0, 1.0)]);
    assert_eq!(
        series.drawit(&set).unwrap_err(),
        GraphError::UnboundSeries("loose".to_string())
    );
}

#[test]
fn test_auto_scale_fits_bound_scales() {
    let mut set = ScaleSet::new();
    let x = set.add(AxisScale::horizontal("x", ""));
    let y = set.add(AxisScale::vertical("y", ""));
    let mut series = DataSeries::with_points("ramp", [(2.0, -1.0), (4.0, f64::NAN), (6.0, 3.0)]);
    series.bind(x, y);
    series.auto_scale(&mut set, FitMode::ResetView).unwrap();
    let sx = set.scale(x).unwrap();
    let sy = set.scale(y).unwrap();
    // x widens from the default [0, 0] extent
    assert_eq!((sx.visible_bottom(), sx.visible_top()), (0.0, 6.0));
    assert_eq!((sy.visible_bottom(), sy.visible_top()), (-1.0, 3.0));
}
