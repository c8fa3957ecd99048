//! Integration tests for pointer interaction on a laid-out display.
//!
//! The XY fixture on [`OUTER`] maps x in [0, 2] to pixels 56..456 and y in
//! [0, 4] to pixels 300..0, so (1, 1) sits at (256, 225).

use crate::helpers::{FLAT_NEIGHBOUR, TestDisplayBuilder, XY_TEXT, assert_close};
use labgraph::geom::{PixelPoint, PixelRect};
use labgraph::graph::{DisplaySurface, GraphError, ScaleId};
use labgraph::settings::GraphSettings;

fn xy_display() -> DisplaySurface {
    TestDisplayBuilder::new()
        .with_text(XY_TEXT, "demo")
        .laid_out()
        .build()
}

fn axes(display: &DisplaySurface) -> (ScaleId, ScaleId) {
    let (_, series) = display.series().next().unwrap();
    (series.scale_x().unwrap(), series.scale_y().unwrap())
}

#[test]
fn test_nearest_series_renders_on_demand() {
    let mut display = xy_display();
    let (id, d) = display.nearest_series(PixelPoint::new(256.0, 225.0)).unwrap();
    assert_eq!(id.index(), 0);
    assert!(d < 1e-9);
}

#[test]
fn test_select_within_tolerance_only() {
    let mut display = xy_display();
    let hit = display.select_at(PixelPoint::new(256.0, 230.0));
    assert!(hit.is_some());
    assert_eq!(display.selected_series(), hit);

    // far above the curve: nothing selected, and the old selection is cleared
    assert_eq!(display.select_at(PixelPoint::new(256.0, 60.0)), None);
    assert_eq!(display.selected_series(), None);
}

#[test]
fn test_tolerance_comes_from_settings() {
    let mut settings = GraphSettings::default();
    settings.layout.hit_tolerance_px = 200.0;
    let mut display = TestDisplayBuilder::new()
        .with_settings(settings)
        .with_text(XY_TEXT, "demo")
        .laid_out()
        .build();
    assert!(display.select_at(PixelPoint::new(256.0, 60.0)).is_some());
}

#[test]
fn test_pan_moves_window_and_keeps_width() {
    let mut display = xy_display();
    let (x, y) = axes(&display);
    display.render().unwrap();
    display.pan(40.0, 30.0).unwrap();

    let sx = display.scale_at(x).unwrap();
    assert_close(sx.visible_width(), 2.0);
    assert_close(sx.visible_bottom(), -0.2);
    let sy = display.scale_at(y).unwrap();
    assert_close(sy.visible_width(), 4.0);
    assert_close(sy.visible_bottom(), 0.4);

    // the pan invalidated the previous render
    assert_eq!(display.render().unwrap(), 1);
}

#[test]
fn test_rubber_band_zoom() {
    let mut display = xy_display();
    let (x, y) = axes(&display);
    display
        .zoom_to_pixel_rect(PixelRect::new(56.0, 150.0, 200.0, 150.0))
        .unwrap();

    let sx = display.scale_at(x).unwrap();
    assert_close(sx.visible_bottom(), 0.0);
    assert_close(sx.visible_top(), 1.0);
    let sy = display.scale_at(y).unwrap();
    assert_close(sy.visible_bottom(), 0.0);
    assert_close(sy.visible_top(), 2.0);
    // the full extent is untouched
    assert_eq!((sy.full_min(), sy.full_max()), (0.0, 4.0));
}

#[test]
fn test_empty_rubber_band_is_ignored() {
    let mut display = xy_display();
    let (x, _) = axes(&display);
    let before = display.scales().revision_of(x);
    display
        .zoom_to_pixel_rect(PixelRect::new(100.0, 100.0, 0.0, 40.0))
        .unwrap();
    assert_eq!(display.scales().revision_of(x), before);
}

#[test]
fn test_cursor_marker() {
    let mut display = xy_display();
    let (x, y) = axes(&display);
    display.mark_at(PixelPoint::new(156.0, 150.0)).unwrap();
    assert_close(display.scale_at(x).unwrap().mark().unwrap(), 0.5);
    assert_close(display.scale_at(y).unwrap().mark().unwrap(), 2.0);
    assert_close(display.scale_at(x).unwrap().mark_pixel().unwrap(), 156.0);

    display.clear_marks();
    assert_eq!(display.scale_at(x).unwrap().mark(), None);
}

#[test]
fn test_scale_strip_hit() {
    let mut display = xy_display();
    let (x, y) = axes(&display);
    assert_eq!(display.scale_hit(PixelPoint::new(200.0, 320.0)), Some(x));
    assert!(display.scale_at(x).unwrap().is_selected());
    assert_eq!(display.scale_hit(PixelPoint::new(20.0, 100.0)), Some(y));
    assert!(!display.scale_at(x).unwrap().is_selected());
    assert_eq!(display.scale_hit(PixelPoint::new(200.0, 100.0)), None);
}

#[test]
fn test_zoom_is_clamped() {
    let mut display = xy_display();
    let (x, y) = axes(&display);
    display.set_zoom(50, 20_000);
    assert_eq!(display.zoom(), (100, 10_000));
    assert_eq!(display.scale_at(x).unwrap().visible_width(), 2.0);
    assert_close(display.scale_at(y).unwrap().visible_width(), 0.04);

    display.auto_scale();
    assert_eq!(display.zoom(), (100, 100));
    assert_eq!(display.scale_at(y).unwrap().visible_width(), 4.0);
}

#[test]
fn test_ticks_follow_layout_settings() {
    let display = xy_display();
    let (x, _) = axes(&display);
    let labels: Vec<String> = display.ticks(x).unwrap().into_iter().map(|t| t.label).collect();
    assert_eq!(labels, vec!["0.0", "0.5", "1.0", "1.5", "2.0"]);
}

#[test]
fn test_swapped_scale_moves_plot_area() {
    let mut display = xy_display();
    let (_, y) = axes(&display);
    display.swap_sides(y).unwrap();
    assert!(!display.is_laid_out());

    display.render().unwrap();
    let inner = display.inner_rect().unwrap();
    assert_eq!((inner.x, inner.width), (0.0, 400.0));
    let (_, series) = display.series().next().unwrap();
    let pixels = series.rendered(display.scales()).unwrap();
    assert_eq!((pixels[0].x, pixels[0].y), (0.0, 300.0));
}

#[test]
fn test_single_zero_point_is_degenerate() {
    let mut display = TestDisplayBuilder::new()
        .with_text("x,y\n0,0\n", "lonely")
        .laid_out()
        .build();
    let (x, _) = axes(&display);
    assert!(!display.is_setup_complete());
    assert_eq!(display.render(), Ok(0));
    assert_eq!(display.nearest_series(PixelPoint::new(10.0, 10.0)), None);

    let before = display.scales().revision_of(x);
    display.pan(5.0, 5.0).unwrap();
    assert_eq!(display.scales().revision_of(x), before);
}

#[test]
fn test_flat_curve_does_not_block_its_neighbour() {
    // Cond is constant zero, so its scale has no width; X spans [0, 2] and
    // UV [0, 5] over the plot rectangle (56, 0, 344, 300)
    let mut display = TestDisplayBuilder::new()
        .with_text(FLAT_NEIGHBOUR, "run 7")
        .laid_out()
        .build();
    let inner = display.inner_rect().unwrap();
    assert_eq!((inner.x, inner.width, inner.height), (56.0, 344.0, 300.0));
    assert!(!display.is_setup_complete());

    let ids: Vec<_> = display.series().map(|(id, _)| id).collect();
    let (uv, cond) = (
        display.series_at(ids[0]).unwrap(),
        display.series_at(ids[1]).unwrap(),
    );
    let (x, uv_y, cond_y) = (
        uv.scale_x().unwrap(),
        uv.scale_y().unwrap(),
        cond.scale_y().unwrap(),
    );
    assert!(display.scale_at(cond_y).unwrap().is_degenerate());

    assert_eq!(display.render(), Ok(1));
    let (hit, d) = display.nearest_series(PixelPoint::new(228.0, 0.0)).unwrap();
    assert_eq!(hit, ids[0]);
    assert!(d < 1e-9);

    display.mark_at(PixelPoint::new(228.0, 150.0)).unwrap();
    assert_close(display.scale_at(x).unwrap().mark().unwrap(), 1.0);
    assert_close(display.scale_at(uv_y).unwrap().mark().unwrap(), 2.5);
    assert_eq!(display.scale_at(cond_y).unwrap().mark(), None);

    display.pan(34.4, 0.0).unwrap();
    assert_close(display.scale_at(x).unwrap().visible_bottom(), -0.2);

    display
        .zoom_to_pixel_rect(PixelRect::new(56.0, 0.0, 172.0, 150.0))
        .unwrap();
    let sy = display.scale_at(uv_y).unwrap();
    assert_close(sy.visible_bottom(), 2.5);
    assert_close(sy.visible_top(), 5.0);
}

#[test]
fn test_render_before_layout_fails() {
    let mut display = TestDisplayBuilder::new().with_text(XY_TEXT, "demo").build();
    assert_eq!(
        display.render(),
        Err(GraphError::NotLaidOut("display".to_string()))
    );
}
