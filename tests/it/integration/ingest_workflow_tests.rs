//! Integration tests for loading instrument files into a display.

use crate::helpers::{
    OUTER, PHOTOMETER_EXPORT, PROSE, TestDisplayBuilder, VENDOR_CSV_EXPORT, XY_TEXT, sampled_dump,
    write_fixture,
};
use labgraph::data::{DataError, FormatId};
use labgraph::graph::{DisplaySurface, ScaleId};
use labgraph::settings::GraphSettings;
use labgraph::types::{Color, Side};
use tempfile::tempdir;

fn window(display: &DisplaySurface, id: ScaleId) -> (f64, f64) {
    let scale = display.scale_at(id).unwrap();
    (scale.visible_bottom(), scale.visible_top())
}

#[test]
fn test_xy_file_becomes_fitted_series() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "demo.csv", XY_TEXT.as_bytes());

    let mut display = DisplaySurface::default();
    let ids = display.load_file(&path).unwrap();
    assert_eq!(ids.len(), 1);

    let series = display.series_at(ids[0]).unwrap();
    assert_eq!(series.name(), "y");
    assert_eq!(series.count(), 3);
    let (x, y) = (series.scale_x().unwrap(), series.scale_y().unwrap());
    assert_eq!(window(&display, x), (0.0, 2.0));
    assert_eq!(window(&display, y), (0.0, 4.0));
    assert_eq!(display.scale_at(x).unwrap().label(), "x");
}

#[test]
fn test_xy_file_renders_into_plot_rectangle() {
    let mut display = TestDisplayBuilder::new().with_text(XY_TEXT, "demo").build();
    let inner = display.layout(OUTER);
    assert_eq!((inner.x, inner.y, inner.width, inner.height), (56.0, 0.0, 400.0, 300.0));
    assert!(display.is_setup_complete());

    assert_eq!(display.render().unwrap(), 1);
    // nothing changed, nothing to redraw
    assert_eq!(display.render().unwrap(), 0);

    let (_, series) = display.series().next().unwrap();
    let pixels = series.rendered(display.scales()).unwrap();
    assert_eq!((pixels[0].x, pixels[0].y), (56.0, 300.0));
    assert_eq!((pixels[2].x, pixels[2].y), (456.0, 0.0));
}

#[test]
fn test_vendor_csv_shares_one_x_scale() {
    let display = TestDisplayBuilder::new()
        .with_text(VENDOR_CSV_EXPORT, "run 12")
        .build();
    assert_eq!(display.scales().len(), 3);
    assert_eq!(display.series_count(), 2);

    let names: Vec<&str> = display.series().map(|(_, s)| s.name()).collect();
    assert_eq!(names, vec!["UV1_280nm", "Cond"]);
    let x_scales: Vec<ScaleId> = display.series().filter_map(|(_, s)| s.scale_x()).collect();
    assert_eq!(x_scales[0], x_scales[1]);
    assert_eq!(window(&display, x_scales[0]), (0.0, 1.5));

    let (_, cond) = display.series().nth(1).unwrap();
    let cond_scale = display.scale_at(cond.scale_y().unwrap()).unwrap();
    assert_eq!(cond_scale.side(), Side::Far);
    assert_eq!(cond.count(), 2);
}

#[test]
fn test_binary_dump_uses_header_sampling() {
    let display = TestDisplayBuilder::new()
        .with_bytes(&sampled_dump(&[0.5, 0.25, 0.75], 250.0, 5.0), "dump")
        .build();
    let (_, series) = display.series().next().unwrap();
    let xs: Vec<f64> = series.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![250.0, 255.0, 260.0]);
    // the fresh scale's [0, 0] extent joins the fitted range
    assert_eq!(window(&display, series.scale_y().unwrap()), (0.0, 0.75));
}

#[test]
fn test_unrecognized_file_leaves_display_empty() {
    let mut display = DisplaySurface::default();
    let err = display.load_bytes(PROSE.as_bytes(), "notes").unwrap_err();
    assert!(matches!(err, DataError::UnrecognizedFormat { .. }));
    assert!(display.scales().is_empty());
    assert_eq!(display.series_count(), 0);

    assert!(matches!(display.load_bytes(b"", "empty"), Err(DataError::EmptyFile)));
}

#[test]
fn test_forced_format_skips_detection() {
    let dir = tempdir().unwrap();
    let path = write_fixture(dir.path(), "scan.csv", PHOTOMETER_EXPORT.as_bytes());

    let mut detected = DisplaySurface::default();
    detected.load_file(&path).unwrap();
    let (_, first) = detected.series().next().unwrap();
    assert_eq!(detected.scale_at(first.scale_y().unwrap()).unwrap().label(), "Absorbance");

    let mut forced = DisplaySurface::default();
    let ids = forced.load_file_as(&path, FormatId::XyPair).unwrap();
    assert_eq!(ids.len(), 2);
    let series = forced.series_at(ids[1]).unwrap();
    assert_eq!(series.name(), "Abs sample B");
    assert_eq!(forced.scale_at(series.scale_x().unwrap()).unwrap().label(), "Wavelength (nm)");
}

#[test]
fn test_loads_accumulate() {
    let mut display = TestDisplayBuilder::new()
        .with_text(XY_TEXT, "first")
        .with_text(PHOTOMETER_EXPORT, "second")
        .laid_out()
        .build();
    assert_eq!(display.series_count(), 3);
    assert_eq!(display.scales().len(), 4);
    assert_eq!(display.render().unwrap(), 3);

    // every series keeps its own colour from the palette
    let colors: Vec<_> = display.series().map(|(_, s)| s.color()).collect();
    assert_ne!(colors[0], colors[1]);
    assert_ne!(colors[1], colors[2]);
}

#[test]
fn test_series_colors_come_from_settings_palette() {
    let mut settings = GraphSettings::default();
    settings.palette = vec![Color::BLACK, Color::rgb(1, 2, 3)];
    let display = TestDisplayBuilder::new()
        .with_settings(settings)
        .with_text(VENDOR_CSV_EXPORT, "run 12")
        .with_text(XY_TEXT, "again")
        .build();
    let colors: Vec<Color> = display.series().map(|(_, s)| s.color()).collect();
    assert_eq!(colors, vec![Color::BLACK, Color::rgb(1, 2, 3), Color::BLACK]);
}

#[test]
fn test_title_comma_keeps_whitespace_columns() {
    let display = TestDisplayBuilder::new()
        .with_text("Sample 1, run 2\n0 1\n1 3\n2 2\n", "scan")
        .build();
    assert_eq!(display.series_count(), 1);
    let (_, series) = display.series().next().unwrap();
    assert_eq!(series.points().len(), 3);
    assert_eq!(window(&display, series.scale_y().unwrap()), (0.0, 3.0));
}
