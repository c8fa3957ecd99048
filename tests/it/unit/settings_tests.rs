//! Unit tests for settings persistence.

use labgraph::data::FormatDetector;
use labgraph::settings::GraphSettings;
use labgraph::types::Color;
use tempfile::tempdir;

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = GraphSettings::default();
    settings.layout.hit_tolerance_px = 4.5;
    settings.palette = vec![Color::rgb(10, 20, 30)];
    settings.dialects.raw_binary.magic = b"ABSX".to_vec();
    settings.save_to(&path).unwrap();

    let loaded = GraphSettings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.series_color(3), Color::rgb(10, 20, 30));
}

#[test]
fn test_saved_file_is_readable_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    GraphSettings::default().save_to(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"hit_tolerance_px\": 8.0"));
    assert!(text.contains("\"#1f5fbf\""));
}

#[test]
fn test_invalid_json_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = GraphSettings::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).starts_with("Invalid settings in"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = GraphSettings::load_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read settings from"));
}

#[test]
fn test_settings_drive_the_detector() {
    let mut settings = GraphSettings::default();
    settings.dialects.xy_max_header_rows = 0;
    let detector = FormatDetector::new(&settings.dialects);
    // a header row is now one row too many
    assert!(detector.detect_bytes(b"x,y\n1,2\n", "t").is_err());
    assert!(detector.detect_bytes(b"1,2\n3,4\n", "t").is_ok());
}
