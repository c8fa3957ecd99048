//! Snapshot tests for serialized output.
//!
//! Guards the on-disk and user-visible shapes: format labels, layout
//! settings, and the scales a dialect asks for.

use crate::helpers::VENDOR_CSV_EXPORT;
use labgraph::data::{FormatDetector, FormatId};
use labgraph::settings::LayoutSettings;

#[test]
fn test_format_labels_in_priority_order() {
    let json = serde_json::to_string_pretty(&FormatId::PRIORITY).unwrap();
    insta::assert_snapshot!(json, @r#"
    [
      "photometer",
      "fluorimeter",
      "raw-binary",
      "alt-binary",
      "vendor-csv",
      "xy-pair"
    ]
    "#);
}

#[test]
fn test_layout_settings_defaults() {
    let json = serde_json::to_string_pretty(&LayoutSettings::default()).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "vertical_scale_width": 56.0,
      "horizontal_scale_height": 36.0,
      "hit_tolerance_px": 8.0,
      "tick_target": 6,
      "max_zoom_percent": 10000
    }
    "#);
}

#[test]
fn test_vendor_csv_scale_plan() {
    let detection = FormatDetector::default()
        .detect_bytes(VENDOR_CSV_EXPORT.as_bytes(), "run")
        .unwrap();
    let json = serde_json::to_string_pretty(&detection.plan.scales).unwrap();
    insta::assert_snapshot!(json, @r#"
    [
      {
        "label": "Volume",
        "unit": "ml",
        "orientation": "horizontal",
        "side": "near"
      },
      {
        "label": "UV1_280nm",
        "unit": "mAU",
        "orientation": "vertical",
        "side": "near"
      },
      {
        "label": "Cond",
        "unit": "mS/cm",
        "orientation": "vertical",
        "side": "far"
      }
    ]
    "#);
}
