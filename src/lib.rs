//! Instrument data plotting core.
//!
//! Detects the format of lab instrument files (photometer, fluorimeter and
//! chromatography exports, raw binary dumps, plain XY columns), turns them
//! into XY series, and keeps the axis scales needed to draw and inspect them.
//!
//! ```ignore
//! let mut display = DisplaySurface::new(&GraphSettings::load());
//! display.load_file(Path::new("scan.csv"))?;
//! display.layout(PixelRect::new(0.0, 0.0, 800.0, 600.0));
//! display.render()?;
//! let hit = display.nearest_series(PixelPoint::new(120.0, 80.0));
//! ```

pub mod constants;
pub mod data;
pub mod geom;
pub mod graph;
pub mod logging;
pub mod perf;
pub mod settings;
pub mod types;

pub use data::{DataError, DataResult, Detection, FormatDetector, FormatId};
pub use geom::{PixelPoint, PixelRect};
pub use graph::{AxisScale, DataSeries, DisplaySurface, GraphError, GraphResult, ScaleId, SeriesId};
pub use settings::GraphSettings;
