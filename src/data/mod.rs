//! Instrument file ingestion
//!
//! Turns raw bytes into series-construction recipes. Text inputs are split
//! into a [`TabularRecord`] once and shared by every text dialect; binary
//! dumps are decoded into a [`RawBuffer`]. The [`FormatDetector`] picks the
//! dialect, and its [`SeriesPlan`] says which scales and series to build.
//!
//! ## Error Handling
//!
//! Ingestion returns `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `TooLarge`: File exceeds size limits
//! - `UnrecognizedFormat`: No dialect accepted the input
//! - `Parse`: A forced dialect rejected the input
//! - `Io`: File system errors

mod detector;
mod error;
pub mod formats;
mod recipe;
mod record;

pub use detector::*;
pub use error::*;
pub use formats::{DialectRules, FormatId, FormatParser, Parsed, RawBuffer, RawHeader};
pub use recipe::*;
pub use record::*;
