//! Scales, series and the display that ties them together
//!
//! Series refer to scales through [`ScaleId`] handles into the display's
//! [`ScaleSet`], so several series can share one scale and a scale always
//! outlives the series drawn against it.
//!
//! ## Error Handling
//!
//! Layout, render and interaction return `GraphResult<T>`:
//! - `DegenerateScale`: zero visible width or pixel span, nothing is drawn
//! - `NotLaidOut` / `UnboundSeries`: used before setup finished

mod display;
mod error;
mod hit_index;
mod scale;
mod series;

pub use display::*;
pub use error::*;
pub use hit_index::{CachedSegment, CachedVertex, HitIndex};
pub use scale::*;
pub use series::*;
