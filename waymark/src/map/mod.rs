//! Map display and its binding to the location pipeline.

pub mod binder;
pub mod display;

pub use binder::MapBinder;
pub use display::{MapDisplay, RecordingDisplay, RegionSet};
