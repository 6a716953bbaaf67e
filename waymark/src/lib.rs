//! Waymark - a live map that follows your position
//!
//! This library provides the core pipeline behind the Waymark shell: location
//! backends push position fixes into a broadcast stream, and a map binder
//! applies each new coordinate to a display as a region centered on it.
//! Frontends supply the display; everything upstream of it lives here.
//!
//! The pipeline never terminates on its own and never surfaces errors to
//! subscribers. Backend failures are logged and swallowed, batches collapse
//! to their first fix, and consecutive identical coordinates are suppressed
//! before they reach the display.

pub mod app;
pub mod config;
pub mod coord;
pub mod location;
pub mod log;
pub mod map;

/// Crate version, for display in UIs and logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use coord::{Coordinate, CoordSpan, MapRegion};
pub use location::{LocationBackend, LocationSource, SystemLocationSource};
pub use map::{MapBinder, MapDisplay};
