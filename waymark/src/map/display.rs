//! Map display abstraction.
//!
//! The binder drives anything that can show a region. Rendering backends
//! implement [`MapDisplay`]; [`RecordingDisplay`] is an inspectable
//! implementation for tests and embedders that only need the values.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::coord::MapRegion;

/// A surface that can display a map region.
pub trait MapDisplay {
    /// Show the given region, optionally animating the transition.
    fn set_region(&mut self, region: MapRegion, animated: bool);

    /// Toggle the user position marker.
    fn set_shows_user_location(&mut self, visible: bool);
}

/// One recorded [`MapDisplay::set_region`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSet {
    pub region: MapRegion,
    pub animated: bool,
}

#[derive(Debug, Default)]
struct RecordingState {
    region_sets: Vec<RegionSet>,
    shows_user_location: bool,
}

/// Display that records every call for later inspection.
///
/// Clones share the same state, so a clone kept outside the binder sees
/// everything the binder applied.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    inner: Arc<Mutex<RecordingState>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// All region sets applied so far, in order.
    pub fn region_sets(&self) -> Vec<RegionSet> {
        self.inner.lock().region_sets.clone()
    }

    /// Whether the user position marker is on.
    pub fn shows_user_location(&self) -> bool {
        self.inner.lock().shows_user_location
    }
}

impl MapDisplay for RecordingDisplay {
    fn set_region(&mut self, region: MapRegion, animated: bool) {
        self.inner.lock().region_sets.push(RegionSet { region, animated });
    }

    fn set_shows_user_location(&mut self, visible: bool) {
        self.inner.lock().shows_user_location = visible;
    }
}
