//! Map camera state driven by the binder.

use waymark::coord::{Coordinate, CoordSpan, MapRegion};
use waymark::map::MapDisplay;

/// Fraction of the remaining distance covered per animation tick.
const ANIMATION_STEP: f64 = 0.25;

/// Distance in degrees below which an animation snaps to its target.
const SNAP_EPSILON: f64 = 1e-6;

/// Camera state for the terminal viewport.
///
/// Region changes arrive through [`MapDisplay`]. Animated changes glide
/// toward the target one step per render tick; non-animated changes and
/// the very first region snap immediately.
#[derive(Debug, Default)]
pub struct ViewportDisplay {
    current: Option<MapRegion>,
    target: Option<MapRegion>,
    shows_user_location: bool,
}

impl ViewportDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// The region to render this frame.
    pub fn region(&self) -> Option<MapRegion> {
        self.current
    }

    /// Where the camera is headed.
    pub fn target(&self) -> Option<MapRegion> {
        self.target
    }

    pub fn shows_user_location(&self) -> bool {
        self.shows_user_location
    }

    /// Whether an animated transition is still in flight.
    pub fn is_animating(&self) -> bool {
        match (self.current, self.target) {
            (Some(current), Some(target)) => current != target,
            _ => false,
        }
    }

    /// Advance the camera one tick toward the target region.
    pub fn advance_animation(&mut self) {
        let (current, target) = match (self.current, self.target) {
            (Some(current), Some(target)) => (current, target),
            _ => return,
        };
        if current == target {
            return;
        }

        let next = MapRegion {
            center: Coordinate::new(
                step(current.center.latitude, target.center.latitude),
                step(current.center.longitude, target.center.longitude),
            ),
            span: CoordSpan::new(
                step(current.span.latitude_delta, target.span.latitude_delta),
                step(current.span.longitude_delta, target.span.longitude_delta),
            ),
        };

        self.current = Some(if close_enough(&next, &target) {
            target
        } else {
            next
        });
    }
}

fn step(from: f64, to: f64) -> f64 {
    from + (to - from) * ANIMATION_STEP
}

fn close_enough(a: &MapRegion, b: &MapRegion) -> bool {
    (a.center.latitude - b.center.latitude).abs() < SNAP_EPSILON
        && (a.center.longitude - b.center.longitude).abs() < SNAP_EPSILON
        && (a.span.latitude_delta - b.span.latitude_delta).abs() < SNAP_EPSILON
        && (a.span.longitude_delta - b.span.longitude_delta).abs() < SNAP_EPSILON
}

impl MapDisplay for ViewportDisplay {
    fn set_region(&mut self, region: MapRegion, animated: bool) {
        let first = self.current.is_none();
        self.target = Some(region);
        if !animated || first {
            self.current = Some(region);
        }
    }

    fn set_shows_user_location(&mut self, visible: bool) {
        self.shows_user_location = visible;
    }
}
