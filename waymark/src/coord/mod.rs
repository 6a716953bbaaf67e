//! Geographic coordinate and map region types.
//!
//! Provides the plain latitude/longitude coordinate used throughout the
//! location pipeline and the region type that describes a map viewport as a
//! center plus a span in degrees.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default span for a recentered map region, in degrees on both axes.
///
/// 0.01 degrees is roughly a kilometre of latitude, a comfortable
/// street-level view around the user.
pub const DEFAULT_SPAN_DEG: f64 = 0.01;

/// A geographic position in decimal degrees.
///
/// Equality is the derived exact floating-point comparison of both fields.
/// Two fixes count as the same position only when latitude and longitude
/// match bit for bit; any difference, however small, makes them distinct.
/// The viewport dedup in [`crate::map::MapBinder`] relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// The extent of a map region, in degrees of latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordSpan {
    /// North-south extent in degrees.
    pub latitude_delta: f64,
    /// East-west extent in degrees.
    pub longitude_delta: f64,
}

impl CoordSpan {
    /// Create a span with independent extents per axis.
    pub const fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }

    /// Create a span with the same extent on both axes.
    pub const fn square(delta: f64) -> Self {
        Self::new(delta, delta)
    }
}

impl Default for CoordSpan {
    fn default() -> Self {
        Self::square(DEFAULT_SPAN_DEG)
    }
}

/// A map viewport described by its center and span.
///
/// The bounds are plain arithmetic on the center; no clamping is applied at
/// the poles or the antimeridian. Centers near those edges produce bounds
/// outside the usual coordinate ranges, which renderers must tolerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    /// Center of the viewport.
    pub center: Coordinate,
    /// Extent of the viewport.
    pub span: CoordSpan,
}

impl MapRegion {
    /// Create a region centered on a coordinate with the given span.
    pub const fn centered(center: Coordinate, span: CoordSpan) -> Self {
        Self { center, span }
    }

    /// Southern edge of the region in degrees latitude.
    pub fn min_latitude(&self) -> f64 {
        self.center.latitude - self.span.latitude_delta / 2.0
    }

    /// Northern edge of the region in degrees latitude.
    pub fn max_latitude(&self) -> f64 {
        self.center.latitude + self.span.latitude_delta / 2.0
    }

    /// Western edge of the region in degrees longitude.
    pub fn min_longitude(&self) -> f64 {
        self.center.longitude - self.span.longitude_delta / 2.0
    }

    /// Eastern edge of the region in degrees longitude.
    pub fn max_longitude(&self) -> f64 {
        self.center.longitude + self.span.longitude_delta / 2.0
    }

    /// Whether a coordinate lies within the region bounds (edges inclusive).
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.latitude >= self.min_latitude()
            && coordinate.latitude <= self.max_latitude()
            && coordinate.longitude >= self.min_longitude()
            && coordinate.longitude <= self.max_longitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_equality_is_exact() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(10.0, 20.0);
        let c = Coordinate::new(10.0, 20.0001);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_coordinate_tiny_difference_is_distinct() {
        let a = Coordinate::new(55.75, 37.61);
        let b = Coordinate::new(55.75, 37.61 + f64::EPSILON);
        assert_ne!(a, b);
    }

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate::new(55.751, 37.618);
        assert_eq!(c.to_string(), "55.75100, 37.61800");
    }

    #[test]
    fn test_default_span() {
        let span = CoordSpan::default();
        assert_eq!(span.latitude_delta, DEFAULT_SPAN_DEG);
        assert_eq!(span.longitude_delta, DEFAULT_SPAN_DEG);
    }

    #[test]
    fn test_region_bounds() {
        let region = MapRegion::centered(Coordinate::new(50.0, 10.0), CoordSpan::square(0.02));

        assert!((region.min_latitude() - 49.99).abs() < 1e-12);
        assert!((region.max_latitude() - 50.01).abs() < 1e-12);
        assert!((region.min_longitude() - 9.99).abs() < 1e-12);
        assert!((region.max_longitude() - 10.01).abs() < 1e-12);
    }

    #[test]
    fn test_region_contains_center_and_edges() {
        let center = Coordinate::new(55.75, 37.61);
        let region = MapRegion::centered(center, CoordSpan::square(0.01));

        assert!(region.contains(center));
        assert!(region.contains(Coordinate::new(region.max_latitude(), 37.61)));
        assert!(!region.contains(Coordinate::new(55.76, 37.61)));
    }

    #[test]
    fn test_region_bounds_not_clamped() {
        // Regions near the poles run past 90 degrees; callers get the raw math.
        let region = MapRegion::centered(Coordinate::new(89.999, 0.0), CoordSpan::square(0.01));
        assert!(region.max_latitude() > 90.0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_centered_region_contains_center(
                lat in -85.0..85.0_f64,
                lon in -179.0..179.0_f64,
                delta in 0.001..1.0_f64
            ) {
                let center = Coordinate::new(lat, lon);
                let region = MapRegion::centered(center, CoordSpan::square(delta));
                prop_assert!(region.contains(center));
            }

            #[test]
            fn test_region_bounds_ordered(
                lat in -85.0..85.0_f64,
                lon in -179.0..179.0_f64,
                delta in 0.001..1.0_f64
            ) {
                let region = MapRegion::centered(Coordinate::new(lat, lon), CoordSpan::square(delta));
                prop_assert!(region.min_latitude() < region.max_latitude());
                prop_assert!(region.min_longitude() < region.max_longitude());
            }

            #[test]
            fn test_region_extent_matches_span(
                lat in -85.0..85.0_f64,
                lon in -179.0..179.0_f64,
                delta in 0.001..1.0_f64
            ) {
                let region = MapRegion::centered(Coordinate::new(lat, lon), CoordSpan::square(delta));
                let lat_extent = region.max_latitude() - region.min_latitude();
                let lon_extent = region.max_longitude() - region.min_longitude();
                prop_assert!((lat_extent - delta).abs() < 1e-9);
                prop_assert!((lon_extent - delta).abs() < 1e-9);
            }

            #[test]
            fn test_equal_coordinates_compare_equal(
                lat in -90.0..90.0_f64,
                lon in -180.0..180.0_f64
            ) {
                let a = Coordinate::new(lat, lon);
                let b = Coordinate::new(lat, lon);
                prop_assert_eq!(a, b);
            }
        }
    }
}
