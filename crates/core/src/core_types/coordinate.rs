//! Geographic coordinates and bounding boxes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used for the spherical approximation (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in decimal degrees.
///
/// No range validation is performed: callers are expected to pass
/// `|lat| <= 90` and `|lng| <= 180`, but out-of-range values still produce
/// computable (if meaningless) geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude in degrees
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear blend toward `other`; `t` is not clamped.
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    /// Component-wise comparison within `epsilon` degrees
    #[inline]
    #[must_use]
    pub fn approx_eq(self, other: Coordinate, epsilon: f64) -> bool {
        (self.lat - other.lat).abs() <= epsilon && (self.lng - other.lng).abs() <= epsilon
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Coordinate { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Axis-aligned latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Minimum latitude and longitude
    pub south_west: Coordinate,
    /// Maximum latitude and longitude
    pub north_east: Coordinate,
}

impl GeoBounds {
    /// Degenerate box around a single point
    #[must_use]
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Grow the box to include `point`
    pub fn extend(&mut self, point: Coordinate) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Whether `point` lies inside or on the edge of the box
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// Centre of the box
    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.south_west.lerp(self.north_east, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(12.0, 16.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert!(a.lerp(b, 0.5).approx_eq(Coordinate::new(11.0, 18.0), 1e-12));
    }

    #[test]
    fn test_bounds_extend_and_contains() {
        let mut bounds = GeoBounds::from_point(Coordinate::new(0.0, 0.0));
        bounds.extend(Coordinate::new(1.0, -2.0));
        bounds.extend(Coordinate::new(-0.5, 3.0));
        assert_eq!(bounds.south_west, Coordinate::new(-0.5, -2.0));
        assert_eq!(bounds.north_east, Coordinate::new(1.0, 3.0));
        assert!(bounds.contains(Coordinate::new(0.2, 2.9)));
        assert!(!bounds.contains(Coordinate::new(1.1, 0.0)));
        assert!(bounds.center().approx_eq(Coordinate::new(0.25, 0.5), 1e-12));
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Coordinate::new(34.05, -118.24)).unwrap();
        assert_eq!(json, r#"{"lat":34.05,"lng":-118.24}"#);
    }
}
