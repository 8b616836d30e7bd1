//! Core types and utilities

pub mod coordinate;
pub mod perimeter;
pub mod units;

pub use coordinate::{Coordinate, GeoBounds, EARTH_RADIUS_KM};
pub use perimeter::Perimeter;
pub use units::*;
