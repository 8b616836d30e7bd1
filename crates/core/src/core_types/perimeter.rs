//! Closed fire perimeter rings
//!
//! A [`Perimeter`] is the ordered vertex ring describing the fire boundary at
//! one instant. Synthesized perimeters hold `K + 1` coordinates: `K` vertices
//! at equal angular steps followed by a copy of the first vertex, so that
//! `first == last`.

use super::coordinate::{Coordinate, GeoBounds, EARTH_RADIUS_KM};
use serde::{Deserialize, Serialize};

/// Ordered ring of coordinates approximating a fire boundary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Perimeter {
    points: Vec<Coordinate>,
}

impl Perimeter {
    /// Wrap an existing coordinate list without checking closure
    #[must_use]
    pub fn from_points(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Build a closed ring from distinct vertices, appending the first vertex
    #[must_use]
    pub fn closed_from_vertices(mut vertices: Vec<Coordinate>) -> Self {
        if let Some(&first) = vertices.first() {
            vertices.push(first);
        }
        Self { points: vertices }
    }

    /// Total number of stored coordinates, closing point included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ring holds no coordinates
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct vertices (the closing copy is not counted)
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        if self.is_closed() {
            self.points.len() - 1
        } else {
            self.points.len()
        }
    }

    /// First and last coordinates are identical (and the ring is non-trivial)
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Coordinate at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.points.get(index).copied()
    }

    /// Final stored coordinate
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    /// Borrow the coordinates
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Coordinate] {
        &self.points
    }

    /// Iterate over the coordinates
    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.points.iter()
    }

    /// Consume into the coordinate list
    #[must_use]
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Bounding box of all vertices, `None` when empty
    #[must_use]
    pub fn bounds(&self) -> Option<GeoBounds> {
        let (first, rest) = self.points.split_first()?;
        let mut bounds = GeoBounds::from_point(*first);
        for &point in rest {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Enclosed area in square kilometres.
    ///
    /// Vertices are projected onto a local equirectangular plane centred on the
    /// ring's mean latitude and the shoelace formula is applied, treating the
    /// ring as closed whether or not the closing copy is stored. Adequate for
    /// fire-sized polygons; not a geodesic area.
    #[must_use]
    pub fn area_km2(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mean_lat = self.points.iter().map(|p| p.lat).sum::<f64>() / n as f64;
        let km_per_deg = EARTH_RADIUS_KM.to_radians();
        let lng_scale = mean_lat.to_radians().cos();
        let project = |p: &Coordinate| (p.lng * km_per_deg * lng_scale, p.lat * km_per_deg);

        let mut twice_area = 0.0;
        for i in 0..n {
            let (x0, y0) = project(&self.points[i]);
            let (x1, y1) = project(&self.points[(i + 1) % n]);
            twice_area += x0 * y1 - x1 * y0;
        }
        twice_area.abs() / 2.0
    }
}

impl<'a> IntoIterator for &'a Perimeter {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<Coordinate> for Perimeter {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_at_equator(side_deg: f64) -> Perimeter {
        Perimeter::closed_from_vertices(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, side_deg),
            Coordinate::new(side_deg, side_deg),
            Coordinate::new(side_deg, 0.0),
        ])
    }

    #[test]
    fn test_closed_from_vertices() {
        let ring = unit_square_at_equator(1.0);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.vertex_count(), 4);
        assert!(ring.is_closed());
        assert_eq!(ring.get(0), ring.last());
    }

    #[test]
    fn test_empty_ring_is_not_closed() {
        let ring = Perimeter::closed_from_vertices(Vec::new());
        assert!(ring.is_empty());
        assert!(!ring.is_closed());
        assert!(ring.bounds().is_none());
        assert_eq!(ring.area_km2(), 0.0);
    }

    #[test]
    fn test_area_of_small_square() {
        // 0.01° square near the equator: ~1.112 km per side
        let ring = unit_square_at_equator(0.01);
        let side = EARTH_RADIUS_KM.to_radians() * 0.01;
        assert_relative_eq!(ring.area_km2(), side * side, max_relative = 1e-4);
    }

    #[test]
    fn test_area_ignores_closing_copy() {
        let closed = unit_square_at_equator(0.02);
        let open = Perimeter::from_points(closed.as_slice()[..4].to_vec());
        assert_relative_eq!(closed.area_km2(), open.area_km2(), max_relative = 1e-12);
    }

    #[test]
    fn test_bounds() {
        let ring = unit_square_at_equator(0.5);
        let bounds = ring.bounds().unwrap();
        assert_eq!(bounds.south_west, Coordinate::new(0.0, 0.0));
        assert_eq!(bounds.north_east, Coordinate::new(0.5, 0.5));
    }
}
