//! Per-vertex blending between two perimeters
//!
//! This is a plain lerp of vertex `i` toward vertex `i`; it does not register
//! or resample the rings. Rings of different length are tolerated: start
//! vertices without a partner blend toward the end ring's final vertex.

use crate::core_types::{Coordinate, Perimeter};

/// Blend `start` toward `end` by `t`.
///
/// `t` is not clamped; callers pass values in `[0, 1]`. The result always has
/// `start.len()` coordinates. If `end` is empty, `start` is returned as is.
#[must_use]
pub fn interpolate(start: &Perimeter, end: &Perimeter, t: f64) -> Perimeter {
    let Some(end_last) = end.last() else {
        return start.clone();
    };

    start
        .iter()
        .enumerate()
        .map(|(i, &from)| {
            let to: Coordinate = end.get(i).unwrap_or(end_last);
            from.lerp(to, t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Perimeter {
        points.iter().map(|&p| Coordinate::from(p)).collect()
    }

    #[test]
    fn test_endpoints() {
        let a = ring(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let b = ring(&[(2.0, 4.0), (3.0, -1.0), (2.0, 4.0)]);
        assert_eq!(interpolate(&a, &b, 0.0), a);
        assert_eq!(interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn test_midpoint() {
        let a = ring(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = ring(&[(2.0, -2.0), (4.0, 6.0)]);
        let mid = interpolate(&a, &b, 0.5);
        assert_eq!(mid, ring(&[(1.0, -1.0), (3.0, 4.0)]));
    }

    #[test]
    fn test_ragged_end_uses_last_vertex() {
        let a = ring(&[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        let b = ring(&[(1.0, 1.0), (5.0, 5.0)]);
        let full = interpolate(&a, &b, 1.0);
        assert_eq!(full, ring(&[(1.0, 1.0), (5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]));
    }

    #[test]
    fn test_shorter_start_keeps_start_length() {
        let a = ring(&[(0.0, 0.0)]);
        let b = ring(&[(1.0, 1.0), (5.0, 5.0)]);
        assert_eq!(interpolate(&a, &b, 1.0).len(), 1);
    }

    #[test]
    fn test_empty_end_returns_start() {
        let a = ring(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(interpolate(&a, &Perimeter::default(), 0.7), a);
    }

    #[test]
    fn test_t_is_not_clamped() {
        let a = ring(&[(0.0, 0.0)]);
        let b = ring(&[(1.0, 2.0)]);
        assert_eq!(interpolate(&a, &b, 2.0), ring(&[(2.0, 4.0)]));
    }
}
