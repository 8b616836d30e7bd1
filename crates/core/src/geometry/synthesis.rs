//! Wind-elongated perimeter synthesis
//!
//! Converts a spread radius into an irregular closed ring around the ignition
//! point. Vertex `i` of `K` sits at angle `θ_i = 2π·i/K`, with latitude offset
//! proportional to `sin θ` and longitude offset proportional to `cos θ`.
//!
//! Each vertex radius is scaled by
//! - a wind elongation `1 + max(0, cos(θ_i − bearing))·max_elongation`, so
//!   vertices whose angle matches the wind bearing reach furthest, and
//! - a uniform irregularity factor in `[jitter_min, jitter_max]` drawn from
//!   the caller's RNG.
//!
//! Kilometres become degrees on a spherical Earth; the longitude offset is
//! divided by `cos(lat)`, with the latitude clamped short of the poles.

use rand::Rng;
use std::f64::consts::TAU;

use crate::config::SynthesisConfig;
use crate::core_types::{Coordinate, Degrees, Kilometers, Perimeter, Radians};
use crate::error::ConfigError;

/// Wind elongation multiplier for a vertex at angle `theta`.
///
/// Lies in `[1, 1 + max_elongation]`: vertices facing away from or
/// perpendicular to the bearing get no extension.
#[inline]
#[must_use]
pub fn elongation_factor(theta: Radians, bearing: Radians, max_elongation: f64) -> f64 {
    let influence = (theta - bearing).cos();
    1.0 + influence.max(0.0) * max_elongation
}

/// Uniform wind bearing in `[0, 360)` degrees
pub fn random_wind_bearing<R: Rng + ?Sized>(rng: &mut R) -> Degrees {
    Degrees::new(rng.random_range(0.0..360.0))
}

/// Synthesize a perimeter with the default parameters and an explicit vertex
/// count.
///
/// Output holds `vertex_count + 1` coordinates, the last repeating the first.
/// Degenerate inputs (non-positive radius, fewer than 3 vertices) produce
/// degenerate rings rather than errors; zero vertices give an empty ring.
pub fn synthesize<R: Rng + ?Sized>(
    center: Coordinate,
    radius: Kilometers,
    wind_bearing: Degrees,
    vertex_count: usize,
    rng: &mut R,
) -> Perimeter {
    PerimeterSynthesizer::default().synthesize_with_vertices(
        center,
        radius,
        wind_bearing,
        vertex_count,
        rng,
    )
}

/// Perimeter generator bound to a validated [`SynthesisConfig`]
#[derive(Debug, Clone, Default)]
pub struct PerimeterSynthesizer {
    config: SynthesisConfig,
}

impl PerimeterSynthesizer {
    /// Create a synthesizer.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`SynthesisConfig::validate`].
    pub fn new(config: SynthesisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize a perimeter with the configured vertex count
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        radius: Kilometers,
        wind_bearing: Degrees,
        rng: &mut R,
    ) -> Perimeter {
        self.synthesize_with_vertices(center, radius, wind_bearing, self.config.vertex_count, rng)
    }

    /// Synthesize a perimeter with an explicit vertex count
    pub fn synthesize_with_vertices<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        radius: Kilometers,
        wind_bearing: Degrees,
        vertex_count: usize,
        rng: &mut R,
    ) -> Perimeter {
        let radii = self.vertex_radii(radius, wind_bearing, vertex_count, rng);

        let deg_per_km = 1.0_f64.to_degrees() / self.config.earth_radius_km;
        let guard = self.config.max_abs_latitude_deg;
        let lng_scale = center.lat.clamp(-guard, guard).to_radians().cos();

        let vertices = radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let theta = vertex_angle(i, vertex_count);
                let lat_offset = r.value() * deg_per_km;
                let lng_offset = lat_offset / lng_scale;
                Coordinate::new(
                    center.lat + lat_offset * theta.sin(),
                    center.lng + lng_offset * theta.cos(),
                )
            })
            .collect();

        Perimeter::closed_from_vertices(vertices)
    }

    /// Effective radius of every vertex (elongation and jitter applied).
    ///
    /// Consumes exactly one RNG draw per vertex, in vertex order; given the
    /// same RNG state, [`synthesize_with_vertices`](Self::synthesize_with_vertices)
    /// places its vertices at these radii.
    pub fn vertex_radii<R: Rng + ?Sized>(
        &self,
        radius: Kilometers,
        wind_bearing: Degrees,
        vertex_count: usize,
        rng: &mut R,
    ) -> Vec<Kilometers> {
        let bearing = wind_bearing.to_radians();
        (0..vertex_count)
            .map(|i| {
                let theta = vertex_angle(i, vertex_count);
                let elongation = elongation_factor(theta, bearing, self.config.max_elongation);
                let jitter = rng.random_range(self.config.jitter_min..=self.config.jitter_max);
                radius * (jitter * elongation)
            })
            .collect()
    }
}

#[inline]
fn vertex_angle(i: usize, vertex_count: usize) -> Radians {
    Radians::new(TAU * i as f64 / vertex_count as f64)
}
