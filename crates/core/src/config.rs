//! Simulation configuration, validation and defaults.
//!
//! [`SimulationConfig`] gathers every tunable of the pipeline. `Default`
//! carries the design values (12 vertices, up to 50% downwind elongation,
//! ±15% jitter, 3 s per playback segment, fallback at 12/24/48/96 h), and
//! [`validate()`](SimulationConfig::validate) checks the structural
//! invariants before a config is used.

use serde::{Deserialize, Serialize};

use crate::core_types::coordinate::EARTH_RADIUS_KM;
use crate::error::ConfigError;

// ── BearingMode ────────────────────────────────────────────────────

/// How wind bearings are assigned to the timeframes of one simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearingMode {
    /// Every timeframe draws its own uniform bearing. Consecutive perimeters
    /// are then elongated in unrelated directions and the animation wobbles.
    #[default]
    PerTimeframe,
    /// One bearing is drawn per simulation and shared by all timeframes, so
    /// vertex `i` points the same way in every perimeter.
    Shared,
}

// ── SynthesisConfig ────────────────────────────────────────────────

/// Parameters of perimeter synthesis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Distinct vertices per perimeter. Default: 12.
    pub vertex_count: usize,
    /// Maximum downwind radius extension as a fraction. Default: 0.5.
    pub max_elongation: f64,
    /// Lower bound of the per-vertex irregularity factor. Default: 0.85.
    pub jitter_min: f64,
    /// Upper bound of the per-vertex irregularity factor. Default: 1.15.
    pub jitter_max: f64,
    /// Spherical Earth radius (km). Default: 6371.
    pub earth_radius_km: f64,
    /// Latitude magnitude at which the longitude scale stops growing.
    /// Default: 89.99°.
    pub max_abs_latitude_deg: f64,
    /// Bearing assignment across timeframes. Default: per timeframe.
    pub bearing_mode: BearingMode,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            vertex_count: 12,
            max_elongation: 0.5,
            jitter_min: 0.85,
            jitter_max: 1.15,
            earth_radius_km: EARTH_RADIUS_KM,
            max_abs_latitude_deg: 89.99,
            bearing_mode: BearingMode::PerTimeframe,
        }
    }
}

impl SynthesisConfig {
    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] for the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertex_count < 3 {
            return Err(ConfigError::OutOfRange {
                field: "synthesis.vertex_count",
                value: self.vertex_count as f64,
                constraint: "must be at least 3",
            });
        }
        if !self.max_elongation.is_finite() || self.max_elongation < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "synthesis.max_elongation",
                value: self.max_elongation,
                constraint: "must be finite and non-negative",
            });
        }
        if !self.jitter_min.is_finite() || self.jitter_min <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "synthesis.jitter_min",
                value: self.jitter_min,
                constraint: "must be finite and positive",
            });
        }
        if !self.jitter_max.is_finite() || self.jitter_max < self.jitter_min {
            return Err(ConfigError::OutOfRange {
                field: "synthesis.jitter_max",
                value: self.jitter_max,
                constraint: "must be finite and not below jitter_min",
            });
        }
        if !self.earth_radius_km.is_finite() || self.earth_radius_km <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "synthesis.earth_radius_km",
                value: self.earth_radius_km,
                constraint: "must be finite and positive",
            });
        }
        let clamp = self.max_abs_latitude_deg;
        if clamp.is_nan() || clamp <= 0.0 || clamp >= 90.0 {
            return Err(ConfigError::OutOfRange {
                field: "synthesis.max_abs_latitude_deg",
                value: self.max_abs_latitude_deg,
                constraint: "must lie strictly between 0 and 90",
            });
        }
        Ok(())
    }
}

// ── PlaybackConfig ─────────────────────────────────────────────────

/// Parameters of the playback clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock length of one segment between consecutive timeframes,
    /// regardless of their hour gap. Default: 3000 ms.
    pub segment_duration_ms: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            segment_duration_ms: 3000.0,
        }
    }
}

impl PlaybackConfig {
    /// Check field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] if the segment duration is not a
    /// finite positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.segment_duration_ms.is_finite() || self.segment_duration_ms <= 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "playback.segment_duration_ms",
                value: self.segment_duration_ms,
                constraint: "must be finite and positive",
            });
        }
        Ok(())
    }
}

// ── FallbackConfig ─────────────────────────────────────────────────

/// Radius model of the fallback timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackRadius {
    /// `radius_km = hours / 6`
    #[default]
    HoursOverSix,
    /// `radius_km = sqrt(hours) * 0.5`
    SqrtHalf,
}

impl FallbackRadius {
    /// Radius in kilometres for a timeframe `hours` after ignition
    #[must_use]
    pub fn radius_km(self, hours: f64) -> f64 {
        match self {
            Self::HoursOverSix => hours / 6.0,
            Self::SqrtHalf => hours.sqrt() * 0.5,
        }
    }
}

/// Shape of the timeline substituted when the oracle fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Hour offsets, strictly increasing. Default: 12, 24, 48, 96.
    pub hours: Vec<f64>,
    /// Radius as a function of hours. Default: hours / 6.
    pub radius: FallbackRadius,
    /// Wind bearing used for every fallback perimeter (degrees). Default: 0.
    pub wind_bearing_deg: f64,
    /// Narrative attached to every fallback timeframe.
    pub impact: String,
    /// Overall narrative of a fallback result.
    pub explanation: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            hours: vec![12.0, 24.0, 48.0, 96.0],
            radius: FallbackRadius::HoursOverSix,
            wind_bearing_deg: 0.0,
            impact: "Fire spreading based on local conditions".to_string(),
            explanation: "Basic fire spread simulation".to_string(),
        }
    }
}

impl FallbackConfig {
    /// Check the hour schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchedule`] if the schedule is empty,
    /// contains a negative or non-finite offset, or is not strictly
    /// increasing, and [`ConfigError::OutOfRange`] for a non-finite bearing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hours.is_empty() {
            return Err(ConfigError::InvalidSchedule {
                reason: "no hour offsets".to_string(),
            });
        }
        if let Some(bad) = self.hours.iter().find(|h| !h.is_finite() || **h < 0.0) {
            return Err(ConfigError::InvalidSchedule {
                reason: format!("offset {bad} is not a finite non-negative number"),
            });
        }
        if let Some(pair) = self.hours.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ConfigError::InvalidSchedule {
                reason: format!("offset {} does not follow {}", pair[1], pair[0]),
            });
        }
        if !self.wind_bearing_deg.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "fallback.wind_bearing_deg",
                value: self.wind_bearing_deg,
                constraint: "must be finite",
            });
        }
        Ok(())
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration of the spread timeline pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Perimeter synthesis parameters.
    pub synthesis: SynthesisConfig,
    /// Playback clock parameters.
    pub playback: PlaybackConfig,
    /// Oracle-failure fallback timeline.
    pub fallback: FallbackConfig,
}

impl SimulationConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] reported by a section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.synthesis.validate()?;
        self.playback.validate()?;
        self.fallback.validate()
    }

    /// Parse a JSON document (missing fields take their defaults) and
    /// validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON for
    /// this shape, or the validation error otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        let mut config = SimulationConfig::default();
        config.synthesis.vertex_count = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "synthesis.vertex_count",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_inverted_jitter() {
        let mut config = SynthesisConfig::default();
        config.jitter_min = 1.2;
        config.jitter_max = 1.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_pole_clamp_at_ninety() {
        let config = SynthesisConfig {
            max_abs_latitude_deg: 90.0,
            ..SynthesisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_segment_duration() {
        let config = PlaybackConfig {
            segment_duration_ms: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_increasing_schedule() {
        let config = FallbackConfig {
            hours: vec![12.0, 24.0, 24.0, 48.0],
            ..FallbackConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSchedule { .. })
        ));

        let empty = FallbackConfig {
            hours: Vec::new(),
            ..FallbackConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_fallback_radius_models() {
        assert_eq!(FallbackRadius::HoursOverSix.radius_km(48.0), 8.0);
        assert_eq!(FallbackRadius::SqrtHalf.radius_km(16.0), 2.0);
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = SimulationConfig::from_json(
            r#"{
                "playback": { "segment_duration_ms": 1500 },
                "fallback": { "hours": [1, 12, 24, 48, 96], "radius": "sqrt_half" },
                "synthesis": { "bearing_mode": "shared" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.playback.segment_duration_ms, 1500.0);
        assert_eq!(config.fallback.hours, vec![1.0, 12.0, 24.0, 48.0, 96.0]);
        assert_eq!(config.fallback.radius, FallbackRadius::SqrtHalf);
        assert_eq!(config.synthesis.bearing_mode, BearingMode::Shared);
        assert_eq!(config.synthesis.vertex_count, 12);
    }

    #[test]
    fn test_from_json_reports_parse_and_validation_errors() {
        assert!(matches!(
            SimulationConfig::from_json("not json"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            SimulationConfig::from_json(r#"{ "synthesis": { "vertex_count": 1 } }"#),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}
