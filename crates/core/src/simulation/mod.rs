//! Spread timeline construction
//!
//! [`FireSpreadSimulator`] turns an oracle answer into a [`SimulationResult`]:
//! one [`Timeframe`] per estimate, each with a synthesized perimeter. When
//! the oracle fails or answers with nothing usable, the configured fallback
//! schedule is used instead, so playback never has to special-case failures.
//!
//! The serialized form of a result keeps the field names the map overlay
//! consumes: `{ timeframes: [{ hours, coordinates, impact }], explanation }`.

pub mod fallback;
pub mod session;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{BearingMode, FallbackConfig, SimulationConfig};
use crate::core_types::{Coordinate, Degrees, Hours, Perimeter};
use crate::error::{ConfigError, OracleError};
use crate::geometry::{random_wind_bearing, PerimeterSynthesizer};
use crate::oracle::{Location, OracleResponse, RiskOracle, TimeframeEstimate};

pub use session::{RequestTicket, RequestTracker, SimulationSession};

/// One instant of the simulated spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeframe {
    /// Hours after ignition
    pub hours: Hours,
    /// Fire boundary at this instant
    #[serde(rename = "coordinates")]
    pub perimeter: Perimeter,
    /// Narrative of the fire's behaviour
    #[serde(rename = "impact")]
    pub narrative: String,
}

/// Where a timeline came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineSource {
    /// Built from oracle estimates
    Oracle,
    /// Substituted after an oracle failure
    Fallback,
}

/// Ordered spread timeline for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    center: Coordinate,
    timeframes: Vec<Timeframe>,
    #[serde(rename = "explanation")]
    overall_narrative: String,
    source: TimelineSource,
}

impl SimulationResult {
    /// Assemble a result from already-built timeframes
    #[must_use]
    pub fn new(
        center: Coordinate,
        timeframes: Vec<Timeframe>,
        overall_narrative: String,
        source: TimelineSource,
    ) -> Self {
        Self {
            center,
            timeframes,
            overall_narrative,
            source,
        }
    }

    /// Ignition point
    #[must_use]
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Timeframes ordered by hours
    #[must_use]
    pub fn timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }

    /// Overall narrative
    #[must_use]
    pub fn overall_narrative(&self) -> &str {
        &self.overall_narrative
    }

    /// Whether the oracle or the fallback produced this timeline
    #[must_use]
    pub fn source(&self) -> TimelineSource {
        self.source
    }

    /// Whether this is the degraded fallback timeline
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == TimelineSource::Fallback
    }
}

/// Builds spread timelines from oracle answers
#[derive(Debug, Clone, Default)]
pub struct FireSpreadSimulator {
    synthesizer: PerimeterSynthesizer,
    fallback: FallbackConfig,
}

impl FireSpreadSimulator {
    /// Create a simulator.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] of the synthesis or fallback section.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.fallback.validate()?;
        Ok(Self {
            synthesizer: PerimeterSynthesizer::new(config.synthesis.clone())?,
            fallback: config.fallback.clone(),
        })
    }

    /// Query `oracle` for `location` and build the timeline.
    ///
    /// Oracle errors are logged and replaced by the fallback timeline.
    pub fn simulate<O, R>(
        &self,
        oracle: &O,
        location: &Location,
        date: NaiveDate,
        rng: &mut R,
    ) -> SimulationResult
    where
        O: RiskOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let outcome = oracle.fetch_timeframes(location, date);
        self.timeline_from_outcome(location.coordinate, outcome, rng)
    }

    /// Build the timeline from an oracle outcome obtained elsewhere
    /// (e.g. decoded by the host from its own request channel).
    pub fn timeline_from_outcome<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        outcome: Result<OracleResponse, OracleError>,
        rng: &mut R,
    ) -> SimulationResult {
        match outcome.and_then(OracleResponse::resolve) {
            Ok(forecast) => {
                let bearings = self.bearings(forecast.estimates.len(), rng);
                let result = self.build(
                    center,
                    forecast.estimates,
                    &bearings,
                    forecast.explanation,
                    TimelineSource::Oracle,
                    rng,
                );
                info!(
                    "Built spread timeline with {} timeframes at {}",
                    result.timeframes.len(),
                    center
                );
                result
            }
            Err(err) => {
                warn!("Oracle failed ({err}), using fallback spread timeline");
                self.fallback(center, rng)
            }
        }
    }

    /// The fallback timeline for `center`
    pub fn fallback<R: Rng + ?Sized>(&self, center: Coordinate, rng: &mut R) -> SimulationResult {
        let estimates = fallback::estimates(&self.fallback);
        let bearings = vec![Degrees::new(self.fallback.wind_bearing_deg); estimates.len()];
        self.build(
            center,
            estimates,
            &bearings,
            self.fallback.explanation.clone(),
            TimelineSource::Fallback,
            rng,
        )
    }

    fn bearings<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Degrees> {
        match self.synthesizer.config().bearing_mode {
            BearingMode::PerTimeframe => (0..count).map(|_| random_wind_bearing(rng)).collect(),
            BearingMode::Shared => vec![random_wind_bearing(rng); count],
        }
    }

    fn build<R: Rng + ?Sized>(
        &self,
        center: Coordinate,
        estimates: Vec<TimeframeEstimate>,
        bearings: &[Degrees],
        overall_narrative: String,
        source: TimelineSource,
        rng: &mut R,
    ) -> SimulationResult {
        let timeframes = estimates
            .into_iter()
            .zip(bearings)
            .map(|(estimate, &bearing)| Timeframe {
                hours: estimate.hours,
                perimeter: self
                    .synthesizer
                    .synthesize(center, estimate.radius, bearing, &mut *rng),
                narrative: estimate.impact,
            })
            .collect();
        SimulationResult::new(center, timeframes, overall_narrative, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackRadius;
    use crate::oracle::OracleTimeframe;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn frame(hours: f64, radius: f64, impact: &str) -> OracleTimeframe {
        OracleTimeframe {
            hours: Some(hours),
            radius: Some(radius),
            impact: Some(impact.to_string()),
        }
    }

    fn la() -> Location {
        Location::new(Coordinate::new(34.05, -118.24), "Los Angeles, CA")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
    }

    #[test]
    fn test_oracle_timeline() {
        let oracle = |_: &Location, _: NaiveDate| -> Result<OracleResponse, OracleError> {
            Ok(OracleResponse {
                timeframes: vec![
                    frame(24.0, 4.0, "Reaches foothills"),
                    frame(12.0, 2.0, "Brush fire"),
                ],
                explanation: Some("Santa Ana winds".to_string()),
            })
        };
        let sim = FireSpreadSimulator::default();
        let result = sim.simulate(&oracle, &la(), date(), &mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(result.source(), TimelineSource::Oracle);
        assert_eq!(result.overall_narrative(), "Santa Ana winds");
        assert_eq!(result.timeframes().len(), 2);
        assert_eq!(result.timeframes()[0].hours, Hours::new(12.0));
        assert_eq!(result.timeframes()[0].narrative, "Brush fire");
        assert!(result
            .timeframes()
            .iter()
            .all(|t| t.perimeter.len() == 13 && t.perimeter.is_closed()));
    }

    #[test]
    fn test_failure_uses_fallback() {
        let oracle = |_: &Location, _: NaiveDate| -> Result<OracleResponse, OracleError> {
            Err(OracleError::Unavailable {
                reason: "quota exceeded".to_string(),
            })
        };
        let sim = FireSpreadSimulator::default();
        let result = sim.simulate(&oracle, &la(), date(), &mut ChaCha8Rng::seed_from_u64(2));

        assert!(result.is_fallback());
        assert_eq!(result.overall_narrative(), "Basic fire spread simulation");
        let hours: Vec<f64> = result.timeframes().iter().map(|t| t.hours.value()).collect();
        assert_eq!(hours, vec![12.0, 24.0, 48.0, 96.0]);
    }

    #[test]
    fn test_empty_response_uses_fallback() {
        let sim = FireSpreadSimulator::default();
        let result = sim.timeline_from_outcome(
            Coordinate::new(0.0, 0.0),
            Ok(OracleResponse::default()),
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        assert!(result.is_fallback());
        assert!(!result.timeframes().is_empty());
    }

    #[test]
    fn test_shared_bearing_mode_aligns_elongation() {
        let mut config = SimulationConfig::default();
        config.synthesis.bearing_mode = BearingMode::Shared;
        config.synthesis.jitter_min = 1.0;
        config.synthesis.jitter_max = 1.0;
        let sim = FireSpreadSimulator::new(&config).unwrap();
        let response = OracleResponse {
            timeframes: vec![frame(12.0, 2.0, "a"), frame(24.0, 4.0, "b")],
            explanation: None,
        };
        let result = sim.timeline_from_outcome(
            Coordinate::new(0.0, 0.0),
            Ok(response),
            &mut ChaCha8Rng::seed_from_u64(4),
        );
        // Without jitter and with one bearing, the second ring is the first
        // scaled by the radius ratio around the centre.
        let [first, second] = result.timeframes() else {
            panic!("expected two timeframes");
        };
        for (a, b) in first.perimeter.iter().zip(second.perimeter.iter()) {
            assert!((b.lat - 2.0 * a.lat).abs() < 1e-12);
            assert!((b.lng - 2.0 * a.lng).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sqrt_fallback_schedule() {
        let mut config = SimulationConfig::default();
        config.fallback.hours = vec![1.0, 12.0, 24.0, 48.0, 96.0];
        config.fallback.radius = FallbackRadius::SqrtHalf;
        let sim = FireSpreadSimulator::new(&config).unwrap();
        let result = sim.fallback(Coordinate::new(10.0, 10.0), &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(result.timeframes().len(), 5);
        assert_eq!(result.timeframes()[0].hours, Hours::new(1.0));
    }

    #[test]
    fn test_serialized_shape() {
        let sim = FireSpreadSimulator::default();
        let result = sim.fallback(Coordinate::new(1.0, 2.0), &mut ChaCha8Rng::seed_from_u64(6));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["explanation"], "Basic fire spread simulation");
        assert_eq!(json["timeframes"][0]["hours"], 12.0);
        assert_eq!(json["timeframes"][0]["coordinates"].as_array().unwrap().len(), 13);
        assert!(json["timeframes"][0]["impact"].is_string());
        assert_eq!(json["source"], "fallback");
    }

    #[test]
    fn test_new_rejects_bad_fallback() {
        let mut config = SimulationConfig::default();
        config.fallback.hours = vec![48.0, 24.0];
        assert!(FireSpreadSimulator::new(&config).is_err());
    }
}
