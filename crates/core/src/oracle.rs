//! Risk oracle adapter
//!
//! The oracle is an external, non-deterministic service that estimates how
//! far a fire started at a location would spread after a handful of hour
//! offsets, with a short narrative per offset. Nothing it returns is trusted:
//! [`OracleResponse`] decodes the payload leniently and
//! [`OracleResponse::resolve`] applies the defaults and filtering that turn
//! it into usable [`TimeframeEstimate`]s.
//!
//! Payload shape:
//!
//! ```json
//! {
//!   "timeframes": [ { "hours": 12, "radius": 1.5, "impact": "..." } ],
//!   "explanation": "..."
//! }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::core_types::{Coordinate, Hours, Kilometers};
use crate::error::OracleError;

/// Radius used when the oracle omits one or sends a non-number (km)
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Narrative used when a timeframe carries no impact text
pub const DEFAULT_IMPACT: &str = "Fire spreading based on local conditions";

/// Overall narrative used when the oracle sends no explanation
pub const DEFAULT_EXPLANATION: &str = "Fire spread simulation based on local conditions";

/// Subject of a simulation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Ignition point
    pub coordinate: Coordinate,
    /// Human-readable address passed to the oracle for context
    pub address: String,
}

impl Location {
    /// Create a location
    pub fn new(coordinate: Coordinate, address: impl Into<String>) -> Self {
        Self {
            coordinate,
            address: address.into(),
        }
    }
}

/// Capability interface to the external spread estimator.
///
/// Implementations may block; the pipeline calls it once per request.
pub trait RiskOracle {
    /// Ask for spread estimates for a fire starting at `location` on `date`.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] when the service cannot be reached or its
    /// answer cannot be decoded.
    fn fetch_timeframes(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<OracleResponse, OracleError>;
}

impl<F> RiskOracle for F
where
    F: Fn(&Location, NaiveDate) -> Result<OracleResponse, OracleError>,
{
    fn fetch_timeframes(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<OracleResponse, OracleError> {
        self(location, date)
    }
}

/// One raw timeframe as sent by the oracle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleTimeframe {
    /// Hours after ignition
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    /// Spread radius in kilometres
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Narrative of the fire's behaviour at this offset
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
}

/// Raw oracle answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleResponse {
    /// Timeframes in the order received
    #[serde(default, deserialize_with = "nullable_list")]
    pub timeframes: Vec<OracleTimeframe>,
    /// Overall narrative
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A timeframe with defaults applied and hours validated
#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeEstimate {
    /// Hours after ignition
    pub hours: Hours,
    /// Spread radius (may be zero or negative if the oracle said so)
    pub radius: Kilometers,
    /// Narrative for this offset
    pub impact: String,
}

/// Oracle answer after sanitisation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedForecast {
    /// Estimates sorted by hours (stable for equal offsets)
    pub estimates: Vec<TimeframeEstimate>,
    /// Overall narrative
    pub explanation: String,
}

impl OracleResponse {
    /// Decode an oracle payload.
    ///
    /// Field-level problems (missing or non-numeric radius, missing impact)
    /// are tolerated here and resolved by [`resolve`](Self::resolve).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Malformed`] if `json` is not a JSON object of
    /// the expected shape.
    pub fn from_json(json: &str) -> Result<Self, OracleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply defaults, drop unusable frames and order by hours.
    ///
    /// - missing, non-numeric or non-finite radius → [`DEFAULT_RADIUS_KM`]
    /// - missing impact → [`DEFAULT_IMPACT`]
    /// - missing explanation → [`DEFAULT_EXPLANATION`]
    /// - frames without a finite, non-negative `hours` are dropped
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Empty`] if no frame survives.
    pub fn resolve(self) -> Result<ResolvedForecast, OracleError> {
        let received = self.timeframes.len();
        let mut estimates: Vec<TimeframeEstimate> = self
            .timeframes
            .into_iter()
            .filter_map(|frame| {
                let Some(hours) = frame.hours.and_then(Hours::try_new) else {
                    warn!("Dropping oracle timeframe with unusable hours: {:?}", frame.hours);
                    return None;
                };
                let radius = frame
                    .radius
                    .filter(|r| r.is_finite())
                    .unwrap_or(DEFAULT_RADIUS_KM);
                Some(TimeframeEstimate {
                    hours,
                    radius: Kilometers::new(radius),
                    impact: frame.impact.unwrap_or_else(|| DEFAULT_IMPACT.to_string()),
                })
            })
            .collect();

        if estimates.is_empty() {
            return Err(OracleError::Empty);
        }
        if estimates.len() < received {
            warn!(
                "Kept {} of {} oracle timeframes",
                estimates.len(),
                received
            );
        }

        estimates.sort_by_key(|e| e.hours);

        Ok(ResolvedForecast {
            estimates,
            explanation: self
                .explanation
                .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string()),
        })
    }
}

/// Accept any JSON value; keep it only if it is a number
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Accept any JSON value; keep it only if it is a string
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Treat `null` like an absent list
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_full_payload() {
        let response = OracleResponse::from_json(
            r#"{
                "timeframes": [
                    { "hours": 12, "radius": 1.5, "impact": "Grass fire" },
                    { "hours": 24, "radius": 3, "impact": "Crosses ridge" }
                ],
                "explanation": "Dry westerly"
            }"#,
        )
        .unwrap();
        assert_eq!(response.timeframes.len(), 2);
        assert_eq!(response.timeframes[1].radius, Some(3.0));
        assert_eq!(response.explanation.as_deref(), Some("Dry westerly"));
    }

    #[test]
    fn test_non_numeric_radius_defaults() {
        let forecast = OracleResponse::from_json(
            r#"{ "timeframes": [ { "hours": 12, "radius": "five" }, { "hours": 24 } ] }"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        assert!(forecast
            .estimates
            .iter()
            .all(|e| e.radius.value() == DEFAULT_RADIUS_KM));
        assert!(forecast.estimates.iter().all(|e| e.impact == DEFAULT_IMPACT));
        assert_eq!(forecast.explanation, DEFAULT_EXPLANATION);
    }

    #[test]
    fn test_missing_or_null_timeframes_is_empty() {
        for json in ["{}", r#"{ "timeframes": null }"#, r#"{ "timeframes": [] }"#] {
            let response = OracleResponse::from_json(json).unwrap();
            assert_eq!(response.resolve(), Err(OracleError::Empty));
        }
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        assert!(matches!(
            OracleResponse::from_json(r#"{ "timeframes": "soon" }"#),
            Err(OracleError::Malformed { .. })
        ));
        assert!(matches!(
            OracleResponse::from_json("[]"),
            Err(OracleError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unusable_hours_dropped_and_sorted() {
        let forecast = OracleResponse::from_json(
            r#"{ "timeframes": [
                { "hours": 48, "radius": 6 },
                { "hours": -1, "radius": 1 },
                { "radius": 2 },
                { "hours": 12, "radius": 2 }
            ] }"#,
        )
        .unwrap()
        .resolve()
        .unwrap();
        let hours: Vec<f64> = forecast.estimates.iter().map(|e| e.hours.value()).collect();
        assert_eq!(hours, vec![12.0, 48.0]);
    }

    #[test]
    fn test_negative_radius_is_kept() {
        let forecast = OracleResponse::from_json(r#"{ "timeframes": [ { "hours": 1, "radius": -3 } ] }"#)
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(forecast.estimates[0].radius.value(), -3.0);
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |_: &Location, _: NaiveDate| -> Result<OracleResponse, OracleError> {
            Err(OracleError::Empty)
        };
        let location = Location::new(Coordinate::new(0.0, 0.0), "Nowhere");
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(oracle.fetch_timeframes(&location, date), Err(OracleError::Empty));
    }
}
