//! Deterministic fallback schedule
//!
//! Used whenever the oracle cannot supply a timeline. Hours and radii are a
//! fixed function of the configuration, so the resulting timeline always has
//! strictly increasing offsets and the usual perimeter invariants.

use crate::config::FallbackConfig;
use crate::core_types::{Hours, Kilometers};
use crate::oracle::TimeframeEstimate;

/// Estimates for every hour offset of a validated fallback schedule.
///
/// Offsets that are negative or non-finite are skipped (validation rejects
/// them, so this only matters for hand-built configs).
pub(crate) fn estimates(config: &FallbackConfig) -> Vec<TimeframeEstimate> {
    config
        .hours
        .iter()
        .filter_map(|&h| Hours::try_new(h))
        .map(|hours| TimeframeEstimate {
            hours,
            radius: Kilometers::new(config.radius.radius_km(hours.value())),
            impact: config.impact.clone(),
        })
        .collect()
}
