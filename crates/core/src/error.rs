//! Error types for the spread timeline.
//!
//! Oracle failures never reach playback: the simulation pipeline converts
//! every [`OracleError`] into the fallback timeline. [`ConfigError`] is
//! returned when a [`SimulationConfig`](crate::config::SimulationConfig)
//! fails validation.

use std::error::Error;
use std::fmt;

/// Failures of the external risk oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle could not be reached or refused the request.
    Unavailable {
        /// Human-readable description from the transport layer.
        reason: String,
    },
    /// The oracle answered with a payload that could not be decoded.
    Malformed {
        /// Description of the decoding failure.
        reason: String,
    },
    /// The oracle answered without a single usable timeframe.
    Empty,
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "oracle unavailable: {reason}"),
            Self::Malformed { reason } => write!(f, "malformed oracle response: {reason}"),
            Self::Empty => write!(f, "oracle returned no usable timeframes"),
        }
    }
}

impl Error for OracleError {}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            reason: err.to_string(),
        }
    }
}

/// Invalid simulation configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric field is outside its accepted range.
    OutOfRange {
        /// Dotted path of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable constraint.
        constraint: &'static str,
    },
    /// The fallback hour schedule is empty or not strictly increasing.
    InvalidSchedule {
        /// Description of the problem.
        reason: String,
    },
    /// The configuration document could not be parsed.
    Parse {
        /// Description of the parse failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                constraint,
            } => write!(f, "{field} {constraint}, got {value}"),
            Self::InvalidSchedule { reason } => write!(f, "invalid fallback schedule: {reason}"),
            Self::Parse { reason } => write!(f, "failed to parse configuration: {reason}"),
        }
    }
}

impl Error for ConfigError {}
