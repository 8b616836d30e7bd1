//! Fire Spread Core Library
//!
//! Turns a risk oracle's spread estimates for a location into an animated
//! fire-perimeter timeline.
//!
//! ## Pipeline
//!
//! - [`oracle`]: the [`RiskOracle`] seam and tolerant decoding of its answers
//! - [`geometry`]: wind-elongated, jittered perimeter synthesis and linear
//!   perimeter interpolation
//! - [`simulation`]: one synthesized [`Timeframe`] per estimate, with a
//!   deterministic fallback schedule when the oracle fails, plus
//!   last-request-wins session handling
//! - [`playback`]: a clock-driven controller that blends consecutive
//!   perimeters and exposes play, pause, restart and skip-to-end
//!
//! All randomness is drawn from a caller-supplied [`rand::Rng`], so seeded
//! generators give reproducible perimeters.

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;

// Perimeter geometry
pub mod geometry;

// Oracle boundary, timeline construction and playback
pub mod oracle;
pub mod playback;
pub mod simulation;

// Re-export core types
pub use core_types::{
    Coordinate, Degrees, Fraction, GeoBounds, Hours, Kilometers, Milliseconds, Perimeter, Radians,
};

// Re-export configuration and errors
pub use config::{
    BearingMode, FallbackConfig, FallbackRadius, PlaybackConfig, SimulationConfig,
    SynthesisConfig,
};
pub use error::{ConfigError, OracleError};

// Re-export the pipeline
pub use geometry::{interpolate, PerimeterSynthesizer};
pub use oracle::{Location, OracleResponse, OracleTimeframe, RiskOracle};
pub use playback::{DisplayFrame, PlaybackController, PlaybackState, TransportCommand};
pub use simulation::{
    FireSpreadSimulator, RequestTicket, RequestTracker, SimulationResult, SimulationSession,
    Timeframe, TimelineSource,
};
