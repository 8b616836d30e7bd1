//! Last-request-wins coordination between oracle requests and playback
//!
//! Selecting a new location issues a [`RequestTicket`] and clears whatever is
//! on screen. Oracle calls may finish in any order (possibly on worker threads
//! holding a [`RequestTracker`] clone); a finished result is loaded only if
//! its ticket is still the newest, otherwise it is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use tracing::debug;

use super::{FireSpreadSimulator, SimulationResult};
use crate::config::PlaybackConfig;
use crate::error::ConfigError;
use crate::oracle::{Location, RiskOracle};
use crate::playback::PlaybackController;

/// Handle identifying one simulation request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    generation: u64,
    location: Location,
}

impl RequestTicket {
    /// Monotonic request number
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Location the request was issued for
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// Shared generation counter deciding which request is current
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    /// Create a tracker with no requests issued
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `location`, superseding every earlier ticket
    pub fn issue(&self, location: Location) -> RequestTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        RequestTicket {
            generation,
            location,
        }
    }

    /// Whether no newer ticket has been issued since `ticket`
    #[must_use]
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.generation
    }
}

/// Playback plus request bookkeeping for one map view
#[derive(Debug, Default)]
pub struct SimulationSession {
    tracker: RequestTracker,
    controller: PlaybackController,
    location: Option<Location>,
}

impl SimulationSession {
    /// Create a session.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`PlaybackConfig::validate`].
    pub fn new(playback: &PlaybackConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            controller: PlaybackController::new(playback)?,
            ..Self::default()
        })
    }

    /// Tracker clone for completing requests off the UI thread
    #[must_use]
    pub fn tracker(&self) -> RequestTracker {
        self.tracker.clone()
    }

    /// Location of the newest request
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Playback controller
    #[must_use]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Playback controller, for transport commands and ticks
    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Start a request for `location`; the current timeline is cleared
    pub fn begin_request(&mut self, location: Location) -> RequestTicket {
        let ticket = self.tracker.issue(location.clone());
        debug!(
            "Issued simulation request {} for {}",
            ticket.generation, location.address
        );
        self.location = Some(location);
        self.controller.clear();
        ticket
    }

    /// Deliver the result of `ticket`'s request.
    ///
    /// Returns `true` if the result was loaded, `false` if a newer request
    /// superseded it.
    pub fn complete(&mut self, ticket: &RequestTicket, result: SimulationResult) -> bool {
        if !self.tracker.is_current(ticket) {
            debug!(
                "Discarding stale simulation result for request {}",
                ticket.generation
            );
            return false;
        }
        self.controller.load(result);
        true
    }

    /// Issue a request, run it to completion and load the result
    pub fn request<O, R>(
        &mut self,
        simulator: &FireSpreadSimulator,
        oracle: &O,
        location: Location,
        date: NaiveDate,
        rng: &mut R,
    ) -> bool
    where
        O: RiskOracle + ?Sized,
        R: Rng + ?Sized,
    {
        let ticket = self.begin_request(location);
        let result = simulator.simulate(oracle, ticket.location(), date, rng);
        self.complete(&ticket, result)
    }
}
