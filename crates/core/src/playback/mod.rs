//! Timeline playback: transport commands, state and the per-tick display

pub mod controller;

use serde::{Deserialize, Serialize};

use crate::core_types::{Fraction, Hours, Perimeter};

pub use controller::PlaybackController;

/// Observable playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Timeframe being departed from
    pub current_index: usize,
    /// Blend position toward the next timeframe
    pub progress: Fraction,
    /// Whether the clock is running
    pub is_playing: bool,
}

/// Transport buttons offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportCommand {
    /// Start or resume
    Play,
    /// Freeze, keeping progress
    Pause,
    /// Play when paused, pause when playing
    TogglePlay,
    /// Back to the first timeframe
    Restart,
    /// Jump to the last timeframe
    SkipToEnd,
}

/// Everything the overlay needs for one redraw
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame<'a> {
    /// Perimeter to draw (blended unless on the last timeframe)
    pub perimeter: Perimeter,
    /// Narrative of the current timeframe
    pub narrative: &'a str,
    /// Hour offset label of the current timeframe
    pub hours: Hours,
    /// Index of the current timeframe
    pub index: usize,
    /// Blend position (1 on the last timeframe)
    pub progress: Fraction,
}
