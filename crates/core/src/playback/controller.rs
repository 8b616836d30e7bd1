//! Timeline playback state machine
//!
//! The host calls [`PlaybackController::tick`] from its redraw callback with a
//! monotonically increasing timestamp. Every segment (the blend from one
//! timeframe to the next) lasts the same wall-clock duration regardless of the
//! hour gap between the two frames. Playback runs forward only and halts on
//! the last timeframe.

use tracing::debug;

use super::{DisplayFrame, PlaybackState, TransportCommand};
use crate::config::PlaybackConfig;
use crate::core_types::{Fraction, Milliseconds, Perimeter};
use crate::error::ConfigError;
use crate::geometry::interpolate;
use crate::simulation::{SimulationResult, Timeframe};

/// Animation driver over one [`SimulationResult`]
#[derive(Debug, Clone)]
pub struct PlaybackController {
    timeline: Option<SimulationResult>,
    state: PlaybackState,
    segment_duration: Milliseconds,
    /// Host timestamp at which the current segment started; `None` until the
    /// first tick after the clock was (re)armed.
    segment_start: Option<Milliseconds>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self {
            timeline: None,
            state: PlaybackState::default(),
            segment_duration: Milliseconds::new(PlaybackConfig::default().segment_duration_ms),
            segment_start: None,
        }
    }
}

impl PlaybackController {
    /// Create an empty controller.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`PlaybackConfig::validate`].
    pub fn new(config: &PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            segment_duration: Milliseconds::new(config.segment_duration_ms),
            ..Self::default()
        })
    }

    /// Create a controller already holding `timeline`
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] from [`PlaybackConfig::validate`].
    pub fn with_timeline(
        config: &PlaybackConfig,
        timeline: SimulationResult,
    ) -> Result<Self, ConfigError> {
        let mut controller = Self::new(config)?;
        controller.load(timeline);
        Ok(controller)
    }

    /// Replace the timeline and reset to `{0, 0, paused}`
    pub fn load(&mut self, timeline: SimulationResult) {
        debug!(
            "Loading timeline with {} timeframes",
            timeline.timeframes().len()
        );
        self.timeline = Some(timeline);
        self.reset();
    }

    /// Drop the timeline (the subject location changed)
    pub fn clear(&mut self) {
        self.timeline = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.state = PlaybackState::default();
        self.segment_start = None;
    }

    /// Loaded timeline, if any
    #[must_use]
    pub fn timeline(&self) -> Option<&SimulationResult> {
        self.timeline.as_ref()
    }

    /// Current playback state
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the clock is running
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Wall-clock length of one segment
    #[must_use]
    pub fn segment_duration(&self) -> Milliseconds {
        self.segment_duration
    }

    fn frames(&self) -> &[Timeframe] {
        match &self.timeline {
            Some(timeline) => timeline.timeframes(),
            None => &[],
        }
    }

    /// Number of timeframes in the loaded timeline
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames().len()
    }

    fn last_index(&self) -> Option<usize> {
        self.frame_count().checked_sub(1)
    }

    /// Start or resume playback. No-op without timeframes.
    pub fn play(&mut self) {
        if self.frame_count() == 0 {
            debug!("Ignoring play on an empty timeline");
            return;
        }
        if !self.state.is_playing {
            self.state.is_playing = true;
            self.segment_start = None;
        }
    }

    /// Freeze the clock, keeping the current progress
    pub fn pause(&mut self) {
        self.state.is_playing = false;
        self.segment_start = None;
    }

    /// Jump back to the first timeframe; keeps playing if it was
    pub fn restart(&mut self) {
        self.state.current_index = 0;
        self.state.progress = Fraction::ZERO;
        self.segment_start = None;
    }

    /// Jump to the last timeframe; the next tick halts playback
    pub fn skip_to_end(&mut self) {
        let Some(last) = self.last_index() else {
            return;
        };
        self.state.current_index = last;
        self.state.progress = Fraction::ONE;
        self.segment_start = None;
    }

    /// Dispatch a transport command
    pub fn apply(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::Play => self.play(),
            TransportCommand::Pause => self.pause(),
            TransportCommand::TogglePlay => {
                if self.state.is_playing {
                    self.pause();
                } else {
                    self.play();
                }
            }
            TransportCommand::Restart => self.restart(),
            TransportCommand::SkipToEnd => self.skip_to_end(),
        }
    }

    /// Advance the clock to host timestamp `now`.
    ///
    /// The first tick after the clock is armed fixes the segment start so that
    /// the retained progress is preserved. Once a segment's full duration has
    /// elapsed the index advances by one and a new segment starts at `now`;
    /// arriving on the last timeframe pins progress at 1 and stops playback.
    pub fn tick(&mut self, now: Milliseconds) {
        if !self.state.is_playing || !now.is_finite() {
            return;
        }
        let Some(last) = self.last_index() else {
            self.state.is_playing = false;
            return;
        };
        if self.state.current_index >= last {
            self.finish();
            return;
        }

        let duration = self.segment_duration;
        let start = *self
            .segment_start
            .get_or_insert(now - duration * self.state.progress.value());
        let elapsed = (now - start).value().max(0.0);

        if elapsed >= duration.value() {
            self.state.current_index += 1;
            self.segment_start = Some(now);
            debug!(
                "Playback advanced to timeframe {} of {}",
                self.state.current_index,
                last + 1
            );
            if self.state.current_index >= last {
                self.finish();
            } else {
                self.state.progress = Fraction::ZERO;
            }
        } else {
            self.state.progress = Fraction::clamped(elapsed / duration.value());
        }
    }

    fn finish(&mut self) {
        self.state.current_index = self.last_index().unwrap_or(0);
        self.state.progress = Fraction::ONE;
        self.state.is_playing = false;
        self.segment_start = None;
    }

    /// What to draw right now; `None` without timeframes.
    ///
    /// On the last timeframe its perimeter is shown as is; otherwise the
    /// current and next perimeters are blended by the segment progress. The
    /// narrative and hour label always belong to the current timeframe.
    #[must_use]
    pub fn display(&self) -> Option<DisplayFrame<'_>> {
        let frames = self.frames();
        let index = self.state.current_index.min(frames.len().checked_sub(1)?);
        let current = &frames[index];

        let perimeter: Perimeter = match frames.get(index + 1) {
            Some(next) => interpolate(&current.perimeter, &next.perimeter, self.state.progress.value()),
            None => current.perimeter.clone(),
        };

        Some(DisplayFrame {
            perimeter,
            narrative: &current.narrative,
            hours: current.hours,
            index,
            progress: if index + 1 == frames.len() {
                Fraction::ONE
            } else {
                self.state.progress
            },
        })
    }
}
