//! C ABI for the fire spread playback pipeline
//!
//! The host owns an opaque [`FireSpreadInstance`] per map view, hands it the
//! risk oracle's raw JSON answer, forwards transport buttons and redraw
//! timestamps, and reads back the perimeter and narrative to draw. Failures
//! are reported as [`FireSpreadErrorCode`] with a per-thread message from
//! [`fire_spread_get_last_error`].

mod error;
mod helpers;
mod instance;
mod playback;
mod queries;

pub use error::{fire_spread_get_last_error, fire_spread_get_last_error_code, FireSpreadErrorCode};
pub use instance::{fire_spread_destroy, fire_spread_load, fire_spread_new, FireSpreadInstance};
pub use playback::{
    fire_spread_pause, fire_spread_play, fire_spread_restart, fire_spread_skip_to_end,
    fire_spread_tick,
};
pub use queries::{
    fire_spread_get_narrative, fire_spread_get_perimeter, fire_spread_get_state, FfiCoordinate,
    PlaybackSnapshot,
};
