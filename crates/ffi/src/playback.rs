use fire_spread_core::{Milliseconds, PlaybackController, TransportCommand};

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{handle_ffi_status, instance_from_ptr, with_controller_mut};
use crate::instance::FireSpreadInstance;

/// Apply one transport command under the write lock.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
unsafe fn transport(ptr: *const FireSpreadInstance, command: TransportCommand) -> FireSpreadErrorCode {
    handle_ffi_status(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_controller_mut(instance, |controller| controller.apply(command))
    })
}

/// Start or resume playback from the retained position.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_play(ptr: *const FireSpreadInstance) -> FireSpreadErrorCode {
    unsafe { transport(ptr, TransportCommand::Play) }
}

/// Pause playback, keeping the current index and progress.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_pause(ptr: *const FireSpreadInstance) -> FireSpreadErrorCode {
    unsafe { transport(ptr, TransportCommand::Pause) }
}

/// Return to the first timeframe; playback continues if it was running.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_restart(ptr: *const FireSpreadInstance) -> FireSpreadErrorCode {
    unsafe { transport(ptr, TransportCommand::Restart) }
}

/// Jump to the last timeframe; a running clock halts on the next tick.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_skip_to_end(
    ptr: *const FireSpreadInstance,
) -> FireSpreadErrorCode {
    unsafe { transport(ptr, TransportCommand::SkipToEnd) }
}

/// Advance the playback clock to the host timestamp `timestamp_ms`.
///
/// Call from the redraw callback with a monotonically increasing clock
/// (e.g. the frame timestamp in milliseconds). No-op while paused.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success
/// - `FireSpreadErrorCode::NullPointer` if `ptr` is null
/// - `FireSpreadErrorCode::InvalidParameter` if `timestamp_ms` is not finite
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_tick(
    ptr: *const FireSpreadInstance,
    timestamp_ms: f64,
) -> FireSpreadErrorCode {
    handle_ffi_status(|| {
        if !timestamp_ms.is_finite() {
            return Err(DefaultFireSpreadError::invalid_parameter(format!(
                "timestamp_ms must be finite, got {timestamp_ms}"
            )));
        }
        let instance = unsafe { instance_from_ptr(ptr) }?;
        with_controller_mut(instance, |controller: &mut PlaybackController| {
            controller.tick(Milliseconds::new(timestamp_ms));
        })
    })
}
