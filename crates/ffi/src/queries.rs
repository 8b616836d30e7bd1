use std::ffi::{c_char, CString};
use std::ptr;

use fire_spread_core::{Coordinate, SimulationResult};

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{handle_ffi_status, instance_from_ptr, track_error, with_controller};
use crate::instance::FireSpreadInstance;

/// FFI-friendly geographic point (degrees).
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FfiCoordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl From<Coordinate> for FfiCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            lat: coordinate.lat,
            lng: coordinate.lng,
        }
    }
}

/// FFI-friendly snapshot of the playback state.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    /// Index of the timeframe being departed from.
    pub current_index: usize,
    /// Number of timeframes in the loaded timeline.
    pub frame_count: usize,
    /// Blend position toward the next timeframe (0.0 - 1.0).
    pub progress: f64,
    /// Hour offset label of the current timeframe.
    pub hours: f64,
    /// Whether the clock is running.
    pub is_playing: bool,
    /// Whether the timeline is the fallback schedule.
    pub is_fallback: bool,
}

/// Write the current playback state to `out_state`.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success
/// - `FireSpreadErrorCode::NullPointer` if `ptr` or `out_state` is null
/// - `FireSpreadErrorCode::LockPoisoned` if the internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be null or a live pointer returned by `fire_spread_new`.
/// - `out_state` must be null or point to writable memory for one `PlaybackSnapshot`.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_get_state(
    ptr: *const FireSpreadInstance,
    out_state: *mut PlaybackSnapshot,
) -> FireSpreadErrorCode {
    if out_state.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_state"));
    }

    handle_ffi_status(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let snapshot = with_controller(instance, |controller| {
            let state = controller.state();
            let frame = controller.display();
            PlaybackSnapshot {
                current_index: state.current_index,
                frame_count: controller.frame_count(),
                progress: frame.as_ref().map_or(0.0, |f| f.progress.value()),
                hours: frame.as_ref().map_or(0.0, |f| f.hours.value()),
                is_playing: state.is_playing,
                is_fallback: controller
                    .timeline()
                    .is_some_and(SimulationResult::is_fallback),
            }
        })?;
        unsafe {
            *out_state = snapshot;
        }
        Ok(())
    })
}

/// Return a borrowed pointer to the perimeter to draw right now.
///
/// The ring is closed (first point repeated last) and already blended
/// between the current and next timeframes. The pointer is invalidated by the
/// next call to this function; **DO NOT FREE THIS POINTER**.
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success; `out_len` is 0 when nothing is loaded
/// - `FireSpreadErrorCode::NullPointer` if `ptr`, `out_len`, or `out_array` is null
/// - `FireSpreadErrorCode::LockPoisoned` if an internal lock is poisoned
///
/// # Safety
///
/// - `ptr` must be null or a live pointer returned by `fire_spread_new`.
/// - `out_len` and `out_array` must be null or valid pointers to writable memory.
///
/// # Example Usage (C++)
/// ```cpp
/// uintptr_t len = 0;
/// const FfiCoordinate* ring = nullptr;
/// if (fire_spread_get_perimeter(fire, &len, &ring) == FireSpreadErrorCode::Ok) {
///     for (uintptr_t i = 0; i < len; i++) {
///         draw_vertex(ring[i].lat, ring[i].lng);
///     }
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn fire_spread_get_perimeter(
    ptr: *const FireSpreadInstance,
    out_len: *mut usize,
    out_array: *mut *const FfiCoordinate,
) -> FireSpreadErrorCode {
    if out_len.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_len"));
    }

    if out_array.is_null() {
        unsafe {
            *out_len = 0;
        }
        return track_error(&DefaultFireSpreadError::null_pointer("out_array"));
    }

    handle_ffi_status(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let mut snapshot = instance
            .perimeter_snapshot
            .lock()
            .map_err(|_| DefaultFireSpreadError::lock_poisoned("perimeter_snapshot"))?;
        snapshot.clear(); // O(1) - keeps capacity

        with_controller(instance, |controller| {
            if let Some(frame) = controller.display() {
                snapshot.extend(frame.perimeter.iter().copied().map(FfiCoordinate::from));
            }
        })?;

        unsafe {
            *out_len = snapshot.len();
            *out_array = if snapshot.is_empty() {
                ptr::null()
            } else {
                snapshot.as_ptr()
            };
        }
        Ok(())
    })
}

/// Return a borrowed pointer to the current timeframe's narrative as a
/// NUL-terminated UTF-8 string, or null when nothing is loaded.
///
/// The pointer is invalidated by the next call to this function;
/// **DO NOT FREE THIS POINTER**.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer returned by `fire_spread_new`.
/// - `out_text` must be null or a valid pointer to writable memory.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_get_narrative(
    ptr: *const FireSpreadInstance,
    out_text: *mut *const c_char,
) -> FireSpreadErrorCode {
    if out_text.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_text"));
    }

    handle_ffi_status(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let mut cached = instance
            .narrative_snapshot
            .lock()
            .map_err(|_| DefaultFireSpreadError::lock_poisoned("narrative_snapshot"))?;

        // Interior NULs cannot cross the boundary; they are replaced by spaces.
        *cached = with_controller(instance, |controller| {
            controller
                .display()
                .map(|frame| CString::new(frame.narrative.replace('\0', " ")).unwrap_or_default())
        })?;

        unsafe {
            *out_text = cached.as_ref().map_or(ptr::null(), |text| text.as_ptr());
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{fire_spread_destroy, fire_spread_new};
    use crate::playback::{fire_spread_skip_to_end, fire_spread_tick};
    use std::ffi::CStr;

    const ORACLE_JSON: &str = r#"{
        "timeframes": [
            { "hours": 6, "radius": 1, "impact": "Ignition" },
            { "hours": 18, "radius": 2.5, "impact": "Crown fire" }
        ],
        "explanation": "Test"
    }"#;

    fn create() -> *mut FireSpreadInstance {
        let json = CString::new(ORACLE_JSON).unwrap();
        let seed = 11_u64;
        let mut instance = ptr::null_mut();
        let code = unsafe { fire_spread_new(0.0, 0.0, json.as_ptr(), &seed, &mut instance) };
        assert_eq!(code, FireSpreadErrorCode::Ok);
        instance
    }

    fn narrative(ptr: *const FireSpreadInstance) -> String {
        let mut text = ptr::null();
        let code = unsafe { fire_spread_get_narrative(ptr, &mut text) };
        assert_eq!(code, FireSpreadErrorCode::Ok);
        unsafe { CStr::from_ptr(text) }.to_str().unwrap().to_string()
    }

    #[test]
    fn test_initial_state() {
        let ptr = create();
        let mut state = PlaybackSnapshot {
            current_index: 99,
            frame_count: 0,
            progress: -1.0,
            hours: -1.0,
            is_playing: true,
            is_fallback: true,
        };
        let code = unsafe { fire_spread_get_state(ptr, &mut state) };
        assert_eq!(code, FireSpreadErrorCode::Ok);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.frame_count, 2);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.hours, 6.0);
        assert!(!state.is_playing);
        assert!(!state.is_fallback);
        unsafe { fire_spread_destroy(ptr) };
    }

    #[test]
    fn test_perimeter_buffer() {
        let ptr = create();
        let mut len = 0_usize;
        let mut ring = ptr::null();
        let code = unsafe { fire_spread_get_perimeter(ptr, &mut len, &mut ring) };
        assert_eq!(code, FireSpreadErrorCode::Ok);
        assert_eq!(len, 13);
        let points = unsafe { std::slice::from_raw_parts(ring, len) };
        assert_eq!(points[0], points[12]);
        unsafe { fire_spread_destroy(ptr) };
    }

    #[test]
    fn test_narrative_follows_index() {
        let ptr = create();
        assert_eq!(narrative(ptr), "Ignition");

        assert_eq!(unsafe { fire_spread_skip_to_end(ptr) }, FireSpreadErrorCode::Ok);
        assert_eq!(unsafe { fire_spread_tick(ptr, 0.0) }, FireSpreadErrorCode::Ok);
        assert_eq!(narrative(ptr), "Crown fire");
        unsafe { fire_spread_destroy(ptr) };
    }

    #[test]
    fn test_null_out_pointers() {
        let ptr = create();
        let code = unsafe { fire_spread_get_state(ptr, ptr::null_mut()) };
        assert_eq!(code, FireSpreadErrorCode::NullPointer);

        let mut len = 5_usize;
        let code = unsafe { fire_spread_get_perimeter(ptr, &mut len, ptr::null_mut()) };
        assert_eq!(code, FireSpreadErrorCode::NullPointer);
        assert_eq!(len, 0);

        let code = unsafe { fire_spread_get_narrative(ptr::null(), &mut ptr::null()) };
        assert_eq!(code, FireSpreadErrorCode::NullPointer);
        unsafe { fire_spread_destroy(ptr) };
    }
}
