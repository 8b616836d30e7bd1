use std::ffi::{c_char, CString};
use std::ptr;
use std::sync::{Mutex, RwLock};

use fire_spread_core::{
    Coordinate, FireSpreadSimulator, OracleError, OracleResponse, PlaybackController,
    SimulationConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::{DefaultFireSpreadError, FireSpreadErrorCode};
use crate::helpers::{
    handle_ffi_result_error, handle_ffi_status, instance_from_ptr, optional_str, track_error,
    with_controller_mut,
};
use crate::queries::FfiCoordinate;

/// Fire spread playback context for one map view.
///
/// Holds the spread timeline for the current location together with its
/// playback clock. The host feeds it the oracle's raw JSON answer; decoding,
/// perimeter synthesis and the fallback timeline all happen inside.
///
/// # Thread Safety
/// The playback controller is protected by an `RwLock`, so queries may run
/// concurrently while transport commands and ticks take the write lock
/// briefly. Query buffers are guarded by their own `Mutex`.
///
/// # Usage
/// ```cpp
/// FireSpreadInstance* fire = nullptr;
/// uint64_t seed = 42;
/// if (fire_spread_new(34.05, -118.24, oracle_json, &seed, &fire) != FireSpreadErrorCode::Ok) {
///     return;
/// }
/// fire_spread_play(fire);
///
/// // every redraw
/// fire_spread_tick(fire, now_ms);
/// const FfiCoordinate* ring = nullptr;
/// uintptr_t len = 0;
/// fire_spread_get_perimeter(fire, &len, &ring);
///
/// fire_spread_destroy(fire);
/// ```
pub struct FireSpreadInstance {
    pub(crate) controller: RwLock<PlaybackController>,
    simulator: FireSpreadSimulator,
    rng: Mutex<ChaCha8Rng>,
    /// Reused by `fire_spread_get_perimeter` to avoid per-frame allocations.
    pub(crate) perimeter_snapshot: Mutex<Vec<FfiCoordinate>>,
    /// Backing storage for the pointer handed out by `fire_spread_get_narrative`.
    pub(crate) narrative_snapshot: Mutex<Option<CString>>,
}

impl FireSpreadInstance {
    /// Creates an instance with the default configuration.
    ///
    /// `seed` fixes the perimeter jitter and wind bearings; `None` draws a
    /// fresh seed.
    pub(crate) fn new(seed: Option<u64>) -> Result<Box<Self>, DefaultFireSpreadError> {
        let config = SimulationConfig::default();
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        Ok(Box::new(Self {
            controller: RwLock::new(PlaybackController::new(&config.playback)?),
            simulator: FireSpreadSimulator::new(&config)?,
            rng: Mutex::new(rng),
            perimeter_snapshot: Mutex::new(Vec::new()),
            narrative_snapshot: Mutex::new(None),
        }))
    }

    /// Builds the timeline for `center` from the oracle's raw answer and
    /// loads it, resetting playback.
    ///
    /// A missing or undecodable answer is an oracle failure and yields the
    /// fallback timeline.
    pub(crate) fn load(
        &self,
        center_lat: f64,
        center_lng: f64,
        oracle_json: Option<&str>,
    ) -> Result<(), DefaultFireSpreadError> {
        if !center_lat.is_finite() || !(-90.0..=90.0).contains(&center_lat) {
            return Err(DefaultFireSpreadError::invalid_parameter(format!(
                "center_lat must be a finite latitude in [-90, 90], got {center_lat}"
            )));
        }
        if !center_lng.is_finite() {
            return Err(DefaultFireSpreadError::invalid_parameter(format!(
                "center_lng must be finite, got {center_lng}"
            )));
        }

        let outcome = match oracle_json {
            Some(json) => OracleResponse::from_json(json),
            None => Err(OracleError::Unavailable {
                reason: "no oracle response supplied".to_string(),
            }),
        };

        let result = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| DefaultFireSpreadError::lock_poisoned("rng"))?;
            self.simulator.timeline_from_outcome(
                Coordinate::new(center_lat, center_lng),
                outcome,
                &mut *rng,
            )
        };
        debug!(
            "Loading {} timeframes into FFI instance (fallback: {})",
            result.timeframes().len(),
            result.is_fallback()
        );

        with_controller_mut(self, |controller| controller.load(result))
    }
}

/// Creates a fire spread instance and loads the timeline for one location.
///
/// Parameters
/// - `center_lat`, `center_lng`: ignition point in degrees.
/// - `oracle_json`: the oracle's answer as a NUL-terminated UTF-8 JSON
///   string, or null. Null or undecodable JSON selects the fallback timeline;
///   it is not an error.
/// - `seed`: optional pointer to a `u64` seed for reproducible perimeters.
/// - `out_instance`: receives the created instance (null on failure).
///
/// Returns
/// - `FireSpreadErrorCode::Ok` (0) on success
/// - `FireSpreadErrorCode::NullPointer` if `out_instance` is null
/// - `FireSpreadErrorCode::InvalidParameter` if the centre is not a finite coordinate
/// - `FireSpreadErrorCode::InvalidUtf8` if `oracle_json` is not UTF-8
///
/// # Safety
///
/// - `out_instance` must be a valid, non-null pointer to writable memory.
/// - `oracle_json` must be null or a NUL-terminated string valid for the call.
/// - `seed` must be null or point to a readable `u64`.
/// - The caller takes ownership of the returned instance and MUST call
///   `fire_spread_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_new(
    center_lat: f64,
    center_lng: f64,
    oracle_json: *const c_char,
    seed: *const u64,
    out_instance: *mut *mut FireSpreadInstance,
) -> FireSpreadErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFireSpreadError::null_pointer("out_instance"));
    }

    let created = handle_ffi_result_error(|| {
        // SAFETY: `seed` is null or readable per the caller contract.
        let seed = unsafe { seed.as_ref() }.copied();
        // SAFETY: `oracle_json` is null or NUL-terminated per the caller contract.
        let json = unsafe { optional_str(oracle_json, "oracle_json") }?;
        let instance = FireSpreadInstance::new(seed)?;
        instance.load(center_lat, center_lng, json)?;
        Ok(instance)
    });

    match created {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(instance);
            }
            FireSpreadErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            code
        }
    }
}

/// Replaces the instance's timeline with one for a new location.
///
/// Playback resets to the first timeframe, paused. `oracle_json` follows the
/// same rules as in `fire_spread_new`.
///
/// # Safety
///
/// - `ptr` must be null or a live pointer returned by `fire_spread_new`.
/// - `oracle_json` must be null or a NUL-terminated string valid for the call.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_load(
    ptr: *const FireSpreadInstance,
    center_lat: f64,
    center_lng: f64,
    oracle_json: *const c_char,
) -> FireSpreadErrorCode {
    handle_ffi_status(|| {
        let instance = unsafe { instance_from_ptr(ptr) }?;
        let json = unsafe { optional_str(oracle_json, "oracle_json") }?;
        instance.load(center_lat, center_lng, json)
    })
}

/// Destroys an instance previously created by `fire_spread_new`.
///
/// If `ptr` is null this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fire_spread_new`.
/// - The pointer MUST NOT have been freed already; it must not be used after
///   this call.
#[no_mangle]
pub unsafe extern "C" fn fire_spread_destroy(ptr: *mut FireSpreadInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: The pointer was created by `Box::into_raw` in `fire_spread_new`
    // and has not been freed. `Box::from_raw` reclaims ownership and drops it.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::with_controller;

    const ORACLE_JSON: &str = r#"{
        "timeframes": [
            { "hours": 12, "radius": 1.5, "impact": "Grass fire" },
            { "hours": 24, "radius": 3, "impact": "Reaches ridge" }
        ],
        "explanation": "Dry northerly"
    }"#;

    fn create(json: Option<&str>) -> *mut FireSpreadInstance {
        let json = json.map(|j| CString::new(j).unwrap());
        let json_ptr = json.as_ref().map_or(ptr::null(), |j| j.as_ptr());
        let seed = 7_u64;
        let mut instance = ptr::null_mut();
        let code = unsafe { fire_spread_new(34.05, -118.24, json_ptr, &seed, &mut instance) };
        assert_eq!(code, FireSpreadErrorCode::Ok);
        assert!(!instance.is_null());
        instance
    }

    #[test]
    fn test_new_with_oracle_answer() {
        let ptr = create(Some(ORACLE_JSON));
        let instance = unsafe { instance_from_ptr(ptr) }.unwrap();
        let (count, fallback) = with_controller(instance, |c| {
            let timeline = c.timeline().unwrap();
            (timeline.timeframes().len(), timeline.is_fallback())
        })
        .unwrap();
        assert_eq!(count, 2);
        assert!(!fallback);
        unsafe { fire_spread_destroy(ptr) };
    }

    #[test]
    fn test_null_or_bad_json_uses_fallback() {
        for json in [None, Some("not json")] {
            let ptr = create(json);
            let instance = unsafe { instance_from_ptr(ptr) }.unwrap();
            let fallback =
                with_controller(instance, |c| c.timeline().unwrap().is_fallback()).unwrap();
            assert!(fallback);
            unsafe { fire_spread_destroy(ptr) };
        }
    }

    #[test]
    fn test_new_rejects_null_out_and_bad_centre() {
        let code = unsafe {
            fire_spread_new(0.0, 0.0, ptr::null(), ptr::null(), ptr::null_mut())
        };
        assert_eq!(code, FireSpreadErrorCode::NullPointer);

        let mut instance = ptr::null_mut();
        let code =
            unsafe { fire_spread_new(f64::NAN, 0.0, ptr::null(), ptr::null(), &mut instance) };
        assert_eq!(code, FireSpreadErrorCode::InvalidParameter);
        assert!(instance.is_null());
    }

    #[test]
    fn test_new_rejects_invalid_utf8() {
        let bytes = [0xff_u8, 0xfe, 0];
        let mut instance = ptr::null_mut();
        let code = unsafe {
            fire_spread_new(0.0, 0.0, bytes.as_ptr().cast(), ptr::null(), &mut instance)
        };
        assert_eq!(code, FireSpreadErrorCode::InvalidUtf8);
        assert!(instance.is_null());
    }

    #[test]
    fn test_load_replaces_timeline() {
        let ptr = create(None);
        let json = CString::new(ORACLE_JSON).unwrap();
        let code = unsafe { fire_spread_load(ptr, -33.87, 151.21, json.as_ptr()) };
        assert_eq!(code, FireSpreadErrorCode::Ok);

        let instance = unsafe { instance_from_ptr(ptr) }.unwrap();
        let center = with_controller(instance, |c| c.timeline().unwrap().center()).unwrap();
        assert_eq!(center, Coordinate::new(-33.87, 151.21));
        unsafe { fire_spread_destroy(ptr) };
    }

    #[test]
    fn test_load_null_instance() {
        let code = unsafe { fire_spread_load(ptr::null(), 0.0, 0.0, ptr::null()) };
        assert_eq!(code, FireSpreadErrorCode::NullPointer);
    }

    #[test]
    fn test_destroy_null_is_noop() {
        unsafe { fire_spread_destroy(ptr::null_mut()) };
    }
}
