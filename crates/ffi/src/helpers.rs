use std::ffi::{c_char, CStr, CString};

use fire_spread_core::PlaybackController;

use crate::error::{with_last_error_mut, DefaultFireSpreadError, FireSpreadError, FireSpreadErrorCode};
use crate::instance::FireSpreadInstance;

/// Set the thread-local error message and code.
/// Accepts any type implementing `FireSpreadError` trait.
pub(crate) fn set_last_error(error: &impl FireSpreadError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl FireSpreadError) -> FireSpreadErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = FireSpreadErrorCode::Ok;
    });
}

/// Run an FFI body, recording its error or clearing the last error on success.
pub(crate) fn handle_ffi_result_error<F, T>(func: F) -> Result<T, FireSpreadErrorCode>
where
    F: FnOnce() -> Result<T, DefaultFireSpreadError>,
{
    match func() {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Like [`handle_ffi_result_error`] for bodies without a value, collapsed to
/// the code returned across the boundary.
pub(crate) fn handle_ffi_status<F>(func: F) -> FireSpreadErrorCode
where
    F: FnOnce() -> Result<(), DefaultFireSpreadError>,
{
    handle_ffi_result_error(func).err().unwrap_or(FireSpreadErrorCode::Ok)
}

/// Borrow the instance behind `ptr`.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `fire_spread_new`.
pub(crate) unsafe fn instance_from_ptr<'a>(
    ptr: *const FireSpreadInstance,
) -> Result<&'a FireSpreadInstance, DefaultFireSpreadError> {
    // SAFETY: null is rejected; otherwise the caller guarantees the pointer
    // came from `Box::into_raw` in `fire_spread_new` and is not yet destroyed.
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFireSpreadError::null_pointer("ptr"))
}

/// Read an optional C string argument; null maps to `None`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string valid for the call.
pub(crate) unsafe fn optional_str<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<Option<&'a str>, DefaultFireSpreadError> {
    if ptr.is_null() {
        return Ok(None);
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(Some)
        .map_err(|_| DefaultFireSpreadError::invalid_utf8(param_name))
}

/// Run `func` with shared access to the playback controller.
pub(crate) fn with_controller<F, T>(
    instance: &FireSpreadInstance,
    func: F,
) -> Result<T, DefaultFireSpreadError>
where
    F: FnOnce(&PlaybackController) -> T,
{
    let controller = instance
        .controller
        .read()
        .map_err(|_| DefaultFireSpreadError::lock_poisoned("controller"))?;
    Ok(func(&controller))
}

/// Run `func` with exclusive access to the playback controller.
pub(crate) fn with_controller_mut<F, T>(
    instance: &FireSpreadInstance,
    func: F,
) -> Result<T, DefaultFireSpreadError>
where
    F: FnOnce(&mut PlaybackController) -> T,
{
    let mut controller = instance
        .controller
        .write()
        .map_err(|_| DefaultFireSpreadError::lock_poisoned("controller"))?;
    Ok(func(&mut controller))
}
