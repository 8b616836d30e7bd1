use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use fire_spread_core::ConfigError;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait FireSpreadError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> FireSpreadErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `FireSpreadError` for common FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultFireSpreadError {
    code: FireSpreadErrorCode,
    msg: String,
}

impl DefaultFireSpreadError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_instance"`, `"ptr"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for poisoned lock.
    ///
    /// # Arguments
    /// * `lock_name` - The name of the lock that was poisoned (e.g., `"controller"`)
    pub fn lock_poisoned(lock_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::LockPoisoned,
            msg: format!("Lock '{lock_name}' was poisoned by a panic in another thread"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: FireSpreadErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for a C string that is not valid UTF-8.
    ///
    /// # Arguments
    /// * `param_name` - The name of the string parameter (e.g., `"oracle_json"`)
    pub fn invalid_utf8(param_name: &str) -> Self {
        Self {
            code: FireSpreadErrorCode::InvalidUtf8,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }
}

impl FireSpreadError for DefaultFireSpreadError {
    fn code(&self) -> FireSpreadErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<ConfigError> for DefaultFireSpreadError {
    fn from(error: ConfigError) -> Self {
        Self::invalid_parameter(error.to_string())
    }
}

/// FFI error codes returned by fire spread functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireSpreadErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Lock poisoned: internal synchronization primitive was poisoned by a panic.
    LockPoisoned = 2,

    /// Invalid parameter passed to function (non-finite coordinate or timestamp).
    InvalidParameter = 3,

    /// A C string argument was not valid UTF-8.
    InvalidUtf8 = 4,
}

impl From<DefaultFireSpreadError> for FireSpreadErrorCode {
    fn from(error: DefaultFireSpreadError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored so the pointer handed out stays valid until the next call.
    static LAST_ERROR: RefCell<(Option<CString>, FireSpreadErrorCode)> = const { RefCell::new((None, FireSpreadErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, FireSpreadErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, FireSpreadErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if no error has occurred or the last call succeeded.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so each
/// thread has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error. **DO NOT FREE THIS POINTER**.
///
/// Example:
/// ```cpp
/// FireSpreadInstance* fire = nullptr;
/// FireSpreadErrorCode err = fire_spread_new(34.05, -118.24, json, nullptr, &fire);
/// if (err != FireSpreadErrorCode::Ok) {
///     const char* error = fire_spread_get_last_error();
///     if (error) {
///         printf("Fire spread creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn fire_spread_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `FireSpreadErrorCode::Ok` (0) if the last call on this thread
/// succeeded, otherwise the code of the last failed operation.
#[no_mangle]
pub extern "C" fn fire_spread_get_last_error_code() -> FireSpreadErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
