use plume_sim_core::ParameterError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// - `code()` - the code returned to the caller
/// - `msg()` - diagnostic text stored for `plume_sim_get_last_error`
pub(crate) trait PlumeSimError {
    fn code(&self) -> PlumeSimErrorCode;

    fn msg(&self) -> &str;
}

/// Error code plus message for the failure cases of this library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultPlumeSimError {
    code: PlumeSimErrorCode,
    msg: String,
}

impl DefaultPlumeSimError {
    /// Null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"params"`, `"out_value"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PlumeSimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Out-of-domain or malformed parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: PlumeSimErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// C string argument that is not UTF-8.
    pub fn invalid_utf8(param_name: &str) -> Self {
        Self {
            code: PlumeSimErrorCode::InvalidUtf8,
            msg: format!("Parameter '{param_name}' is not valid UTF-8"),
        }
    }
}

impl PlumeSimError for DefaultPlumeSimError {
    fn code(&self) -> PlumeSimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<ParameterError> for DefaultPlumeSimError {
    fn from(error: ParameterError) -> Self {
        Self::invalid_parameter(error.to_string())
    }
}

/// FFI error codes returned by dispersion functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumeSimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Null pointer passed where non-null required.
    NullPointer = 1,

    /// A parameter was not a finite number or named an unknown model.
    InvalidParameter = 2,

    /// A C string argument was not valid UTF-8.
    InvalidUtf8 = 3,
}

impl From<DefaultPlumeSimError> for PlumeSimErrorCode {
    fn from(error: DefaultPlumeSimError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is owned here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, PlumeSimErrorCode)> = const { RefCell::new((None, PlumeSimErrorCode::Ok)) };
}

pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, PlumeSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, PlumeSimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns a borrowed pointer to the message, or `null` if the last call on
/// this thread succeeded.
///
/// The pointer is valid until the next FFI call on this thread.
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// char *result = NULL;
/// PlumeSimErrorCode err = plume_sim_concentration_json("plume", "{\"x\": \"far\"}", &result);
/// if (err != Ok) {
///     fprintf(stderr, "calculation failed: %s\n", plume_sim_get_last_error());
/// }
/// ```
#[no_mangle]
pub extern "C" fn plume_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn plume_sim_get_last_error_code() -> PlumeSimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
