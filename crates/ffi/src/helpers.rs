use crate::error::{with_last_error_mut, DefaultPlumeSimError, PlumeSimError, PlumeSimErrorCode};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl PlumeSimError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error and return its code.
#[inline]
pub(crate) fn track_error(error: &impl PlumeSimError) -> PlumeSimErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error; called on every successful entry point.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = PlumeSimErrorCode::Ok;
    });
}

/// Record the error of a failed result, or clear the error state on success.
pub(crate) fn track_result<T>(result: Result<T, DefaultPlumeSimError>) -> Result<T, PlumeSimErrorCode> {
    match result {
        Ok(value) => {
            clear_last_error();
            Ok(value)
        }
        Err(error) => Err(track_error(&error)),
    }
}

/// Borrow a C string argument as UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string that outlives `'a`.
pub(crate) unsafe fn str_from_ptr<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultPlumeSimError> {
    if ptr.is_null() {
        return Err(DefaultPlumeSimError::null_pointer(param_name));
    }
    // SAFETY: non-null and null-terminated per the caller contract
    let cstr = unsafe { CStr::from_ptr(ptr) };
    cstr.to_str()
        .map_err(|_| DefaultPlumeSimError::invalid_utf8(param_name))
}

/// Copy a caller array, treating a zero length as empty regardless of pointer.
///
/// # Safety
/// When `len > 0`, `ptr` must be null or point to `len` readable values.
pub(crate) unsafe fn slice_to_vec(
    ptr: *const f64,
    len: usize,
    param_name: &str,
) -> Result<Vec<f64>, DefaultPlumeSimError> {
    if len == 0 {
        return Ok(Vec::new());
    }
    if ptr.is_null() {
        return Err(DefaultPlumeSimError::null_pointer(param_name));
    }
    // SAFETY: non-null with `len` elements per the caller contract
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) }.to_vec())
}
