use plume_sim_core::{calculate_concentration, ConcentrationResult, Parameters};
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

use crate::error::{DefaultPlumeSimError, PlumeSimErrorCode};
use crate::helpers::{str_from_ptr, track_error, track_result};
use crate::params::{PlumeSimModel, PlumeSimParams, PlumeSimStability};

/// Concentration at one receptor and how it was produced.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeSimResult {
    /// µg/m³
    pub concentration: f64,
    /// Kinetics that produced the value
    pub model: PlumeSimModel,
    /// Class actually applied; never `Auto` for a struct request
    pub stability: PlumeSimStability,
}

impl From<&ConcentrationResult> for PlumeSimResult {
    fn from(result: &ConcentrationResult) -> Self {
        Self {
            concentration: *result.concentration,
            model: result.model_type.into(),
            stability: PlumeSimStability::reported(&result.stability_class),
        }
    }
}

/// Concentration (µg/m³) at the receptor described by `params`.
///
/// With `params.stability == Auto` the class is derived from the wind speed;
/// `out_result.stability` reports the one used.
///
/// Returns
/// - `Ok` with the result in `out_result`
/// - `NullPointer` if `params` or `out_result` is null
/// - `InvalidParameter` if a field is not finite
///
/// # Safety
///
/// - `params` must be null or point to a valid `PlumeSimParams`.
/// - `out_result` must be null or point to writable memory for one `PlumeSimResult`.
///
/// # Example Usage (C)
/// ```c
/// PlumeSimParams p = plume_sim_default_params(Plume);
/// p.x = 500.0;
/// PlumeSimResult r;
/// if (plume_sim_concentration(&p, Plume, &r) != Ok) {
///     fprintf(stderr, "%s\n", plume_sim_get_last_error());
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn plume_sim_concentration(
    params: *const PlumeSimParams,
    model: PlumeSimModel,
    out_result: *mut PlumeSimResult,
) -> PlumeSimErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultPlumeSimError::null_pointer("out_result"));
    }
    if params.is_null() {
        return track_error(&DefaultPlumeSimError::null_pointer("params"));
    }

    // SAFETY: non-null, caller guarantees a valid struct
    let params = unsafe { *params };
    let result = params.to_dispersion_params().map(|typed| {
        let result = typed
            .scenario(model.into())
            .concentration_at(&typed.query_point());
        PlumeSimResult::from(&result)
    });

    match track_result(result) {
        Ok(value) => {
            unsafe {
                *out_result = value;
            }
            PlumeSimErrorCode::Ok
        }
        Err(code) => code,
    }
}

/// # Safety
/// Both pointers must be null or null-terminated strings.
unsafe fn result_json(
    model: *const c_char,
    params_json: *const c_char,
) -> Result<CString, DefaultPlumeSimError> {
    let model = unsafe { str_from_ptr(model, "model") }?;
    let json = unsafe { str_from_ptr(params_json, "params_json") }?;
    let params: Parameters = serde_json::from_str(json).map_err(|e| {
        DefaultPlumeSimError::invalid_parameter(format!("malformed parameter JSON: {e}"))
    })?;
    let result = calculate_concentration(model, &params)?;
    let text = serde_json::to_string(&result).map_err(|e| {
        DefaultPlumeSimError::invalid_parameter(format!("result not serializable: {e}"))
    })?;
    CString::new(text)
        .map_err(|e| DefaultPlumeSimError::invalid_parameter(format!("result contains NUL: {e}")))
}

/// Concentration from a model code and a JSON parameter object, returned as
/// the JSON result object.
///
/// `model` is `"plume"`, `"puff"` or `"instantaneous"` (case-insensitive).
/// `params_json` is an object of the keys accepted by the core engine, e.g.
/// `{"x": 500, "Q": "25", "stability_class": "D"}`. Unknown keys are ignored.
///
/// On success `*out_json` receives a new string such as
/// `{"concentration":12.3,"units":"µg/m³","model_type":"plume","stability_class":"D"}`,
/// which must be released with `plume_sim_string_free`.
///
/// Returns
/// - `Ok` with the result string in `out_json`
/// - `NullPointer` if any argument is null
/// - `InvalidUtf8` if a string argument is not UTF-8
/// - `InvalidParameter` for malformed JSON, an unknown model or a malformed value
///
/// On error `*out_json` is set to null.
///
/// # Safety
///
/// - `model` and `params_json` must be null or null-terminated strings.
/// - `out_json` must be null or point to writable memory for one pointer.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_concentration_json(
    model: *const c_char,
    params_json: *const c_char,
    out_json: *mut *mut c_char,
) -> PlumeSimErrorCode {
    if out_json.is_null() {
        return track_error(&DefaultPlumeSimError::null_pointer("out_json"));
    }

    // SAFETY: pointers forwarded under this function's contract
    let result = unsafe { result_json(model, params_json) };

    match track_result(result) {
        Ok(text) => {
            unsafe {
                *out_json = text.into_raw();
            }
            PlumeSimErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_json = ptr::null_mut();
            }
            code
        }
    }
}

/// Free a string returned by `plume_sim_concentration_json`. Null is a no-op.
///
/// # Safety
///
/// `text` must be null or a pointer from `plume_sim_concentration_json` that
/// has not already been freed.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_string_free(text: *mut c_char) {
    if text.is_null() {
        return;
    }

    // SAFETY: created by `CString::into_raw` and not yet freed
    unsafe {
        drop(CString::from_raw(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{plume_sim_get_last_error, plume_sim_get_last_error_code};
    use crate::params::plume_sim_default_params;
    use std::ffi::CStr;

    fn empty_result() -> PlumeSimResult {
        PlumeSimResult {
            concentration: -1.0,
            model: PlumeSimModel::Plume,
            stability: PlumeSimStability::Auto,
        }
    }

    /// Run the JSON entry point and take ownership of the returned string
    fn json_call(model: &str, params: &str) -> (PlumeSimErrorCode, Option<serde_json::Value>) {
        let model = CString::new(model).unwrap();
        let params = CString::new(params).unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { plume_sim_concentration_json(model.as_ptr(), params.as_ptr(), &mut out) };
        if out.is_null() {
            return (code, None);
        }
        let text = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_string();
        unsafe { plume_sim_string_free(out) };
        (code, Some(serde_json::from_str(&text).unwrap()))
    }

    #[test]
    fn struct_entry_point_matches_core() {
        let mut p = plume_sim_default_params(PlumeSimModel::Plume);
        p.x = 500.0;
        p.release_height = 10.0;
        p.stability = PlumeSimStability::D;

        let mut r = empty_result();
        let code = unsafe { plume_sim_concentration(&p, PlumeSimModel::Plume, &mut r) };
        assert_eq!(code, PlumeSimErrorCode::Ok);
        assert!(r.concentration > 0.0);
        assert_eq!(r.stability, PlumeSimStability::D);
        assert_eq!(plume_sim_get_last_error_code(), PlumeSimErrorCode::Ok);
        assert!(plume_sim_get_last_error().is_null());
    }

    #[test]
    fn auto_stability_reports_classified_class() {
        let mut p = plume_sim_default_params(PlumeSimModel::Puff);
        // 12 mph -> D
        p.wind_speed_mph = 12.0;
        assert_eq!(p.stability, PlumeSimStability::Auto);

        let mut r = empty_result();
        let code = unsafe { plume_sim_concentration(&p, PlumeSimModel::Puff, &mut r) };
        assert_eq!(code, PlumeSimErrorCode::Ok);
        assert_eq!(r.model, PlumeSimModel::Puff);
        assert_eq!(r.stability, PlumeSimStability::D);
    }

    #[test]
    fn null_output_is_reported() {
        let p = plume_sim_default_params(PlumeSimModel::Plume);
        let code = unsafe { plume_sim_concentration(&p, PlumeSimModel::Plume, ptr::null_mut()) };
        assert_eq!(code, PlumeSimErrorCode::NullPointer);
        let msg = unsafe { CStr::from_ptr(plume_sim_get_last_error()) };
        assert!(msg.to_str().unwrap().contains("out_result"));
    }

    #[test]
    fn json_entry_point_returns_result_object() {
        let (code, value) = json_call("puff", r#"{"x": 130, "z": 50, "t": 60, "stability": "4"}"#);
        assert_eq!(code, PlumeSimErrorCode::Ok);
        let value = value.unwrap();
        assert!(value["concentration"].as_f64().unwrap() > 0.0);
        assert_eq!(value["units"], "µg/m³");
        assert_eq!(value["model_type"], "puff");
        assert_eq!(value["stability_class"], "D");

        // classified from 3 mph
        let (_, value) = json_call("plume", r#"{"wind_speed": 3}"#);
        assert_eq!(value.unwrap()["stability_class"], "A");

        let (_, value) = json_call("plume", r#"{"stability_class": "q"}"#);
        assert_eq!(value.unwrap()["stability_class"], "Q");
    }

    #[test]
    fn json_errors_carry_messages() {
        let (code, value) = json_call("jet", "{}");
        assert_eq!(code, PlumeSimErrorCode::InvalidParameter);
        assert!(value.is_none());
        let msg = unsafe { CStr::from_ptr(plume_sim_get_last_error()) };
        assert!(msg.to_str().unwrap().contains("jet"));

        let (code, _) = json_call("plume", r#"{"x": "far"}"#);
        assert_eq!(code, PlumeSimErrorCode::InvalidParameter);

        let (code, _) = json_call("plume", "not json");
        assert_eq!(code, PlumeSimErrorCode::InvalidParameter);

        let json = CString::new("{}").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { plume_sim_concentration_json(ptr::null(), json.as_ptr(), &mut out) };
        assert_eq!(code, PlumeSimErrorCode::NullPointer);
        assert!(out.is_null());
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let bad = CString::new(vec![0xff, 0xfe]).unwrap();
        let json = CString::new("{}").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { plume_sim_concentration_json(bad.as_ptr(), json.as_ptr(), &mut out) };
        assert_eq!(code, PlumeSimErrorCode::InvalidUtf8);
    }

    #[test]
    fn free_null_string_is_noop() {
        unsafe { plume_sim_string_free(ptr::null_mut()) };
    }
}
