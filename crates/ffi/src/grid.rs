use plume_sim_core::{GridResult, SamplingPattern};
use std::ptr;

use crate::error::{DefaultPlumeSimError, PlumeSimErrorCode};
use crate::helpers::{slice_to_vec, track_error, track_result};
use crate::params::{finite, PlumeSimModel, PlumeSimParams, PlumeSimStability};

/// One grid cell. Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeSimSample {
    /// Downwind distance (m)
    pub x: f64,
    /// Crosswind offset (m)
    pub y: f64,
    /// µg/m³
    pub concentration: f64,
}

/// Evaluated receptor grid, owned by the library.
///
/// Created by `plume_sim_grid_new` / `plume_sim_grid_new_with_pattern` and
/// released with `plume_sim_grid_destroy`. Samples are distance-major.
pub struct PlumeSimGrid {
    samples: Vec<PlumeSimSample>,
    max_concentration: f64,
    model: PlumeSimModel,
    stability: PlumeSimStability,
}

impl From<GridResult> for PlumeSimGrid {
    fn from(grid: GridResult) -> Self {
        Self {
            samples: grid
                .samples
                .iter()
                .map(|s| PlumeSimSample {
                    x: *s.x,
                    y: *s.y,
                    concentration: *s.concentration,
                })
                .collect(),
            max_concentration: *grid.max_concentration,
            model: grid.model_type.into(),
            stability: PlumeSimStability::reported(&grid.stability_class),
        }
    }
}

/// Copy a caller array of meters, rejecting non-finite entries.
///
/// # Safety
/// Same contract as `slice_to_vec`.
unsafe fn finite_meters(
    ptr: *const f64,
    len: usize,
    param_name: &str,
) -> Result<Vec<f64>, DefaultPlumeSimError> {
    let values = unsafe { slice_to_vec(ptr, len, param_name) }?;
    for &value in &values {
        finite(param_name, value)?;
    }
    Ok(values)
}

fn build_grid(
    params: PlumeSimParams,
    model: PlumeSimModel,
    pattern: &SamplingPattern,
) -> Result<Box<PlumeSimGrid>, DefaultPlumeSimError> {
    let typed = params.to_dispersion_params()?;
    let grid = typed.scenario(model.into()).grid(pattern, typed.z);
    Ok(Box::new(PlumeSimGrid::from(grid)))
}

/// Write a built grid (or null on failure) to `out_grid`.
///
/// # Safety
/// `out_grid` must be non-null and writable.
unsafe fn publish(
    result: Result<Box<PlumeSimGrid>, DefaultPlumeSimError>,
    out_grid: *mut *mut PlumeSimGrid,
) -> PlumeSimErrorCode {
    match track_result(result) {
        Ok(grid) => {
            unsafe {
                *out_grid = Box::into_raw(grid);
            }
            PlumeSimErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_grid = ptr::null_mut();
            }
            code
        }
    }
}

/// Evaluate the default grid (50-1000 m downwind × ±50 m crosswind) at
/// receptor height `params.z`. `params.x` and `params.y` are ignored.
///
/// Returns
/// - `Ok` with a new grid in `out_grid`; free it with `plume_sim_grid_destroy`
/// - `NullPointer` if `params` or `out_grid` is null
/// - `InvalidParameter` if a field is not finite
///
/// On error `*out_grid` is set to null.
///
/// # Safety
///
/// - `params` must be null or point to a valid `PlumeSimParams`.
/// - `out_grid` must be null or point to writable memory for one pointer.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_new(
    params: *const PlumeSimParams,
    model: PlumeSimModel,
    out_grid: *mut *mut PlumeSimGrid,
) -> PlumeSimErrorCode {
    if out_grid.is_null() {
        return track_error(&DefaultPlumeSimError::null_pointer("out_grid"));
    }
    if params.is_null() {
        unsafe {
            *out_grid = ptr::null_mut();
        }
        return track_error(&DefaultPlumeSimError::null_pointer("params"));
    }

    // SAFETY: non-null, caller guarantees a valid struct
    let params = unsafe { *params };
    let result = build_grid(params, model, &SamplingPattern::default());
    unsafe { publish(result, out_grid) }
}

/// Evaluate a caller-defined grid: `distances` × `offsets`, distance-major.
///
/// Either array may be empty (length 0, pointer ignored), giving an empty
/// grid with a maximum of 0. A NaN or infinite entry is `InvalidParameter`.
///
/// # Safety
///
/// - `params` must be null or point to a valid `PlumeSimParams`.
/// - `distances` must point to `distances_len` doubles when `distances_len > 0`;
///   likewise `offsets`.
/// - `out_grid` must be null or point to writable memory for one pointer.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_new_with_pattern(
    params: *const PlumeSimParams,
    model: PlumeSimModel,
    distances: *const f64,
    distances_len: usize,
    offsets: *const f64,
    offsets_len: usize,
    out_grid: *mut *mut PlumeSimGrid,
) -> PlumeSimErrorCode {
    if out_grid.is_null() {
        return track_error(&DefaultPlumeSimError::null_pointer("out_grid"));
    }
    if params.is_null() {
        unsafe {
            *out_grid = ptr::null_mut();
        }
        return track_error(&DefaultPlumeSimError::null_pointer("params"));
    }

    // SAFETY: non-null, caller guarantees a valid struct and array lengths
    let params = unsafe { *params };
    let result = unsafe { finite_meters(distances, distances_len, "distances") }.and_then(|d| {
        let o = unsafe { finite_meters(offsets, offsets_len, "offsets") }?;
        build_grid(params, model, &SamplingPattern::from_meters(&d, &o))
    });
    unsafe { publish(result, out_grid) }
}

/// Borrow the samples of a grid.
///
/// Writes the sample count to `out_len` and returns a pointer to the first
/// sample (null when the grid is null or empty). The array lives as long as
/// the grid. **DO NOT FREE THIS POINTER**.
///
/// # Safety
///
/// - `grid` must be null or a live pointer from `plume_sim_grid_new*`.
/// - `out_len` must be null or point to writable memory for one `usize`.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_samples(
    grid: *const PlumeSimGrid,
    out_len: *mut usize,
) -> *const PlumeSimSample {
    if out_len.is_null() {
        track_error(&DefaultPlumeSimError::null_pointer("out_len"));
        return ptr::null();
    }
    if grid.is_null() {
        unsafe {
            *out_len = 0;
        }
        track_error(&DefaultPlumeSimError::null_pointer("grid"));
        return ptr::null();
    }

    // SAFETY: non-null and live per the caller contract
    let grid = unsafe { &*grid };
    unsafe {
        *out_len = grid.samples.len();
    }
    if grid.samples.is_empty() {
        ptr::null()
    } else {
        grid.samples.as_ptr()
    }
}

/// Peak concentration of a grid (µg/m³); 0 for an empty or null grid.
///
/// # Safety
///
/// `grid` must be null or a live pointer from `plume_sim_grid_new*`.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_max(grid: *const PlumeSimGrid) -> f64 {
    if grid.is_null() {
        track_error(&DefaultPlumeSimError::null_pointer("grid"));
        return 0.0;
    }
    // SAFETY: non-null and live per the caller contract
    unsafe { (*grid).max_concentration }
}

/// Kinetics the grid was evaluated with. `Plume` for a null grid.
///
/// # Safety
///
/// `grid` must be null or a live pointer from `plume_sim_grid_new*`.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_model(grid: *const PlumeSimGrid) -> PlumeSimModel {
    if grid.is_null() {
        track_error(&DefaultPlumeSimError::null_pointer("grid"));
        return PlumeSimModel::Plume;
    }
    // SAFETY: non-null and live per the caller contract
    unsafe { (*grid).model }
}

/// Stability class the grid was evaluated with, resolved from the wind when
/// the request said `Auto`. `Auto` for a null grid.
///
/// # Safety
///
/// `grid` must be null or a live pointer from `plume_sim_grid_new*`.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_stability(grid: *const PlumeSimGrid) -> PlumeSimStability {
    if grid.is_null() {
        track_error(&DefaultPlumeSimError::null_pointer("grid"));
        return PlumeSimStability::Auto;
    }
    // SAFETY: non-null and live per the caller contract
    unsafe { (*grid).stability }
}

/// Destroy a grid created by `plume_sim_grid_new*`. Null is a no-op.
///
/// # Safety
///
/// `grid` must be null or a pointer from `plume_sim_grid_new*` that has not
/// already been destroyed. It must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn plume_sim_grid_destroy(grid: *mut PlumeSimGrid) {
    if grid.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `publish` and not yet freed
    unsafe {
        drop(Box::from_raw(grid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{plume_sim_default_params, PlumeSimStability};

    #[test]
    fn default_grid_lifecycle() {
        let mut p = plume_sim_default_params(PlumeSimModel::Plume);
        p.release_height = 5.0;
        p.stability = PlumeSimStability::C;

        let mut grid: *mut PlumeSimGrid = ptr::null_mut();
        let code = unsafe { plume_sim_grid_new(&p, PlumeSimModel::Plume, &mut grid) };
        assert_eq!(code, PlumeSimErrorCode::Ok);
        assert!(!grid.is_null());

        let mut len = 0_usize;
        let samples = unsafe { plume_sim_grid_samples(grid, &mut len) };
        assert_eq!(len, 30);
        let samples = unsafe { std::slice::from_raw_parts(samples, len) };
        assert_eq!((samples[0].x, samples[0].y), (50.0, -50.0));

        let max = unsafe { plume_sim_grid_max(grid) };
        let expected = samples
            .iter()
            .map(|s| s.concentration)
            .fold(0.0_f64, f64::max);
        assert_eq!(max, expected);
        assert!(max > 0.0);

        unsafe { plume_sim_grid_destroy(grid) };
    }

    #[test]
    fn custom_and_empty_patterns() {
        let p = plume_sim_default_params(PlumeSimModel::Instantaneous);
        let distances = [100.0, 400.0];
        let offsets = [0.0];

        let mut grid: *mut PlumeSimGrid = ptr::null_mut();
        let code = unsafe {
            plume_sim_grid_new_with_pattern(
                &p,
                PlumeSimModel::Instantaneous,
                distances.as_ptr(),
                distances.len(),
                offsets.as_ptr(),
                offsets.len(),
                &mut grid,
            )
        };
        assert_eq!(code, PlumeSimErrorCode::Ok);
        let mut len = 0_usize;
        unsafe { plume_sim_grid_samples(grid, &mut len) };
        assert_eq!(len, 2);
        unsafe { plume_sim_grid_destroy(grid) };

        let code = unsafe {
            plume_sim_grid_new_with_pattern(
                &p,
                PlumeSimModel::Instantaneous,
                ptr::null(),
                0,
                offsets.as_ptr(),
                offsets.len(),
                &mut grid,
            )
        };
        assert_eq!(code, PlumeSimErrorCode::Ok);
        let samples = unsafe { plume_sim_grid_samples(grid, &mut len) };
        assert_eq!(len, 0);
        assert!(samples.is_null());
        assert_eq!(unsafe { plume_sim_grid_max(grid) }, 0.0);
        unsafe { plume_sim_grid_destroy(grid) };
    }

    #[test]
    fn missing_array_is_rejected() {
        let p = plume_sim_default_params(PlumeSimModel::Plume);
        let mut grid: *mut PlumeSimGrid = ptr::null_mut();
        let code = unsafe {
            plume_sim_grid_new_with_pattern(
                &p,
                PlumeSimModel::Plume,
                ptr::null(),
                3,
                ptr::null(),
                0,
                &mut grid,
            )
        };
        assert_eq!(code, PlumeSimErrorCode::NullPointer);
        assert!(grid.is_null());
    }

    #[test]
    fn grid_reports_classified_stability() {
        let mut p = plume_sim_default_params(PlumeSimModel::Puff);
        // 14 mph -> E
        p.wind_speed_mph = 14.0;

        let mut grid: *mut PlumeSimGrid = ptr::null_mut();
        let code = unsafe { plume_sim_grid_new(&p, PlumeSimModel::Puff, &mut grid) };
        assert_eq!(code, PlumeSimErrorCode::Ok);
        assert_eq!(unsafe { plume_sim_grid_model(grid) }, PlumeSimModel::Puff);
        assert_eq!(unsafe { plume_sim_grid_stability(grid) }, PlumeSimStability::E);
        unsafe { plume_sim_grid_destroy(grid) };

        assert_eq!(unsafe { plume_sim_grid_stability(ptr::null()) }, PlumeSimStability::Auto);
    }

    #[test]
    fn non_finite_pattern_entry_is_rejected() {
        let p = plume_sim_default_params(PlumeSimModel::Plume);
        let distances = [100.0, f64::NAN];
        let offsets = [0.0];
        let mut grid: *mut PlumeSimGrid = ptr::null_mut();
        let code = unsafe {
            plume_sim_grid_new_with_pattern(
                &p,
                PlumeSimModel::Plume,
                distances.as_ptr(),
                distances.len(),
                offsets.as_ptr(),
                offsets.len(),
                &mut grid,
            )
        };
        assert_eq!(code, PlumeSimErrorCode::InvalidParameter);
        assert!(grid.is_null());
        let msg = unsafe { std::ffi::CStr::from_ptr(crate::error::plume_sim_get_last_error()) };
        assert!(msg.to_str().unwrap().contains("distances"));
    }

    #[test]
    fn destroy_null_is_noop() {
        unsafe { plume_sim_grid_destroy(ptr::null_mut()) };
    }
}
