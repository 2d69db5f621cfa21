//! C ABI for the Plume Sim dispersion engine
//!
//! Two styles of entry point:
//! - a flat `#[repr(C)]` parameter block (`PlumeSimParams`), starting from
//!   `plume_sim_default_params`
//! - a JSON object of the same keys the Rust API accepts, answered with the
//!   JSON result object (free it with `plume_sim_string_free`)
//!
//! Every function returns a `PlumeSimErrorCode` (or null / 0 for accessors)
//! and records a per-thread message readable via `plume_sim_get_last_error`.
//! Every result reports the model and the stability class actually applied.
//! Grids are owned handles freed with `plume_sim_grid_destroy`.
//!
//! The C header `PlumeSimFFI.h` is generated by `build.rs` with cbindgen.

mod concentration;
mod error;
mod grid;
mod helpers;
mod params;

pub use concentration::{
    plume_sim_concentration, plume_sim_concentration_json, plume_sim_string_free, PlumeSimResult,
};
pub use error::{plume_sim_get_last_error, plume_sim_get_last_error_code, PlumeSimErrorCode};
pub use grid::{
    plume_sim_grid_destroy, plume_sim_grid_max, plume_sim_grid_model, plume_sim_grid_new,
    plume_sim_grid_new_with_pattern, plume_sim_grid_samples, plume_sim_grid_stability,
    PlumeSimGrid, PlumeSimSample,
};
pub use params::{plume_sim_default_params, PlumeSimModel, PlumeSimParams, PlumeSimStability};
