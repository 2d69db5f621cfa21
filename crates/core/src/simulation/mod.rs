//! Scenario evaluation and the mapping-based entry points
//!
//! [`DispersionScenario`] is the typed API. [`calculate_concentration`] and
//! [`calculate_grid`] accept the loose parameter mapping used by external
//! callers and convert it at the door.

mod scenario;

pub use scenario::DispersionScenario;

use crate::grid::{GridResult, SamplingPattern};
use crate::params::{parse_model, DispersionParams, ParameterError, Parameters};
use crate::physics::gaussian::ConcentrationResult;

/// Concentration at the receptor described by `params`.
///
/// # Example
/// ```
/// use plume_sim_core::params::{ParamValue, Parameters};
/// use plume_sim_core::simulation::calculate_concentration;
///
/// let mut params = Parameters::default();
/// params.insert("stability_class".into(), ParamValue::from("D"));
/// params.insert("x".into(), ParamValue::from(500.0));
///
/// let result = calculate_concentration("plume", &params)?;
/// assert!(*result.concentration > 0.0);
/// # Ok::<(), plume_sim_core::params::ParameterError>(())
/// ```
///
/// # Errors
/// [`ParameterError::UnknownModel`] for an unrecognized model code and
/// [`ParameterError::InvalidParameter`] for a malformed numeric value.
pub fn calculate_concentration(
    model: &str,
    params: &Parameters,
) -> Result<ConcentrationResult, ParameterError> {
    let kind = parse_model(model)?;
    let typed = DispersionParams::from_map(params, kind)?;
    Ok(typed.scenario(kind).concentration_at(&typed.query_point()))
}

/// Concentrations over the default sampling pattern.
///
/// Receptor height comes from `z`; `x` and `y` are ignored.
///
/// # Errors
/// Same as [`calculate_concentration`].
pub fn calculate_grid(model: &str, params: &Parameters) -> Result<GridResult, ParameterError> {
    calculate_grid_with_pattern(model, params, &SamplingPattern::default())
}

/// Concentrations over a caller-supplied sampling pattern.
///
/// # Errors
/// Same as [`calculate_concentration`].
pub fn calculate_grid_with_pattern(
    model: &str,
    params: &Parameters,
    pattern: &SamplingPattern,
) -> Result<GridResult, ParameterError> {
    let kind = parse_model(model)?;
    let typed = DispersionParams::from_map(params, kind)?;
    Ok(typed.scenario(kind).grid(pattern, typed.z))
}
