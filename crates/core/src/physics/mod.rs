//! Dispersion physics: spread coefficients, plume rise and the Gaussian kernels

pub mod dispersion;
pub mod gaussian;
pub mod plume_rise;

pub use dispersion::{
    dispersion_coefficients, molecular_weight_factor, DispersionCoefficients, SigmaOverride,
    MIN_SIGMA_Y, MIN_SIGMA_Z,
};
pub use gaussian::{concentration, gaussian_cross_section, ConcentrationResult, ResolvedRelease};
pub use plume_rise::{effective_release_height, plume_rise};
