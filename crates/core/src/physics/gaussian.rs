//! Gaussian concentration models for the three release kinetics.
//!
//! All three share one cross-section: a crosswind Gaussian times a vertical
//! Gaussian plus its mirror image about the ground (image-source reflection,
//! no deposition):
//!
//! ```text
//! G(y, z) = exp(-y²/2σy²) · [exp(-(z-H)²/2σz²) + exp(-(z+H)²/2σz²)]
//! ```
//!
//! and differ only in normalization and time handling:
//!
//! | Kinetics      | Concentration                                        | Zero when      |
//! |---------------|------------------------------------------------------|----------------|
//! | Plume         | Q / (2π·u·σy·σz) · G                                 | u ≤ 0 or x ≤ 0 |
//! | Puff          | Q / ((2π)^1.5·σy'·σz') · exp(-(x-u·t)²/2σy'²) · G    | u ≤ 0 or t ≤ 0 |
//! | Instantaneous | Q / ((2π)^1.5·σy'·σz') · G, with t = x/u             | u ≤ 0 or x ≤ 0 |
//!
//! where σ' are the coefficients grown by elapsed time. Results are converted
//! from g/m³ to µg/m³ and clamped at zero.
//!
//! # References
//!
//! - Turner, D.B. (1970). "Workbook of Atmospheric Dispersion Estimates." EPA AP-26.
//! - Seinfeld, J.H. & Pandis, S.N. (2016). "Atmospheric Chemistry and Physics", 3rd ed., ch. 18.

use crate::atmosphere::Stability;
use crate::core_types::release::{QueryPoint, ReleaseKind};
use crate::core_types::units::{GramsPerMole, Meters, MetersPerSecond, MicrogramsPerCubicMeter, Seconds};
use crate::physics::dispersion::{dispersion_coefficients, DispersionCoefficients, SigmaOverride};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Release with every upstream decision already made: stability chosen and
/// effective height computed. The kernels only read from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRelease {
    /// g/s for a plume, g for puff/instantaneous
    pub source_strength: f64,
    pub effective_height: Meters,
    pub wind_speed: MetersPerSecond,
    /// Puff only
    pub elapsed_time: Seconds,
    pub stability: Stability,
    pub molecular_weight: GramsPerMole,
    /// Caller widths taking precedence over the stability curves
    #[serde(default)]
    pub sigma_override: SigmaOverride,
}

impl ResolvedRelease {
    /// Widths at `distance` before any time growth
    fn coefficients_at(&self, distance: Meters) -> DispersionCoefficients {
        let computed = dispersion_coefficients(&self.stability, distance, self.molecular_weight);
        self.sigma_override.apply(computed)
    }
}

/// Concentration at one receptor, tagged with how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationResult {
    pub concentration: MicrogramsPerCubicMeter,
    pub units: String,
    pub model_type: ReleaseKind,
    pub stability_class: Stability,
}

impl ConcentrationResult {
    #[must_use]
    pub fn new(
        concentration: MicrogramsPerCubicMeter,
        model_type: ReleaseKind,
        stability_class: Stability,
    ) -> Self {
        Self {
            concentration,
            units: MicrogramsPerCubicMeter::UNITS.to_string(),
            model_type,
            stability_class,
        }
    }
}

#[inline]
fn gaussian(offset: f64, sigma: f64) -> f64 {
    (-(offset * offset) / (2.0 * sigma * sigma)).exp()
}

/// Crosswind Gaussian times ground-reflected vertical Gaussian.
#[must_use]
pub fn gaussian_cross_section(
    y: Meters,
    z: Meters,
    effective_height: Meters,
    coefficients: DispersionCoefficients,
) -> f64 {
    let sigma_y = *coefficients.sigma_y;
    let sigma_z = *coefficients.sigma_z;
    let crosswind = gaussian(*y, sigma_y);
    let direct = gaussian(*z - *effective_height, sigma_z);
    let reflected = gaussian(*z + *effective_height, sigma_z);
    crosswind * (direct + reflected)
}

/// Normalization for a cloud of finite mass: (2π)^1.5·σy·σz
#[inline]
fn puff_normalization(coefficients: DispersionCoefficients) -> f64 {
    (2.0 * PI).powf(1.5) * *coefficients.sigma_y * *coefficients.sigma_z
}

fn plume(release: &ResolvedRelease, point: &QueryPoint) -> f64 {
    let u = *release.wind_speed;
    let moving = u > 0.0;
    let downwind = *point.x > 0.0;
    if !moving || !downwind {
        debug!("Plume: u={:.2} m/s, x={:.1} m, zero concentration", u, *point.x);
        return 0.0;
    }

    let coefficients = release.coefficients_at(point.x);
    let normalization = 2.0 * PI * u * *coefficients.sigma_y * *coefficients.sigma_z;

    release.source_strength / normalization
        * gaussian_cross_section(point.y, point.z, release.effective_height, coefficients)
}

fn puff(release: &ResolvedRelease, point: &QueryPoint) -> f64 {
    let u = *release.wind_speed;
    let t = release.elapsed_time;
    let moving = u > 0.0;
    let released = *t > 0.0;
    if !moving || !released {
        debug!("Puff: u={:.2} m/s, t={:.1} s, zero concentration", u, *t);
        return 0.0;
    }

    let coefficients = release.coefficients_at(point.x).grown_by(t);

    // Along-wind offset from the advected puff center
    let center = release.wind_speed * t;
    let along_wind = gaussian(*point.x - *center, *coefficients.sigma_y);

    release.source_strength / puff_normalization(coefficients)
        * along_wind
        * gaussian_cross_section(point.y, point.z, release.effective_height, coefficients)
}

fn instantaneous(release: &ResolvedRelease, point: &QueryPoint) -> f64 {
    let u = *release.wind_speed;
    let moving = u > 0.0;
    let downwind = *point.x > 0.0;
    if !moving || !downwind {
        debug!(
            "Instantaneous: u={:.2} m/s, x={:.1} m, zero concentration",
            u, *point.x
        );
        return 0.0;
    }

    // Evaluated when the cloud center arrives at the receptor distance
    let travel_time = point.x / release.wind_speed;
    let coefficients = release.coefficients_at(point.x).grown_by(travel_time);

    release.source_strength / puff_normalization(coefficients)
        * gaussian_cross_section(point.y, point.z, release.effective_height, coefficients)
}

/// Concentration at `point` for the given kinetics.
///
/// Never fails and never negative: degenerate inputs give zero.
#[must_use]
pub fn concentration(
    kind: ReleaseKind,
    release: &ResolvedRelease,
    point: &QueryPoint,
) -> MicrogramsPerCubicMeter {
    let grams_per_m3 = match kind {
        ReleaseKind::Plume => plume(release, point),
        ReleaseKind::Puff => puff(release, point),
        ReleaseKind::Instantaneous => instantaneous(release, point),
    };
    MicrogramsPerCubicMeter::from_grams_per_cubic_meter(grams_per_m3)
}
