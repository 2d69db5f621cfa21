//! Pasquill-Gifford dispersion coefficients (σy, σz)
//!
//! The Gaussian models describe the crosswind and vertical spread of a cloud
//! by two standard deviations that grow with downwind distance. Their growth
//! rate depends on the stability class: class A spreads fastest, class F
//! slowest.
//!
//! # Parameterization
//!
//! Briggs' open-country fits to the Pasquill-Gifford curves, rewritten with
//! downwind distance in kilometers:
//!
//! ```text
//! σ = a · x_km · (1 + k · x_km)^p
//! ```
//!
//! | Class | σy (a, k, p)   | σz (a, k, p)   |
//! |-------|----------------|----------------|
//! | A     | 220, 0.1, -0.5 | 200, 0, 1      |
//! | B     | 160, 0.1, -0.5 | 120, 0, 1      |
//! | C     | 110, 0.1, -0.5 | 80, 0.2, -0.5  |
//! | D     | 80, 0.1, -0.5  | 60, 1.5, -0.5  |
//! | E     | 60, 0.1, -0.5  | 30, 0.3, -1    |
//! | F     | 40, 0.1, -0.5  | 16, 0.3, -1    |
//!
//! Both coefficients are then scaled by `sqrt(28.97 / M)` for a species of
//! molecular weight M, so gases heavier than air spread less, and floored at
//! σy = 1 m, σz = 0.5 m so the kernels never see a near-zero width close to
//! the source.
//!
//! Unlisted class codes use a linear fallback instead, `σy = 0.1·x_km` and
//! `σz = 0.06·x_km`. Those slopes are per kilometer, so below 10 km downwind
//! σy stays on its 1 m floor, and σz stays on its 0.5 m floor below about
//! 8 km. An unlisted class is therefore far narrower than class F at any
//! practical range, and its near-field concentrations are correspondingly
//! higher on the centerline and lower off it.
//!
//! A caller that already knows the widths can bypass the curves per axis
//! with a [`SigmaOverride`]. Overridden widths are used as given at every
//! distance: no molecular-weight scaling, but the floors still apply.
//!
//! # References
//!
//! - Briggs, G.A. (1973). "Diffusion estimation for small emissions."
//!   ATDL Contribution File No. 79, NOAA.
//! - Gifford, F.A. (1976). "Turbulent diffusion-typing schemes: a review."
//!   Nuclear Safety, 17(1), 68-86.

use crate::atmosphere::{Stability, StabilityClass};
use crate::core_types::chemical::ChemicalProperties;
use crate::core_types::units::{GramsPerMole, Meters, Seconds};
use serde::{Deserialize, Serialize};

/// Lower bound on σy
pub const MIN_SIGMA_Y: Meters = Meters::new(1.0);

/// Lower bound on σz
pub const MIN_SIGMA_Z: Meters = Meters::new(0.5);

/// Crosswind growth rate of a puff after release (m/s)
const PUFF_GROWTH_Y: f64 = 0.1;

/// Vertical growth rate of a puff after release (m/s)
const PUFF_GROWTH_Z: f64 = 0.05;

/// One Briggs curve `a · x · (1 + k · x)^p`, x in km
#[derive(Debug, Clone, Copy)]
struct BriggsCurve {
    a: f64,
    k: f64,
    p: f64,
}

impl BriggsCurve {
    const fn new(a: f64, k: f64, p: f64) -> Self {
        Self { a, k, p }
    }

    #[inline]
    fn eval(self, x_km: f64) -> f64 {
        self.a * x_km * (1.0 + self.k * x_km).powf(self.p)
    }
}

/// (σy, σz) curves per class, indexed A..F
const CURVES: [(BriggsCurve, BriggsCurve); 6] = [
    (BriggsCurve::new(220.0, 0.1, -0.5), BriggsCurve::new(200.0, 0.0, 1.0)),
    (BriggsCurve::new(160.0, 0.1, -0.5), BriggsCurve::new(120.0, 0.0, 1.0)),
    (BriggsCurve::new(110.0, 0.1, -0.5), BriggsCurve::new(80.0, 0.2, -0.5)),
    (BriggsCurve::new(80.0, 0.1, -0.5), BriggsCurve::new(60.0, 1.5, -0.5)),
    (BriggsCurve::new(60.0, 0.1, -0.5), BriggsCurve::new(30.0, 0.3, -1.0)),
    (BriggsCurve::new(40.0, 0.1, -0.5), BriggsCurve::new(16.0, 0.3, -1.0)),
];

/// Linear fallback for unlisted class codes: (σy, σz) slopes per km
const UNLISTED_SLOPES: (f64, f64) = (0.1, 0.06);

fn curves_for(class: StabilityClass) -> (BriggsCurve, BriggsCurve) {
    CURVES[class as usize]
}

/// Crosswind and vertical spread at one downwind distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispersionCoefficients {
    pub sigma_y: Meters,
    pub sigma_z: Meters,
}

impl DispersionCoefficients {
    /// Build from raw widths, applying the floors
    #[must_use]
    pub fn clamped(sigma_y: f64, sigma_z: f64) -> Self {
        Self {
            sigma_y: Meters::new(sigma_y.max(*MIN_SIGMA_Y)),
            sigma_z: Meters::new(sigma_z.max(*MIN_SIGMA_Z)),
        }
    }

    /// Continued turbulent growth of a released cloud after time `t`
    ///
    /// ```text
    /// σy_eff = σy + 0.1·t
    /// σz_eff = σz + 0.05·t
    /// ```
    #[must_use]
    pub fn grown_by(self, t: Seconds) -> Self {
        Self {
            sigma_y: Meters::new(*self.sigma_y + PUFF_GROWTH_Y * *t),
            sigma_z: Meters::new(*self.sigma_z + PUFF_GROWTH_Z * *t),
        }
    }
}

/// Caller-supplied widths that replace the stability curves.
///
/// Each axis is independent: an absent width keeps the parameterized value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SigmaOverride {
    pub sigma_y: Option<Meters>,
    pub sigma_z: Option<Meters>,
}

impl SigmaOverride {
    /// Use the stability curves on both axes
    pub const NONE: SigmaOverride = SigmaOverride {
        sigma_y: None,
        sigma_z: None,
    };

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.sigma_y.is_none() && self.sigma_z.is_none()
    }

    /// Replace the overridden axes of `computed`, re-applying the floors
    #[must_use]
    pub fn apply(self, computed: DispersionCoefficients) -> DispersionCoefficients {
        if self.is_none() {
            return computed;
        }
        DispersionCoefficients::clamped(
            *self.sigma_y.unwrap_or(computed.sigma_y),
            *self.sigma_z.unwrap_or(computed.sigma_z),
        )
    }
}

/// Diffusivity correction relative to air, `sqrt(28.97 / M)`.
///
/// Invalid weights use the default species weight.
#[must_use]
pub fn molecular_weight_factor(molecular_weight: GramsPerMole) -> f64 {
    let mw = ChemicalProperties::new(molecular_weight).effective_molecular_weight();
    (*GramsPerMole::AIR / *mw).sqrt()
}

/// Dispersion coefficients at `distance` downwind.
///
/// Total over its inputs: an unlisted class uses the linear fallback
/// `σy = 0.1·x_km`, `σz = 0.06·x_km`, and non-positive or NaN distances are
/// evaluated at the source (so both widths sit on their floors).
///
/// # Example
/// ```
/// use plume_sim_core::atmosphere::{Stability, StabilityClass};
/// use plume_sim_core::core_types::{GramsPerMole, Meters};
/// use plume_sim_core::physics::dispersion_coefficients;
///
/// let unstable = dispersion_coefficients(
///     &Stability::Class(StabilityClass::A), Meters::new(500.0), GramsPerMole::AIR);
/// let stable = dispersion_coefficients(
///     &Stability::Class(StabilityClass::F), Meters::new(500.0), GramsPerMole::AIR);
/// assert!(unstable.sigma_z > stable.sigma_z);
/// ```
#[must_use]
pub fn dispersion_coefficients(
    stability: &Stability,
    distance: Meters,
    molecular_weight: GramsPerMole,
) -> DispersionCoefficients {
    let x_km = *Meters::new((*distance).max(0.0)).to_kilometers();

    let (sigma_y, sigma_z) = match stability.class() {
        Some(class) => {
            let (curve_y, curve_z) = curves_for(class);
            (curve_y.eval(x_km), curve_z.eval(x_km))
        }
        None => (UNLISTED_SLOPES.0 * x_km, UNLISTED_SLOPES.1 * x_km),
    };

    let mw_factor = molecular_weight_factor(molecular_weight);
    DispersionCoefficients::clamped(sigma_y * mw_factor, sigma_z * mw_factor)
}
