//! Effective release height: buoyant plume rise, terrain offset and building downwash.
//!
//! The Gaussian kernels are centered on an effective height `H_eff` rather
//! than the physical stack height. Three corrections are applied:
//!
//! 1. **Plume rise** (Briggs, simplified): a buoyant release climbs
//!    `Δh = c · Fb^(1/3) / u` above the stack, with `c = 1.6` in unstable air
//!    (A-C) and `c = 2.6` otherwise. Uphill slope suppresses the rise and a
//!    nearby building caps it at three building heights.
//! 2. **Terrain**: receptor ground elevation relative to the source is added.
//! 3. **Downwash**: a plume below 2.5 building heights is pulled down to the
//!    building top.
//!
//! With no buoyancy, flat terrain and no building, `H_eff == H`.
//!
//! # References
//!
//! - Briggs, G.A. (1975). "Plume rise predictions." Lectures on Air Pollution
//!   and Environmental Impact Analyses, AMS, 59-111.
//! - Snyder, W.H. & Lawson, R.E. (1976). "Determination of a necessary height
//!   for a stack close to a building." Atmospheric Environment, 10, 683-691.

use crate::atmosphere::Stability;
use crate::core_types::release::SiteConditions;
use crate::core_types::units::{Meters, MetersPerSecond};

/// Rise coefficient for unstable classes A-C
const RISE_COEFF_UNSTABLE: f64 = 1.6;

/// Rise coefficient for neutral and stable classes (and unlisted codes)
const RISE_COEFF_STABLE: f64 = 2.6;

/// Fractional change in rise per radian of slope; uphill reduces the rise
const SLOPE_RISE_FACTOR: f64 = 0.5;

/// Maximum rise as a multiple of building height
const BUILDING_RISE_CAP: f64 = 3.0;

/// Plume below this multiple of building height is caught in the wake
const DOWNWASH_THRESHOLD: f64 = 2.5;

/// Buoyant plume rise above the release point.
///
/// # Arguments
/// * `buoyancy_flux` - Fb in m^4/s^3
/// * `wind_speed` - mean wind at release height
/// * `stability` - stability selection in effect
/// * `site` - terrain slope and building height
///
/// # Returns
/// Rise Δh in meters, never negative. Zero for a passive release or calm air.
#[must_use]
pub fn plume_rise(
    buoyancy_flux: f64,
    wind_speed: MetersPerSecond,
    stability: &Stability,
    site: &SiteConditions,
) -> Meters {
    let buoyant = buoyancy_flux > 0.0;
    let windy = *wind_speed > 0.0;
    if !buoyant || !windy {
        return Meters::ZERO;
    }

    let coeff = match stability.class() {
        Some(class) if class.is_unstable() => RISE_COEFF_UNSTABLE,
        _ => RISE_COEFF_STABLE,
    };

    let mut rise = coeff * buoyancy_flux.cbrt() / *wind_speed;
    rise *= 1.0 - SLOPE_RISE_FACTOR * *site.terrain_gradient;

    if site.has_building() {
        rise = rise.min(BUILDING_RISE_CAP * *site.building_height);
    }

    Meters::new(rise.max(0.0))
}

/// Height the Gaussian kernels are centered on.
///
/// `H_eff = H + Δh + terrain`, then downwash to the building top when the
/// result is below 2.5 building heights, then clamped at ground level.
#[must_use]
pub fn effective_release_height(
    release_height: Meters,
    rise: Meters,
    site: &SiteConditions,
) -> Meters {
    let mut height = *release_height + *rise + *site.terrain_height;

    if site.has_building() && height < DOWNWASH_THRESHOLD * *site.building_height {
        height = *site.building_height;
    }

    Meters::new(height.max(0.0))
}
