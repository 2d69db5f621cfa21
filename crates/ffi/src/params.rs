use plume_sim_core::core_types::{
    Degrees, GramsPerMole, Meters, MilesPerHour, Radians, Seconds,
};
use plume_sim_core::{DispersionParams, ReleaseKind, Stability, StabilityClass};

use crate::error::DefaultPlumeSimError;

/// Release kinetics selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumeSimModel {
    /// Continuous emission, source strength in g/s
    Plume = 0,
    /// Finite cloud observed `elapsed_time` seconds after release, mass in g
    Puff = 1,
    /// Single burst observed on arrival at the receptor, mass in g
    Instantaneous = 2,
}

impl From<PlumeSimModel> for ReleaseKind {
    fn from(model: PlumeSimModel) -> Self {
        match model {
            PlumeSimModel::Plume => ReleaseKind::Plume,
            PlumeSimModel::Puff => ReleaseKind::Puff,
            PlumeSimModel::Instantaneous => ReleaseKind::Instantaneous,
        }
    }
}

/// Stability selector. `Auto` classifies from wind speed; 1-6 match the
/// legacy digit codes for A-F.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumeSimStability {
    Auto = 0,
    A = 1,
    B = 2,
    C = 3,
    D = 4,
    E = 5,
    F = 6,
}

impl PlumeSimStability {
    /// Selector reporting the class a calculation used.
    ///
    /// The struct entry points only name A-F, so every class they produce maps
    /// back exactly. An unlisted code (JSON path only) reports `Auto`.
    pub(crate) fn reported(stability: &Stability) -> Self {
        match stability.class() {
            Some(StabilityClass::A) => Self::A,
            Some(StabilityClass::B) => Self::B,
            Some(StabilityClass::C) => Self::C,
            Some(StabilityClass::D) => Self::D,
            Some(StabilityClass::E) => Self::E,
            Some(StabilityClass::F) => Self::F,
            None => Self::Auto,
        }
    }
}

impl From<ReleaseKind> for PlumeSimModel {
    fn from(kind: ReleaseKind) -> Self {
        match kind {
            ReleaseKind::Plume => PlumeSimModel::Plume,
            ReleaseKind::Puff => PlumeSimModel::Puff,
            ReleaseKind::Instantaneous => PlumeSimModel::Instantaneous,
        }
    }
}

impl From<PlumeSimStability> for Option<Stability> {
    fn from(stability: PlumeSimStability) -> Self {
        let class = match stability {
            PlumeSimStability::Auto => return None,
            PlumeSimStability::A => StabilityClass::A,
            PlumeSimStability::B => StabilityClass::B,
            PlumeSimStability::C => StabilityClass::C,
            PlumeSimStability::D => StabilityClass::D,
            PlumeSimStability::E => StabilityClass::E,
            PlumeSimStability::F => StabilityClass::F,
        };
        Some(Stability::Class(class))
    }
}

/// Flat parameter block for C callers.
///
/// Start from `plume_sim_default_params` and override fields as needed.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlumeSimParams {
    /// Downwind distance (m)
    pub x: f64,
    /// Crosswind offset (m)
    pub y: f64,
    /// Receptor height (m)
    pub z: f64,
    /// g/s for plume, g for puff/instantaneous
    pub source_strength: f64,
    /// Physical release height (m)
    pub release_height: f64,
    /// Wind speed (mph)
    pub wind_speed_mph: f64,
    /// Degrees, informational
    pub wind_direction: f64,
    /// °C, informational
    pub temperature: f64,
    pub stability: PlumeSimStability,
    /// g/mol
    pub molecular_weight: f64,
    /// Puff elapsed time (s)
    pub elapsed_time: f64,
    /// m^4/s^3
    pub buoyancy_flux: f64,
    /// Receptor terrain elevation relative to the source base (m)
    pub terrain_height: f64,
    /// Slope along the wind (rad), positive uphill
    pub terrain_gradient: f64,
    /// Nearest building height (m), 0 for none
    pub building_height: f64,
    /// Fixed σy (m); 0 or less uses the stability curves
    pub sigma_y: f64,
    /// Fixed σz (m); 0 or less uses the stability curves
    pub sigma_z: f64,
}

impl From<&DispersionParams> for PlumeSimParams {
    fn from(p: &DispersionParams) -> Self {
        Self {
            x: *p.x,
            y: *p.y,
            z: *p.z,
            source_strength: p.source_strength,
            release_height: *p.release_height,
            wind_speed_mph: *p.wind_speed,
            wind_direction: *p.wind_direction,
            temperature: *p.temperature,
            stability: PlumeSimStability::Auto,
            molecular_weight: *p.molecular_weight,
            elapsed_time: *p.elapsed_time,
            buoyancy_flux: p.buoyancy_flux,
            terrain_height: *p.terrain_height,
            terrain_gradient: *p.terrain_gradient,
            building_height: *p.building_height,
            sigma_y: p.sigma_y.map_or(0.0, |s| *s),
            sigma_z: p.sigma_z.map_or(0.0, |s| *s),
        }
    }
}

pub(crate) fn finite(name: &str, value: f64) -> Result<f64, DefaultPlumeSimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DefaultPlumeSimError::invalid_parameter(format!(
            "invalid value '{value}' for parameter '{name}'"
        )))
    }
}

impl PlumeSimParams {
    /// Validate and convert to the engine's typed parameters.
    pub(crate) fn to_dispersion_params(self) -> Result<DispersionParams, DefaultPlumeSimError> {
        let temperature = DispersionParams::temperature_from(finite("temperature", self.temperature)?);
        let fixed_sigma = |name: &str, value: f64| -> Result<Option<Meters>, DefaultPlumeSimError> {
            let value = finite(name, value)?;
            Ok((value > 0.0).then_some(Meters::new(value)))
        };

        Ok(DispersionParams {
            x: Meters::new(finite("x", self.x)?),
            y: Meters::new(finite("y", self.y)?),
            z: Meters::new(finite("z", self.z)?),
            source_strength: finite("source_strength", self.source_strength)?,
            release_height: Meters::new(finite("release_height", self.release_height)?),
            wind_speed: MilesPerHour::new(finite("wind_speed_mph", self.wind_speed_mph)?),
            wind_direction: Degrees::new(finite("wind_direction", self.wind_direction)?),
            temperature,
            stability: self.stability.into(),
            molecular_weight: GramsPerMole::new(finite("molecular_weight", self.molecular_weight)?),
            elapsed_time: Seconds::new(finite("elapsed_time", self.elapsed_time)?),
            buoyancy_flux: finite("buoyancy_flux", self.buoyancy_flux)?,
            terrain_height: Meters::new(finite("terrain_height", self.terrain_height)?),
            terrain_gradient: Radians::new(finite("terrain_gradient", self.terrain_gradient)?),
            building_height: Meters::new(finite("building_height", self.building_height)?),
            sigma_y: fixed_sigma("sigma_y", self.sigma_y)?,
            sigma_z: fixed_sigma("sigma_z", self.sigma_z)?,
        })
    }
}

/// Default parameter block for a model.
///
/// Only the source strength depends on the model (10 g/s for a plume,
/// 100 g otherwise). Stability defaults to `Auto`.
#[no_mangle]
pub extern "C" fn plume_sim_default_params(model: PlumeSimModel) -> PlumeSimParams {
    PlumeSimParams::from(&DispersionParams::defaults_for(model.into()))
}
