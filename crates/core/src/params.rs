//! Caller-facing parameter mapping and its conversion to a typed scenario
//!
//! External callers hand the engine a loose mapping of string keys to numbers
//! or text. It is converted once, here, into [`DispersionParams`]; nothing
//! past this point looks up keys or parses strings.
//!
//! | Key(s)                      | Default                   |
//! |-----------------------------|---------------------------|
//! | `x`, `y`, `z`               | 100, 0, 1.5 m             |
//! | `Q` / `q`                   | 10 (plume), 100 otherwise |
//! | `release_height` / `H`      | 50 m                      |
//! | `wind_speed`                | 5 mph                     |
//! | `wind_direction`            | 270°                      |
//! | `temperature`               | 20 °C                     |
//! | `stability_class` / `stability` | classified from wind  |
//! | `molecular_weight`          | 64 g/mol                  |
//! | `chemical`                  | catalog lookup            |
//! | `t`                         | 60 s                      |
//! | `buoyancy_flux`             | 0                         |
//! | `terrain_height`            | 0 m                       |
//! | `terrain_gradient`          | 0 rad                     |
//! | `building_height`           | 0 m                       |
//! | `sy`, `sz`                  | from the stability curves |

use crate::atmosphere::Stability;
use crate::core_types::units::{
    Celsius, Degrees, GramsPerMole, Meters, MilesPerHour, Radians, Seconds,
};
use crate::core_types::{
    ChemicalProperties, MeteorologicalState, QueryPoint, ReleaseDescriptor, ReleaseKind,
    SiteConditions, UnknownReleaseKind,
};
use crate::physics::SigmaOverride;
use crate::simulation::DispersionScenario;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A single parameter value: a number or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric reading; numeric strings are accepted
    fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Textual reading; numbers use their shortest decimal form (4.0 -> "4")
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Loose caller-supplied parameters
pub type Parameters = FxHashMap<String, ParamValue>;

/// Errors at the parameter boundary
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A numeric key carried a value that is not a finite number
    InvalidParameter { key: String, value: String },
    /// Model code is not plume, puff or instantaneous
    UnknownModel(String),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { key, value } => {
                write!(f, "invalid value '{value}' for parameter '{key}'")
            }
            Self::UnknownModel(code) => write!(
                f,
                "unknown model type '{code}' (expected plume, puff or instantaneous)"
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

impl From<UnknownReleaseKind> for ParameterError {
    fn from(err: UnknownReleaseKind) -> Self {
        Self::UnknownModel(err.0)
    }
}

/// Parse a model code at the boundary.
///
/// # Errors
/// [`ParameterError::UnknownModel`] for anything other than `plume`, `puff`,
/// `instantaneous` or `instant` (case-insensitive).
pub fn parse_model(code: &str) -> Result<ReleaseKind, ParameterError> {
    Ok(code.parse::<ReleaseKind>()?)
}

/// Every key the boundary understands, aliases included
const KNOWN_KEYS: &[&str] = &[
    "x",
    "y",
    "z",
    "Q",
    "q",
    "release_height",
    "H",
    "wind_speed",
    "wind_direction",
    "temperature",
    "stability_class",
    "stability",
    "molecular_weight",
    "chemical",
    "t",
    "buoyancy_flux",
    "terrain_height",
    "terrain_gradient",
    "building_height",
    "sy",
    "sz",
];

/// Typed form of the parameter mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionParams {
    pub x: Meters,
    pub y: Meters,
    pub z: Meters,
    pub source_strength: f64,
    pub release_height: Meters,
    pub wind_speed: MilesPerHour,
    pub wind_direction: Degrees,
    pub temperature: Celsius,
    /// `None` means classify from wind speed
    pub stability: Option<Stability>,
    pub molecular_weight: GramsPerMole,
    pub elapsed_time: Seconds,
    pub buoyancy_flux: f64,
    pub terrain_height: Meters,
    pub terrain_gradient: Radians,
    pub building_height: Meters,
    /// Fixed σy; `None` uses the stability curves
    pub sigma_y: Option<Meters>,
    /// Fixed σz; `None` uses the stability curves
    pub sigma_z: Option<Meters>,
}

impl DispersionParams {
    pub const DEFAULT_WIND_SPEED: MilesPerHour = MilesPerHour::new(5.0);

    /// Defaults for the given kinetics (only the source strength differs)
    #[must_use]
    pub fn defaults_for(kind: ReleaseKind) -> Self {
        let receptor = QueryPoint::default();
        Self {
            x: receptor.x,
            y: receptor.y,
            z: receptor.z,
            source_strength: kind.default_source_strength(),
            release_height: ReleaseDescriptor::DEFAULT_RELEASE_HEIGHT,
            wind_speed: Self::DEFAULT_WIND_SPEED,
            wind_direction: MeteorologicalState::DEFAULT_WIND_DIRECTION,
            temperature: MeteorologicalState::DEFAULT_TEMPERATURE,
            stability: None,
            molecular_weight: ChemicalProperties::DEFAULT_MOLECULAR_WEIGHT,
            elapsed_time: ReleaseDescriptor::DEFAULT_ELAPSED_TIME,
            buoyancy_flux: 0.0,
            terrain_height: Meters::ZERO,
            terrain_gradient: Radians::new(0.0),
            building_height: Meters::ZERO,
            sigma_y: None,
            sigma_z: None,
        }
    }

    /// Convert a caller mapping, filling gaps with the defaults for `kind`.
    ///
    /// Unknown keys are ignored. Where a key and its alias are both present
    /// the primary spelling wins.
    ///
    /// # Errors
    /// [`ParameterError::InvalidParameter`] when a numeric key holds something
    /// that is not a finite number.
    pub fn from_map(params: &Parameters, kind: ReleaseKind) -> Result<Self, ParameterError> {
        for key in params.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!("Ignoring unrecognized parameter '{}'", key);
            }
        }

        let mut out = Self::defaults_for(kind);

        if let Some(v) = number(params, &["x"])? {
            out.x = Meters::new(v);
        }
        if let Some(v) = number(params, &["y"])? {
            out.y = Meters::new(v);
        }
        if let Some(v) = number(params, &["z"])? {
            out.z = Meters::new(v);
        }
        if let Some(v) = number(params, &["Q", "q"])? {
            out.source_strength = v;
        }
        if let Some(v) = number(params, &["release_height", "H"])? {
            out.release_height = Meters::new(v);
        }
        if let Some(v) = number(params, &["wind_speed"])? {
            out.wind_speed = MilesPerHour::new(v);
        }
        if let Some(v) = number(params, &["wind_direction"])? {
            out.wind_direction = Degrees::new(v);
        }
        if let Some(v) = number(params, &["temperature"])? {
            out.temperature = Self::temperature_from(v);
        }
        if let Some((_, value)) = lookup(params, &["stability_class", "stability"]) {
            out.stability = Some(Stability::parse(&value.as_text()));
        }

        if let Some(v) = number(params, &["molecular_weight"])? {
            out.molecular_weight = GramsPerMole::new(v);
        } else if let Some((_, value)) = lookup(params, &["chemical"]) {
            let name = value.as_text();
            out.molecular_weight = match ChemicalProperties::from_formula(&name) {
                Some(chemical) => chemical.molecular_weight,
                None => {
                    debug!("Chemical '{}' not in catalog, using default weight", name);
                    ChemicalProperties::DEFAULT_MOLECULAR_WEIGHT
                }
            };
        }

        if let Some(v) = number(params, &["t"])? {
            out.elapsed_time = Seconds::new(v);
        }
        if let Some(v) = number(params, &["buoyancy_flux"])? {
            out.buoyancy_flux = v;
        }
        if let Some(v) = number(params, &["terrain_height"])? {
            out.terrain_height = Meters::new(v);
        }
        if let Some(v) = number(params, &["terrain_gradient"])? {
            out.terrain_gradient = Radians::new(v);
        }
        if let Some(v) = number(params, &["building_height"])? {
            out.building_height = Meters::new(v);
        }
        out.sigma_y = number(params, &["sy"])?.map(Meters::new);
        out.sigma_z = number(params, &["sz"])?.map(Meters::new);

        Ok(out)
    }

    /// Temperature is informational, so an impossible reading is replaced by
    /// the default rather than rejected.
    #[must_use]
    pub fn temperature_from(value: f64) -> Celsius {
        Celsius::try_new(value).unwrap_or_else(|| {
            debug!("Temperature {} is below absolute zero, using default", value);
            MeteorologicalState::DEFAULT_TEMPERATURE
        })
    }

    /// Receptor described by `x`, `y`, `z`
    #[must_use]
    pub fn query_point(&self) -> QueryPoint {
        QueryPoint::new(self.x, self.y, self.z)
    }

    /// Build the scenario for the given kinetics
    #[must_use]
    pub fn scenario(&self, kind: ReleaseKind) -> DispersionScenario {
        let release = ReleaseDescriptor::new(kind, self.source_strength)
            .with_release_height(self.release_height)
            .with_elapsed_time(self.elapsed_time)
            .with_buoyancy_flux(self.buoyancy_flux);

        let mut meteorology = MeteorologicalState::from_mph(self.wind_speed)
            .with_wind_direction(self.wind_direction)
            .with_temperature(self.temperature);
        meteorology.stability.clone_from(&self.stability);

        DispersionScenario::new(release, meteorology)
            .with_chemical(ChemicalProperties::new(self.molecular_weight))
            .with_site(SiteConditions {
                terrain_height: self.terrain_height,
                terrain_gradient: self.terrain_gradient,
                building_height: self.building_height,
            })
            .with_sigma_override(SigmaOverride {
                sigma_y: self.sigma_y,
                sigma_z: self.sigma_z,
            })
    }
}

impl Default for DispersionParams {
    fn default() -> Self {
        Self::defaults_for(ReleaseKind::Plume)
    }
}

/// First present key among `keys`
fn lookup<'a>(params: &'a Parameters, keys: &[&'static str]) -> Option<(&'static str, &'a ParamValue)> {
    keys.iter()
        .find_map(|&key| params.get(key).map(|value| (key, value)))
}

fn invalid(key: &str, value: &ParamValue) -> ParameterError {
    ParameterError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Numeric value under the first present key, if any
fn number(params: &Parameters, keys: &[&'static str]) -> Result<Option<f64>, ParameterError> {
    match lookup(params, keys) {
        None => Ok(None),
        Some((key, value)) => value.as_number().map(Some).ok_or_else(|| invalid(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::StabilityClass;

    fn params(pairs: &[(&str, ParamValue)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        let p = DispersionParams::from_map(&Parameters::default(), ReleaseKind::Plume).unwrap();
        assert_eq!(p, DispersionParams::default());
        assert_eq!(*p.x, 100.0);
        assert_eq!(*p.z, 1.5);
        assert_eq!(p.source_strength, 10.0);
        assert!(p.stability.is_none());

        let puff = DispersionParams::from_map(&Parameters::default(), ReleaseKind::Puff).unwrap();
        assert_eq!(puff.source_strength, 100.0);
    }

    #[test]
    fn aliases_and_numeric_strings() {
        let p = DispersionParams::from_map(
            &params(&[
                ("q", 25.0.into()),
                ("H", "30".into()),
                ("stability", "e".into()),
            ]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(p.source_strength, 25.0);
        assert_eq!(*p.release_height, 30.0);
        assert_eq!(p.stability, Some(Stability::Class(StabilityClass::E)));
    }

    #[test]
    fn primary_key_beats_alias() {
        let p = DispersionParams::from_map(
            &params(&[("Q", 1.0.into()), ("q", 2.0.into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(p.source_strength, 1.0);
    }

    #[test]
    fn numeric_stability_code_is_read_as_text() {
        let p = DispersionParams::from_map(
            &params(&[("stability_class", 4.0.into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(p.stability, Some(Stability::Class(StabilityClass::D)));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = DispersionParams::from_map(
            &params(&[("wind_speed", "breezy".into())]),
            ReleaseKind::Plume,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ParameterError::InvalidParameter {
                key: "wind_speed".into(),
                value: "breezy".into()
            }
        );
        assert!(err.to_string().contains("wind_speed"));
    }

    #[test]
    fn impossible_temperature_falls_back_to_default() {
        let p = DispersionParams::from_map(
            &params(&[("temperature", (-300.0).into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(p.temperature, MeteorologicalState::DEFAULT_TEMPERATURE);

        let p = DispersionParams::from_map(
            &params(&[("temperature", "-40".into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(*p.temperature, -40.0);

        let err = DispersionParams::from_map(
            &params(&[("temperature", "hot".into())]),
            ReleaseKind::Plume,
        )
        .unwrap_err();
        assert!(matches!(err, ParameterError::InvalidParameter { ref key, .. } if key == "temperature"));
    }

    #[test]
    fn fixed_sigmas_are_read_and_applied() {
        let p = DispersionParams::from_map(
            &params(&[("sy", 10.0.into()), ("sz", "8".into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(p.sigma_y, Some(Meters::new(10.0)));
        assert_eq!(p.sigma_z, Some(Meters::new(8.0)));

        let fixed = p.scenario(ReleaseKind::Plume).concentration_at(&p.query_point());
        let curves = DispersionParams::default()
            .scenario(ReleaseKind::Plume)
            .concentration_at(&p.query_point());
        assert_ne!(fixed.concentration, curves.concentration);

        let err = DispersionParams::from_map(&params(&[("sy", "wide".into())]), ReleaseKind::Plume)
            .unwrap_err();
        assert_eq!(
            err,
            ParameterError::InvalidParameter {
                key: "sy".into(),
                value: "wide".into()
            }
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let p = DispersionParams::from_map(
            &params(&[("colour", "blue".into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(p, DispersionParams::default());
    }

    #[test]
    fn chemical_lookup_unless_weight_given() {
        let p = DispersionParams::from_map(&params(&[("chemical", "nh3".into())]), ReleaseKind::Plume)
            .unwrap();
        assert_eq!(p.molecular_weight, ChemicalProperties::NH3.molecular_weight);

        let p = DispersionParams::from_map(
            &params(&[("chemical", "nh3".into()), ("molecular_weight", 30.0.into())]),
            ReleaseKind::Plume,
        )
        .unwrap();
        assert_eq!(*p.molecular_weight, 30.0);

        let p = DispersionParams::from_map(&params(&[("chemical", "unobtainium".into())]), ReleaseKind::Plume)
            .unwrap();
        assert_eq!(p.molecular_weight, ChemicalProperties::DEFAULT_MOLECULAR_WEIGHT);
    }

    #[test]
    fn scenario_converts_wind_to_metric() {
        let p = DispersionParams::from_map(&params(&[("wind_speed", 10.0.into())]), ReleaseKind::Puff)
            .unwrap();
        let scenario = p.scenario(ReleaseKind::Puff);
        assert!((*scenario.meteorology.wind_speed - 4.4704).abs() < 1e-12);
        assert_eq!(scenario.release.kind, ReleaseKind::Puff);
        assert_eq!(scenario.release.source_strength, 100.0);
    }

    #[test]
    fn model_codes() {
        assert_eq!(parse_model("Instant"), Ok(ReleaseKind::Instantaneous));
        assert_eq!(parse_model("jet"), Err(ParameterError::UnknownModel("jet".into())));
    }
}
