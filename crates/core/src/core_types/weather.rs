//! Meteorological state consumed by the dispersion engine
//!
//! The engine never fetches or forecasts weather: it takes an already
//! resolved observation and only reads from it. Wind direction and
//! temperature are carried for provenance; the Gaussian models are 1-D along
//! the mean wind and do not use them.

use crate::atmosphere::{classify_stability, Stability};
use crate::core_types::units::{Celsius, Degrees, MetersPerSecond, MilesPerHour};
use serde::{Deserialize, Serialize};

/// A single surface observation
///
/// # Example
/// ```
/// use plume_sim_core::atmosphere::{Stability, StabilityClass};
/// use plume_sim_core::core_types::{MeteorologicalState, MilesPerHour};
///
/// // Calm afternoon: no class given, so it is derived from the wind speed
/// let met = MeteorologicalState::from_mph(MilesPerHour::new(3.0));
/// assert_eq!(met.resolved_stability(), Stability::Class(StabilityClass::A));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeteorologicalState {
    /// Mean wind speed at release height (m/s)
    ///
    /// Non-positive values are a degenerate input: every model returns zero
    /// concentration rather than dividing by it.
    pub wind_speed: MetersPerSecond,

    /// Direction the wind blows from (meteorological degrees)
    pub wind_direction: Degrees,

    /// Ambient air temperature (°C)
    pub temperature: Celsius,

    /// Stability class; `None` means derive it from the wind speed
    pub stability: Option<Stability>,
}

impl MeteorologicalState {
    /// Default wind direction (westerly)
    pub const DEFAULT_WIND_DIRECTION: Degrees = Degrees::new(270.0);

    /// Default ambient temperature
    pub const DEFAULT_TEMPERATURE: Celsius = Celsius::new(20.0);

    /// Observation with default direction and temperature and no explicit class
    #[must_use]
    pub fn new(wind_speed: MetersPerSecond) -> Self {
        Self {
            wind_speed,
            wind_direction: Self::DEFAULT_WIND_DIRECTION,
            temperature: Self::DEFAULT_TEMPERATURE,
            stability: None,
        }
    }

    /// Observation from a station wind speed in mph
    #[must_use]
    pub fn from_mph(wind_speed: MilesPerHour) -> Self {
        Self::new(wind_speed.to_mps())
    }

    /// Set an explicit stability selection
    pub fn with_stability(mut self, stability: impl Into<Stability>) -> Self {
        self.stability = Some(stability.into());
        self
    }

    /// Set wind direction
    pub fn with_wind_direction(mut self, direction: Degrees) -> Self {
        self.wind_direction = direction;
        self
    }

    /// Set ambient temperature
    pub fn with_temperature(mut self, temperature: Celsius) -> Self {
        self.temperature = temperature;
        self
    }

    /// Stability class to use: the explicit one, or one classified from wind.
    #[must_use]
    pub fn resolved_stability(&self) -> Stability {
        match &self.stability {
            Some(stability) => stability.clone(),
            None => classify_stability(self.wind_speed.to_mph(), Some(self.temperature)).into(),
        }
    }
}
