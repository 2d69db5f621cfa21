//! Pasquill-Gifford atmospheric stability classes.
//!
//! The stability class is a coarse categorical proxy for turbulence intensity
//! in the surface layer and is the main driver of how fast a released cloud
//! spreads. Class A is strongly unstable (convective, widest spread), class F
//! is moderately stable (nocturnal, narrowest spread).
//!
//! # Classification
//!
//! Full Pasquill-Gifford classification needs insolation or cloud cover as
//! well as wind speed. Station records only reliably carry wind, so the
//! classifier here uses wind-speed breakpoints alone under a daytime
//! assumption:
//!
//! ```text
//! u < 4.5 mph  -> A
//! u < 6.7 mph  -> B
//! u < 11.2 mph -> C
//! u < 13.4 mph -> D
//! u < 15.7 mph -> E
//! otherwise    -> F
//! ```
//!
//! # References
//!
//! - Pasquill, F. (1961). "The estimation of the dispersion of windborne material."
//!   Meteorological Magazine, 90, 33-49.
//! - Gifford, F.A. (1961). "Use of routine meteorological observations for
//!   estimating atmospheric dispersion." Nuclear Safety, 2(4), 47-51.

use crate::core_types::units::{Celsius, MilesPerHour};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Wind-speed upper bounds (mph, exclusive) for classes A through E.
/// Anything at or above the last bound is class F.
const BREAKPOINTS_MPH: [(f64, StabilityClass); 5] = [
    (4.5, StabilityClass::A),
    (6.7, StabilityClass::B),
    (11.2, StabilityClass::C),
    (13.4, StabilityClass::D),
    (15.7, StabilityClass::E),
];

/// One of the six ordered Pasquill-Gifford classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StabilityClass {
    /// Very unstable
    A,
    /// Unstable
    B,
    /// Slightly unstable
    C,
    /// Neutral
    D,
    /// Slightly stable
    E,
    /// Stable
    F,
}

impl StabilityClass {
    /// All classes from most to least dispersive
    pub const ALL: [StabilityClass; 6] = [
        StabilityClass::A,
        StabilityClass::B,
        StabilityClass::C,
        StabilityClass::D,
        StabilityClass::E,
        StabilityClass::F,
    ];

    /// Resolve a class code.
    ///
    /// Accepts the letters `A`-`F` in either case and the legacy digit codes
    /// `1`-`6` that older station records use for the same classes.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" | "a" | "1" => Some(Self::A),
            "B" | "b" | "2" => Some(Self::B),
            "C" | "c" | "3" => Some(Self::C),
            "D" | "d" | "4" => Some(Self::D),
            "E" | "e" | "5" => Some(Self::E),
            "F" | "f" | "6" => Some(Self::F),
            _ => None,
        }
    }

    /// Canonical single-letter code
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }

    /// Unstable (convective) classes A-C
    #[must_use]
    pub fn is_unstable(self) -> bool {
        self <= Self::C
    }

    /// Classify from wind speed using the daytime breakpoint table.
    ///
    /// Total over all inputs: NaN and anything above the last breakpoint
    /// fall through to F.
    #[must_use]
    pub fn from_wind_speed(wind_speed: MilesPerHour) -> Self {
        BREAKPOINTS_MPH
            .iter()
            .find(|(upper, _)| *wind_speed < *upper)
            .map_or(Self::F, |&(_, class)| class)
    }
}

impl fmt::Display for StabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify atmospheric stability from surface observations.
///
/// Temperature is accepted so callers can pass a whole observation, but the
/// daytime table does not use it.
#[must_use]
pub fn classify_stability(wind_speed: MilesPerHour, _temperature: Option<Celsius>) -> StabilityClass {
    let class = StabilityClass::from_wind_speed(wind_speed);
    debug!("Stability class {} from wind speed {}", class, wind_speed);
    class
}

/// Stability selection carried through a calculation.
///
/// An unlisted code is not an error: it selects the default coefficient set
/// and is reported back verbatim so the caller can see what was used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stability {
    Class(StabilityClass),
    Unlisted(String),
}

impl Stability {
    /// Parse a caller-supplied code. Never fails.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match StabilityClass::from_code(code) {
            Some(class) => Self::Class(class),
            None => {
                let code = code.trim().to_ascii_uppercase();
                debug!("Unlisted stability class '{}', using default coefficients", code);
                Self::Unlisted(code)
            }
        }
    }

    /// The listed class, if any
    #[must_use]
    pub fn class(&self) -> Option<StabilityClass> {
        match self {
            Self::Class(class) => Some(*class),
            Self::Unlisted(_) => None,
        }
    }
}

impl From<StabilityClass> for Stability {
    fn from(class: StabilityClass) -> Self {
        Self::Class(class)
    }
}

impl From<String> for Stability {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<Stability> for String {
    fn from(stability: Stability) -> String {
        stability.to_string()
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(class) => class.fmt(f),
            Self::Unlisted(code) => f.write_str(code),
        }
    }
}
