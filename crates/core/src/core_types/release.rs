//! Release source, receptor and site descriptions

use crate::core_types::units::{Meters, Radians, Seconds};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Release kinetics, selecting which concentration model applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    /// Steady continuous emission (Q in g/s)
    Plume,
    /// Finite cloud advecting downwind, observed at elapsed time t (Q in g)
    Puff,
    /// Single burst observed at its own arrival time x/u (Q in g)
    Instantaneous,
}

impl ReleaseKind {
    pub const ALL: [ReleaseKind; 3] = [
        ReleaseKind::Plume,
        ReleaseKind::Puff,
        ReleaseKind::Instantaneous,
    ];

    /// Boundary code for this kind
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plume => "plume",
            Self::Puff => "puff",
            Self::Instantaneous => "instantaneous",
        }
    }

    /// Default source strength when the caller gives none
    #[must_use]
    pub fn default_source_strength(self) -> f64 {
        match self {
            Self::Plume => 10.0,
            Self::Puff | Self::Instantaneous => 100.0,
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized release-kind code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReleaseKind(pub String);

impl fmt::Display for UnknownReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown model type '{}' (expected plume, puff or instantaneous)",
            self.0
        )
    }
}

impl std::error::Error for UnknownReleaseKind {}

impl FromStr for ReleaseKind {
    type Err = UnknownReleaseKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plume" => Ok(Self::Plume),
            "puff" => Ok(Self::Puff),
            "instantaneous" | "instant" => Ok(Self::Instantaneous),
            _ => Err(UnknownReleaseKind(s.to_string())),
        }
    }
}

/// Source of the release
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    pub kind: ReleaseKind,

    /// Emission rate (g/s) for a plume, total mass (g) for puff/instantaneous
    pub source_strength: f64,

    /// Physical release height above ground
    pub release_height: Meters,

    /// Time since release; used by the puff model only
    pub elapsed_time: Seconds,

    /// Buoyancy flux Fb (m^4/s^3) driving plume rise; zero for a passive release
    pub buoyancy_flux: f64,
}

impl ReleaseDescriptor {
    pub const DEFAULT_RELEASE_HEIGHT: Meters = Meters::new(50.0);
    pub const DEFAULT_ELAPSED_TIME: Seconds = Seconds::new(60.0);

    /// Passive release with default height and elapsed time
    #[must_use]
    pub fn new(kind: ReleaseKind, source_strength: f64) -> Self {
        Self {
            kind,
            source_strength,
            release_height: Self::DEFAULT_RELEASE_HEIGHT,
            elapsed_time: Self::DEFAULT_ELAPSED_TIME,
            buoyancy_flux: 0.0,
        }
    }

    pub fn with_release_height(mut self, height: Meters) -> Self {
        self.release_height = height;
        self
    }

    pub fn with_elapsed_time(mut self, t: Seconds) -> Self {
        self.elapsed_time = t;
        self
    }

    pub fn with_buoyancy_flux(mut self, flux: f64) -> Self {
        self.buoyancy_flux = flux;
        self
    }
}

impl Default for ReleaseDescriptor {
    fn default() -> Self {
        Self::new(ReleaseKind::Plume, ReleaseKind::Plume.default_source_strength())
    }
}

/// Receptor location relative to the source, along the mean wind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    /// Downwind distance; non-positive is upwind of the source
    pub x: Meters,
    /// Crosswind offset from the centerline
    pub y: Meters,
    /// Receptor height above ground
    pub z: Meters,
}

impl QueryPoint {
    /// Breathing height of a standing person
    pub const DEFAULT_RECEPTOR_HEIGHT: Meters = Meters::new(1.5);

    #[must_use]
    pub fn new(x: Meters, y: Meters, z: Meters) -> Self {
        Self { x, y, z }
    }

    /// Ground-level receptor at breathing height
    #[must_use]
    pub fn at_ground(x: Meters, y: Meters) -> Self {
        Self::new(x, y, Self::DEFAULT_RECEPTOR_HEIGHT)
    }

    /// Mirror across the plume centerline
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self { y: Meters::new(-*self.y), ..self }
    }
}

impl Default for QueryPoint {
    fn default() -> Self {
        Self::at_ground(Meters::new(100.0), Meters::ZERO)
    }
}

/// Simple site description modifying the effective release height.
///
/// This is a height correction only, not a flow solution around obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteConditions {
    /// Terrain elevation at the receptor relative to the source base
    pub terrain_height: Meters,
    /// Terrain slope along the wind; positive is uphill
    pub terrain_gradient: Radians,
    /// Height of the nearest building; zero when there is none
    pub building_height: Meters,
}

impl SiteConditions {
    /// Flat open country with no buildings
    pub const OPEN_COUNTRY: SiteConditions = SiteConditions {
        terrain_height: Meters::ZERO,
        terrain_gradient: Radians::new(0.0),
        building_height: Meters::ZERO,
    };

    #[must_use]
    pub fn has_building(&self) -> bool {
        *self.building_height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes_parse() {
        assert_eq!("plume".parse::<ReleaseKind>(), Ok(ReleaseKind::Plume));
        assert_eq!(" PUFF ".parse::<ReleaseKind>(), Ok(ReleaseKind::Puff));
        assert_eq!("instant".parse::<ReleaseKind>(), Ok(ReleaseKind::Instantaneous));
        assert!("jet".parse::<ReleaseKind>().is_err());
        for kind in ReleaseKind::ALL {
            assert_eq!(kind.as_str().parse::<ReleaseKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_default_source_strength_depends_on_kind() {
        assert_eq!(ReleaseKind::Plume.default_source_strength(), 10.0);
        assert_eq!(ReleaseKind::Puff.default_source_strength(), 100.0);
        assert_eq!(ReleaseKind::Instantaneous.default_source_strength(), 100.0);
    }

    #[test]
    fn test_mirrored_point() {
        let p = QueryPoint::at_ground(Meters::new(200.0), Meters::new(25.0));
        let m = p.mirrored();
        assert_eq!(*m.y, -25.0);
        assert_eq!(m.x, p.x);
        assert_eq!(m.z, QueryPoint::DEFAULT_RECEPTOR_HEIGHT);
    }

    #[test]
    fn test_open_country_has_no_building() {
        assert!(!SiteConditions::OPEN_COUNTRY.has_building());
        assert_eq!(SiteConditions::default(), SiteConditions::OPEN_COUNTRY);
    }
}
