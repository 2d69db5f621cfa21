use crate::core_types::units::GramsPerMole;
use serde::{Deserialize, Serialize};

/// Properties of the released species that affect dispersion.
///
/// Only the molecular weight enters the model, as a diffusivity correction
/// relative to air.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChemicalProperties {
    pub molecular_weight: GramsPerMole,
}

impl ChemicalProperties {
    /// Molecular weight used when the caller gives none (SO2-like heavy gas)
    pub const DEFAULT_MOLECULAR_WEIGHT: GramsPerMole = GramsPerMole::new(64.0);

    /// Sulfur dioxide
    pub const SO2: ChemicalProperties = ChemicalProperties::new(GramsPerMole::new(64.066));

    /// Nitrogen dioxide
    pub const NO2: ChemicalProperties = ChemicalProperties::new(GramsPerMole::new(46.0055));

    /// Carbon monoxide
    pub const CO: ChemicalProperties = ChemicalProperties::new(GramsPerMole::new(28.010));

    /// Ammonia - lighter than air
    pub const NH3: ChemicalProperties = ChemicalProperties::new(GramsPerMole::new(17.031));

    /// Chlorine - dense toxic gas
    pub const CL2: ChemicalProperties = ChemicalProperties::new(GramsPerMole::new(70.906));

    /// Hydrogen sulfide
    pub const H2S: ChemicalProperties = ChemicalProperties::new(GramsPerMole::new(34.08));

    #[must_use]
    pub const fn new(molecular_weight: GramsPerMole) -> Self {
        Self { molecular_weight }
    }

    /// Look up a catalogued species by formula (case-insensitive).
    ///
    /// Returns `None` for species outside the catalog.
    #[must_use]
    pub fn from_formula(formula: &str) -> Option<Self> {
        match formula.trim().to_ascii_uppercase().as_str() {
            "SO2" => Some(Self::SO2),
            "NO2" => Some(Self::NO2),
            "CO" => Some(Self::CO),
            "NH3" => Some(Self::NH3),
            "CL2" => Some(Self::CL2),
            "H2S" => Some(Self::H2S),
            _ => None,
        }
    }

    /// Molecular weight usable as a divisor.
    ///
    /// Non-positive or non-finite weights fall back to the default rather than
    /// producing infinite spread.
    #[must_use]
    pub fn effective_molecular_weight(&self) -> GramsPerMole {
        if self.molecular_weight.is_finite() && *self.molecular_weight > 0.0 {
            self.molecular_weight
        } else {
            Self::DEFAULT_MOLECULAR_WEIGHT
        }
    }
}

impl Default for ChemicalProperties {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MOLECULAR_WEIGHT)
    }
}
