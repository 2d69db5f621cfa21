//! A complete dispersion configuration and its evaluation

use crate::atmosphere::Stability;
use crate::core_types::{
    ChemicalProperties, MeteorologicalState, QueryPoint, ReleaseDescriptor, SiteConditions,
};
use crate::core_types::units::Meters;
use crate::grid::{evaluate_grid, GridResult, SamplingPattern};
use crate::physics::dispersion::SigmaOverride;
use crate::physics::gaussian::{concentration, ConcentrationResult, ResolvedRelease};
use crate::physics::plume_rise::{effective_release_height, plume_rise};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Release, weather, species and site for one calculation.
///
/// Immutable once built; every query reads from it and nothing is cached,
/// so a scenario can be shared freely across threads.
///
/// # Example
/// ```
/// use plume_sim_core::atmosphere::StabilityClass;
/// use plume_sim_core::core_types::{
///     MeteorologicalState, MetersPerSecond, Meters, QueryPoint, ReleaseDescriptor, ReleaseKind,
/// };
/// use plume_sim_core::simulation::DispersionScenario;
///
/// let scenario = DispersionScenario::new(
///     ReleaseDescriptor::new(ReleaseKind::Plume, 10.0),
///     MeteorologicalState::new(MetersPerSecond::new(5.0)).with_stability(StabilityClass::D),
/// );
/// let result = scenario.concentration_at(&QueryPoint::at_ground(Meters::new(500.0), Meters::ZERO));
/// assert!(*result.concentration > 0.0);
/// assert_eq!(result.units, "µg/m³");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionScenario {
    pub release: ReleaseDescriptor,
    pub meteorology: MeteorologicalState,
    pub chemical: ChemicalProperties,
    pub site: SiteConditions,
    #[serde(default)]
    pub sigma_override: SigmaOverride,
}

impl DispersionScenario {
    /// Scenario with the default species over open country
    #[must_use]
    pub fn new(release: ReleaseDescriptor, meteorology: MeteorologicalState) -> Self {
        Self {
            release,
            meteorology,
            chemical: ChemicalProperties::default(),
            site: SiteConditions::OPEN_COUNTRY,
            sigma_override: SigmaOverride::NONE,
        }
    }

    pub fn with_chemical(mut self, chemical: ChemicalProperties) -> Self {
        self.chemical = chemical;
        self
    }

    pub fn with_site(mut self, site: SiteConditions) -> Self {
        self.site = site;
        self
    }

    /// Fixed σy/σz in place of the stability curves
    pub fn with_sigma_override(mut self, sigma_override: SigmaOverride) -> Self {
        self.sigma_override = sigma_override;
        self
    }

    /// Stability selection in effect
    #[must_use]
    pub fn stability(&self) -> Stability {
        self.meteorology.resolved_stability()
    }

    /// Height the kernels are centered on
    #[must_use]
    pub fn effective_height(&self) -> Meters {
        self.effective_height_for(&self.stability())
    }

    fn effective_height_for(&self, stability: &Stability) -> Meters {
        let rise = plume_rise(
            self.release.buoyancy_flux,
            self.meteorology.wind_speed,
            stability,
            &self.site,
        );
        effective_release_height(self.release.release_height, rise, &self.site)
    }

    /// Collapse the configuration into kernel inputs
    #[must_use]
    pub fn resolve(&self) -> ResolvedRelease {
        let stability = self.stability();
        let effective_height = self.effective_height_for(&stability);

        debug!(
            "Resolved {} release: Q={}, H={}, H_eff={}, u={}, class {}",
            self.release.kind,
            self.release.source_strength,
            self.release.release_height,
            effective_height,
            self.meteorology.wind_speed,
            stability
        );

        ResolvedRelease {
            source_strength: self.release.source_strength,
            effective_height,
            wind_speed: self.meteorology.wind_speed,
            elapsed_time: self.release.elapsed_time,
            stability,
            molecular_weight: self.chemical.effective_molecular_weight(),
            sigma_override: self.sigma_override,
        }
    }

    /// Concentration at a single receptor
    #[must_use]
    pub fn concentration_at(&self, point: &QueryPoint) -> ConcentrationResult {
        let resolved = self.resolve();
        let value = concentration(self.release.kind, &resolved, point);
        ConcentrationResult::new(value, self.release.kind, resolved.stability)
    }

    /// Concentrations over a sampling pattern, receptors at height `z`
    #[must_use]
    pub fn grid(&self, pattern: &SamplingPattern, z: Meters) -> GridResult {
        evaluate_grid(self.release.kind, &self.resolve(), pattern, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::StabilityClass;
    use crate::core_types::units::{MetersPerSecond, MilesPerHour};
    use crate::core_types::ReleaseKind;

    #[test]
    fn stability_is_classified_when_absent() {
        let scenario = DispersionScenario::new(
            ReleaseDescriptor::default(),
            MeteorologicalState::from_mph(MilesPerHour::new(12.0)),
        );
        assert_eq!(scenario.stability(), Stability::Class(StabilityClass::D));
        let result = scenario.concentration_at(&QueryPoint::default());
        assert_eq!(result.stability_class, Stability::Class(StabilityClass::D));
    }

    #[test]
    fn passive_release_keeps_stack_height() {
        let scenario = DispersionScenario::new(
            ReleaseDescriptor::default(),
            MeteorologicalState::new(MetersPerSecond::new(5.0)),
        );
        assert_eq!(scenario.effective_height(), ReleaseDescriptor::DEFAULT_RELEASE_HEIGHT);
        assert_eq!(scenario.resolve().effective_height, Meters::new(50.0));
    }

    #[test]
    fn buoyant_release_is_raised() {
        let scenario = DispersionScenario::new(
            ReleaseDescriptor::default().with_buoyancy_flux(64.0),
            MeteorologicalState::new(MetersPerSecond::new(4.0)).with_stability(StabilityClass::D),
        );
        // 2.6 * 4 / 4
        assert!((*scenario.effective_height() - 52.6).abs() < 1e-9);
    }

    #[test]
    fn sigma_override_reaches_kernels() {
        let widths = SigmaOverride {
            sigma_y: Some(Meters::new(10.0)),
            sigma_z: None,
        };
        let base = DispersionScenario::new(
            ReleaseDescriptor::default(),
            MeteorologicalState::new(MetersPerSecond::new(5.0)).with_stability(StabilityClass::D),
        );
        let fixed = base.clone().with_sigma_override(widths);
        assert_eq!(fixed.resolve().sigma_override, widths);

        let p = QueryPoint::at_ground(Meters::new(800.0), Meters::new(20.0));
        assert_ne!(fixed.concentration_at(&p).concentration, base.concentration_at(&p).concentration);
    }

    #[test]
    fn result_reports_kind() {
        let scenario = DispersionScenario::new(
            ReleaseDescriptor::new(ReleaseKind::Instantaneous, 100.0),
            MeteorologicalState::new(MetersPerSecond::new(2.0)),
        );
        let result = scenario.concentration_at(&QueryPoint::default());
        assert_eq!(result.model_type, ReleaseKind::Instantaneous);
    }
}
