//! Receptor grids: concentration over a downwind × crosswind sampling pattern
//!
//! Cells are independent, so they are evaluated in parallel on the rayon pool.
//! Output order is always distance-major (all offsets of the first distance,
//! then the next distance) regardless of scheduling.

use crate::atmosphere::Stability;
use crate::core_types::release::{QueryPoint, ReleaseKind};
use crate::core_types::units::{Meters, MicrogramsPerCubicMeter};
use crate::physics::gaussian::{concentration, ResolvedRelease};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Downwind distances sampled by default (m)
pub const DEFAULT_DISTANCES: [f64; 6] = [50.0, 100.0, 200.0, 300.0, 500.0, 1000.0];

/// Crosswind offsets sampled by default (m)
pub const DEFAULT_OFFSETS: [f64; 5] = [-50.0, -25.0, 0.0, 25.0, 50.0];

/// Ordered downwind distances crossed with ordered crosswind offsets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingPattern {
    pub distances: Vec<Meters>,
    pub offsets: Vec<Meters>,
}

impl SamplingPattern {
    #[must_use]
    pub fn new(distances: Vec<Meters>, offsets: Vec<Meters>) -> Self {
        Self { distances, offsets }
    }

    /// Build from raw meter values
    #[must_use]
    pub fn from_meters(distances: &[f64], offsets: &[f64]) -> Self {
        Self::new(
            distances.iter().copied().map(Meters::new).collect(),
            offsets.iter().copied().map(Meters::new).collect(),
        )
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len() * self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receptors at height `z`, distance-major
    pub fn points(&self, z: Meters) -> impl Iterator<Item = QueryPoint> + '_ {
        self.distances.iter().flat_map(move |&x| {
            self.offsets
                .iter()
                .map(move |&y| QueryPoint::new(x, y, z))
        })
    }
}

impl Default for SamplingPattern {
    fn default() -> Self {
        Self::from_meters(&DEFAULT_DISTANCES, &DEFAULT_OFFSETS)
    }
}

/// One evaluated cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSample {
    pub x: Meters,
    pub y: Meters,
    pub concentration: MicrogramsPerCubicMeter,
}

/// All cells of a pattern plus the peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResult {
    pub samples: Vec<GridSample>,
    /// Zero for an empty pattern
    pub max_concentration: MicrogramsPerCubicMeter,
    pub model_type: ReleaseKind,
    pub stability_class: Stability,
}

impl GridResult {
    /// First cell holding the peak concentration, `None` for an empty grid
    #[must_use]
    pub fn max_sample(&self) -> Option<&GridSample> {
        self.samples.iter().reduce(|best, sample| {
            if sample.concentration > best.concentration {
                sample
            } else {
                best
            }
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Evaluate `kind` at every cell of `pattern`, receptors at height `z`.
#[must_use]
pub fn evaluate_grid(
    kind: ReleaseKind,
    release: &ResolvedRelease,
    pattern: &SamplingPattern,
    z: Meters,
) -> GridResult {
    let points: Vec<QueryPoint> = pattern.points(z).collect();

    // Indexed parallel map keeps input order in the output
    let samples: Vec<GridSample> = points
        .par_iter()
        .map(|point| GridSample {
            x: point.x,
            y: point.y,
            concentration: concentration(kind, release, point),
        })
        .collect();

    let max_concentration = samples
        .iter()
        .map(|s| s.concentration)
        .max()
        .unwrap_or(MicrogramsPerCubicMeter::ZERO);

    info!(
        "Grid evaluated: {} model, class {}, {} cells, max {:.3e} {}",
        kind,
        release.stability,
        samples.len(),
        *max_concentration,
        MicrogramsPerCubicMeter::UNITS
    );

    GridResult {
        samples,
        max_concentration,
        model_type: kind,
        stability_class: release.stability.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::StabilityClass;
    use crate::core_types::units::{GramsPerMole, MetersPerSecond, Seconds};
    use crate::physics::dispersion::SigmaOverride;

    fn release() -> ResolvedRelease {
        ResolvedRelease {
            source_strength: 10.0,
            effective_height: Meters::new(10.0),
            wind_speed: MetersPerSecond::new(3.0),
            elapsed_time: Seconds::new(60.0),
            stability: Stability::Class(StabilityClass::C),
            molecular_weight: GramsPerMole::new(64.0),
            sigma_override: SigmaOverride::NONE,
        }
    }

    #[test]
    fn default_pattern_has_thirty_cells() {
        let pattern = SamplingPattern::default();
        assert_eq!(pattern.len(), 30);
        let points: Vec<_> = pattern.points(Meters::new(1.5)).collect();
        assert_eq!(*points[0].x, 50.0);
        assert_eq!(*points[0].y, -50.0);
        assert_eq!(*points[4].y, 50.0);
        assert_eq!(*points[5].x, 100.0);
        assert_eq!(*points[29].x, 1000.0);
    }

    #[test]
    fn samples_are_distance_major() {
        let pattern = SamplingPattern::default();
        let grid = evaluate_grid(ReleaseKind::Plume, &release(), &pattern, Meters::new(1.5));
        let expected: Vec<(f64, f64)> = pattern
            .points(Meters::new(1.5))
            .map(|p| (*p.x, *p.y))
            .collect();
        let actual: Vec<(f64, f64)> = grid.samples.iter().map(|s| (*s.x, *s.y)).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn max_matches_samples() {
        let grid = evaluate_grid(
            ReleaseKind::Plume,
            &release(),
            &SamplingPattern::default(),
            Meters::new(1.5),
        );
        let peak = grid.max_sample().expect("non-empty grid");
        assert_eq!(peak.concentration, grid.max_concentration);
        assert!(grid
            .samples
            .iter()
            .all(|s| s.concentration <= grid.max_concentration));
        // Peak is on the centerline
        assert_eq!(*peak.y, 0.0);
    }

    #[test]
    fn empty_pattern_has_zero_max() {
        let pattern = SamplingPattern::from_meters(&[], &[0.0]);
        let grid = evaluate_grid(ReleaseKind::Puff, &release(), &pattern, Meters::new(1.5));
        assert!(grid.is_empty());
        assert_eq!(grid.max_concentration, MicrogramsPerCubicMeter::ZERO);
        assert!(grid.max_sample().is_none());
        assert_eq!(grid.model_type, ReleaseKind::Puff);
    }
}
