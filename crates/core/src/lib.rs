//! Plume Sim Core Library
//!
//! Steady-state Gaussian dispersion of a gaseous pollutant released from a
//! point source. Given a release, the weather and a receptor, it estimates the
//! ground-reflected concentration in µg/m³ using Pasquill-Gifford stability
//! classes.
//!
//! ## Release kinetics
//!
//! - **Plume**: continuous emission in g/s, steady state
//! - **Puff**: finite mass in g observed `t` seconds after release
//! - **Instantaneous**: finite mass in g observed when it reaches the receptor
//!
//! ## Layout
//!
//! - [`atmosphere`]: stability classes and wind-speed classification
//! - [`physics`]: σy/σz coefficients, plume rise and the Gaussian kernels
//! - [`grid`]: parallel evaluation over receptor grids
//! - [`params`]: the loose key/value boundary used by external callers
//! - [`simulation`]: scenarios and the mapping-based entry points
//!
//! The engine is stateless: every call is a pure function of its inputs.

// Core types and utilities
pub mod core_types;

pub mod atmosphere;
pub mod grid;
pub mod params;
pub mod physics;
pub mod simulation;

// Re-export core types
pub use core_types::{
    ChemicalProperties, MeteorologicalState, QueryPoint, ReleaseDescriptor, ReleaseKind,
    SiteConditions,
};

pub use atmosphere::{Stability, StabilityClass};
pub use grid::{GridResult, GridSample, SamplingPattern};
pub use params::{DispersionParams, ParamValue, ParameterError, Parameters};
pub use physics::{ConcentrationResult, DispersionCoefficients, SigmaOverride};
pub use simulation::{
    calculate_concentration, calculate_grid, calculate_grid_with_pattern, DispersionScenario,
};
