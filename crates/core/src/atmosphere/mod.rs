//! Atmospheric state consumed by the dispersion models.
//!
//! This module holds the surface-layer stability classification that selects
//! the dispersion coefficient curves.
//!
//! # References
//!
//! - Pasquill, F. (1961). "The estimation of the dispersion of windborne material."
//! - Turner, D.B. (1970). "Workbook of Atmospheric Dispersion Estimates." EPA AP-26.

mod stability;

pub use stability::{classify_stability, Stability, StabilityClass};
