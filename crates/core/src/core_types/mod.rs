//! Core types and utilities

pub mod chemical;
pub mod release;
pub mod units;
pub mod weather;

pub use chemical::ChemicalProperties;
pub use release::{QueryPoint, ReleaseDescriptor, ReleaseKind, SiteConditions, UnknownReleaseKind};
pub use units::*;
pub use weather::MeteorologicalState;
