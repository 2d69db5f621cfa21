//! Semantic unit types for type-safe physical quantity handling
//!
//! This module provides newtype wrappers for the physical quantities that flow
//! through the dispersion engine, so that a wind speed in mph can never be fed
//! where the Gaussian kernels expect m/s, and a downwind distance can never be
//! confused with a release height in the wrong units.
//!
//! # Design Philosophy
//! - All quantities use f64: concentrations decay through `exp()` terms down to
//!   ~1e-300 and must stay reproducible bit-for-bit for identical inputs
//! - Implements common traits (Add, Sub, Mul, Div, Ord, Display, etc.)
//! - Provides explicit conversion methods between related types
//! - Serde support for serialization (newtypes serialize as bare numbers)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//!
//! # Usage
//! ```
//! use plume_sim_core::core_types::units::{Meters, MetersPerSecond, MilesPerHour, Seconds};
//!
//! let wind: MetersPerSecond = MilesPerHour::new(10.0).into();
//! assert!((*wind - 4.4704).abs() < 1e-12);
//!
//! // Travel time to a receptor is distance over speed
//! let t: Seconds = Meters::new(1000.0) / wind;
//! assert!((*t - 223.69).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// DISTANCE TYPES
// ============================================================================

/// Distance in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

impl Eq for Meters {}

impl PartialOrd for Meters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Meters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Meters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Meters {
    /// Zero distance
    pub const ZERO: Meters = Meters(0.0);

    /// Create a new distance (may be negative for crosswind offsets)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to kilometers
    #[inline]
    #[must_use]
    pub fn to_kilometers(self) -> Kilometers {
        Kilometers(self.0 / 1000.0)
    }
}

impl From<f64> for Meters {
    fn from(v: f64) -> Self {
        Meters(v)
    }
}

impl From<Meters> for f64 {
    fn from(m: Meters) -> f64 {
        m.0
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Meters) -> Meters {
        Meters(self.0 + rhs.0)
    }
}

impl Sub for Meters {
    type Output = Meters;
    fn sub(self, rhs: Meters) -> Meters {
        Meters(self.0 - rhs.0)
    }
}

impl Mul<f64> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f64) -> Meters {
        Meters(self.0 * rhs)
    }
}

// Cross-type operation: distance / velocity = time
impl Div<MetersPerSecond> for Meters {
    type Output = Seconds;
    fn div(self, rhs: MetersPerSecond) -> Seconds {
        Seconds(self.0 / rhs.0)
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

/// Distance in kilometers
///
/// The Pasquill-Gifford curves are tabulated against downwind distance in km.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kilometers(f64);

impl Eq for Kilometers {}

impl PartialOrd for Kilometers {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kilometers {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Kilometers {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kilometers {
    /// Create a new distance in kilometers
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Kilometers(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to meters
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 * 1000.0)
    }
}

impl From<Meters> for Kilometers {
    fn from(m: Meters) -> Kilometers {
        m.to_kilometers()
    }
}

impl From<Kilometers> for Meters {
    fn from(km: Kilometers) -> Meters {
        km.to_meters()
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} km", self.0)
    }
}

// ============================================================================
// TIME TYPES
// ============================================================================

/// Time duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f64);

impl Eq for Seconds {}

impl PartialOrd for Seconds {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Seconds {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Seconds {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Seconds {
    /// Create a new duration
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Seconds(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Seconds {
    fn from(v: f64) -> Self {
        Seconds(v)
    }
}

impl From<Seconds> for f64 {
    fn from(s: Seconds) -> f64 {
        s.0
    }
}

// Cross-type operation: time × velocity = distance
impl Mul<MetersPerSecond> for Seconds {
    type Output = Meters;
    fn mul(self, rhs: MetersPerSecond) -> Meters {
        Meters(self.0 * rhs.0)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} s", self.0)
    }
}

// ============================================================================
// VELOCITY TYPES
// ============================================================================

/// Velocity in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

impl Eq for MetersPerSecond {}

impl PartialOrd for MetersPerSecond {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MetersPerSecond {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for MetersPerSecond {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl MetersPerSecond {
    /// Create a new velocity
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to mph
    #[inline]
    #[must_use]
    pub fn to_mph(self) -> MilesPerHour {
        MilesPerHour(self.0 / MilesPerHour::METERS_PER_SECOND_PER_MPH)
    }
}

impl From<f64> for MetersPerSecond {
    fn from(v: f64) -> Self {
        MetersPerSecond(v)
    }
}

impl From<MetersPerSecond> for f64 {
    fn from(v: MetersPerSecond) -> f64 {
        v.0
    }
}

impl Mul<f64> for MetersPerSecond {
    type Output = MetersPerSecond;
    fn mul(self, rhs: f64) -> MetersPerSecond {
        MetersPerSecond(self.0 * rhs)
    }
}

// Cross-type operation: velocity × time = distance
impl Mul<Seconds> for MetersPerSecond {
    type Output = Meters;
    fn mul(self, rhs: Seconds) -> Meters {
        Meters(self.0 * rhs.0)
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m/s", self.0)
    }
}

/// Velocity in statute miles per hour
///
/// Station feeds report wind in mph; the classifier breakpoints are in mph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MilesPerHour(f64);

impl Eq for MilesPerHour {}

impl PartialOrd for MilesPerHour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MilesPerHour {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for MilesPerHour {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl MilesPerHour {
    /// Exact international mile conversion (1609.344 m / 3600 s)
    pub const METERS_PER_SECOND_PER_MPH: f64 = 0.44704;

    /// Create a new `MilesPerHour` value.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MilesPerHour(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to m/s
    #[inline]
    #[must_use]
    pub fn to_mps(self) -> MetersPerSecond {
        MetersPerSecond(self.0 * Self::METERS_PER_SECOND_PER_MPH)
    }
}

impl From<MilesPerHour> for MetersPerSecond {
    fn from(v: MilesPerHour) -> MetersPerSecond {
        v.to_mps()
    }
}

impl From<f64> for MilesPerHour {
    fn from(v: f64) -> Self {
        MilesPerHour(v)
    }
}

impl fmt::Display for MilesPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mph", self.0)
    }
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= Self::ABSOLUTE_ZERO.0,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Create a temperature, returning `None` below absolute zero or for NaN.
    #[inline]
    #[must_use]
    pub fn try_new(value: f64) -> Option<Self> {
        (value >= Self::ABSOLUTE_ZERO.0).then_some(Celsius(value))
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Celsius> for f64 {
    fn from(c: Celsius) -> f64 {
        c.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle in degrees (meteorological convention for wind direction)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

impl Eq for Degrees {}

impl PartialOrd for Degrees {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Degrees {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Degrees {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Degrees {
    fn from(v: f64) -> Self {
        Degrees(v)
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Angle in radians (terrain slope)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

impl Deref for Radians {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Radians {
    /// Create a new angle in radians
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Radians(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Radians {
    fn from(v: f64) -> Self {
        Radians(v)
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

// ============================================================================
// CHEMISTRY
// ============================================================================

/// Molar mass in grams per mole
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct GramsPerMole(f64);

impl Eq for GramsPerMole {}

impl PartialOrd for GramsPerMole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GramsPerMole {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for GramsPerMole {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl GramsPerMole {
    /// Mean molar mass of dry air
    pub const AIR: GramsPerMole = GramsPerMole(28.97);

    /// Create a new molar mass
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        GramsPerMole(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for GramsPerMole {
    fn from(v: f64) -> Self {
        GramsPerMole(v)
    }
}

impl fmt::Display for GramsPerMole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} g/mol", self.0)
    }
}

// ============================================================================
// CONCENTRATION
// ============================================================================

/// Mass concentration in micrograms per cubic meter
///
/// Never negative: construction from a raw model output clamps at zero and
/// maps NaN to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MicrogramsPerCubicMeter(f64);

impl Eq for MicrogramsPerCubicMeter {}

impl PartialOrd for MicrogramsPerCubicMeter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MicrogramsPerCubicMeter {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for MicrogramsPerCubicMeter {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl MicrogramsPerCubicMeter {
    /// Zero concentration
    pub const ZERO: MicrogramsPerCubicMeter = MicrogramsPerCubicMeter(0.0);

    /// Unit label carried on every result
    pub const UNITS: &'static str = "µg/m³";

    const MICROGRAMS_PER_GRAM: f64 = 1.0e6;

    /// Create a concentration, clamping negative and NaN inputs to zero
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        // f64::max returns the non-NaN operand
        MicrogramsPerCubicMeter(value.max(0.0))
    }

    /// Convert a model output in g/m³
    #[inline]
    #[must_use]
    pub fn from_grams_per_cubic_meter(value: f64) -> Self {
        Self::new(value * Self::MICROGRAMS_PER_GRAM)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<MicrogramsPerCubicMeter> for f64 {
    fn from(c: MicrogramsPerCubicMeter) -> f64 {
        c.0
    }
}

impl fmt::Display for MicrogramsPerCubicMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6e} {}", self.0, Self::UNITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mph_to_mps() {
        let mps = MilesPerHour::new(5.0).to_mps();
        assert!((mps.0 - 2.2352).abs() < 1e-12);
    }

    #[test]
    fn test_mps_round_trips_through_mph() {
        let mps = MetersPerSecond::new(7.5);
        let back = mps.to_mph().to_mps();
        assert!((back.0 - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_meters_to_kilometers() {
        let km: Kilometers = Meters::new(2500.0).into();
        assert!((km.0 - 2.5).abs() < 1e-12);
        assert!((km.to_meters().0 - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_divided_by_velocity_equals_time() {
        let t: Seconds = Meters::new(100.0) / MetersPerSecond::new(5.0);
        assert!((t.0 - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_velocity_times_time_equals_distance() {
        let d: Meters = MetersPerSecond::new(5.0) * Seconds::new(60.0);
        assert!((d.0 - 300.0).abs() < 1e-12);
        let d2: Meters = Seconds::new(60.0) * MetersPerSecond::new(5.0);
        assert_eq!(d, d2);
    }

    #[test]
    fn test_concentration_clamps_negative_and_nan() {
        assert_eq!(MicrogramsPerCubicMeter::new(-1e-30), MicrogramsPerCubicMeter::ZERO);
        assert_eq!(MicrogramsPerCubicMeter::new(f64::NAN), MicrogramsPerCubicMeter::ZERO);
        assert_eq!(MicrogramsPerCubicMeter::new(3.0).value(), 3.0);
    }

    #[test]
    fn test_concentration_from_grams() {
        let c = MicrogramsPerCubicMeter::from_grams_per_cubic_meter(2.5e-6);
        assert!((c.0 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_celsius_try_new() {
        assert!(Celsius::try_new(20.0).is_some());
        assert!(Celsius::try_new(-300.0).is_none());
        assert!(Celsius::try_new(f64::NAN).is_none());
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_celsius_new_panics_below_absolute_zero() {
        let _ = Celsius::new(-274.0);
    }

    #[test]
    fn test_total_ordering_handles_nan() {
        let a = Meters::new(1.0);
        let nan = Meters::new(f64::NAN);
        assert_eq!(a.cmp(&nan), Ordering::Less);
    }

    #[test]
    fn test_display_units() {
        assert_eq!(format!("{}", MetersPerSecond::new(5.0)), "5.00 m/s");
        assert_eq!(format!("{}", GramsPerMole::AIR), "28.97 g/mol");
    }
}
