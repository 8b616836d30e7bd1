//! Semantic unit types for type-safe quantity handling
//!
//! This module provides newtype wrappers for the quantities that flow through
//! the spread timeline, so that a bearing in degrees can never be passed where
//! radians are expected, or an hour offset where a playback clock value is.
//!
//! # Design Philosophy
//! - Geographic and timing types use f64 (decimal degrees need the precision)
//! - Implements common traits (Add, Sub, Mul, Div, Ord, Display, etc.)
//! - Provides explicit conversion methods between related types
//! - Serde support for serialization
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Private inner fields with validated constructors
//!
//! # Usage
//! ```
//! use fire_spread_core::core_types::units::{Degrees, Hours, Milliseconds};
//!
//! let bearing = Degrees::new(270.0);
//! assert!((bearing.to_radians().value() - 3.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//!
//! let segment = Milliseconds::new(3000.0);
//! assert_eq!(segment.to_seconds(), 3.0);
//!
//! // Use standard min/max from Ord trait
//! assert_eq!(Hours::new(12.0).max(Hours::new(96.0)), Hours::new(96.0));
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
// ANGLE TYPES
// ============================================================================

/// Angle in degrees
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

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }

    /// Wrap into the half-open compass range [0, 360)
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Degrees {
        Degrees(self.0.rem_euclid(360.0))
    }
}

impl From<f64> for Degrees {
    fn from(v: f64) -> Self {
        Degrees(v)
    }
}

impl From<Degrees> for f64 {
    fn from(d: Degrees) -> f64 {
        d.0
    }
}

impl From<Degrees> for Radians {
    fn from(d: Degrees) -> Radians {
        d.to_radians()
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

impl Eq for Radians {}

impl PartialOrd for Radians {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Radians {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

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

    /// Convert to degrees
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    /// Compute sine
    #[inline]
    #[must_use]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    /// Compute cosine
    #[inline]
    #[must_use]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl From<f64> for Radians {
    fn from(v: f64) -> Self {
        Radians(v)
    }
}

impl From<Radians> for Degrees {
    fn from(r: Radians) -> Degrees {
        r.to_degrees()
    }
}

impl Sub for Radians {
    type Output = Radians;
    fn sub(self, rhs: Radians) -> Radians {
        Radians(self.0 - rhs.0)
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

// ============================================================================
// DISTANCE TYPES
// ============================================================================

/// Distance in kilometers
///
/// Spread radii come from an untrusted source, so zero and negative values are
/// carried through rather than rejected; geometry built from them is
/// degenerate but well defined.
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
    /// Create a new Kilometers value.
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
}

impl From<f64> for Kilometers {
    fn from(v: f64) -> Self {
        Kilometers(v)
    }
}

impl From<Kilometers> for f64 {
    fn from(k: Kilometers) -> f64 {
        k.0
    }
}

impl Add for Kilometers {
    type Output = Kilometers;
    fn add(self, rhs: Kilometers) -> Kilometers {
        Kilometers(self.0 + rhs.0)
    }
}

impl Mul<f64> for Kilometers {
    type Output = Kilometers;
    fn mul(self, rhs: f64) -> Kilometers {
        Kilometers(self.0 * rhs)
    }
}

impl Div<Kilometers> for Kilometers {
    type Output = f64;
    fn div(self, rhs: Kilometers) -> f64 {
        self.0 / rhs.0
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

// ============================================================================
// TIME TYPES
// ============================================================================

/// Time offset in hours since the start of a spread simulation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Hours(f64);

impl Eq for Hours {}

impl PartialOrd for Hours {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hours {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Hours {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Hours {
    /// Create a new Hours value. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Hours::new: negative offset is invalid");
        Hours(value)
    }

    /// Create an Hours value if `value` is finite and non-negative
    #[inline]
    #[must_use]
    pub fn try_new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Hours(value))
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Hours> for f64 {
    fn from(h: Hours) -> f64 {
        h.0
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Timeline labels read "12h", "96h"; keep fractional hours visible.
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}h", self.0)
        } else {
            write!(f, "{:.1}h", self.0)
        }
    }
}

/// Wall-clock duration or host timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Milliseconds(f64);

impl Eq for Milliseconds {}

impl PartialOrd for Milliseconds {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Milliseconds {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Milliseconds {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Milliseconds {
    /// Zero duration
    pub const ZERO: Milliseconds = Milliseconds(0.0);

    /// Create a new Milliseconds value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Milliseconds(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert to seconds
    #[inline]
    #[must_use]
    pub fn to_seconds(self) -> f64 {
        self.0 / 1000.0
    }
}

impl From<f64> for Milliseconds {
    fn from(v: f64) -> Self {
        Milliseconds(v)
    }
}

impl Add for Milliseconds {
    type Output = Milliseconds;
    fn add(self, rhs: Milliseconds) -> Milliseconds {
        Milliseconds(self.0 + rhs.0)
    }
}

impl Sub for Milliseconds {
    type Output = Milliseconds;
    fn sub(self, rhs: Milliseconds) -> Milliseconds {
        Milliseconds(self.0 - rhs.0)
    }
}

impl Mul<f64> for Milliseconds {
    type Output = Milliseconds;
    fn mul(self, rhs: f64) -> Milliseconds {
        Milliseconds(self.0 * rhs)
    }
}

impl fmt::Display for Milliseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} ms", self.0)
    }
}

// ============================================================================
// FRACTION TYPES
// ============================================================================

/// A fraction in the range [0, 1]
/// Represents playback progress through a timeline segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Fraction(f64);

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Fraction {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Fraction {
    /// Zero fraction
    pub const ZERO: Fraction = Fraction(0.0);

    /// Full/complete (1.0)
    pub const ONE: Fraction = Fraction(1.0);

    /// Create a new fraction. Asserts value is within [0, 1].
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "Fraction::new: value not in [0, 1]"
        );
        Fraction(value)
    }

    /// Create a fraction, clamping into [0, 1] (NaN becomes 0)
    #[inline]
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Fraction::ZERO
        } else {
            Fraction(value.clamp(0.0, 1.0))
        }
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl From<Fraction> for f64 {
    fn from(f: Fraction) -> f64 {
        f.0
    }
}

impl Mul<f64> for Fraction {
    type Output = f64;
    fn mul(self, rhs: f64) -> f64 {
        self.0 * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        let d = Degrees(180.0);
        assert!((d.to_radians().0 - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_degrees_normalized() {
        assert!((Degrees(-90.0).normalized().0 - 270.0).abs() < 1e-12);
        assert!((Degrees(720.0).normalized().0).abs() < 1e-12);
    }

    #[test]
    fn test_hours_label() {
        assert_eq!(Hours::new(12.0).to_string(), "12h");
        assert_eq!(Hours::new(1.5).to_string(), "1.5h");
    }

    #[test]
    fn test_hours_try_new_rejects_invalid() {
        assert!(Hours::try_new(-1.0).is_none());
        assert!(Hours::try_new(f64::NAN).is_none());
        assert!(Hours::try_new(f64::INFINITY).is_none());
        assert_eq!(Hours::try_new(48.0), Some(Hours(48.0)));
    }

    #[test]
    #[should_panic(expected = "negative offset")]
    fn test_hours_new_panics_on_negative() {
        let _ = Hours::new(-0.5);
    }

    #[test]
    fn test_fraction_clamped() {
        assert_eq!(Fraction::clamped(1.7), Fraction::ONE);
        assert_eq!(Fraction::clamped(-0.2), Fraction::ZERO);
        assert_eq!(Fraction::clamped(f64::NAN), Fraction::ZERO);
        assert_eq!(Fraction::clamped(0.25).value(), 0.25);
    }

    #[test]
    fn test_kilometers_allow_degenerate() {
        let k = Kilometers::new(-2.0);
        assert_eq!(k.value(), -2.0);
        assert_eq!((Kilometers::new(3.0) * 2.0).value(), 6.0);
    }

    #[test]
    fn test_milliseconds_ordering() {
        let a = Milliseconds::new(100.0);
        let b = Milliseconds::new(250.0);
        assert_eq!(a.max(b), b);
        assert_eq!((b - a).value(), 150.0);
    }
}
