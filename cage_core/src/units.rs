//! # Unit Types
//!
//! Type-safe wrappers for the metric units used in rebar takeoffs. These are
//! plain f64 newtypes that serialize as bare numbers.
//!
//! - Length: meters (m)
//! - Linear mass: kilograms per meter (kg/m)
//! - Mass: kilograms (kg)
//!
//! ## Example
//!
//! ```rust
//! use cage_core::units::{KgPerMeter, Meters};
//!
//! let total_length = Meters(3.0) * 10.0;
//! let mass = total_length * KgPerMeter(0.888);
//! assert!((mass.0 - 26.64).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Nominal mass per unit length in kilograms per meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerMeter(pub f64);

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Bar count times length per bar
impl Mul<f64> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f64) -> Meters {
        Meters(self.0 * rhs)
    }
}

impl Mul<KgPerMeter> for Meters {
    type Output = Kilograms;
    fn mul(self, rhs: KgPerMeter) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

impl Add for Kilograms {
    type Output = Kilograms;
    fn add(self, rhs: Kilograms) -> Kilograms {
        Kilograms(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Kilograms {
    fn sum<I: Iterator<Item = Kilograms>>(iter: I) -> Kilograms {
        iter.fold(Kilograms(0.0), |acc, k| acc + k)
    }
}

impl std::fmt::Display for Meters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

impl std::fmt::Display for KgPerMeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg/m", self.0)
    }
}

impl std::fmt::Display for Kilograms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} kg", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_times_linear_mass() {
        // 50 links at 1.0 m of N16: 50 * 1.579 = 78.95 kg
        let mass = Meters(1.0) * 50.0 * KgPerMeter(1.579);
        assert!((mass.0 - 78.95).abs() < 1e-9);
    }

    #[test]
    fn test_sum_kilograms() {
        let total: Kilograms = [Kilograms(26.64), Kilograms(78.95)].into_iter().sum();
        assert!((total.0 - 105.59).abs() < 1e-9);
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(Kilograms(105.594).to_string(), "105.59 kg");
        assert_eq!(KgPerMeter(0.8881).to_string(), "0.888 kg/m");
        assert_eq!(Meters(30.0).to_string(), "30.00 m");
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&KgPerMeter(2.466)).unwrap();
        assert_eq!(json, "2.466");
    }
}
