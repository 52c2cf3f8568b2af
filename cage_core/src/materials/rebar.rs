//! Reinforcing Bar Database (AS/NZS 4671)
//!
//! Nominal mass per meter for Australian deformed reinforcing bars (N-class).
//!
//! ## Data Source
//!
//! Values are the nominal masses tabulated in AS/NZS 4671 for 500N bars,
//! computed from nominal diameter at a steel density of 7850 kg/m³.
//!
//! ## Example
//!
//! ```rust
//! use cage_core::materials::rebar::{BarSize, unit_weight};
//!
//! let n12: BarSize = "N12".parse().unwrap();
//! assert_eq!(n12.unit_weight_kg_per_m(), 0.888);
//! assert_eq!(unit_weight("n16"), Some(1.579));
//! assert_eq!(unit_weight("N13"), None);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::units::KgPerMeter;

/// Bar size designation (nominal diameter class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BarSize {
    N10,
    N12,
    N16,
    N20,
    N24,
    N28,
    N32,
    N36,
    N40,
    N50,
}

impl BarSize {
    /// All bar sizes in ascending diameter order
    pub const ALL: [BarSize; 10] = [
        BarSize::N10,
        BarSize::N12,
        BarSize::N16,
        BarSize::N20,
        BarSize::N24,
        BarSize::N28,
        BarSize::N32,
        BarSize::N36,
        BarSize::N40,
        BarSize::N50,
    ];

    /// Designation code as printed on schedules (e.g., "N12")
    pub fn designation(&self) -> &'static str {
        match self {
            BarSize::N10 => "N10",
            BarSize::N12 => "N12",
            BarSize::N16 => "N16",
            BarSize::N20 => "N20",
            BarSize::N24 => "N24",
            BarSize::N28 => "N28",
            BarSize::N32 => "N32",
            BarSize::N36 => "N36",
            BarSize::N40 => "N40",
            BarSize::N50 => "N50",
        }
    }

    /// Nominal diameter in millimeters
    pub fn diameter_mm(&self) -> u32 {
        match self {
            BarSize::N10 => 10,
            BarSize::N12 => 12,
            BarSize::N16 => 16,
            BarSize::N20 => 20,
            BarSize::N24 => 24,
            BarSize::N28 => 28,
            BarSize::N32 => 32,
            BarSize::N36 => 36,
            BarSize::N40 => 40,
            BarSize::N50 => 50,
        }
    }

    /// Nominal mass per meter (kg/m)
    pub fn unit_weight_kg_per_m(&self) -> f64 {
        match self {
            BarSize::N10 => 0.617,
            BarSize::N12 => 0.888,
            BarSize::N16 => 1.579,
            BarSize::N20 => 2.466,
            BarSize::N24 => 3.551,
            BarSize::N28 => 4.834,
            BarSize::N32 => 6.313,
            BarSize::N36 => 7.990,
            BarSize::N40 => 9.865,
            BarSize::N50 => 15.420,
        }
    }

    pub fn unit_weight(&self) -> KgPerMeter {
        KgPerMeter(self.unit_weight_kg_per_m())
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.designation())
    }
}

impl FromStr for BarSize {
    type Err = CalcError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        BarSize::ALL
            .iter()
            .copied()
            .find(|size| size.designation() == code)
            .ok_or_else(|| CalcError::unrecognized_bar_size(s))
    }
}

/// Designation → nominal kg/m, built once and never mutated.
static UNIT_WEIGHT_TABLE: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BarSize::ALL
        .iter()
        .map(|size| (size.designation(), size.unit_weight_kg_per_m()))
        .collect()
});

/// Look up the nominal unit weight for a designation.
///
/// Returns `None` for anything not in the table.
pub fn unit_weight(designation: &str) -> Option<f64> {
    let code = designation.trim().to_uppercase();
    UNIT_WEIGHT_TABLE.get(code.as_str()).copied()
}

/// All known designations in ascending diameter order, for size pickers.
pub fn designations() -> Vec<&'static str> {
    BarSize::ALL.iter().map(|size| size.designation()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum() {
        for size in BarSize::ALL {
            assert_eq!(unit_weight(size.designation()), Some(size.unit_weight_kg_per_m()));
        }
        assert_eq!(UNIT_WEIGHT_TABLE.len(), BarSize::ALL.len());
    }

    #[test]
    fn test_unit_weight_tracks_diameter() {
        // m = ρ·π·d²/4 with ρ = 7850 kg/m³, tabulated to 3 places
        for size in BarSize::ALL {
            let d_m = size.diameter_mm() as f64 / 1000.0;
            let computed = 7850.0 * std::f64::consts::PI * d_m * d_m / 4.0;
            assert!(
                (computed - size.unit_weight_kg_per_m()).abs() < 0.01,
                "{} computed {:.3} vs table {:.3}",
                size,
                computed,
                size.unit_weight_kg_per_m()
            );
        }
    }

    #[test]
    fn test_parse_is_lenient_on_case_and_whitespace() {
        assert_eq!(" n20 ".parse::<BarSize>().unwrap(), BarSize::N20);
        assert_eq!(unit_weight("n50"), Some(15.420));
    }

    #[test]
    fn test_unknown_designation() {
        let err = "INVALID".parse::<BarSize>().unwrap_err();
        assert_eq!(err, CalcError::unrecognized_bar_size("INVALID"));
        assert_eq!(unit_weight("N14"), None);
        assert_eq!(unit_weight(""), None);
    }

    #[test]
    fn test_designations_order() {
        let codes = designations();
        assert_eq!(codes.first(), Some(&"N10"));
        assert_eq!(codes.last(), Some(&"N50"));
        assert_eq!(codes.len(), 10);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&BarSize::N36).unwrap();
        assert_eq!(json, "\"N36\"");
    }
}
