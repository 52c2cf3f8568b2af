//! # Cage Calculations
//!
//! Input types for reinforcement cage takeoffs and the dispatch from a cage
//! type to its weight computation. Each calculation follows the pattern:
//!
//! - `*Input` / [`BarSpec`] - Input parameters (JSON-serializable)
//! - [`CalculationSummary`] - Results (JSON-serializable)
//! - pure functions with no hidden state
//!
//! ## Available Calculations
//!
//! - [`weight`] - Per-line-item and aggregate steel mass (wall cages)
//!
//! ## Example
//!
//! ```rust
//! use cage_core::calculations::{calculate_cage, CageInput};
//!
//! let input = CageInput::wall_default();
//! let summary = calculate_cage(&input).unwrap();
//! assert_eq!(summary.line_items.len(), 3);
//! ```

pub mod weight;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use weight::{compute_line_item, compute_summary, CalculationSummary, LineItemCalc, LineItemResult};

/// Structural element the cage reinforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CageType {
    #[default]
    Wall,
    Column,
    Pile,
}

impl CageType {
    pub const ALL: [CageType; 3] = [CageType::Wall, CageType::Column, CageType::Pile];

    /// Label used in headings and the total statement (e.g., "Wall Cage")
    pub fn display_name(&self) -> &'static str {
        match self {
            CageType::Wall => "Wall Cage",
            CageType::Column => "Column Cage",
            CageType::Pile => "Pile Cage",
        }
    }

    /// Whether a weight computation exists for this cage type
    pub fn is_supported(&self) -> bool {
        matches!(self, CageType::Wall)
    }

    /// Parse a user selection ("wall", "Column Cage", ...)
    pub fn from_name(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let word = lower.strip_suffix(" cage").unwrap_or(&lower);
        match word {
            "wall" => Some(CageType::Wall),
            "column" => Some(CageType::Column),
            "pile" => Some(CageType::Pile),
            _ => None,
        }
    }
}

impl std::fmt::Display for CageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Role of a bar group within the cage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarCategory {
    Vertical,
    Horizontal,
    /// Links/ties maintaining bar spacing; length is the link perimeter
    Link,
}

impl BarCategory {
    pub const ALL: [BarCategory; 3] = [BarCategory::Vertical, BarCategory::Horizontal, BarCategory::Link];

    /// Component label used in tables (e.g., "Vertical Bars")
    pub fn display_name(&self) -> &'static str {
        match self {
            BarCategory::Vertical => "Vertical Bars",
            BarCategory::Horizontal => "Horizontal Bars",
            BarCategory::Link => "Links",
        }
    }

    /// Caption for the per-unit length input
    pub fn length_caption(&self) -> &'static str {
        match self {
            BarCategory::Vertical | BarCategory::Horizontal => "Length per Bar (m)",
            BarCategory::Link => "Length per Link (m) (Perimeter)",
        }
    }
}

/// One raw bar entry as collected by the form layer.
///
/// `size` holds the designation text as entered so that unknown sizes can be
/// reported instead of rejected at deserialization time. `quantity` is signed
/// for the same reason.
///
/// ## JSON Example
///
/// ```json
/// {
///   "category": "Vertical",
///   "size": "N12",
///   "quantity": 10,
///   "length_per_unit_m": 3.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSpec {
    pub category: BarCategory,

    /// Optional label override; defaults to the category name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Bar size designation (e.g., "N12")
    pub size: String,

    /// Number of bars
    pub quantity: i64,

    /// Length of each bar in meters (perimeter for links)
    pub length_per_unit_m: f64,
}

impl BarSpec {
    pub fn new(category: BarCategory, size: impl Into<String>, quantity: i64, length_per_unit_m: f64) -> Self {
        BarSpec {
            category,
            label: None,
            size: size.into(),
            quantity,
            length_per_unit_m,
        }
    }

    /// Set a custom label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Placeholder slots (zero quantity or zero length) are left out of a
    /// calculation without being reported.
    pub fn is_placeholder(&self) -> bool {
        self.quantity == 0 || self.length_per_unit_m == 0.0
    }
}

/// Complete input for one cage calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CageInput {
    pub cage_type: CageType,

    /// Bar entries in display order; any number per category
    pub bars: Vec<BarSpec>,
}

impl CageInput {
    pub fn new(cage_type: CageType) -> Self {
        CageInput {
            cage_type,
            bars: Vec::new(),
        }
    }

    /// Append a bar entry
    pub fn with_bar(mut self, bar: BarSpec) -> Self {
        self.bars.push(bar);
        self
    }

    /// Wall cage pre-filled with the form defaults.
    pub fn wall_default() -> Self {
        CageInput::new(CageType::Wall)
            .with_bar(BarSpec::new(BarCategory::Vertical, "N10", 10, 3.0))
            .with_bar(BarSpec::new(BarCategory::Horizontal, "N10", 10, 6.0))
            .with_bar(BarSpec::new(BarCategory::Link, "N10", 50, 1.0))
    }

    /// Bar entries belonging to one category, in order
    pub fn bars_in(&self, category: BarCategory) -> impl Iterator<Item = &BarSpec> {
        self.bars.iter().filter(move |b| b.category == category)
    }
}

impl Default for CageInput {
    fn default() -> Self {
        CageInput::wall_default()
    }
}

/// Compute the weight summary for a cage.
///
/// # Returns
///
/// * `Ok(CalculationSummary)` - possibly empty, possibly carrying issues
/// * `Err(CalcError::UnsupportedCageType)` - column and pile cages are not implemented
pub fn calculate_cage(input: &CageInput) -> CalcResult<CalculationSummary> {
    match input.cage_type {
        CageType::Wall => Ok(compute_summary(&input.bars)),
        other => Err(CalcError::UnsupportedCageType {
            cage_type: other.display_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_default() {
        let input = CageInput::wall_default();
        assert_eq!(input.cage_type, CageType::Wall);
        assert_eq!(input.bars.len(), 3);
        assert_eq!(input.bars_in(BarCategory::Link).count(), 1);

        let summary = calculate_cage(&input).unwrap();
        // N10 @ 0.617: 30 m + 60 m + 50 m = 140 m → 86.38 kg
        assert!((summary.total_weight_kg - 86.38).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_cage_types() {
        for cage_type in [CageType::Column, CageType::Pile] {
            let err = calculate_cage(&CageInput::new(cage_type)).unwrap_err();
            assert_eq!(err.error_code(), "UNSUPPORTED_CAGE_TYPE");
            assert!(!cage_type.is_supported());
        }
        assert!(CageType::Wall.is_supported());
    }

    #[test]
    fn test_cage_type_from_name() {
        assert_eq!(CageType::from_name("Wall Cage"), Some(CageType::Wall));
        assert_eq!(CageType::from_name(" column "), Some(CageType::Column));
        assert_eq!(CageType::from_name("PILE"), Some(CageType::Pile));
        assert_eq!(CageType::from_name("slab"), None);
    }

    #[test]
    fn test_bar_spec_json() {
        let json = r#"{"category":"Link","size":"N12","quantity":40,"length_per_unit_m":1.2}"#;
        let spec: BarSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.category, BarCategory::Link);
        assert_eq!(spec.label, None);
        assert!(!spec.is_placeholder());

        let roundtrip = serde_json::to_string(&spec).unwrap();
        assert_eq!(roundtrip, json);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(BarSpec::new(BarCategory::Vertical, "N20", 0, 6.0).is_placeholder());
        assert!(BarSpec::new(BarCategory::Vertical, "N20", 4, 0.0).is_placeholder());
        assert!(!BarSpec::new(BarCategory::Vertical, "N20", -1, 6.0).is_placeholder());
    }
}
