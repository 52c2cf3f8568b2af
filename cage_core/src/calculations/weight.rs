//! # Steel Weight Calculation
//!
//! Computes the steel mass of each bar entry and aggregates a cage total.
//!
//! ## Formulas
//!
//! - Total length: L = n × l
//! - Total weight: W = L × w
//!
//! Where:
//! - n = quantity of bars
//! - l = length per bar (m)
//! - w = nominal unit weight (kg/m)
//!
//! No rounding is applied here; see [`crate::display`] for presentation.
//!
//! ## Example
//!
//! ```rust
//! use cage_core::calculations::weight::compute_line_item;
//!
//! let calc = compute_line_item("N12", 10, 3.0);
//! assert!((calc.total_length_m - 30.0).abs() < 1e-9);
//! assert!((calc.total_weight_kg - 26.64).abs() < 1e-9);
//! assert!(calc.issue.is_none());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::{BarCategory, BarSpec};
use crate::errors::CalcIssue;
use crate::materials::BarSize;
use crate::units::{Kilograms, Meters};

/// Raw figures for one bar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemCalc {
    /// Total steel mass (kg)
    pub total_weight_kg: f64,

    /// Nominal mass per meter for the size (kg/m); zero if the size is unknown
    pub unit_weight_kg_per_m: f64,

    /// Quantity × length per bar (m)
    pub total_length_m: f64,

    /// Error or warning raised for this entry
    pub issue: Option<CalcIssue>,
}

impl LineItemCalc {
    fn zero(unit_weight_kg_per_m: f64, issue: CalcIssue) -> Self {
        LineItemCalc {
            total_weight_kg: 0.0,
            unit_weight_kg_per_m,
            total_length_m: 0.0,
            issue: Some(issue),
        }
    }
}

/// Compute the steel mass for one bar entry.
///
/// Never fails: an unknown size yields all zeros with an error issue, and a
/// negative (or non-finite) quantity or length yields zero length and weight
/// with a warning issue while keeping the size's unit weight.
pub fn compute_line_item(size: &str, quantity: i64, length_per_unit_m: f64) -> LineItemCalc {
    let bar_size = match size.parse::<BarSize>() {
        Ok(s) => s,
        Err(_) => {
            error!(size, "bar size not recognized");
            return LineItemCalc::zero(0.0, CalcIssue::unrecognized_size(size));
        }
    };
    let unit_weight = bar_size.unit_weight();

    if quantity < 0 {
        warn!(size, quantity, "negative quantity, skipping calculation");
        return LineItemCalc::zero(unit_weight.0, CalcIssue::negative_input("quantity", quantity.to_string()));
    }
    if !length_per_unit_m.is_finite() || length_per_unit_m < 0.0 {
        warn!(size, length_per_unit_m, "invalid length, skipping calculation");
        return LineItemCalc::zero(
            unit_weight.0,
            CalcIssue::negative_input("length_per_unit_m", length_per_unit_m.to_string()),
        );
    }

    let total_length = Meters(length_per_unit_m) * quantity as f64;
    let total_weight = total_length * unit_weight;

    LineItemCalc {
        total_weight_kg: total_weight.0,
        unit_weight_kg_per_m: unit_weight.0,
        total_length_m: total_length.0,
        issue: None,
    }
}

/// One computed row of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemResult {
    /// Component label (e.g., "Vertical Bars", "Links 2")
    pub label: String,
    pub category: BarCategory,
    pub size: BarSize,
    pub quantity: u64,
    pub length_per_unit_m: f64,
    pub total_length_m: f64,
    pub unit_weight_kg_per_m: f64,
    pub total_weight_kg: f64,
}

/// Ordered line items and the cage total.
///
/// ## JSON Example
///
/// ```json
/// {
///   "line_items": [
///     {
///       "label": "Vertical Bars",
///       "category": "Vertical",
///       "size": "N12",
///       "quantity": 10,
///       "length_per_unit_m": 3.0,
///       "total_length_m": 30.0,
///       "unit_weight_kg_per_m": 0.888,
///       "total_weight_kg": 26.64
///     }
///   ],
///   "total_weight_kg": 26.64,
///   "issues": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationSummary {
    pub line_items: Vec<LineItemResult>,
    pub total_weight_kg: f64,
    /// Errors and warnings for entries left out of the total
    pub issues: Vec<CalcIssue>,
}

impl CalculationSummary {
    /// No qualifying line items
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Sum of total lengths across line items (m)
    pub fn total_length_m(&self) -> f64 {
        self.line_items.iter().map(|item| item.total_length_m).sum()
    }

    /// Whether any issue has error severity
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|issue| issue.is_error())
    }
}

/// Compute every qualifying bar entry and sum their weights.
///
/// Entries with zero quantity or zero length are unused slots and are skipped
/// without comment. Entries that raise an issue (unknown size, negative input)
/// contribute zero: the issue is recorded and the entry is left out of the
/// line items. Input order is preserved.
pub fn compute_summary(bars: &[BarSpec]) -> CalculationSummary {
    let labels = resolve_labels(bars);
    let mut summary = CalculationSummary::default();

    for (spec, label) in bars.iter().zip(labels) {
        if spec.is_placeholder() {
            debug!(label = %label, "skipping empty bar slot");
            continue;
        }

        let calc = compute_line_item(&spec.size, spec.quantity, spec.length_per_unit_m);
        if let Some(issue) = calc.issue {
            summary.issues.push(issue.with_label(label));
            continue;
        }

        let size = match spec.size.parse::<BarSize>() {
            Ok(size) => size,
            Err(e) => {
                summary.issues.push(CalcIssue::unrecognized_size(e.to_string()).with_label(label));
                continue;
            }
        };

        summary.line_items.push(LineItemResult {
            label,
            category: spec.category,
            size,
            quantity: spec.quantity.unsigned_abs(),
            length_per_unit_m: spec.length_per_unit_m,
            total_length_m: calc.total_length_m,
            unit_weight_kg_per_m: calc.unit_weight_kg_per_m,
            total_weight_kg: calc.total_weight_kg,
        });
    }

    summary.total_weight_kg = summary
        .line_items
        .iter()
        .map(|item| Kilograms(item.total_weight_kg))
        .sum::<Kilograms>()
        .0;

    debug!(
        items = summary.line_items.len(),
        issues = summary.issues.len(),
        total_weight_kg = summary.total_weight_kg,
        "computed cage summary"
    );
    summary
}

/// Explicit labels win; otherwise the category name, numbered when a
/// category has more than one entry.
fn resolve_labels(bars: &[BarSpec]) -> Vec<String> {
    let mut per_category: HashMap<BarCategory, usize> = HashMap::new();
    for bar in bars {
        *per_category.entry(bar.category).or_insert(0) += 1;
    }

    let mut seen: HashMap<BarCategory, usize> = HashMap::new();
    bars.iter()
        .map(|bar| {
            let index = seen.entry(bar.category).or_insert(0);
            *index += 1;
            match &bar.label {
                Some(label) => label.clone(),
                None if per_category[&bar.category] > 1 => {
                    format!("{} {}", bar.category.display_name(), index)
                }
                None => bar.category.display_name().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CalcError, Severity};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_n12_example() {
        let calc = compute_line_item("N12", 10, 3.0);
        assert!((calc.total_length_m - 30.0).abs() < EPS);
        assert!((calc.unit_weight_kg_per_m - 0.888).abs() < EPS);
        assert!((calc.total_weight_kg - 26.64).abs() < EPS);
        assert!(calc.issue.is_none());
    }

    #[test]
    fn test_n16_example() {
        let calc = compute_line_item("N16", 50, 1.0);
        assert!((calc.total_weight_kg - 78.95).abs() < EPS);
    }

    #[test]
    fn test_weight_equals_product_for_all_sizes() {
        for size in BarSize::ALL {
            for (q, l) in [(0_i64, 0.0), (1, 0.5), (7, 2.35), (120, 11.9)] {
                let calc = compute_line_item(size.designation(), q, l);
                let expected = q as f64 * l * size.unit_weight_kg_per_m();
                assert!(
                    (calc.total_weight_kg - expected).abs() < 1e-9 * expected.max(1.0),
                    "{} x{} @ {}",
                    size,
                    q,
                    l
                );
                assert!(calc.issue.is_none());
            }
        }
    }

    #[test]
    fn test_unknown_size() {
        let calc = compute_line_item("INVALID", 5, 2.0);
        assert_eq!(calc.total_weight_kg, 0.0);
        assert_eq!(calc.total_length_m, 0.0);
        assert_eq!(calc.unit_weight_kg_per_m, 0.0);

        let issue = calc.issue.unwrap();
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.error, CalcError::unrecognized_bar_size("INVALID"));
    }

    #[test]
    fn test_negative_inputs_keep_unit_weight() {
        for (q, l) in [(-1_i64, 3.0), (4, -2.5), (-3, -1.0)] {
            let calc = compute_line_item("N20", q, l);
            assert_eq!(calc.total_weight_kg, 0.0);
            assert_eq!(calc.total_length_m, 0.0);
            assert!((calc.unit_weight_kg_per_m - 2.466).abs() < EPS);
            assert_eq!(calc.issue.unwrap().severity, Severity::Warning);
        }
    }

    #[test]
    fn test_non_finite_length_is_a_warning() {
        let calc = compute_line_item("N10", 2, f64::INFINITY);
        assert_eq!(calc.total_weight_kg, 0.0);
        assert_eq!(calc.issue.unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_example_batch() {
        let bars = vec![
            BarSpec::new(BarCategory::Vertical, "N12", 10, 3.0),
            BarSpec::new(BarCategory::Link, "N16", 50, 1.0),
            BarSpec::new(BarCategory::Horizontal, "N20", 0, 6.0),
        ];
        let summary = compute_summary(&bars);

        assert_eq!(summary.line_items.len(), 2);
        assert_eq!(summary.line_items[0].label, "Vertical Bars");
        assert_eq!(summary.line_items[1].label, "Links");
        assert!((summary.total_weight_kg - 105.59).abs() < EPS);
        assert!(summary.issues.is_empty());
    }

    #[test]
    fn test_total_is_sum_of_items() {
        let bars = vec![
            BarSpec::new(BarCategory::Vertical, "N24", 14, 4.2),
            BarSpec::new(BarCategory::Vertical, "N16", 6, 4.2),
            BarSpec::new(BarCategory::Horizontal, "N12", 22, 8.75),
            BarSpec::new(BarCategory::Link, "N10", 80, 1.35),
        ];
        let summary = compute_summary(&bars);
        let sum: f64 = summary.line_items.iter().map(|i| i.total_weight_kg).sum();
        assert_eq!(summary.line_items.len(), 4);
        assert!((summary.total_weight_kg - sum).abs() < EPS);

        for item in &summary.line_items {
            let expected = item.quantity as f64 * item.length_per_unit_m * item.unit_weight_kg_per_m;
            assert!((item.total_weight_kg - expected).abs() < EPS);
        }
    }

    #[test]
    fn test_placeholders_are_silent() {
        let bars = vec![
            BarSpec::new(BarCategory::Vertical, "N12", 0, 3.0),
            BarSpec::new(BarCategory::Horizontal, "N12", 10, 0.0),
            BarSpec::new(BarCategory::Link, "BOGUS", 0, 0.0),
        ];
        let summary = compute_summary(&bars);
        assert!(summary.is_empty());
        assert_eq!(summary.total_weight_kg, 0.0);
        assert!(summary.issues.is_empty());
    }

    #[test]
    fn test_issues_do_not_halt_batch() {
        let bars = vec![
            BarSpec::new(BarCategory::Vertical, "INVALID", 5, 2.0),
            BarSpec::new(BarCategory::Horizontal, "N12", -2, 6.0),
            BarSpec::new(BarCategory::Link, "N12", 10, 3.0),
        ];
        let summary = compute_summary(&bars);

        assert_eq!(summary.line_items.len(), 1);
        assert!((summary.total_weight_kg - 26.64).abs() < EPS);
        assert_eq!(summary.issues.len(), 2);
        assert!(summary.has_errors());
        assert_eq!(summary.issues[0].label.as_deref(), Some("Vertical Bars"));
        assert_eq!(summary.issues[1].severity, Severity::Warning);
    }

    #[test]
    fn test_empty_input() {
        let summary = compute_summary(&[]);
        assert_eq!(summary, CalculationSummary::default());
        assert_eq!(summary.total_length_m(), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let input = crate::calculations::CageInput::wall_default();
        let first = compute_summary(&input.bars);
        let second = compute_summary(&input.bars);
        assert_eq!(first, second);
    }

    #[test]
    fn test_labels_numbered_within_category() {
        let bars = vec![
            BarSpec::new(BarCategory::Vertical, "N16", 4, 3.0),
            BarSpec::new(BarCategory::Vertical, "N12", 4, 3.0),
            BarSpec::new(BarCategory::Horizontal, "N12", 8, 2.0).with_label("Top Trimmers"),
            BarSpec::new(BarCategory::Link, "N10", 12, 1.1),
        ];
        let labels: Vec<String> = compute_summary(&bars)
            .line_items
            .into_iter()
            .map(|item| item.label)
            .collect();
        assert_eq!(labels, ["Vertical Bars 1", "Vertical Bars 2", "Top Trimmers", "Links"]);
    }

    #[test]
    fn test_summary_json_shape() {
        let bars = vec![BarSpec::new(BarCategory::Vertical, "N12", 10, 3.0)];
        let json = serde_json::to_value(compute_summary(&bars)).unwrap();
        assert_eq!(json["line_items"][0]["size"], "N12");
        assert_eq!(json["line_items"][0]["quantity"], 10);
        assert!(json["issues"].as_array().unwrap().is_empty());
    }
}
