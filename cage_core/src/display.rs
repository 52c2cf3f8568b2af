//! # Presentation Helpers
//!
//! Rounding and text layout shared by the terminal table and the PDF report.
//! Quantities print as integers, lengths and weights to 2 decimal places and
//! unit weights to 3.

use crate::calculations::CalculationSummary;

/// MIME type of exported reports
pub const PDF_MIME_TYPE: &str = "application/pdf";

pub fn fmt_quantity(quantity: u64) -> String {
    quantity.to_string()
}

/// Lengths in meters, 2 places
pub fn fmt_length(length_m: f64) -> String {
    format!("{:.2}", length_m)
}

/// Weights in kilograms, 2 places
pub fn fmt_weight(weight_kg: f64) -> String {
    format!("{:.2}", weight_kg)
}

/// Unit weights in kg/m, 3 places
pub fn fmt_unit_weight(unit_weight_kg_per_m: f64) -> String {
    format!("{:.3}", unit_weight_kg_per_m)
}

/// Closing statement, e.g. "Total Estimated Wall Cage Weight: 105.59 kg"
pub fn total_statement(cage_type_label: &str, total_weight_kg: f64) -> String {
    format!(
        "Total Estimated {} Weight: {} kg",
        cage_type_label,
        fmt_weight(total_weight_kg)
    )
}

/// File name for an exported report, derived from the project number.
///
/// ```rust
/// use cage_core::display::export_file_name;
///
/// assert_eq!(export_file_name("25-001"), "Cage_Weight_Report_25-001.pdf");
/// assert_eq!(export_file_name("J 42/B"), "Cage_Weight_Report_J_42_B.pdf");
/// assert_eq!(export_file_name("  "), "Cage_Weight_Report_Unnumbered.pdf");
/// ```
pub fn export_file_name(project_number: &str) -> String {
    let trimmed = project_number.trim();
    let stem: String = if trimmed.is_empty() {
        "Unnumbered".to_string()
    } else {
        trimmed
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect()
    };
    format!("Cage_Weight_Report_{}.pdf", stem)
}

const TABLE_HEADERS: [&str; 7] = [
    "Component",
    "Bar Size",
    "Quantity",
    "Length per Unit (m)",
    "Total Length (m)",
    "Unit Weight (kg/m)",
    "Total Weight (kg)",
];

/// Plain-text summary table for terminal display.
///
/// Returns a "no data" line instead of an empty table when nothing qualified.
pub fn summary_table(summary: &CalculationSummary) -> String {
    if summary.is_empty() {
        return "No bar entries with a quantity and length greater than zero.".to_string();
    }

    let rows: Vec<[String; 7]> = summary
        .line_items
        .iter()
        .map(|item| {
            [
                item.label.clone(),
                item.size.to_string(),
                fmt_quantity(item.quantity),
                fmt_length(item.length_per_unit_m),
                fmt_length(item.total_length_m),
                fmt_unit_weight(item.unit_weight_kg_per_m),
                fmt_weight(item.total_weight_kg),
            ]
        })
        .collect();

    let mut widths: [usize; 7] = TABLE_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &TABLE_HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

/// Text column left aligned, numeric columns right aligned
fn push_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, w))| {
            if i < 2 {
                format!("{:<width$}", cell, width = w)
            } else {
                format!("{:>width$}", cell, width = w)
            }
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{compute_summary, BarCategory, BarSpec};

    #[test]
    fn test_number_formats() {
        assert_eq!(fmt_quantity(50), "50");
        assert_eq!(fmt_length(3.0), "3.00");
        assert_eq!(fmt_weight(26.639999999999997), "26.64");
        assert_eq!(fmt_unit_weight(15.42), "15.420");
    }

    #[test]
    fn test_total_statement() {
        assert_eq!(
            total_statement("Wall Cage", 105.59),
            "Total Estimated Wall Cage Weight: 105.59 kg"
        );
        assert_eq!(total_statement("Wall Cage", 0.0), "Total Estimated Wall Cage Weight: 0.00 kg");
    }

    #[test]
    fn test_summary_table_rows() {
        let summary = compute_summary(&[
            BarSpec::new(BarCategory::Vertical, "N12", 10, 3.0),
            BarSpec::new(BarCategory::Link, "N16", 50, 1.0),
        ]);
        let table = summary_table(&summary);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Component"));
        assert!(lines[2].starts_with("Vertical Bars"));
        assert!(lines[2].contains("0.888"));
        assert!(lines[2].ends_with("26.64"));
        assert!(lines[3].ends_with("78.95"));
    }

    #[test]
    fn test_summary_table_empty() {
        let table = summary_table(&CalculationSummary::default());
        assert!(table.starts_with("No bar entries"));
        assert!(!table.contains("Component"));
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(PDF_MIME_TYPE, "application/pdf");
    }
}
