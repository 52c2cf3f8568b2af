//! # cage_core - Reinforcement Cage Weight Engine
//!
//! `cage_core` computes the steel mass of a reinforcement cage from bar
//! counts and lengths, and renders a paginated PDF summary. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Each calculation is a pure function of its input
//! - **Non-fatal issues**: Bad line items are reported, not propagated
//! - **Rounding at the edge**: Figures stay unrounded until formatted
//!
//! ## Quick Start
//!
//! ```rust
//! use cage_core::calculations::{compute_summary, BarCategory, BarSpec};
//! use cage_core::display::total_statement;
//!
//! let summary = compute_summary(&[
//!     BarSpec::new(BarCategory::Vertical, "N12", 10, 3.0),
//!     BarSpec::new(BarCategory::Link, "N16", 50, 1.0),
//!     BarSpec::new(BarCategory::Horizontal, "N20", 0, 6.0),
//! ]);
//!
//! assert_eq!(summary.line_items.len(), 2);
//! assert_eq!(
//!     total_statement("Wall Cage", summary.total_weight_kg),
//!     "Total Estimated Wall Cage Weight: 105.59 kg"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Cage inputs and the weight engine
//! - [`materials`] - Bar sizes and the unit weight table
//! - [`display`] - Rounding, terminal tables and export naming
//! - [`pdf`] - Typst-based report renderer
//! - [`branding`] - Logo provider with HTTP fallback
//! - [`settings`] - Report branding configuration
//! - [`project`] - Project container and report metadata
//! - [`file_io`] - Atomic project saves and report export
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error and issue types

pub mod branding;
pub mod calculations;
pub mod display;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod pdf;
pub mod project;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate_cage, compute_line_item, compute_summary, BarSpec, CageInput, CalculationSummary};
pub use errors::{CalcError, CalcIssue, CalcResult, Severity};
pub use file_io::{load_project, save_project, write_report};
pub use pdf::render_report;
pub use project::{CageProject, ReportMetadata};
pub use settings::ReportSettings;
