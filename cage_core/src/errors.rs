//! # Error Types
//!
//! Structured error types for cage_core. Fatal conditions surface as
//! [`CalcError`] through [`CalcResult`]; per-line-item problems that must not
//! halt a batch are collected as [`CalcIssue`]s inside a summary.
//!
//! ## Example
//!
//! ```rust
//! use cage_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "length_per_unit_m".to_string(),
//!             value: length_m.to_string(),
//!             reason: "Length cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cage_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Bar size designation is not in the unit weight table
    #[error("Bar size '{size}' not recognized")]
    UnrecognizedBarSize { size: String },

    /// Cage type has no weight computation yet
    #[error("{cage_type} calculations are under construction")]
    UnsupportedCageType { cage_type: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Typst compilation or PDF export failed
    #[error("Report rendering failed: {stage} - {reason}")]
    RenderFailed { stage: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnrecognizedBarSize error
    pub fn unrecognized_bar_size(size: impl Into<String>) -> Self {
        CalcError::UnrecognizedBarSize { size: size.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnrecognizedBarSize { .. } => "UNRECOGNIZED_BAR_SIZE",
            CalcError::UnsupportedCageType { .. } => "UNSUPPORTED_CAGE_TYPE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

/// How loudly an issue should be shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Shown as an error (e.g. unknown bar size)
    Error,
    /// Shown as a warning (e.g. negative quantity)
    Warning,
}

/// A non-fatal problem raised while computing one line item.
///
/// The offending item contributes zero weight; the rest of the batch
/// is still processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcIssue {
    pub severity: Severity,
    /// Label of the line item that raised the issue, when known
    pub label: Option<String>,
    pub error: CalcError,
}

impl CalcIssue {
    /// Unknown bar size designation
    pub fn unrecognized_size(size: impl Into<String>) -> Self {
        CalcIssue {
            severity: Severity::Error,
            label: None,
            error: CalcError::unrecognized_bar_size(size),
        }
    }

    /// Negative quantity or length
    pub fn negative_input(field: impl Into<String>, value: impl Into<String>) -> Self {
        CalcIssue {
            severity: Severity::Warning,
            label: None,
            error: CalcError::invalid_input(
                field,
                value,
                "Quantity and length cannot be negative. Skipping calculation for this item.",
            ),
        }
    }

    /// Attach the line item label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for CalcIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        match &self.label {
            Some(label) => write!(f, "{} ({}): {}", prefix, label, self.error),
            None => write!(f, "{}: {}", prefix, self.error),
        }
    }
}
