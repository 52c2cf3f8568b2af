//! # Project Data Structures
//!
//! A [`CageProject`] bundles the job identification with one cage input.
//! Projects serialize to `.cage.json` files as human-readable JSON (see
//! [`crate::file_io`]). [`ReportMetadata`] is the per-render snapshot the PDF
//! header block is filled from.
//!
//! ## Structure
//!
//! ```text
//! CageProject
//! ├── version: schema version
//! ├── project_name / project_number
//! ├── created / modified timestamps
//! └── input: CageInput (cage type + bar entries)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cage_core::project::{CageProject, ReportMetadata};
//!
//! let project = CageProject::new("Riverside Apartments", "25-014");
//! let meta = ReportMetadata::for_project(&project);
//! assert_eq!(meta.cage_type_label, "Wall Cage");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::CageInput;

/// Current schema version for .cage.json files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root container saved to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CageProject {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub project_name: String,

    /// Job/project number (e.g., "25-014"); also names exported reports
    pub project_number: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,

    pub input: CageInput,
}

impl CageProject {
    /// Create a project with the default wall cage input.
    pub fn new(project_name: impl Into<String>, project_number: impl Into<String>) -> Self {
        let now = Utc::now();
        CageProject {
            version: SCHEMA_VERSION.to_string(),
            project_name: project_name.into(),
            project_number: project_number.into(),
            created: now,
            modified: now,
            input: CageInput::wall_default(),
        }
    }

    /// Replace the cage input
    pub fn with_input(mut self, input: CageInput) -> Self {
        self.input = input;
        self.touch();
        self
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

impl Default for CageProject {
    fn default() -> Self {
        CageProject::new("", "")
    }
}

/// Identification block printed at the top of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// e.g. "Wall Cage"
    pub cage_type_label: String,
    pub project_name: String,
    pub project_number: String,
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    pub fn new(
        cage_type_label: impl Into<String>,
        project_name: impl Into<String>,
        project_number: impl Into<String>,
    ) -> Self {
        ReportMetadata {
            cage_type_label: cage_type_label.into(),
            project_name: project_name.into(),
            project_number: project_number.into(),
            generated_at: Utc::now(),
        }
    }

    /// Snapshot a project's identification, stamped with the current time
    pub fn for_project(project: &CageProject) -> Self {
        ReportMetadata::new(
            project.input.cage_type.display_name(),
            project.project_name.clone(),
            project.project_number.clone(),
        )
    }

    /// Pin the generation timestamp (reproducible output in tests)
    pub fn at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Timestamp as printed in reports
    pub fn generated_display(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}
