//! # File I/O Module
//!
//! Handles project files and report export with atomic writes: data goes to a
//! `.tmp` sibling, is synced, then renamed over the target so an interrupted
//! save never leaves a truncated file.
//!
//! ## File Format
//!
//! Projects are saved as `.cage.json` files containing JSON with a schema
//! version header. Reports are written as PDF under a name derived from the
//! project number (see [`crate::display::export_file_name`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use cage_core::file_io::{load_project, save_project};
//! use cage_core::project::CageProject;
//! use std::path::Path;
//!
//! let project = CageProject::new("Riverside", "25-014");
//! let path = Path::new("riverside.cage.json");
//!
//! save_project(&project, path).unwrap();
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.project_number, "25-014");
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::display::export_file_name;
use crate::errors::{CalcError, CalcResult};
use crate::project::{CageProject, SCHEMA_VERSION};

/// Write bytes to `path` atomically (temp file, fsync, rename).
fn atomic_write(path: &Path, bytes: &[u8]) -> CalcResult<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    // Sync to disk
    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a project as pretty JSON with atomic write semantics.
pub fn save_project(project: &CageProject, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    atomic_write(path, json.as_bytes())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(CageProject)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<CageProject> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: CageProject = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&project.version)?;

    Ok(project)
}

/// Write rendered report bytes into `dir`, named after the project number.
///
/// Returns the full path of the written file.
pub fn write_report(pdf_bytes: &[u8], dir: &Path, project_number: &str) -> CalcResult<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| CalcError::file_error("create directory", dir.display().to_string(), e.to_string()))?;

    let path = dir.join(export_file_name(project_number));
    atomic_write(&path, pdf_bytes)?;
    info!(path = %path.display(), bytes = pdf_bytes.len(), "wrote report");
    Ok(path)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
