//! # Report Settings
//!
//! Organization branding and report options, read from a TOML file.
//!
//! ## File Format
//!
//! ```toml
//! organization_name = "Acme Reinforcing Pty Ltd"
//! organization_address = "12 Mill Road, Newcastle NSW 2300"
//! program_name = "Cage Weight Calculator"
//! logo_primary_url = "https://cdn.example.com/acme/logo.png"
//! logo_fallback_url = "https://www.example.com/logo.png"
//! logo_timeout_secs = 10
//! ```
//!
//! Every key is optional. `CAGE_LOGO_URL` and `CAGE_LOGO_FALLBACK_URL`
//! override the logo URLs from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Environment override for the primary logo URL
pub const LOGO_URL_ENV: &str = "CAGE_LOGO_URL";
/// Environment override for the fallback logo URL
pub const LOGO_FALLBACK_URL_ENV: &str = "CAGE_LOGO_FALLBACK_URL";

/// Current crate version, printed in report footers
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Branding and report options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Organization shown in the header and footer of every page
    pub organization_name: String,

    /// Postal address printed under the organization name
    pub organization_address: String,

    /// Program name printed in the footer
    pub program_name: String,

    /// Logo image URL tried first
    pub logo_primary_url: Option<String>,

    /// Logo image URL tried when the primary fetch fails
    pub logo_fallback_url: Option<String>,

    /// Per-request timeout for logo fetches (seconds)
    pub logo_timeout_secs: u64,

    /// Where a fetched logo is cached; OS temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            organization_name: "Reinforcement Detailing Services".to_string(),
            organization_address: String::new(),
            program_name: "Cage Weight Calculator".to_string(),
            logo_primary_url: None,
            logo_fallback_url: None,
            logo_timeout_secs: 10,
            scratch_dir: None,
        }
    }
}

impl ReportSettings {
    /// Load settings from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings = Self::from_toml(&text)?.with_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text (no environment overrides)
    pub fn from_toml(text: &str) -> CalcResult<Self> {
        toml::from_str(text).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid settings file: {}", e),
        })
    }

    /// Replace logo URLs with `CAGE_LOGO_URL` / `CAGE_LOGO_FALLBACK_URL` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = non_empty_env(LOGO_URL_ENV) {
            self.logo_primary_url = Some(url);
        }
        if let Some(url) = non_empty_env(LOGO_FALLBACK_URL_ENV) {
            self.logo_fallback_url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> CalcResult<()> {
        if !(1..=60).contains(&self.logo_timeout_secs) {
            return Err(CalcError::invalid_input(
                "logo_timeout_secs",
                self.logo_timeout_secs.to_string(),
                "Logo fetch timeout must be between 1 and 60 seconds",
            ));
        }
        Ok(())
    }

    /// Configured logo URLs in the order they are tried
    pub fn logo_urls(&self) -> Vec<&str> {
        [&self.logo_primary_url, &self.logo_fallback_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// Scratch directory for cached branding files
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// "<program> v<version>" for footers and the HTTP User-Agent
    pub fn program_label(&self) -> String {
        format!("{} v{}", self.program_name, PROGRAM_VERSION)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
