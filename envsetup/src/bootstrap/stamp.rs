//! Record of how a virtual environment was created.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stamp file written inside venvs created by envsetup.
pub const STAMP_FILE: &str = "envsetup.json";

/// Venv creation details (persisted to envsetup.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenvStamp {
    /// Base interpreter version used to create the venv (e.g., "Python 3.12.1").
    pub python_version: Option<String>,

    /// envsetup version that created the venv.
    pub created_by: String,

    pub created_at: DateTime<Utc>,
}

impl VenvStamp {
    pub fn new(python_version: Option<String>) -> Self {
        Self {
            python_version,
            created_by: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn path(venv_dir: &Path) -> PathBuf {
        venv_dir.join(STAMP_FILE)
    }

    /// Load the stamp, or `None` for venvs created by other tools.
    pub fn load(venv_dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(venv_dir);

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let stamp = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(stamp))
    }

    pub fn save(&self, venv_dir: &Path) -> Result<()> {
        let path = Self::path(venv_dir);
        let content = serde_json::to_string_pretty(self)?;

        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Whether the venv was built from the given interpreter version.
    ///
    /// Unknown versions on either side are treated as a match.
    pub fn python_matches(&self, current: Option<&str>) -> bool {
        match (self.python_version.as_deref(), current) {
            (Some(recorded), Some(current)) => recorded == current,
            _ => true,
        }
    }
}
