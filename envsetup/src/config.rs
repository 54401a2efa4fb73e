//! Project-level settings for envsetup.
//!
//! Settings are read from an optional `envsetup.toml` in the project
//! directory. Every key has a default, so the file is only needed to
//! deviate from the conventional layout.

use crate::error::{Result, SetupError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked up in the project directory.
pub const SETTINGS_FILE: &str = "envsetup.toml";

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_VENV_DIR: &str = ".venv";
const DEFAULT_REQUIREMENTS: &str = "requirements.txt";
const DEFAULT_CONFIG_FILE: &str = "config.yml";
const DEFAULT_SCRIPT_PREFIX: &str = "env_";
const DEFAULT_SCRIPT_SUFFIX: &str = ".py";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Base interpreter used to create the venv.
    #[serde(default = "default_python")]
    pub python: String,

    /// Virtual environment directory, relative to the project directory.
    #[serde(default = "default_venv_dir")]
    pub venv_dir: PathBuf,

    /// Package manifest passed to `pip install -r`.
    #[serde(default = "default_requirements")]
    pub requirements: PathBuf,

    /// Configuration file that must exist before dispatch.
    #[serde(default = "default_config_file")]
    pub config_file: PathBuf,

    #[serde(default = "default_script_prefix")]
    pub script_prefix: String,

    #[serde(default = "default_script_suffix")]
    pub script_suffix: String,

    /// Run `pip install --upgrade pip` after activation.
    #[serde(default = "default_upgrade_pip")]
    pub upgrade_pip: bool,
}

fn default_python() -> String {
    DEFAULT_PYTHON.to_string()
}

fn default_venv_dir() -> PathBuf {
    PathBuf::from(DEFAULT_VENV_DIR)
}

fn default_requirements() -> PathBuf {
    PathBuf::from(DEFAULT_REQUIREMENTS)
}

fn default_config_file() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

fn default_script_prefix() -> String {
    DEFAULT_SCRIPT_PREFIX.to_string()
}

fn default_script_suffix() -> String {
    DEFAULT_SCRIPT_SUFFIX.to_string()
}

fn default_upgrade_pip() -> bool {
    true
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            venv_dir: default_venv_dir(),
            requirements: default_requirements(),
            config_file: default_config_file(),
            script_prefix: default_script_prefix(),
            script_suffix: default_script_suffix(),
            upgrade_pip: default_upgrade_pip(),
        }
    }
}

impl SetupConfig {
    /// Path of the settings file for a project directory.
    pub fn settings_path(project_dir: &Path) -> PathBuf {
        project_dir.join(SETTINGS_FILE)
    }

    /// Load settings for a project, returning defaults if the file doesn't exist.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = Self::settings_path(project_dir);

        if !path.exists() {
            log::debug!("No {} in {}, using defaults", SETTINGS_FILE, project_dir.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| SetupError::Settings {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let config: SetupConfig = toml::from_str(&content).map_err(|e| SetupError::Settings {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        log::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// File name of the dispatch script for an environment, e.g. `env_dev.py`.
    ///
    /// The name is templated verbatim; whether it names a real file is
    /// checked at dispatch time.
    pub fn script_name(&self, environment: &str) -> String {
        format!("{}{}{}", self.script_prefix, environment, self.script_suffix)
    }
}
