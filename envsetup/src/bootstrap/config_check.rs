//! Configuration file presence check and optional YAML validation.

use crate::console::Console;
use crate::error::{Result, SetupError};
use serde::Deserialize;
use std::path::Path;

/// Keys the environment scripts read from `config.yml`.
///
/// Anything else in the file is left to the scripts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub devs: Option<DevList>,

    #[serde(default)]
    pub project: Option<String>,
}

/// Developer accounts, either `"alice, bob"` or a YAML list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DevList {
    Csv(String),
    List(Vec<String>),
}

impl DevList {
    /// Trimmed, non-empty names.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            DevList::Csv(s) => s.split(',').collect(),
            DevList::List(items) => items.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl EnvironmentConfig {
    pub fn dev_names(&self) -> Vec<String> {
        self.devs.as_ref().map(DevList::names).unwrap_or_default()
    }
}

/// Fail if the configuration file is missing.
pub fn check_config(console: &Console, path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(SetupError::ConfigMissing(path.to_path_buf()));
    }

    console.success(&format!("Found {}", path.display()));
    Ok(())
}

/// Parse the configuration file as a YAML mapping.
pub fn validate_config(console: &Console, path: &Path) -> Result<EnvironmentConfig> {
    let invalid = |reason: String| SetupError::ConfigInvalid {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let config = parse_config(&content).map_err(invalid)?;

    let devs = config.dev_names();
    if devs.is_empty() {
        console.warn(&format!("No developers specified in {}", path.display()));
    } else {
        console.info(&format!("Developers: {}", devs.join(", ")));
    }
    if let Some(project) = &config.project {
        console.info(&format!("Shared project: {}", project));
    }

    Ok(config)
}

fn parse_config(content: &str) -> std::result::Result<EnvironmentConfig, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    match value {
        serde_yaml::Value::Null => Ok(EnvironmentConfig::default()),
        serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value).map_err(|e| e.to_string()),
        _ => Err("expected a mapping at the top level".to_string()),
    }
}
