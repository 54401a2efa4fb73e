use std::path::PathBuf;
use thiserror::Error;

/// Fatal setup failures. Each variant stops the pipeline.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Missing required dependencies: {}", .0.join(", "))]
    MissingDependencies(Vec<String>),

    #[error("Failed to run {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve project directory {}", .path.display())]
    ProjectDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove existing virtual environment at {}", .path.display())]
    VenvRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create virtual environment at {}: {detail}", .path.display())]
    VenvCreation { path: PathBuf, detail: String },

    #[error("Failed to activate virtual environment: interpreter not found at {}", .0.display())]
    VenvActivation(PathBuf),

    #[error("Failed to install dependencies from {}: {detail}", .path.display())]
    Install { path: PathBuf, detail: String },

    #[error("Configuration file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Invalid configuration file {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid settings file {}: {reason}", .path.display())]
    Settings { path: PathBuf, reason: String },

    #[error("Environment script not found: {}", .0.display())]
    ScriptMissing(PathBuf),

    #[error("Environment script {} failed{}", .script.display(), .code.map(|c| format!(" with exit code {}", c)).unwrap_or_else(|| " (terminated by signal)".to_string()))]
    ScriptFailed { script: PathBuf, code: Option<i32> },
}

pub type Result<T> = std::result::Result<T, SetupError>;
