//! The setup pipeline.
//!
//! Five steps run in order, and the first failure stops the run:
//! 1. Dependency check: the base interpreter and its `venv` module
//! 2. Virtual environment: create or reuse, activate, upgrade pip
//! 3. Dependency installation from the requirements manifest
//! 4. Configuration file check
//! 5. Dispatch to the environment script

pub mod config_check;
pub mod deps;
pub mod dispatch;
pub mod install;
pub mod stamp;
pub mod venv;

use crate::config::SetupConfig;
use crate::console::Console;
use crate::error::{Result, SetupError};
use crate::runner::CommandRunner;
use std::path::{Path, PathBuf};
use venv::VenvState;

pub const TOTAL_STEPS: usize = 5;

/// Per-run choices that don't come from the settings file.
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Environment name, e.g. `dev` selects `env_dev.py`.
    pub environment: String,
    /// Directory holding the manifest, config file, and scripts.
    pub project_dir: PathBuf,
    /// Arguments forwarded to the environment script.
    pub script_args: Vec<String>,
    pub recreate_venv: bool,
    pub validate_config: bool,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub venv_dir: PathBuf,
    pub venv_state: VenvState,
    pub pip_upgraded: bool,
    pub dependencies_installed: bool,
    pub script: PathBuf,
}

pub struct Bootstrap<'a, R: CommandRunner> {
    runner: &'a R,
    console: Console,
    config: &'a SetupConfig,
    options: &'a SetupOptions,
}

impl<'a, R: CommandRunner> Bootstrap<'a, R> {
    pub fn new(
        runner: &'a R,
        console: Console,
        config: &'a SetupConfig,
        options: &'a SetupOptions,
    ) -> Self {
        Self {
            runner,
            console,
            config,
            options,
        }
    }

    /// Run every step, stopping at the first failure.
    pub fn run(&self) -> Result<SetupReport> {
        let project_dir = resolve_project_dir(&self.options.project_dir)?;
        let venv_dir = project_dir.join(&self.config.venv_dir);
        let manifest = project_dir.join(&self.config.requirements);
        let config_file = project_dir.join(&self.config.config_file);
        let script = project_dir.join(self.config.script_name(&self.options.environment));

        log::debug!(
            "Setting up '{}' in {}",
            self.options.environment,
            project_dir.display()
        );

        self.console.step(1, TOTAL_STEPS, "Checking dependencies");
        let base_python = deps::check_dependencies(self.runner, &self.config.python)?;
        self.console.success(&format!(
            "Found {} with venv support",
            base_python.display()
        ));

        self.console.step(2, TOTAL_STEPS, "Setting up virtual environment");
        let venv_state = venv::ensure_venv(
            self.runner,
            &self.console,
            &base_python,
            &venv_dir,
            self.options.recreate_venv,
        )?;
        let active = venv::activate(&venv_dir)?;
        self.console.success(&format!(
            "Activated virtual environment {}",
            active.root().display()
        ));
        let pip_upgraded = if self.config.upgrade_pip {
            venv::upgrade_pip(self.runner, &self.console, &active)
        } else {
            log::debug!("Skipping pip upgrade");
            false
        };

        self.console.step(3, TOTAL_STEPS, "Installing dependencies");
        let dependencies_installed =
            install::install_requirements(self.runner, &self.console, &active, &manifest)?;

        self.console.step(4, TOTAL_STEPS, "Checking configuration");
        config_check::check_config(&self.console, &config_file)?;
        if self.options.validate_config {
            config_check::validate_config(&self.console, &config_file)?;
        }

        self.console.step(5, TOTAL_STEPS, "Running environment script");
        dispatch::run_script(
            self.runner,
            &self.console,
            &active,
            &project_dir,
            &script,
            &self.options.script_args,
        )?;

        self.console.banner(&format!(
            "Environment '{}' setup complete",
            self.options.environment
        ));

        Ok(SetupReport {
            venv_dir,
            venv_state,
            pip_upgraded,
            dependencies_installed,
            script,
        })
    }
}

/// Anchor the project directory to the current working directory.
///
/// Every derived path must stay valid after the dispatched script changes
/// into the project directory.
fn resolve_project_dir(project_dir: &Path) -> Result<PathBuf> {
    std::path::absolute(project_dir).map_err(|source| SetupError::ProjectDir {
        path: project_dir.to_path_buf(),
        source,
    })
}
