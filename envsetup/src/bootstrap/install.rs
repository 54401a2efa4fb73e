//! Package installation from the requirements manifest.

use super::venv::ActiveVenv;
use crate::console::Console;
use crate::error::{Result, SetupError};
use crate::runner::CommandRunner;
use std::path::Path;

/// Install packages listed in `manifest`. A missing manifest is skipped
/// with a warning. Returns whether anything was installed.
pub fn install_requirements(
    runner: &impl CommandRunner,
    console: &Console,
    venv: &ActiveVenv,
    manifest: &Path,
) -> Result<bool> {
    if !manifest.is_file() {
        console.warn(&format!(
            "{} not found, skipping dependency installation",
            manifest.display()
        ));
        return Ok(false);
    }

    console.info(&format!("Installing dependencies from {}...", manifest.display()));

    let spec = venv
        .python_command()
        .args(["-m", "pip", "install", "-r"])
        .arg(manifest)
        .inherit_stdio();

    let output = runner.run(&spec).map_err(|source| SetupError::Spawn {
        program: spec.display_program(),
        source,
    })?;

    if !output.success {
        return Err(SetupError::Install {
            path: manifest.to_path_buf(),
            detail: output.failure_detail(),
        });
    }

    console.success("Dependencies installed");
    Ok(true)
}
