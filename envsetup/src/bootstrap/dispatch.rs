//! Environment script dispatch.

use super::venv::ActiveVenv;
use crate::console::Console;
use crate::error::{Result, SetupError};
use crate::runner::CommandRunner;
use std::path::Path;

/// Run the environment script with the venv interpreter.
///
/// The script runs from `project_dir` with stdio inherited; any non-zero
/// exit is fatal.
pub fn run_script(
    runner: &impl CommandRunner,
    console: &Console,
    venv: &ActiveVenv,
    project_dir: &Path,
    script: &Path,
    script_args: &[String],
) -> Result<()> {
    if !script.is_file() {
        return Err(SetupError::ScriptMissing(script.to_path_buf()));
    }

    console.info(&format!("Running {}...", script.display()));

    let spec = venv
        .python_command()
        .arg(script)
        .args(script_args)
        .current_dir(project_dir)
        .inherit_stdio();

    let output = runner.run(&spec).map_err(|source| SetupError::Spawn {
        program: spec.display_program(),
        source,
    })?;

    if !output.success {
        return Err(SetupError::ScriptFailed {
            script: script.to_path_buf(),
            code: output.code,
        });
    }

    console.success(&format!("{} completed", script.display()));
    Ok(())
}
