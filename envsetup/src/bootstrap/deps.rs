//! Interpreter and `venv` module presence check.

use crate::error::{Result, SetupError};
use crate::runner::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};

/// Check that the base interpreter exists and can create venvs.
///
/// Every missing item is collected before failing, so the error names all
/// of them at once. Returns the resolved interpreter path.
pub fn check_dependencies(runner: &impl CommandRunner, python: &str) -> Result<PathBuf> {
    let name = display_name(python);
    let mut missing = Vec::new();

    let resolved = runner.locate(python);
    if resolved.is_none() {
        missing.push(name.clone());
    }

    let has_venv = match &resolved {
        Some(path) => can_import_venv(runner, path),
        None => false,
    };
    if !has_venv {
        missing.push(format!("{}-venv", name));
    }

    match resolved {
        Some(path) if missing.is_empty() => Ok(path),
        _ => Err(SetupError::MissingDependencies(missing)),
    }
}

/// Version string reported by an interpreter, e.g. `Python 3.12.1`.
pub fn interpreter_version(runner: &impl CommandRunner, python: &Path) -> Option<String> {
    let output = runner
        .run(&CommandSpec::new(python).arg("--version"))
        .ok()?;
    if !output.success {
        return None;
    }

    // Python 2 and some early 3.x builds print the version on stderr
    let text = if output.stdout.trim().is_empty() {
        output.stderr.trim()
    } else {
        output.stdout.trim()
    };
    (!text.is_empty()).then(|| text.to_string())
}

fn can_import_venv(runner: &impl CommandRunner, python: &Path) -> bool {
    match runner.run(&CommandSpec::new(python).args(["-c", "import venv"])) {
        Ok(output) => output.success,
        Err(e) => {
            log::debug!("Could not run {}: {}", python.display(), e);
            false
        }
    }
}

/// `python3` for both `python3` and `/usr/local/bin/python3`.
fn display_name(python: &str) -> String {
    Path::new(python)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| python.to_string())
}
