//! Virtual environment creation, activation, and pip self-upgrade.

use super::deps::interpreter_version;
use super::stamp::VenvStamp;
use crate::console::Console;
use crate::error::{Result, SetupError};
use crate::platform::VenvLayout;
use crate::runner::{CommandRunner, CommandSpec};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Whether the venv was freshly created or picked up from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvState {
    Created,
    Reused,
}

/// An activated virtual environment.
///
/// Activation has no process-wide effect: commands built through
/// [`ActiveVenv::python_command`] carry the environment a shell `activate`
/// script would have set up.
#[derive(Debug, Clone)]
pub struct ActiveVenv {
    layout: VenvLayout,
    python: PathBuf,
}

impl ActiveVenv {
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    /// A command running the venv interpreter with activation applied.
    pub fn python_command(&self) -> CommandSpec {
        CommandSpec::new(&self.python)
            .env("VIRTUAL_ENV", self.layout.root())
            .env("PATH", self.search_path())
            .env_remove("PYTHONHOME")
    }

    /// `PATH` with the venv bin directory in front.
    fn search_path(&self) -> OsString {
        let current = std::env::var_os("PATH").unwrap_or_default();
        let paths =
            std::iter::once(self.layout.bin_dir()).chain(std::env::split_paths(&current));
        // join_paths only fails on entries containing the separator; fall back
        // to the bin dir alone rather than dropping activation
        std::env::join_paths(paths).unwrap_or_else(|_| self.layout.bin_dir().into_os_string())
    }
}

/// Create the venv, or reuse it with a warning if it already exists.
pub fn ensure_venv(
    runner: &impl CommandRunner,
    console: &Console,
    base_python: &Path,
    venv_dir: &Path,
    recreate: bool,
) -> Result<VenvState> {
    if venv_dir.exists() {
        if !recreate {
            console.warn(&format!(
                "Virtual environment already exists at {}, reusing it",
                venv_dir.display()
            ));
            warn_on_version_drift(runner, console, base_python, venv_dir);
            return Ok(VenvState::Reused);
        }

        console.info(&format!(
            "Removing existing virtual environment at {}",
            venv_dir.display()
        ));
        std::fs::remove_dir_all(venv_dir).map_err(|source| SetupError::VenvRemoval {
            path: venv_dir.to_path_buf(),
            source,
        })?;
    }

    console.info(&format!(
        "Creating virtual environment at {}...",
        venv_dir.display()
    ));

    let spec = CommandSpec::new(base_python).args(["-m", "venv"]).arg(venv_dir);
    let output = runner.run(&spec).map_err(|source| SetupError::Spawn {
        program: spec.display_program(),
        source,
    })?;

    if !output.success {
        return Err(SetupError::VenvCreation {
            path: venv_dir.to_path_buf(),
            detail: output.failure_detail(),
        });
    }

    let stamp = VenvStamp::new(interpreter_version(runner, base_python));
    if let Err(e) = stamp.save(venv_dir) {
        console.warn(&format!("Could not record venv details: {:#}", e));
    }

    console.success("Virtual environment created");
    Ok(VenvState::Created)
}

/// Resolve the venv interpreter. Fails if the venv has none.
pub fn activate(venv_dir: &Path) -> Result<ActiveVenv> {
    let layout = VenvLayout::new(venv_dir);
    let python = layout.python();

    if !python.exists() {
        return Err(SetupError::VenvActivation(python));
    }

    log::debug!("Activated virtual environment {}", layout);
    Ok(ActiveVenv { layout, python })
}

/// Upgrade pip inside the venv. Returns whether the upgrade succeeded;
/// failure only warns.
pub fn upgrade_pip(runner: &impl CommandRunner, console: &Console, venv: &ActiveVenv) -> bool {
    console.info("Upgrading pip...");

    let spec = venv
        .python_command()
        .args(["-m", "pip", "install", "--upgrade", "pip"]);

    let detail = match runner.run(&spec) {
        Ok(output) if output.success => {
            console.success("pip upgraded");
            return true;
        }
        Ok(output) => output.failure_detail(),
        Err(e) => e.to_string(),
    };

    log::debug!("pip upgrade failed: {}", detail);
    console.warn("Failed to upgrade pip, continuing with the installed version");
    false
}

fn warn_on_version_drift(
    runner: &impl CommandRunner,
    console: &Console,
    base_python: &Path,
    venv_dir: &Path,
) {
    let stamp = match VenvStamp::load(venv_dir) {
        Ok(Some(stamp)) => stamp,
        Ok(None) => return,
        Err(e) => {
            log::debug!("Ignoring venv stamp: {:#}", e);
            return;
        }
    };

    let current = interpreter_version(runner, base_python);
    if !stamp.python_matches(current.as_deref()) {
        console.warn(&format!(
            "Virtual environment was created with {} but {} is now {}; pass --recreate-venv to rebuild it",
            stamp.python_version.as_deref().unwrap_or("an unknown Python"),
            base_python.display(),
            current.as_deref().unwrap_or("unknown"),
        ));
    }
}
