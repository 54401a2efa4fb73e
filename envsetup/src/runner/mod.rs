//! External command execution.
//!
//! Every step of the setup pipeline shells out through a [`CommandRunner`],
//! so the pipeline can be driven by a recording mock in tests.

mod system;

#[cfg(test)]
pub mod mock;

pub use system::SystemRunner;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// A command to run: program, arguments, and environment adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub envs: Vec<(OsString, OsString)>,
    pub env_remove: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    /// Let the child write straight to our stdout/stderr instead of capturing.
    pub inherit_stdio: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            env_remove: Vec::new(),
            current_dir: None,
            inherit_stdio: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn env_remove(mut self, key: impl AsRef<OsStr>) -> Self {
        self.env_remove.push(key.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn inherit_stdio(mut self) -> Self {
        self.inherit_stdio = true;
        self
    }

    /// Program name for messages.
    pub fn display_program(&self) -> String {
        self.program.display().to_string()
    }

    /// Whether the argument list contains `arg` anywhere.
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    /// Captured stdout (empty when stdio was inherited).
    pub stdout: String,
    /// Captured stderr (empty when stdio was inherited).
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failed(code: i32, stderr: &str) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.to_string(),
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn with_stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    /// Short human-readable reason for a failure.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external commands and locates programs.
pub trait CommandRunner {
    /// Run a command to completion.
    ///
    /// `Err` means the process could not be started at all; a process that
    /// ran and failed is reported through [`CommandOutput::success`].
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput>;

    /// Resolve a program name on `PATH`. Paths are returned as-is if they exist.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}
