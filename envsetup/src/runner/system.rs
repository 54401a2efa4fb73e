//! Runner backed by real child processes.

use super::{CommandOutput, CommandRunner, CommandSpec};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Runs commands with [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        log::debug!("Running: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        for key in &spec.env_remove {
            cmd.env_remove(key);
        }
        for (key, value) in &spec.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &spec.current_dir {
            cmd.current_dir(dir);
        }

        if spec.inherit_stdio {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()?;

            return Ok(CommandOutput {
                success: status.success(),
                code: status.code(),
                ..Default::default()
            });
        }

        let output = cmd.stdin(Stdio::null()).output()?;
        let result = CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success {
            log::trace!("{} failed: {}", spec, result.failure_detail());
        }

        Ok(result)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("Could not locate {}: {}", program, e);
                None
            }
        }
    }
}
