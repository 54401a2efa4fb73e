//! Mock runner for testing
//!
//! Records every command and answers with a configurable responder, so
//! pipeline steps can be tested without a Python installation.

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::platform::VenvLayout;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CommandSpec) -> std::io::Result<CommandOutput>>;

pub struct MockRunner {
    /// Programs that `locate` resolves
    programs: HashMap<String, PathBuf>,
    /// Produces the result for each command
    responder: Responder,
    /// Lay down a venv interpreter on `-m venv <dir>`
    creates_venvs: bool,
    calls: Mutex<Vec<CommandSpec>>,
}

impl MockRunner {
    /// A runner where every command succeeds and nothing is on `PATH`
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
            responder: Box::new(|_| Ok(CommandOutput::ok())),
            creates_venvs: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runner with `python3` on `PATH` that builds venvs on disk
    pub fn with_python() -> Self {
        Self::new()
            .with_program("python3", "/usr/bin/python3")
            .creating_venvs()
    }

    pub fn with_program(mut self, name: &str, path: &str) -> Self {
        self.programs.insert(name.to_string(), PathBuf::from(path));
        self
    }

    pub fn respond_with(
        mut self,
        responder: impl Fn(&CommandSpec) -> std::io::Result<CommandOutput> + 'static,
    ) -> Self {
        self.responder = Box::new(responder);
        self
    }

    pub fn creating_venvs(mut self) -> Self {
        self.creates_venvs = true;
        self
    }

    /// All commands run so far
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands whose argument list contains `arg`
    pub fn calls_with_arg(&self, arg: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.has_arg(arg))
            .collect()
    }

    fn lay_down_venv(&self, spec: &CommandSpec) {
        let Some(pos) = spec.args.iter().position(|a| a == "venv") else {
            return;
        };
        let Some(dir) = spec.args.get(pos + 1) else {
            return;
        };
        let layout = VenvLayout::new(PathBuf::from(dir));
        std::fs::create_dir_all(layout.bin_dir()).unwrap();
        std::fs::write(layout.python(), "").unwrap();
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        let output = (self.responder)(spec)?;

        if output.success && self.creates_venvs && spec.has_arg("venv") {
            self.lay_down_venv(spec);
        }

        Ok(output)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs.get(program).cloned()
    }
}
