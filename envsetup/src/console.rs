//! Status lines printed to stderr.
//!
//! Step headers, successes, warnings and errors are user-facing output, not
//! log records, so they are printed regardless of the log filter.

use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";

#[derive(Debug, Clone, Copy)]
pub struct Console {
    color: bool,
    quiet: bool,
}

impl Console {
    /// Console that colours output when stderr is a terminal.
    pub fn new(quiet: bool) -> Self {
        Self {
            color: std::io::stderr().is_terminal(),
            quiet,
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            color: false,
            quiet: false,
        }
    }

    /// `[n/total] message` header for a pipeline step.
    pub fn step(&self, n: usize, total: usize, message: &str) {
        if self.quiet {
            return;
        }
        eprintln!();
        eprintln!("{}", self.paint(BOLD, &format!("[{}/{}] {}", n, total, message)));
    }

    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", self.paint(BLUE, "[INFO]"), message);
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        eprintln!("{} {}", self.paint(GREEN, "[SUCCESS]"), message);
    }

    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.paint(YELLOW, "[WARNING]"), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", self.paint(RED, "[ERROR]"), message);
    }

    /// Final banner once every step has passed.
    pub fn banner(&self, message: &str) {
        eprintln!();
        eprintln!("{}", self.paint(GREEN, &format!("==> {}", message)));
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}
