//! envsetup: prepare a Python virtual environment and hand off to an
//! environment-specific setup script.
//!
//! The pipeline lives in [`bootstrap`]; every external command goes through a
//! [`runner::CommandRunner`].

pub mod bootstrap;
pub mod config;
pub mod console;
pub mod error;
pub mod platform;
pub mod runner;

pub use bootstrap::{Bootstrap, SetupOptions, SetupReport};
pub use config::SetupConfig;
pub use console::Console;
pub use error::{Result, SetupError};
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
