//! envsetup - Prepare a Python virtual environment and run an environment setup script

use anyhow::{Context, Result};
use clap::Parser;
use envsetup::{Bootstrap, Console, SetupConfig, SetupOptions, SystemRunner};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "envsetup")]
#[command(
    about = "Create a virtual environment, install dependencies, and run env_<ENVIRONMENT>.py",
    long_about = None
)]
#[command(version)]
struct Args {
    /// Environment to set up (e.g. dev, test, prod)
    environment: String,

    /// Arguments passed through to the environment script
    #[arg(last = true)]
    script_args: Vec<String>,

    /// Directory containing config.yml, requirements.txt and the env scripts
    #[arg(short = 'C', long, default_value = ".")]
    project_dir: PathBuf,

    /// Base Python interpreter used to create the virtual environment
    #[arg(long)]
    python: Option<String>,

    /// Virtual environment directory, relative to the project directory
    #[arg(long)]
    venv_dir: Option<PathBuf>,

    /// Delete and recreate an existing virtual environment
    #[arg(long)]
    recreate_venv: bool,

    /// Parse config.yml as YAML before running the script
    #[arg(long)]
    validate_config: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    // Usage errors exit with 1 rather than clap's default 2
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Nothing left to report if stderr itself is gone
            e.print().ok();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level().as_str()),
    )
    .format_timestamp(None)
    .init();

    let console = Console::new(args.quiet);
    match run(args, console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, console: Console) -> Result<()> {
    let mut config = SetupConfig::load(&args.project_dir).context("Failed to load settings")?;
    if let Some(python) = args.python {
        config.python = python;
    }
    if let Some(venv_dir) = args.venv_dir {
        config.venv_dir = venv_dir;
    }

    let options = SetupOptions {
        environment: args.environment,
        project_dir: args.project_dir,
        script_args: args.script_args,
        recreate_venv: args.recreate_venv,
        validate_config: args.validate_config,
    };

    let runner = SystemRunner::new();
    let report = Bootstrap::new(&runner, console, &config, &options).run()?;
    log::debug!("{:?}", report);

    Ok(())
}
