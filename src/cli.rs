//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use log::debug;

use pride::defaults::GLOBAL_CONFIG_ENV;
use pride::output::OutputConfig;

use crate::commands::{self, Context};

/// Pride - Manage multi-repository Gradle workspaces
#[derive(Parser, Debug)]
#[command(name = "pride")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Print progress for every module and run the build tool verbosely
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory of the pride to work with.
    ///
    /// Defaults to the current directory; commands other than `init` also
    /// search its parent directories.
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pride_dir: Option<PathBuf>,

    /// Global configuration file, `~/.prideconfig` by default.
    #[arg(long, global = true, value_name = "FILE", env = GLOBAL_CONFIG_ENV)]
    global_config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a pride in the current directory
    Init(commands::init::InitArgs),

    /// Add existing directories or repositories as modules
    Add(commands::add::AddArgs),

    /// Read and write configuration values
    Config(commands::config::ConfigArgs),

    /// List modules and their version control status
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),

    /// Remove modules from the pride
    #[command(visible_alias = "rm")]
    Remove(commands::remove::RemoveArgs),

    /// Export the pride configuration for `init --import`
    Export(commands::export::ExportArgs),

    /// Run Gradle from the root of the pride
    Gradle(commands::gradle::GradleArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        init_logging(&self.log_level);

        let directory = match self.pride_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to get current directory")?,
        };
        let context = Context {
            directory,
            global_config: self
                .global_config
                .unwrap_or_else(pride::defaults::default_global_config),
            output: OutputConfig::from_env_and_flag(&self.color),
            verbose: self.verbose,
        };
        debug!("Running with {:?}", context);

        match self.command {
            Commands::Init(args) => commands::init::execute(&context, args),
            Commands::Add(args) => commands::add::execute(&context, args),
            Commands::Config(args) => commands::config::execute(&context, args),
            Commands::List(args) => commands::list::execute(&context, args),
            Commands::Remove(args) => commands::remove::execute(&context, args),
            Commands::Export(args) => commands::export::execute(&context, args),
            Commands::Gradle(args) => commands::gradle::execute(&context, args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` records to stderr. `RUST_LOG` takes precedence over the flag.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
