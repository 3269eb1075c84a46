//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `pride`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the shared [`Context`] and the parsed
//!   `Args`, and returns the process exit code.
//!
//! ## Exit codes
//!
//! - `0`: success
//! - `1`: nothing found or nothing changed (e.g. `config --unset` of a
//!   missing key, `list` without matches)
//! - `2`: fatal error, printed by `main`

pub mod add;
pub mod completions;
pub mod config;
pub mod export;
pub mod gradle;
pub mod init;
pub mod list;
pub mod remove;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

use pride::build_tool::GradleBuildTool;
use pride::config::ConfigFile;
use pride::error::Error;
use pride::output::{ConsoleReporter, OutputConfig};
use pride::suggestions;
use pride::vcs::VcsRegistry;
use pride::workspace::Workspace;

/// Exit code for "nothing found / nothing changed".
pub const EXIT_NOT_FOUND: u8 = 1;
/// Exit code for fatal errors.
pub const EXIT_FATAL: u8 = 2;

pub fn not_found() -> ExitCode {
    ExitCode::from(EXIT_NOT_FOUND)
}

/// Settings shared by every command invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory the command operates on.
    pub directory: PathBuf,
    /// Path of the global configuration file.
    pub global_config: PathBuf,
    pub output: OutputConfig,
    pub verbose: bool,
}

impl Context {
    pub fn reporter(&self) -> ConsoleReporter {
        ConsoleReporter::new(self.output.clone(), self.verbose)
    }

    pub fn load_global_config(&self) -> Result<ConfigFile> {
        Ok(ConfigFile::load(&self.global_config)?)
    }

    /// Open the workspace enclosing the working directory.
    pub fn load_workspace(&self) -> Result<Workspace> {
        let global = self.load_global_config()?;
        Workspace::load(&self.directory, global).map_err(|e| match e {
            Error::NotAWorkspace { path } => suggestions::not_a_workspace(&path),
            other => other.into(),
        })
    }

    pub fn build_tool(&self, workspace: &Workspace) -> GradleBuildTool {
        GradleBuildTool::from_config(workspace.config(), self.verbose)
    }

    pub fn vcs_registry(&self, workspace: &Workspace) -> VcsRegistry {
        VcsRegistry::from_config(workspace.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context(directory: PathBuf, global_config: PathBuf) -> Context {
        Context {
            directory,
            global_config,
            output: OutputConfig { use_color: false },
            verbose: false,
        }
    }

    #[test]
    fn test_load_workspace_outside_pride_has_hint() {
        let temp_dir = TempDir::new().unwrap();
        let context = context(
            temp_dir.path().to_path_buf(),
            temp_dir.path().join(".prideconfig"),
        );
        let message = format!("{:#}", context.load_workspace().unwrap_err());
        assert!(message.contains("No pride found"));
        assert!(message.contains("pride init"));
    }

    #[test]
    fn test_missing_global_config_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let context = context(
            temp_dir.path().to_path_buf(),
            temp_dir.path().join("missing"),
        );
        assert!(context.load_global_config().unwrap().entries().is_empty());
    }
}
