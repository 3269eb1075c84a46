//! # Completions Command Implementation
//!
//! Prints a shell completion script for `pride` to stdout.
//!
//! ```bash
//! pride completions bash > ~/.local/share/bash-completion/completions/pride
//! pride completions zsh > ~/.zfunc/_pride
//! ```

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<ExitCode> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
