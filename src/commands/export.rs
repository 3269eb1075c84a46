//! # Export Command Implementation
//!
//! Writes the pride's settings and module list, with the remote of every
//! module, in the format `pride init --import` reads. Output goes to stdout
//! unless `--output` names a file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;

/// Export the pride configuration for `init --import`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `export` command.
pub fn execute(context: &Context, args: ExportArgs) -> Result<ExitCode> {
    let workspace = context.load_workspace()?;
    let registry = context.vcs_registry(&workspace);
    let exported = workspace.export(&registry);

    let mut content = Vec::new();
    exported.write_to(&mut content)?;
    match args.output {
        Some(path) => fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout().lock().write_all(&content)?,
    }
    Ok(ExitCode::SUCCESS)
}
