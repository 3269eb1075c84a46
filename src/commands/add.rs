//! # Add Command Implementation
//!
//! This module implements the `add` subcommand. Each argument is either the
//! name of an existing checkout under the pride root, or a repository locator
//! (anything containing `/`, `\` or `:`) that is checked out into
//! `<root>/<name>` first, the name being the last path segment without `.git`.
//!
//! Additions run as a tolerant batch: every argument is attempted, successful
//! ones are saved and the descriptors regenerated, and failures are reported
//! together at the end.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use pride::batch::BatchExecutor;
use pride::initializer::Initializer;
use pride::output::Reporter;
use pride::path::is_locator;
use pride::suggestions;

use super::Context;

/// Add existing directories or repositories as modules
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Version control system used to check out repository locators
    #[arg(long, value_name = "TYPE", default_value = "git")]
    pub vcs: String,

    /// Module directory names or repository locators
    #[arg(required = true, value_name = "MODULE")]
    pub modules: Vec<String>,
}

/// Execute the `add` command.
pub fn execute(context: &Context, args: AddArgs) -> Result<ExitCode> {
    let mut workspace = context.load_workspace()?;
    let registry = context.vcs_registry(&workspace);
    let reporter = context.reporter();

    if args.modules.iter().any(|m| is_locator(m)) && registry.backend(&args.vcs).is_err() {
        return Err(suggestions::unknown_vcs(&args.vcs, &registry.type_names()));
    }

    let outcome = BatchExecutor::new("Adding", &reporter).execute(&args.modules, |item, _, _| {
        let module = if is_locator(item) {
            workspace.add_from_locator(&registry, item, &args.vcs, None)?
        } else {
            workspace.add_existing(&registry, item)?
        };
        reporter.info(&format!("Added {} ({})", module.name, module.vcs));
        Ok(())
    });

    if !outcome.succeeded.is_empty() {
        workspace.save()?;
        let tool = context.build_tool(&workspace);
        Initializer::new(&tool, &reporter).reinitialize(&workspace)?;
    }

    outcome.into_result()?;
    Ok(ExitCode::SUCCESS)
}
