//! # Remove Command Implementation
//!
//! This module implements the `remove` subcommand, which unregisters modules
//! and deletes their checkouts.
//!
//! ## Functionality
//!
//! - **Selection**: Each argument is a regex matched against whole module
//!   names; patterns that select nothing only produce a warning (exit 1)
//! - **Change check**: Refuses to run when any named module has uncommitted
//!   or unpublished work, listing all of them, unless `--force`
//! - **Removal**: Unregisters each module and deletes its directory; a
//!   directory that cannot be deleted does not undo the unregistration
//! - **Descriptors**: Saves the registry and regenerates the descriptors
//!   before reporting modules whose removal was incomplete

use std::fs;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use log::debug;
use regex::Regex;

use pride::batch::BatchExecutor;
use pride::error::Error;
use pride::initializer::Initializer;
use pride::output::Reporter;
use pride::suggestions;
use pride::workspace::ModuleFilter;

use super::{not_found, Context};

/// Remove modules from the pride
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Remove modules even if they have local changes
    #[arg(short, long)]
    pub force: bool,

    /// Regex patterns selecting the modules to remove
    #[arg(value_name = "PATTERN")]
    pub modules: Vec<String>,
}

/// Execute the `remove` command.
pub fn execute(context: &Context, args: RemoveArgs) -> Result<ExitCode> {
    if args.modules.is_empty() {
        return Err(suggestions::no_modules_to_remove());
    }

    for pattern in &args.modules {
        if let Err(e) = Regex::new(pattern) {
            return Err(suggestions::invalid_regex(pattern, &e));
        }
    }
    let filter = ModuleFilter::new(&args.modules)?;

    let mut workspace = context.load_workspace()?;
    let reporter = context.reporter();
    let names: Vec<String> = workspace
        .list_modules(&filter)
        .into_iter()
        .map(|module| module.name)
        .collect();
    if names.is_empty() {
        reporter.warn("No matching modules found");
        return Ok(not_found());
    }

    let registry = context.vcs_registry(&workspace);
    if !args.force {
        let changed = workspace.changed_modules(&registry, &names)?;
        if !changed.is_empty() {
            return Err(Error::ModulesHaveChanges { modules: changed }.into());
        }
    }

    let outcome = BatchExecutor::new("Removing", &reporter).execute(&names, |name, _, _| {
        workspace.remove_module(name)?;
        let directory = workspace.module_directory(name);
        if directory.exists() {
            debug!("Deleting {}", directory.display());
            fs::remove_dir_all(&directory)?;
        }
        reporter.info(&format!("Removed {}", name));
        Ok(())
    });

    workspace.save()?;
    let tool = context.build_tool(&workspace);
    Initializer::new(&tool, &reporter).reinitialize(&workspace)?;

    outcome.into_result()?;
    Ok(ExitCode::SUCCESS)
}
