//! # List Command Implementation
//!
//! This module implements the `list` subcommand, which prints the modules of
//! the pride together with their version control status:
//!
//! ```text
//! M  lib-core  main   @1a2b3c4 (git)
//!  M app       trunk  @1234 (svn)
//! ```
//!
//! The first column shows `M` when the module has unpublished commits, the
//! second when it has uncommitted changes. `--short` prints names only.
//!
//! This command is a safe, read-only operation. It exits with 1 when no module
//! matches the `--include` patterns, with a warning, or when the pride
//! has no modules at all.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use regex::Regex;

use pride::batch::BatchExecutor;
use pride::output::Reporter;
use pride::suggestions;
use pride::vcs::VcsStatus;
use pride::workspace::{Module, ModuleFilter};

use super::{not_found, Context};

/// List modules and their version control status
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list modules whose whole name matches the regex PATTERN
    #[arg(short = 'I', long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Print module names only
    #[arg(short, long)]
    pub short: bool,
}

/// Execute the `list` command.
pub fn execute(context: &Context, args: ListArgs) -> Result<ExitCode> {
    for pattern in &args.include {
        if let Err(e) = Regex::new(pattern) {
            return Err(suggestions::invalid_regex(pattern, &e));
        }
    }
    let filter = ModuleFilter::new(&args.include)?;

    let workspace = context.load_workspace()?;
    let modules = workspace.list_modules(&filter);
    let reporter = context.reporter();
    if modules.is_empty() {
        if !filter.is_empty() {
            reporter.warn("No modules match the given patterns");
        }
        return Ok(not_found());
    }

    if args.short {
        for module in &modules {
            reporter.info(&module.name);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let registry = context.vcs_registry(&workspace);
    let mut rows: Vec<(Module, VcsStatus)> = Vec::new();
    let outcome = BatchExecutor::new("Checking", &reporter).execute(&modules, |module, _, _| {
        let backend = registry.backend(&module.vcs)?;
        let status = backend.status(&workspace.module_directory(&module.name))?;
        rows.push((module.clone(), status));
        Ok(())
    });

    let name_width = workspace
        .modules()
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(0);
    let branch_width = rows
        .iter()
        .filter_map(|(_, status)| status.branch.as_ref().map(String::len))
        .max()
        .unwrap_or(0);
    for (module, status) in &rows {
        reporter.info(&format_status_line(module, status, name_width, branch_width));
    }

    outcome.into_result()?;
    Ok(ExitCode::SUCCESS)
}

/// One status line: change markers, name, branch, revision and backend.
///
/// Names and branches are padded to the given widths plus two spaces; a
/// checkout without a branch shows the bare revision.
pub fn format_status_line(
    module: &Module,
    status: &VcsStatus,
    name_width: usize,
    branch_width: usize,
) -> String {
    let mut line = format!(
        "{}{} {:<width$}",
        if status.unpublished { 'M' } else { ' ' },
        if status.uncommitted { 'M' } else { ' ' },
        module.name,
        width = name_width + 2
    );
    if let Some(branch) = status.branch.as_deref().filter(|b| !b.is_empty()) {
        line.push_str(&format!("{:<width$}@", branch, width = branch_width + 2));
    }
    line.push_str(&format!("{} ({})", status.revision, module.vcs));
    line
}
