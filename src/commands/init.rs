//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which turns a directory into
//! a pride.
//!
//! ## Functionality
//!
//! - **Marker**: Writes `.pride/version` and a fresh `.pride/config`
//! - **Auto-discovery**: Registers existing checkouts found in immediate
//!   subdirectories, in sorted name order, unless `--no-add-existing`
//! - **Import**: Recreates an exported pride from a file or stdin, checking out
//!   modules that are not on disk yet
//! - **Force Mode**: Re-initializes an existing pride, keeping its settings
//!   unless `--ignore-config`
//! - **Descriptors**: Generates `settings.gradle` and `build.gradle`, and a
//!   Gradle wrapper when requested

use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Args;

use pride::batch::BatchExecutor;
use pride::config::{ConfigFile, GRADLE_WRAPPER, MODULES_PREFIX};
use pride::error::Error;
use pride::initializer::Initializer;
use pride::output::Reporter;
use pride::suggestions;
use pride::workspace::{read_modules, Module, Workspace};

use super::Context;

/// Create a pride in the current directory
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Re-initialize an existing pride
    #[arg(short, long)]
    pub force: bool,

    /// Do not keep the configuration of the pride being re-initialized
    #[arg(long, requires = "force")]
    pub ignore_config: bool,

    /// Generate a Gradle wrapper, overriding `gradle.wrapper`
    #[arg(long, conflicts_with = "no_wrapper")]
    pub with_wrapper: bool,

    /// Do not generate a Gradle wrapper, overriding `gradle.wrapper`
    #[arg(long)]
    pub no_wrapper: bool,

    /// Do not register existing checkouts found in subdirectories
    #[arg(long)]
    pub no_add_existing: bool,

    /// Import an exported pride configuration from FILE, or `-` for stdin
    #[arg(long, value_name = "FILE")]
    pub import: Option<String>,
}

/// Execute the `init` command.
pub fn execute(context: &Context, args: InitArgs) -> Result<ExitCode> {
    fs::create_dir_all(&context.directory)
        .with_context(|| format!("Failed to create {}", context.directory.display()))?;
    let root = fs::canonicalize(&context.directory)?;
    let global = context.load_global_config()?;

    let mut settings = ConfigFile::in_memory();
    if let Some(existing) = Workspace::find_root(&root) {
        if !args.force {
            return Err(suggestions::workspace_exists(&existing));
        }
        if existing == root && !args.ignore_config {
            settings = ConfigFile::load(Workspace::config_file(&root))?;
        }
    }

    let imported = match &args.import {
        Some(source) => Some(read_import(source)?),
        None => None,
    };
    if let Some(imported) = &imported {
        for (key, value) in imported.entries() {
            if !key.starts_with(MODULES_PREFIX) {
                settings.set(&key, &value);
            }
        }
    }

    let reporter = context.reporter();
    let mut workspace = Workspace::create(&root, global, &settings)?;
    let registry = context.vcs_registry(&workspace);

    let mut failures = Vec::new();
    if let Some(imported) = &imported {
        let modules = read_modules(imported)?;
        let outcome = BatchExecutor::new("Importing", &reporter).execute(&modules, |module, _, _| {
            import_module(&mut workspace, &registry, module)
        });
        failures.push(outcome);
    }

    if !args.no_add_existing {
        let existing = workspace.discover_unregistered(&registry)?;
        let outcome = BatchExecutor::new("Adding", &reporter).execute(&existing, |name, _, _| {
            workspace.add_existing(&registry, name).map(|_| ())
        });
        failures.push(outcome);
    }

    workspace.save()?;

    let with_wrapper = workspace.config().override_bool(
        GRADLE_WRAPPER,
        false,
        args.with_wrapper,
        args.no_wrapper,
    );
    let tool = context.build_tool(&workspace);
    Initializer::new(&tool, &reporter).initialize(&workspace, with_wrapper)?;

    reporter.info(&format!(
        "Initialized pride in {} with {} modules",
        root.display(),
        workspace.modules().len()
    ));

    for outcome in failures {
        outcome.into_result()?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Read an exported configuration from a file, or stdin for `-`.
fn read_import(source: &str) -> Result<ConfigFile> {
    if source == "-" {
        return Ok(ConfigFile::read_from(&mut io::stdin().lock())?);
    }
    let mut file = fs::File::open(Path::new(source))
        .with_context(|| format!("Failed to open import file {}", source))?;
    Ok(ConfigFile::read_from(&mut file)?)
}

/// Register an imported module, checking it out first when it is not on disk.
fn import_module(
    workspace: &mut Workspace,
    registry: &pride::vcs::VcsRegistry,
    module: &Module,
) -> pride::error::Result<()> {
    let directory = workspace.module_directory(&module.name);
    if !Workspace::is_valid_module_directory(&directory) {
        let remote = module.remote.as_deref().ok_or_else(|| Error::Config {
            message: format!("module '{}' has no remote to check out from", module.name),
        })?;
        registry.backend(&module.vcs)?.checkout(remote, &directory)?;
    }
    workspace.add_module(module.clone())
}
