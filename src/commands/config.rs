//! # Config Command Implementation
//!
//! Reads and writes configuration keys.
//!
//! - `pride config <key>` prints the effective value: workspace-local first,
//!   then global. Exits with 1 when the key is not set.
//! - `pride config <key> <value>` sets the key, `--default` only when it is not
//!   set yet.
//! - `pride config --unset <key>` removes the key. Exits with 1, writing
//!   nothing, when the key was not set.
//!
//! Writes go to the local scope inside a pride and to the global scope
//! outside one, unless `--global` or `--local` says otherwise.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use log::debug;

use pride::config::{ConfigFile, RuntimeConfig, MODULES_PREFIX};
use pride::output::Reporter;
use pride::suggestions;
use pride::workspace::Workspace;

use super::{not_found, Context};

/// Read and write configuration values
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Use the global configuration file
    #[arg(long, conflicts_with = "local")]
    pub global: bool,

    /// Use the configuration of the current pride only
    #[arg(long)]
    pub local: bool,

    /// Remove the key
    #[arg(long, conflicts_with_all = ["value", "default"])]
    pub unset: bool,

    /// Only set the value when the key is not set yet
    #[arg(long, requires = "value")]
    pub default: bool,

    /// Configuration key, e.g. `gradle.home`
    pub key: String,

    /// New value for the key
    pub value: Option<String>,
}

/// Execute the `config` command.
pub fn execute(context: &Context, args: ConfigArgs) -> Result<ExitCode> {
    if args.key.starts_with(MODULES_PREFIX) && (args.unset || args.value.is_some()) {
        anyhow::bail!(
            "Module entries are managed by 'pride add' and 'pride remove'\n\n\
             hint: Use 'pride list' to see the registered modules"
        );
    }

    let global = context.load_global_config()?;
    let root = Workspace::find_root(&context.directory);
    if args.local && root.is_none() {
        return Err(suggestions::not_a_workspace(&context.directory));
    }
    let local = match &root {
        Some(root) => Some(ConfigFile::load(Workspace::config_file(root))?),
        None => None,
    };
    let reporter = context.reporter();

    if !args.unset && args.value.is_none() {
        let config = if args.global {
            RuntimeConfig::global_only(global)
        } else if args.local {
            RuntimeConfig::new(ConfigFile::in_memory(), local)
        } else {
            RuntimeConfig::new(global, local)
        };
        return Ok(match config.get(&args.key) {
            Some(value) => {
                reporter.info(value);
                ExitCode::SUCCESS
            }
            None => not_found(),
        });
    }

    let mut file = match local {
        Some(local) if !args.global => local,
        _ => global,
    };

    if args.unset {
        if !file.unset(&args.key) {
            debug!("{} is not set; nothing to write", args.key);
            return Ok(not_found());
        }
    } else if let Some(value) = &args.value {
        if args.default && file.contains(&args.key) {
            debug!("{} is already set; keeping it", args.key);
            return Ok(ExitCode::SUCCESS);
        }
        file.set(&args.key, value);
    }
    file.save()?;
    Ok(ExitCode::SUCCESS)
}
