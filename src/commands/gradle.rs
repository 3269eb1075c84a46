//! # Gradle Command Implementation
//!
//! Runs Gradle from the pride root with the given arguments, using the same
//! executable the descriptors were generated with.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use pride::build_tool::BuildTool;

use super::Context;

/// Run Gradle from the root of the pride
#[derive(Args, Debug)]
pub struct GradleArgs {
    /// Tasks and options passed to Gradle
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub arguments: Vec<String>,
}

/// Execute the `gradle` command.
pub fn execute(context: &Context, args: GradleArgs) -> Result<ExitCode> {
    let workspace = context.load_workspace()?;
    let tool = context.build_tool(&workspace);
    tool.run_build(workspace.root(), &[], &args.arguments)?;
    Ok(ExitCode::SUCCESS)
}
