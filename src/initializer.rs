//! # Workspace Initialization
//!
//! Regenerates the build descriptors of a workspace from the current module
//! registry. Every pass starts from nothing:
//!
//! 1. optionally generate a build tool wrapper in the root,
//! 2. delete any previously generated descriptor files,
//! 3. fetch the project tree of every module whose directory exists,
//! 4. merge the trees into one namespace,
//! 5. write fresh descriptors.
//!
//! Any failure aborts the pass and is surfaced as
//! [`Error::Initialization`]. Since step 2 already ran, a failed pass leaves
//! the workspace without descriptors rather than with stale ones.

use std::path::PathBuf;

use log::{debug, info};

use crate::batch::BatchExecutor;
use crate::build_tool::BuildTool;
use crate::config::GRADLE_WRAPPER;
use crate::descriptor;
use crate::error::{Error, Result};
use crate::merge::{merge_project_models, MergedProject};
use crate::model::{ProjectModel, ProjectModelAccessor};
use crate::output::Reporter;
use crate::workspace::{Module, Workspace};

/// Drives descriptor regeneration for a workspace.
pub struct Initializer<'a> {
    build_tool: &'a dyn BuildTool,
    reporter: &'a dyn Reporter,
}

impl<'a> Initializer<'a> {
    pub fn new(build_tool: &'a dyn BuildTool, reporter: &'a dyn Reporter) -> Self {
        Self {
            build_tool,
            reporter,
        }
    }

    /// Regenerate the descriptors of `workspace`, generating a wrapper first
    /// when `with_wrapper` is set.
    pub fn initialize(
        &self,
        workspace: &Workspace,
        with_wrapper: bool,
    ) -> Result<Vec<MergedProject>> {
        self.run(workspace, with_wrapper).map_err(Error::initialization)
    }

    /// Regenerate the descriptors after the module set changed. The wrapper
    /// is regenerated only when the workspace is configured for it.
    pub fn reinitialize(&self, workspace: &Workspace) -> Result<Vec<MergedProject>> {
        let with_wrapper = workspace.config().get_bool(GRADLE_WRAPPER, false)
            && !self.wrapper_present(workspace);
        self.initialize(workspace, with_wrapper)
    }

    fn wrapper_present(&self, workspace: &Workspace) -> bool {
        workspace.root().join("gradlew").is_file()
    }

    fn run(&self, workspace: &Workspace, with_wrapper: bool) -> Result<Vec<MergedProject>> {
        let root = workspace.root();
        if with_wrapper {
            debug!("Generating build tool wrapper in {}", root.display());
            self.build_tool.generate_wrapper(root)?;
        }

        descriptor::cleanup(root)?;

        let present: Vec<Module> = workspace
            .modules()
            .iter()
            .filter(|module| {
                let directory = workspace.module_directory(&module.name);
                let valid = Workspace::is_valid_module_directory(&directory);
                if !valid {
                    self.reporter.warn(&format!(
                        "Module '{}' is missing from {}; skipping it",
                        module.name,
                        directory.display()
                    ));
                }
                valid
            })
            .cloned()
            .collect();

        let accessor = ProjectModelAccessor::new(self.build_tool);
        let mut models: Vec<(PathBuf, ProjectModel)> = Vec::with_capacity(present.len());
        BatchExecutor::new("Resolving", self.reporter)
            .strict()
            .execute(&present, |module, _, _| {
                let directory = workspace.module_directory(&module.name);
                let model = accessor.root_project_model(&directory)?;
                models.push((directory, model));
                Ok(())
            })
            .into_first_error()?;

        let merged = merge_project_models(root, &models)?;
        descriptor::write(root, &merged)?;
        info!(
            "Generated descriptors for {} modules ({} projects)",
            models.len(),
            merged.len()
        );
        Ok(merged)
    }
}
