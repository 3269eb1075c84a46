//! # Project Models
//!
//! A [`ProjectModel`] is the build tool's view of one module: a root project
//! with a tree of child projects. Trees are owned top-down (children are held
//! by value), fetched fresh on every initialization pass and never merged with
//! an earlier snapshot.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::build_tool::BuildTool;
use crate::error::{Error, Result};

/// One project as reported by the build tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectModel {
    /// Project name. For a root project this is the name the module's own
    /// build declares, which need not match the module directory.
    pub name: String,
    /// Build tool path of the project, `:` for the root, `:sub:leaf` below.
    pub path: String,
    /// Absolute project directory.
    pub project_dir: PathBuf,
    /// Child projects in the order the build tool reports them.
    #[serde(default)]
    pub children: Vec<ProjectModel>,
}

impl ProjectModel {
    /// A root project without children.
    pub fn root(name: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: ":".to_string(),
            project_dir: project_dir.into(),
            children: Vec::new(),
        }
    }

    /// Add a child project, deriving its path and directory from this project.
    pub fn with_child(mut self, name: &str, configure: impl FnOnce(Self) -> Self) -> Self {
        let path = if self.path == ":" {
            format!(":{}", name)
        } else {
            format!("{}:{}", self.path, name)
        };
        let child = Self {
            name: name.to_string(),
            path,
            project_dir: self.project_dir.join(name),
            children: Vec::new(),
        };
        self.children.push(configure(child));
        self
    }

    /// Number of projects in this tree, including the root.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ProjectModel::node_count).sum::<usize>()
    }

    /// Visit every descendant depth-first, in reported order, excluding self.
    pub fn for_each_descendant<'a>(&'a self, visit: &mut impl FnMut(&'a ProjectModel)) {
        for child in &self.children {
            visit(child);
            child.for_each_descendant(visit);
        }
    }
}

/// Reads the root project model of module directories through the build tool.
pub struct ProjectModelAccessor<'a> {
    build_tool: &'a dyn BuildTool,
}

impl<'a> ProjectModelAccessor<'a> {
    pub fn new(build_tool: &'a dyn BuildTool) -> Self {
        Self { build_tool }
    }

    /// Resolve the project tree of one module; one round trip, no caching.
    pub fn root_project_model(&self, module_directory: &Path) -> Result<ProjectModel> {
        let model = self
            .build_tool
            .fetch_project_model(module_directory)
            .map_err(|e| match e {
                Error::ProjectModel { .. } => e,
                other => Error::ProjectModel {
                    directory: module_directory.to_path_buf(),
                    message: other.to_string(),
                },
            })?;
        if model.name.trim().is_empty() {
            return Err(Error::ProjectModel {
                directory: module_directory.to_path_buf(),
                message: "the root project has no name".to_string(),
            });
        }
        Ok(model)
    }
}
