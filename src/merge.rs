//! # Project Tree Merging
//!
//! Flattens the project trees of all modules into one namespace the build
//! tool can load as a single multi-project build.
//!
//! ## Naming rules
//!
//! - A module's root project is included under the name its own build reports,
//!   bound to the module directory.
//! - A descendant reported at path `:sub:leaf` is included as
//!   `<root name>:sub:leaf`, bound to its own project directory.
//!
//! Directories are expressed relative to the workspace root. Modules are
//! visited in registration order and every tree depth-first in reported
//! order, so the output is reproducible. Two modules producing the same merged
//! name is a fatal [`Error::DescriptorConflict`]; collisions are never
//! resolved silently.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::ProjectModel;
use crate::path::{relative_path, to_slash};

/// One include entry of the merged descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedProject {
    /// Flattened project name, e.g. `core:api`.
    pub name: String,
    /// Project directory relative to the workspace root, `/`-separated.
    pub directory: String,
    /// Module directory relative to the workspace root, for grouping.
    pub module: String,
}

/// Merge the project trees of `modules` (module directory and its root model,
/// in registration order) under `root`.
pub fn merge_project_models(
    root: &Path,
    modules: &[(PathBuf, ProjectModel)],
) -> Result<Vec<MergedProject>> {
    let canonical_root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let relative = |path: &Path| -> String {
        let base = if path.starts_with(&canonical_root) {
            canonical_root.as_path()
        } else {
            root
        };
        to_slash(&relative_path(base, path))
    };

    let mut merged = Vec::new();
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut claim = |name: String, directory: String, module: &str| -> Result<()> {
        if let Some(first) = owners.get(&name) {
            return Err(Error::DescriptorConflict {
                name,
                first: first.clone(),
                second: module.to_string(),
            });
        }
        owners.insert(name.clone(), module.to_string());
        merged.push(MergedProject {
            name,
            directory,
            module: module.to_string(),
        });
        Ok(())
    };

    for (module_directory, root_project) in modules {
        let module = relative(module_directory);
        claim(root_project.name.clone(), module.clone(), &module)?;

        let mut descendants = Vec::new();
        root_project.for_each_descendant(&mut |project| descendants.push(project));
        for project in descendants {
            let name = format!("{}{}", root_project.name, project.path);
            claim(name, relative(&project.project_dir), &module)?;
        }
    }

    Ok(merged)
}
