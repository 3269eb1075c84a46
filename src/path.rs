//! Path manipulation utilities for pride

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Check that a module name can be used as a single directory name under the
/// workspace root.
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('.')
        && !name.contains(['/', '\\', ':'])
        && !name.chars().any(char::is_control)
}

/// Express `target` relative to `base`, walking up with `..` where needed.
///
/// Both paths are compared component-wise without touching the filesystem.
/// When they share no common prefix (e.g. different drives) the target is
/// returned unchanged.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target_components: Vec<Component> = target.components().collect();

    let common = base
        .iter()
        .zip(&target_components)
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 && target.has_root() {
        return target.to_path_buf();
    }

    let mut result = PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for component in &target_components[common..] {
        result.push(component.as_os_str());
    }
    if result.as_os_str().is_empty() {
        result.push(".");
    }
    result
}

/// Render a path with forward slashes, as build descriptors expect.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
        .replace("//", "/")
}

/// Whether a command-line argument names a repository rather than a module
/// directory.
pub fn is_locator(argument: &str) -> bool {
    argument.contains(['/', '\\', ':'])
}

/// Derive a module name from a repository locator.
///
/// Handles URLs (`https://host/org/repo.git`), scp-like git addresses
/// (`git@host:org/repo.git`) and plain paths. Returns `None` when the last
/// segment is not a valid module name.
pub fn module_name_from_locator(locator: &str) -> Option<String> {
    let path = match Url::parse(locator) {
        Ok(url) if url.scheme().len() > 1 => url.path().to_string(),
        _ => locator.rsplit(':').next().unwrap_or(locator).to_string(),
    };
    let segment = path
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    if is_valid_module_name(name) {
        Some(name.to_string())
    } else {
        None
    }
}
