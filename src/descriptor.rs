//! Generated build descriptor files.
//!
//! The workspace root holds a `settings.gradle` including every merged
//! project and a `build.gradle` for the root project. Both are machine-owned:
//! they are deleted and written from scratch on every initialization pass,
//! never patched, so entries of removed modules cannot survive.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;
use crate::merge::MergedProject;

pub const SETTINGS_FILE: &str = "settings.gradle";
pub const BUILD_FILE: &str = "build.gradle";

/// Banner at the top of every generated file.
pub const DO_NOT_MODIFY_WARNING: &str = "//\n\
// DO NOT MODIFY -- This file is generated by pride, and will be\n\
// overwritten whenever the pride itself is changed.\n\
//\n";

pub fn settings_file(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

pub fn build_file(root: &Path) -> PathBuf {
    root.join(BUILD_FILE)
}

/// Render the settings descriptor for `projects`, in merge order.
pub fn render_settings(projects: &[MergedProject]) -> String {
    let mut out = String::from(DO_NOT_MODIFY_WARNING);
    let mut current_module: Option<&str> = None;
    for project in projects {
        if current_module != Some(project.module.as_str()) {
            out.push_str(&format!(
                "\n// Settings from project in directory /{}/\n\n",
                project.module
            ));
            current_module = Some(project.module.as_str());
        }
        out.push_str(&format!("include '{}'\n", escape(&project.name)));
        out.push_str(&format!(
            "project(':{}').projectDir = file('{}')\n",
            escape(&project.name),
            escape(&project.directory)
        ));
    }
    out
}

/// Render the root build descriptor.
pub fn render_build() -> String {
    DO_NOT_MODIFY_WARNING.to_string()
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Delete previously generated descriptor files; missing files are fine.
pub fn cleanup(root: &Path) -> Result<()> {
    for file in [settings_file(root), build_file(root)] {
        match fs::remove_file(&file) {
            Ok(()) => debug!("Removed {}", file.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Write freshly generated descriptor files for `projects`.
pub fn write(root: &Path, projects: &[MergedProject]) -> Result<()> {
    fs::write(build_file(root), render_build())?;
    fs::write(settings_file(root), render_settings(projects))?;
    debug!(
        "Wrote {} with {} projects",
        settings_file(root).display(),
        projects.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(name: &str, directory: &str, module: &str) -> MergedProject {
        MergedProject {
            name: name.to_string(),
            directory: directory.to_string(),
            module: module.to_string(),
        }
    }

    #[test]
    fn test_render_settings() {
        let projects = vec![
            project("core", "lib-core", "lib-core"),
            project("core:api", "lib-core/api", "lib-core"),
            project("app", "app", "app"),
        ];
        let settings = render_settings(&projects);

        let expected = format!(
            "{}\n// Settings from project in directory /lib-core/\n\n\
             include 'core'\n\
             project(':core').projectDir = file('lib-core')\n\
             include 'core:api'\n\
             project(':core:api').projectDir = file('lib-core/api')\n\
             \n// Settings from project in directory /app/\n\n\
             include 'app'\n\
             project(':app').projectDir = file('app')\n",
            DO_NOT_MODIFY_WARNING
        );
        assert_eq!(settings, expected);
    }

    #[test]
    fn test_render_settings_empty() {
        assert_eq!(render_settings(&[]), DO_NOT_MODIFY_WARNING);
    }

    #[test]
    fn test_escape_quotes() {
        let settings = render_settings(&[project("it's", "dir", "dir")]);
        assert!(settings.contains("include 'it\\'s'"));
    }

    #[test]
    fn test_cleanup_then_write() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        // Cleanup without files is fine
        cleanup(root).unwrap();

        write(root, &[project("core", "lib-core", "lib-core")]).unwrap();
        assert!(settings_file(root).exists());
        assert!(fs::read_to_string(build_file(root))
            .unwrap()
            .starts_with("//\n// DO NOT MODIFY"));

        cleanup(root).unwrap();
        assert!(!settings_file(root).exists());
        assert!(!build_file(root).exists());
    }
}
