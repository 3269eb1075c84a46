//! Shared test utilities for E2E tests.
//!
//! This module provides a fixture that owns a temporary directory, an isolated
//! global configuration file and, optionally, a stand-in `gradle` executable,
//! so tests never touch the user's `~/.prideconfig` or need a real Gradle.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_pride(&[]);
//!     fixture.command().args(["list", "--short"]).assert().code(1);
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Stand-in for the `gradle` executable.
///
/// Asked for the project model (`--quiet --init-script ... help`), it reports
/// a root project named after the directory it runs in. Any other invocation
/// records its arguments in `gradle-args.txt`.
#[allow(dead_code)]
const FAKE_GRADLE: &str = r#"#!/bin/sh
if [ "$1" = "--quiet" ]; then
  dir=$(pwd)
  name=$(basename "$dir")
  printf 'PRIDE-PROJECT-MODEL:{"name":"%s","path":":","projectDir":"%s","children":[]}\n' "$name" "$dir"
else
  echo "$@" > gradle-args.txt
fi
"#;

/// Whether a `git` client is on `PATH`.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary directory to run `pride` in.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Path of the isolated global configuration file.
    pub fn global_config(&self) -> PathBuf {
        self.temp_dir.path().join("global.prideconfig")
    }

    /// Add a line to the global configuration file.
    #[allow(dead_code)]
    pub fn with_global_setting(self, key: &str, value: &str) -> Self {
        let path = self.global_config();
        let mut content = std::fs::read_to_string(&path).unwrap_or_default();
        content.push_str(&format!("{}={}\n", key, value));
        std::fs::write(&path, content).expect("Failed to write global config");
        self
    }

    /// Turn the workspace directory into a pride with the given modules,
    /// written straight into `.pride/config` without touching any checkout.
    #[allow(dead_code)]
    pub fn with_pride(self, modules: &[&str]) -> Self {
        let mut config = String::new();
        for (index, name) in modules.iter().enumerate() {
            config.push_str(&format!("modules.{index}.name={name}\nmodules.{index}.vcs=git\n"));
        }
        self.with_file("work/.pride/version", "0\n")
            .with_file("work/.pride/config", &config)
    }

    /// Create `work/<name>` as a directory the git backend recognizes.
    #[allow(dead_code)]
    pub fn with_checkout(self, name: &str) -> Self {
        self.temp_dir
            .child(format!("work/{}/.git", name))
            .create_dir_all()
            .expect("Failed to create checkout");
        self
    }

    /// Install the stand-in Gradle and point `gradle.home` at it.
    #[allow(dead_code)]
    #[cfg(unix)]
    pub fn with_fake_gradle(self) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = self.temp_dir.child("gradle/bin/gradle");
        script.write_str(FAKE_GRADLE).expect("Failed to write gradle");
        let mut permissions = std::fs::metadata(script.path()).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(script.path(), permissions).unwrap();

        let home = self.temp_dir.path().join("gradle");
        self.with_global_setting("gradle.home", &home.display().to_string())
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// The directory `pride` runs in.
    pub fn work(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// Get the path to the temporary directory.
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the workspace directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(format!("work/{}", path))
    }

    /// Read a file in the workspace directory.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.work().join(path)).expect("Failed to read file")
    }

    /// Create a command running in the workspace directory with the isolated
    /// global configuration.
    pub fn command(&self) -> assert_cmd::Command {
        std::fs::create_dir_all(self.work()).expect("Failed to create work directory");
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pride");
        cmd.current_dir(self.work())
            .env("PRIDE_GLOBAL_CONFIG", self.global_config())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
