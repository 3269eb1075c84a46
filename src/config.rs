//! # Configuration Store
//!
//! Hierarchical key/value configuration backed by INI files (`rust-ini`).
//!
//! There are two scopes:
//!
//! - **Global**: `~/.prideconfig` by default, shared by every workspace.
//! - **Local**: `<root>/.pride/config`, owned by one workspace. It also holds
//!   the persisted module registry under `modules.<index>.*` keys.
//!
//! Keys live flat in the general section of the file, e.g.
//!
//! ```text
//! gradle.home=/opt/gradle
//! modules.0.name=lib-core
//! modules.0.vcs=git
//! ```
//!
//! [`RuntimeConfig`] resolves a key against the local scope first, then the
//! global one.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use ini::Ini;
use log::debug;

use crate::error::{Error, Result};

/// Client executable used by the git backend.
pub const GIT_COMMAND: &str = "git.command";
/// Client executable used by the svn backend.
pub const SVN_COMMAND: &str = "svn.command";
/// Comma-separated list of backend names excluded from detection.
pub const VCS_DISABLED: &str = "vcs.disabled";
/// Gradle installation used when the directory has no wrapper.
pub const GRADLE_HOME: &str = "gradle.home";
/// Whether `init` generates a Gradle wrapper in the workspace root.
pub const GRADLE_WRAPPER: &str = "gradle.wrapper";
/// Prefix of the keys holding the module registry.
pub const MODULES_PREFIX: &str = "modules.";

/// One configuration file: an ordered set of flat keys, optionally bound to a
/// path on disk.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    ini: Ini,
}

impl ConfigFile {
    /// An empty configuration that is never written anywhere.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            ini: Ini::new(),
        }
    }

    /// An empty configuration that will be saved to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ini: Ini::new(),
        }
    }

    /// Load the configuration at `path`; a missing file yields an empty store
    /// bound to that path.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ini = if path.is_file() {
            debug!("Loading configuration from {}", path.display());
            Ini::load_from_file(&path)?
        } else {
            Ini::new()
        };
        Ok(Self {
            path: Some(path),
            ini,
        })
    }

    /// Parse configuration from a reader, e.g. an exported workspace on stdin.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            path: None,
            ini: Ini::read_from(reader)?,
        })
    }

    /// The file this configuration is saved to, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.ini.general_section().get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.ini.with_general_section().set(key, value);
    }

    /// Remove a key. Returns `false` when the key was not present.
    pub fn unset(&mut self, key: &str) -> bool {
        self.ini.general_section_mut().remove(key).is_some()
    }

    /// All key/value pairs in file order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.ini
            .general_section()
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    /// Remove every key starting with `prefix`.
    pub fn unset_prefixed(&mut self, prefix: &str) {
        let keys: Vec<String> = self
            .entries()
            .into_iter()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with(prefix))
            .collect();
        for key in keys {
            self.unset(&key);
        }
    }

    /// Serialize the configuration in its on-disk format.
    pub fn write_to<W: std::io::Write>(&self, writer: &mut W) -> Result<()> {
        self.ini.write_to(writer)?;
        Ok(())
    }

    /// Persist the configuration to its path.
    ///
    /// The content is written to a sibling temporary file which then replaces
    /// the target, so a failed save never leaves a half-written file behind.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_ref().ok_or_else(|| Error::Config {
            message: "cannot save a configuration that is not bound to a file".to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = Vec::new();
        self.write_to(&mut content)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }
}

/// Parse a boolean configuration value.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Layered configuration: workspace-local values override global ones.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    global: ConfigFile,
    local: Option<ConfigFile>,
}

impl RuntimeConfig {
    pub fn new(global: ConfigFile, local: Option<ConfigFile>) -> Self {
        Self { global, local }
    }

    /// Configuration with only a global scope.
    pub fn global_only(global: ConfigFile) -> Self {
        Self::new(global, None)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.local
            .as_ref()
            .and_then(|local| local.get(key))
            .or_else(|| self.global.get(key))
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Read a boolean key; unparsable values fall back to `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(parse_bool).unwrap_or(default)
    }

    /// Resolve a boolean that may be forced on or off from the command line.
    pub fn override_bool(&self, key: &str, default: bool, force_on: bool, force_off: bool) -> bool {
        if force_on {
            true
        } else if force_off {
            false
        } else {
            self.get_bool(key, default)
        }
    }

    /// Read a comma-separated list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn global(&self) -> &ConfigFile {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut ConfigFile {
        &mut self.global
    }

    pub fn local(&self) -> Option<&ConfigFile> {
        self.local.as_ref()
    }

    pub fn local_mut(&mut self) -> Option<&mut ConfigFile> {
        self.local.as_mut()
    }
}
