//! # Version Control Backends
//!
//! Every module in a workspace is a checkout of some version control system.
//! This module defines the capability set a backend must provide
//! ([`VcsBackend`]) and the [`VcsRegistry`] that decides which backend owns a
//! given directory.
//!
//! ## Detection
//!
//! The registry holds an ordered list of backends. Detection walks that list
//! and returns the first backend whose [`VcsBackend::supports`] claims the
//! directory, skipping backends disabled through the `vcs.disabled`
//! configuration key. The default order is git, then svn.
//!
//! Backends are implemented by shelling out to the VCS client. `status`,
//! `has_changes` and `remote` only read; `checkout` is the only operation that
//! modifies the disk.

pub mod git;
pub mod svn;

use std::path::Path;
use std::process::{Command, Output};

use log::debug;

use crate::config::{RuntimeConfig, GIT_COMMAND, SVN_COMMAND, VCS_DISABLED};
use crate::error::{Error, Result};

pub use git::GitBackend;
pub use svn::SvnBackend;

/// Point-in-time status of a module checkout. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VcsStatus {
    /// Current branch, when the checkout is on one.
    pub branch: Option<String>,
    /// Identifier of the checked-out revision.
    pub revision: String,
    /// Local modifications that are not committed.
    pub uncommitted: bool,
    /// Commits that are not pushed or otherwise shared.
    pub unpublished: bool,
}

/// Capabilities every version control backend provides.
pub trait VcsBackend {
    /// Name stored in the module registry, e.g. `git`.
    fn type_name(&self) -> &str;

    /// Whether `directory` is a checkout handled by this backend.
    fn supports(&self, directory: &Path) -> bool;

    /// Query the current status of a checkout.
    fn status(&self, directory: &Path) -> Result<VcsStatus>;

    /// Whether removing the checkout would lose work.
    fn has_changes(&self, directory: &Path) -> Result<bool> {
        let status = self.status(directory)?;
        Ok(status.uncommitted || status.unpublished)
    }

    /// Check out `locator` into `destination`.
    ///
    /// Re-running against an existing checkout without pending changes is a
    /// no-op.
    fn checkout(&self, locator: &str, destination: &Path) -> Result<()>;

    /// The locator the checkout was made from, if known.
    fn remote(&self, directory: &Path) -> Result<Option<String>>;
}

/// Ordered set of backends used to recognize module directories.
pub struct VcsRegistry {
    backends: Vec<Box<dyn VcsBackend>>,
}

impl VcsRegistry {
    /// Create a registry evaluating `backends` in the given order.
    pub fn new(backends: Vec<Box<dyn VcsBackend>>) -> Self {
        Self { backends }
    }

    /// The default registry: git, then svn, with client executables taken
    /// from the configuration.
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(vec![
            Box::new(GitBackend::new(config.get_or(GIT_COMMAND, "git"))),
            Box::new(SvnBackend::new(config.get_or(SVN_COMMAND, "svn"))),
        ])
    }

    /// Names of the registered backends, in detection order.
    pub fn type_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.type_name()).collect()
    }

    /// Find the first enabled backend that supports `directory`.
    pub fn detect(&self, directory: &Path, config: &RuntimeConfig) -> Option<&dyn VcsBackend> {
        let disabled = config.get_list(VCS_DISABLED);
        let backend = self
            .backends
            .iter()
            .filter(|backend| !disabled.iter().any(|name| name == backend.type_name()))
            .find(|backend| backend.supports(directory))
            .map(|backend| &**backend);
        debug!(
            "Detected {:?} for {}",
            backend.map(|b| b.type_name()),
            directory.display()
        );
        backend
    }

    /// Like [`detect`](Self::detect), but a directory nobody claims is an
    /// error naming the module.
    pub fn require(
        &self,
        module: &str,
        directory: &Path,
        config: &RuntimeConfig,
    ) -> Result<&dyn VcsBackend> {
        self.detect(directory, config)
            .ok_or_else(|| Error::UnsupportedVcs {
                module: module.to_string(),
                path: directory.to_path_buf(),
            })
    }

    /// Look up a backend by the type name stored in the module registry.
    pub fn backend(&self, type_name: &str) -> Result<&dyn VcsBackend> {
        self.backends
            .iter()
            .find(|backend| backend.type_name() == type_name)
            .map(|backend| &**backend)
            .ok_or_else(|| Error::UnknownVcsType {
                vcs: type_name.to_string(),
            })
    }
}

/// Run a VCS client and return its output when it exits successfully.
pub(crate) fn run_client(program: &str, directory: &Path, args: &[&str]) -> Result<String> {
    let output = spawn_client(program, directory, args)?;
    if !output.status.success() {
        return Err(Error::VcsCommand {
            command: describe(program, args),
            directory: directory.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a VCS client where a non-zero exit is an answer rather than a failure.
pub(crate) fn try_run_client(
    program: &str,
    directory: &Path,
    args: &[&str],
) -> Result<Option<String>> {
    let output = spawn_client(program, directory, args)?;
    if output.status.success() {
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    } else {
        Ok(None)
    }
}

fn spawn_client(program: &str, directory: &Path, args: &[&str]) -> Result<Output> {
    debug!("Running {} in {}", describe(program, args), directory.display());
    Command::new(program)
        .args(args)
        .current_dir(directory)
        .output()
        .map_err(|e| Error::VcsCommand {
            command: describe(program, args),
            directory: directory.to_path_buf(),
            stderr: e.to_string(),
        })
}

fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shared guard for `checkout`: decide whether `destination` already holds a
/// clean checkout (`Ok(true)`), is free to check out into (`Ok(false)`), or
/// blocks the checkout.
pub(crate) fn existing_checkout(
    backend: &dyn VcsBackend,
    locator: &str,
    destination: &Path,
) -> Result<bool> {
    if !destination.exists() {
        return Ok(false);
    }
    let blocked = |reason: &str| Error::VcsCommand {
        command: format!("{} checkout {}", backend.type_name(), locator),
        directory: destination.to_path_buf(),
        stderr: reason.to_string(),
    };
    if !backend.supports(destination) {
        let empty = destination.read_dir()?.next().is_none();
        return if empty {
            Ok(false)
        } else {
            Err(blocked("destination exists and is not a checkout"))
        };
    }
    if backend.has_changes(destination)? {
        return Err(blocked("destination has local changes"));
    }
    debug!("{} is already checked out", destination.display());
    Ok(true)
}
