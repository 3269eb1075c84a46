//! Git backend, implemented on top of the system `git` command.
//!
//! Using the system client means SSH keys, credential helpers and anything
//! configured in `~/.gitconfig` apply to checkouts without extra setup.

use std::fs;
use std::path::Path;

use log::info;

use super::{existing_checkout, run_client, try_run_client, VcsBackend, VcsStatus};
use crate::error::{Error, Result};

pub struct GitBackend {
    command: String,
}

impl GitBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn run(&self, directory: &Path, args: &[&str]) -> Result<String> {
        run_client(&self.command, directory, args)
    }

    fn try_run(&self, directory: &Path, args: &[&str]) -> Result<Option<String>> {
        try_run_client(&self.command, directory, args)
    }

    fn branch(&self, directory: &Path) -> Result<Option<String>> {
        Ok(self
            .try_run(directory, &["symbolic-ref", "--short", "-q", "HEAD"])?
            .map(|out| out.trim().to_string())
            .filter(|branch| !branch.is_empty()))
    }

    fn has_uncommitted_changes(&self, directory: &Path) -> Result<bool> {
        let output = self.run(directory, &["status", "--porcelain"])?;
        Ok(!output.trim().is_empty())
    }

    /// Commits on the current branch not yet on its upstream. A branch without
    /// an upstream has never been published.
    fn has_unpublished_changes(&self, directory: &Path, on_branch: bool) -> Result<bool> {
        match self.try_run(directory, &["rev-list", "--count", "@{upstream}..HEAD"])? {
            Some(count) => Ok(count.trim() != "0"),
            None => Ok(on_branch),
        }
    }
}

impl VcsBackend for GitBackend {
    fn type_name(&self) -> &str {
        "git"
    }

    fn supports(&self, directory: &Path) -> bool {
        // `.git` is a file for worktrees and submodules
        directory.join(".git").exists()
    }

    fn status(&self, directory: &Path) -> Result<VcsStatus> {
        let revision = self
            .run(directory, &["rev-parse", "--short", "HEAD"])?
            .trim()
            .to_string();
        let branch = self.branch(directory)?;
        let uncommitted = self.has_uncommitted_changes(directory)?;
        let unpublished = self.has_unpublished_changes(directory, branch.is_some())?;
        Ok(VcsStatus {
            branch,
            revision,
            uncommitted,
            unpublished,
        })
    }

    fn has_changes(&self, directory: &Path) -> Result<bool> {
        if self.has_uncommitted_changes(directory)? {
            return Ok(true);
        }
        // An unborn branch has nothing to publish
        if self
            .try_run(directory, &["rev-parse", "--verify", "-q", "HEAD"])?
            .is_none()
        {
            return Ok(false);
        }
        let on_branch = self.branch(directory)?.is_some();
        self.has_unpublished_changes(directory, on_branch)
    }

    fn checkout(&self, locator: &str, destination: &Path) -> Result<()> {
        if existing_checkout(self, locator, destination)? {
            return Ok(());
        }

        let parent = destination.parent().ok_or_else(|| Error::VcsCommand {
            command: format!("{} clone {}", self.command, locator),
            directory: destination.to_path_buf(),
            stderr: "destination has no parent directory".to_string(),
        })?;
        fs::create_dir_all(parent)?;

        info!("Cloning {} into {}", locator, destination.display());
        let destination_arg = destination.to_string_lossy();
        self.run(parent, &["clone", locator, &destination_arg])?;
        Ok(())
    }

    fn remote(&self, directory: &Path) -> Result<Option<String>> {
        Ok(self
            .try_run(directory, &["config", "--get", "remote.origin.url"])?
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()))
    }
}
