//! Subversion backend, implemented on top of the system `svn` command.
//!
//! Subversion commits are shared the moment they are made, so a checkout
//! never has unpublished changes.

use std::fs;
use std::path::Path;

use log::info;

use super::{existing_checkout, run_client, VcsBackend, VcsStatus};
use crate::error::{Error, Result};

pub struct SvnBackend {
    command: String,
}

/// Fields of interest from `svn info`.
#[derive(Debug, Default, PartialEq, Eq)]
struct SvnInfo {
    url: Option<String>,
    relative_url: Option<String>,
    revision: Option<String>,
}

impl SvnBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn info(&self, directory: &Path) -> Result<SvnInfo> {
        let output = run_client(&self.command, directory, &["info"])?;
        Ok(parse_info(&output))
    }
}

fn parse_info(output: &str) -> SvnInfo {
    let mut info = SvnInfo::default();
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(": ") {
            let value = Some(value.trim().to_string());
            match key.trim() {
                "URL" => info.url = value,
                "Relative URL" => info.relative_url = value,
                "Revision" => info.revision = value,
                _ => {}
            }
        }
    }
    info
}

/// Derive a branch name from a repository-relative URL following the
/// standard `trunk`/`branches`/`tags` layout.
fn branch_from_relative_url(relative_url: &str) -> Option<String> {
    let path = relative_url.trim_start_matches('^').trim_start_matches('/');
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match segments.next()? {
        "trunk" => Some("trunk".to_string()),
        "branches" | "tags" => segments.next().map(str::to_string),
        _ => None,
    }
}

impl VcsBackend for SvnBackend {
    fn type_name(&self) -> &str {
        "svn"
    }

    fn supports(&self, directory: &Path) -> bool {
        directory.join(".svn").is_dir()
    }

    fn status(&self, directory: &Path) -> Result<VcsStatus> {
        let info = self.info(directory)?;
        let revision = info.revision.ok_or_else(|| Error::VcsCommand {
            command: format!("{} info", self.command),
            directory: directory.to_path_buf(),
            stderr: "no revision reported".to_string(),
        })?;
        let branch = info
            .relative_url
            .as_deref()
            .and_then(branch_from_relative_url);
        let changes = run_client(&self.command, directory, &["status", "-q"])?;
        Ok(VcsStatus {
            branch,
            revision,
            uncommitted: !changes.trim().is_empty(),
            unpublished: false,
        })
    }

    fn checkout(&self, locator: &str, destination: &Path) -> Result<()> {
        if existing_checkout(self, locator, destination)? {
            return Ok(());
        }

        let parent = destination.parent().ok_or_else(|| Error::VcsCommand {
            command: format!("{} checkout {}", self.command, locator),
            directory: destination.to_path_buf(),
            stderr: "destination has no parent directory".to_string(),
        })?;
        fs::create_dir_all(parent)?;

        info!("Checking out {} into {}", locator, destination.display());
        let destination_arg = destination.to_string_lossy();
        run_client(&self.command, parent, &["checkout", locator, &destination_arg])?;
        Ok(())
    }

    fn remote(&self, directory: &Path) -> Result<Option<String>> {
        Ok(self.info(directory)?.url)
    }
}
