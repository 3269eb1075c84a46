//! # Error Handling
//!
//! This module defines the centralized error type for `pride`. It uses the
//! `thiserror` library to build one `Error` enum covering every failure mode
//! of the workspace model, with messages that name the offending module, key
//! or path.
//!
//! ## Propagation
//!
//! - Registry misuse (`DuplicateModule`, `ModuleNotFound`, `InvalidModuleName`)
//!   is fatal for the single operation and leaves the workspace untouched.
//! - `ProjectModel`, `DescriptorConflict` and any descriptor write failure abort
//!   the whole initialization pass and surface as `Initialization`.
//! - Per-module failures inside a tolerant batch are collected and reported
//!   together as `PartialBatchFailure` after all eligible work is done.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for pride operations
#[derive(Error, Debug)]
pub enum Error {
    /// No workspace marker was found in the directory or any of its ancestors.
    #[error("No pride found in {}", path.display())]
    NotAWorkspace { path: PathBuf },

    /// A workspace already exists where a new one was about to be created.
    #[error("An existing pride has been found in {}", path.display())]
    WorkspaceExists { path: PathBuf },

    /// A module with the same name is already registered.
    #[error("Module '{name}' is already part of the pride")]
    DuplicateModule { name: String },

    /// The named module is not registered in the workspace.
    #[error("No module with name '{name}' in the pride")]
    ModuleNotFound { name: String },

    /// The module name cannot be used as a directory under the workspace root.
    #[error("Invalid module name '{name}': must be a single path segment")]
    InvalidModuleName { name: String },

    /// No registered VCS backend recognizes a directory expected to be a module.
    #[error("No supported version control system found for module '{module}' in {}", path.display())]
    UnsupportedVcs { module: String, path: PathBuf },

    /// A module refers to a backend type that is not registered.
    #[error("Unknown version control system type '{vcs}'")]
    UnknownVcsType { vcs: String },

    /// An external VCS client invocation failed.
    #[error("VCS command failed in {}: {command} - {stderr}", directory.display())]
    VcsCommand {
        command: String,
        directory: PathBuf,
        stderr: String,
    },

    /// The build tool failed while running tasks.
    #[error("Build tool error: {command} - {message}")]
    BuildTool { command: String, message: String },

    /// The build tool could not resolve a module's project structure.
    #[error("Could not resolve project model in {}: {message}", directory.display())]
    ProjectModel { directory: PathBuf, message: String },

    /// Two modules contribute the same merged project name.
    #[error("Project name '{name}' is defined by both '{first}' and '{second}'; rename the root project of one of them")]
    DescriptorConflict {
        name: String,
        first: String,
        second: String,
    },

    /// Aggregate failure of a descriptor regeneration pass.
    #[error("There was a problem during the initialization of the pride: {source}\n\nFix the errors above, and try again with\n\n\tpride init --force")]
    Initialization {
        #[source]
        source: Box<Error>,
    },

    /// One or more modules failed a tolerant batch operation.
    #[error("{action} failed for the following modules:\n{details}")]
    PartialBatchFailure {
        action: String,
        modules: Vec<String>,
        details: String,
    },

    /// Modules with local changes would lose work if the operation went ahead.
    #[error("These modules have changes: {}", modules.join(", "))]
    ModulesHaveChanges { modules: Vec<String> },

    /// Invalid configuration content or usage.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error reading a configuration file, wrapped from `ini::Error`.
    #[error("Configuration file error: {0}")]
    Ini(#[from] ini::Error),
}

impl Error {
    /// Wrap a failure of the initialization pipeline into the aggregate error.
    ///
    /// Already-wrapped errors are returned unchanged.
    pub fn initialization(source: Error) -> Self {
        match source {
            Error::Initialization { .. } => source,
            other => Error::Initialization {
                source: Box::new(other),
            },
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
