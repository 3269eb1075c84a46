//! # Pride Library
//!
//! A *pride* is a workspace directory holding several independently
//! version-controlled modules that should build together as one multi-project
//! Gradle build. This library keeps the registry of modules, talks to their
//! version control systems and regenerates the Gradle descriptors that tie
//! them together. It is used by the `pride` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use pride::config::ConfigFile;
//! use pride::workspace::{Module, ModuleFilter, Workspace};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut workspace =
//!     Workspace::create(dir.path(), ConfigFile::in_memory(), &ConfigFile::in_memory()).unwrap();
//! workspace.add_module(Module::new("lib-core", "git")).unwrap();
//! workspace.add_module(Module::new("app", "git")).unwrap();
//! workspace.save().unwrap();
//!
//! let filter = ModuleFilter::new(&["lib-.*"]).unwrap();
//! assert_eq!(workspace.list_modules(&filter).len(), 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Workspace (`workspace`)**: the root directory, marked by `.pride/`, and
//!   its ordered registry of modules persisted in `.pride/config`.
//! - **Configuration (`config`)**: layered INI key/value stores, workspace-local
//!   over global.
//! - **Version control (`vcs`)**: the backend contract plus git and svn
//!   implementations, and the registry that detects which one owns a directory.
//! - **Build tool (`build_tool`, `model`)**: fetching each module's project tree.
//! - **Merging and descriptors (`merge`, `descriptor`)**: flattening all trees
//!   into one namespace and writing `settings.gradle` / `build.gradle`.
//! - **Initialization (`initializer`)**: the regeneration pipeline.
//! - **Batches (`batch`)**: per-module operations with collected failures.
//!
//! ## Regeneration Flow
//!
//! 1.  Delete previously generated descriptors.
//! 2.  Fetch the project tree of every module, in registration order.
//! 3.  Merge the trees, rejecting name collisions.
//! 4.  Write fresh descriptors.

pub mod batch;
pub mod build_tool;
pub mod config;
pub mod defaults;
pub mod descriptor;
pub mod error;
pub mod initializer;
pub mod merge;
pub mod model;
pub mod output;
pub mod path;
pub mod suggestions;
pub mod vcs;
pub mod workspace;

mod merge_proptest;
