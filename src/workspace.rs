//! # Module Registry
//!
//! A [`Workspace`] is a root directory holding a `.pride` marker directory and
//! a set of modules, each a version-controlled checkout in a subdirectory named
//! after the module.
//!
//! The registry keeps modules in insertion order. Mutations (`add_module`,
//! `remove_module`) only change the in-memory state; [`Workspace::save`]
//! persists the mapping into the workspace-local configuration file as
//!
//! ```text
//! modules.0.name=lib-core
//! modules.0.vcs=git
//! modules.0.remote=https://example.com/lib-core.git
//! ```
//!
//! with contiguous indices, so `save` followed by `load` reproduces the same
//! ordered mapping.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use regex::Regex;

use crate::config::{ConfigFile, RuntimeConfig, MODULES_PREFIX};
use crate::error::{Error, Result};
use crate::path::{is_valid_module_name, module_name_from_locator};
use crate::vcs::VcsRegistry;

/// Directory marking the root of a workspace.
pub const CONFIG_DIRECTORY: &str = ".pride";
/// Marker file inside [`CONFIG_DIRECTORY`].
pub const VERSION_FILE: &str = "version";
/// Workspace-local configuration file inside [`CONFIG_DIRECTORY`].
pub const CONFIG_FILE: &str = "config";
/// Version written to [`VERSION_FILE`].
pub const WORKSPACE_VERSION: &str = "0";

/// One registered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Unique name, also the directory name under the workspace root.
    pub name: String,
    /// Type name of the VCS backend, e.g. `git`.
    pub vcs: String,
    /// Locator the module was checked out from, when known.
    pub remote: Option<String>,
}

impl Module {
    pub fn new(name: impl Into<String>, vcs: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vcs: vcs.into(),
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = Some(remote.into());
        self
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Name patterns selecting modules. A module matches when any pattern matches
/// its whole name; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter {
    patterns: Vec<Regex>,
}

impl ModuleFilter {
    /// A filter matching every module.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| Regex::new(&format!("^(?:{})$", pattern.as_ref())))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.is_match(name))
    }
}

/// Read the module mapping stored in a configuration file.
pub fn read_modules(config: &ConfigFile) -> Result<Vec<Module>> {
    let mut modules = Vec::new();
    for index in 0.. {
        let Some(name) = config.get(&format!("{}{}.name", MODULES_PREFIX, index)) else {
            break;
        };
        let vcs = config
            .get(&format!("{}{}.vcs", MODULES_PREFIX, index))
            .ok_or_else(|| Error::Config {
                message: format!("module '{}' has no version control type", name),
            })?;
        let mut module = Module::new(name, vcs);
        module.remote = config
            .get(&format!("{}{}.remote", MODULES_PREFIX, index))
            .map(str::to_string);
        modules.push(module);
    }
    Ok(modules)
}

/// Replace the module mapping stored in a configuration file.
pub fn write_modules(config: &mut ConfigFile, modules: &[Module]) {
    config.unset_prefixed(MODULES_PREFIX);
    for (index, module) in modules.iter().enumerate() {
        config.set(&format!("{}{}.name", MODULES_PREFIX, index), &module.name);
        config.set(&format!("{}{}.vcs", MODULES_PREFIX, index), &module.vcs);
        if let Some(remote) = &module.remote {
            config.set(&format!("{}{}.remote", MODULES_PREFIX, index), remote);
        }
    }
}

/// An open workspace: root, ordered module mapping and layered configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    modules: Vec<Module>,
    config: RuntimeConfig,
}

impl Workspace {
    pub fn config_directory(root: &Path) -> PathBuf {
        root.join(CONFIG_DIRECTORY)
    }

    pub fn config_file(root: &Path) -> PathBuf {
        Self::config_directory(root).join(CONFIG_FILE)
    }

    /// Whether `directory` itself is the root of a workspace.
    pub fn contains(directory: &Path) -> bool {
        Self::config_directory(directory).join(VERSION_FILE).is_file()
    }

    /// Find the workspace enclosing `directory`, searching its ancestors.
    pub fn find_root(directory: &Path) -> Option<PathBuf> {
        let directory = fs::canonicalize(directory).unwrap_or_else(|_| directory.to_path_buf());
        directory
            .ancestors()
            .find(|candidate| Self::contains(candidate))
            .map(Path::to_path_buf)
    }

    /// Open the workspace enclosing `directory`.
    pub fn load(directory: &Path, global: ConfigFile) -> Result<Self> {
        let root = Self::find_root(directory).ok_or_else(|| Error::NotAWorkspace {
            path: directory.to_path_buf(),
        })?;
        let local = ConfigFile::load(Self::config_file(&root))?;
        let modules = read_modules(&local)?;
        debug!(
            "Loaded workspace {} with {} modules",
            root.display(),
            modules.len()
        );
        Ok(Self {
            root,
            modules,
            config: RuntimeConfig::new(global, Some(local)),
        })
    }

    /// Write the marker and a fresh local configuration into `root`, replacing
    /// any existing `.pride` directory. Module keys in `settings` are ignored.
    pub fn create(root: &Path, global: ConfigFile, settings: &ConfigFile) -> Result<Self> {
        fs::create_dir_all(root)?;
        let config_directory = Self::config_directory(root);
        if config_directory.exists() {
            fs::remove_dir_all(&config_directory)?;
        }
        fs::create_dir_all(&config_directory)?;
        fs::write(
            config_directory.join(VERSION_FILE),
            format!("{}\n", WORKSPACE_VERSION),
        )?;

        let mut local = ConfigFile::new(Self::config_file(root));
        for (key, value) in settings.entries() {
            if !key.starts_with(MODULES_PREFIX) {
                local.set(&key, &value);
            }
        }
        local.save()?;

        Ok(Self {
            root: root.to_path_buf(),
            modules: Vec::new(),
            config: RuntimeConfig::new(global, Some(local)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    /// All modules in registration order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn has_module(&self, name: &str) -> bool {
        self.module(name).is_some()
    }

    pub fn module_directory(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Whether `directory` looks like a checked-out module.
    pub fn is_valid_module_directory(directory: &Path) -> bool {
        directory.is_dir()
    }

    /// Register a module at the end of the mapping.
    pub fn add_module(&mut self, module: Module) -> Result<()> {
        if !is_valid_module_name(&module.name) {
            return Err(Error::InvalidModuleName { name: module.name });
        }
        if self.has_module(&module.name) {
            return Err(Error::DuplicateModule { name: module.name });
        }
        debug!("Adding module {} ({})", module.name, module.vcs);
        self.modules.push(module);
        Ok(())
    }

    /// Unregister a module. The directory on disk is left alone.
    pub fn remove_module(&mut self, name: &str) -> Result<Module> {
        let index = self
            .modules
            .iter()
            .position(|m| m.name == name)
            .ok_or_else(|| Error::ModuleNotFound {
                name: name.to_string(),
            })?;
        debug!("Removing module {}", name);
        Ok(self.modules.remove(index))
    }

    /// Modules matching `filter`, in registration order.
    pub fn list_modules(&self, filter: &ModuleFilter) -> Vec<Module> {
        self.modules
            .iter()
            .filter(|m| filter.matches(&m.name))
            .cloned()
            .collect()
    }

    /// Persist the module mapping and local configuration.
    pub fn save(&mut self) -> Result<()> {
        let modules = self.modules.clone();
        let local = self.config.local_mut().ok_or_else(|| Error::Config {
            message: "workspace has no local configuration".to_string(),
        })?;
        write_modules(local, &modules);
        local.save()
    }

    /// Register an existing checkout `<root>/<name>`.
    pub fn add_existing(&mut self, registry: &VcsRegistry, name: &str) -> Result<Module> {
        if !is_valid_module_name(name) {
            return Err(Error::InvalidModuleName {
                name: name.to_string(),
            });
        }
        let directory = self.module_directory(name);
        let backend = registry.require(name, &directory, &self.config)?;
        let mut module = Module::new(name, backend.type_name());
        module.remote = backend.remote(&directory).unwrap_or_else(|e| {
            debug!("Could not query remote of {}: {}", name, e);
            None
        });
        self.add_module(module.clone())?;
        Ok(module)
    }

    /// Check out `locator` with the backend named `vcs` and register it.
    ///
    /// The module name defaults to the last segment of the locator.
    pub fn add_from_locator(
        &mut self,
        registry: &VcsRegistry,
        locator: &str,
        vcs: &str,
        name: Option<&str>,
    ) -> Result<Module> {
        let name = match name {
            Some(name) => name.to_string(),
            None => module_name_from_locator(locator).ok_or_else(|| Error::InvalidModuleName {
                name: locator.to_string(),
            })?,
        };
        if !is_valid_module_name(&name) {
            return Err(Error::InvalidModuleName { name });
        }
        if self.has_module(&name) {
            return Err(Error::DuplicateModule { name });
        }
        let backend = registry.backend(vcs)?;
        backend.checkout(locator, &self.module_directory(&name))?;
        let module = Module::new(name, backend.type_name()).with_remote(locator);
        self.add_module(module.clone())?;
        Ok(module)
    }

    /// Names of subdirectories that are checkouts recognized by `registry`
    /// but not registered yet, sorted by name.
    pub fn discover_unregistered(&self, registry: &VcsRegistry) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_valid_module_name(&name) || self.has_module(&name) {
                continue;
            }
            if registry.detect(&entry.path(), &self.config).is_some() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Names among `names` whose checkouts hold uncommitted or unpublished
    /// work. Missing directories count as unchanged.
    pub fn changed_modules(&self, registry: &VcsRegistry, names: &[String]) -> Result<Vec<String>> {
        let mut changed = Vec::new();
        for name in names {
            let directory = self.module_directory(name);
            if !directory.exists() {
                continue;
            }
            let backend = match self.module(name) {
                Some(module) => registry.backend(&module.vcs)?,
                None => registry.require(name, &directory, &self.config)?,
            };
            if backend.has_changes(&directory)? {
                changed.push(name.clone());
            }
        }
        Ok(changed)
    }

    /// The local configuration and module list in the format `init --import`
    /// reads. Remotes are refreshed from the checkouts where possible.
    pub fn export(&self, registry: &VcsRegistry) -> ConfigFile {
        let mut exported = ConfigFile::in_memory();
        if let Some(local) = self.config.local() {
            for (key, value) in local.entries() {
                if !key.starts_with(MODULES_PREFIX) {
                    exported.set(&key, &value);
                }
            }
        }

        let modules: Vec<Module> = self
            .modules
            .iter()
            .map(|module| {
                let directory = self.module_directory(&module.name);
                let remote = registry
                    .backend(&module.vcs)
                    .and_then(|backend| backend.remote(&directory))
                    .unwrap_or_else(|e| {
                        debug!("Could not query remote of {}: {}", module.name, e);
                        None
                    });
                Module {
                    remote: remote.or_else(|| module.remote.clone()),
                    ..module.clone()
                }
            })
            .collect();
        write_modules(&mut exported, &modules);
        exported
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::testing::FakeBackend;
    use crate::vcs::VcsStatus;
    use tempfile::TempDir;

    fn create_workspace(root: &Path) -> Workspace {
        Workspace::create(root, ConfigFile::in_memory(), &ConfigFile::in_memory()).unwrap()
    }

    fn fake_registry() -> VcsRegistry {
        VcsRegistry::new(vec![Box::new(FakeBackend::new("fake", ".fake"))])
    }

    #[test]
    fn test_create_writes_marker() {
        let temp_dir = TempDir::new().unwrap();
        create_workspace(temp_dir.path());
        assert!(Workspace::contains(temp_dir.path()));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(".pride/version")).unwrap(),
            "0\n"
        );
        assert!(Workspace::config_file(temp_dir.path()).exists());
    }

    #[test]
    fn test_create_copies_settings_without_modules() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = ConfigFile::in_memory();
        settings.set("gradle.home", "/opt/gradle");
        settings.set("modules.0.name", "stale");
        settings.set("modules.0.vcs", "git");

        let workspace =
            Workspace::create(temp_dir.path(), ConfigFile::in_memory(), &settings).unwrap();
        assert_eq!(workspace.config().get("gradle.home"), Some("/opt/gradle"));
        assert!(workspace.modules().is_empty());
        assert!(workspace.config().get("modules.0.name").is_none());
    }

    #[test]
    fn test_load_outside_workspace_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = Workspace::load(temp_dir.path(), ConfigFile::in_memory());
        assert!(matches!(result, Err(Error::NotAWorkspace { .. })));
    }

    #[test]
    fn test_load_from_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_workspace(temp_dir.path());
        let nested = temp_dir.path().join("lib-core").join("src");
        fs::create_dir_all(&nested).unwrap();

        let workspace = Workspace::load(&nested, ConfigFile::in_memory()).unwrap();
        assert_eq!(
            workspace.root(),
            fs::canonicalize(temp_dir.path()).unwrap().as_path()
        );
    }

    #[test]
    fn test_add_module_rejects_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        workspace.add_module(Module::new("lib", "git")).unwrap();
        let result = workspace.add_module(Module::new("lib", "svn"));
        assert!(matches!(result, Err(Error::DuplicateModule { .. })));
        assert_eq!(workspace.modules().len(), 1);
        assert_eq!(workspace.modules()[0].vcs, "git");
    }

    #[test]
    fn test_add_module_rejects_invalid_names() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        for name in ["", "a/b", "..", ".pride"] {
            let result = workspace.add_module(Module::new(name, "git"));
            assert!(matches!(result, Err(Error::InvalidModuleName { .. })));
        }
    }

    #[test]
    fn test_remove_missing_module() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        let result = workspace.remove_module("ghost");
        assert!(matches!(result, Err(Error::ModuleNotFound { .. })));
    }

    #[test]
    fn test_remove_is_in_memory_until_save() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        workspace.add_module(Module::new("a", "git")).unwrap();
        workspace.add_module(Module::new("b", "git")).unwrap();
        workspace.save().unwrap();

        workspace.remove_module("a").unwrap();
        let reloaded = Workspace::load(temp_dir.path(), ConfigFile::in_memory()).unwrap();
        assert_eq!(reloaded.modules().len(), 2);

        workspace.save().unwrap();
        let reloaded = Workspace::load(temp_dir.path(), ConfigFile::in_memory()).unwrap();
        assert_eq!(reloaded.modules(), &[Module::new("b", "git")]);
    }

    #[test]
    fn test_save_load_round_trip_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        let modules = vec![
            Module::new("zeta", "git").with_remote("https://example.com/zeta.git"),
            Module::new("alpha", "svn"),
            Module::new("mid", "git"),
        ];
        for module in &modules {
            workspace.add_module(module.clone()).unwrap();
        }
        workspace.save().unwrap();

        let reloaded = Workspace::load(temp_dir.path(), ConfigFile::in_memory()).unwrap();
        assert_eq!(reloaded.modules(), modules.as_slice());
    }

    #[test]
    fn test_list_modules_with_filter() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        for name in ["lib-core", "app", "lib-util"] {
            workspace.add_module(Module::new(name, "git")).unwrap();
        }

        let filter = ModuleFilter::new(&["^lib-.*"]).unwrap();
        let names: Vec<String> = workspace
            .list_modules(&filter)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["lib-core", "lib-util"]);

        assert_eq!(workspace.list_modules(&ModuleFilter::all()).len(), 3);

        let none = ModuleFilter::new(&["nothing"]).unwrap();
        assert!(workspace.list_modules(&none).is_empty());
    }

    #[test]
    fn test_filter_matches_whole_name() {
        let filter = ModuleFilter::new(&["lib"]).unwrap();
        assert!(filter.matches("lib"));
        assert!(!filter.matches("lib-core"));
        assert!(ModuleFilter::new(&["("]).is_err());
    }

    #[test]
    fn test_read_modules_requires_vcs() {
        let mut config = ConfigFile::in_memory();
        config.set("modules.0.name", "orphan");
        assert!(matches!(read_modules(&config), Err(Error::Config { .. })));
    }

    #[test]
    fn test_write_modules_drops_stale_entries() {
        let mut config = ConfigFile::in_memory();
        write_modules(
            &mut config,
            &[Module::new("a", "git"), Module::new("b", "git")],
        );
        write_modules(&mut config, &[Module::new("b", "git")]);
        assert_eq!(read_modules(&config).unwrap(), vec![Module::new("b", "git")]);
        assert!(config.get("modules.1.name").is_none());
    }

    #[test]
    fn test_discover_and_add_existing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let mut workspace = create_workspace(root);
        for name in ["beta", "alpha"] {
            fs::create_dir_all(root.join(name)).unwrap();
            fs::write(root.join(name).join(".fake"), "").unwrap();
        }
        fs::create_dir_all(root.join("plain")).unwrap();

        let registry = fake_registry();
        let found = workspace.discover_unregistered(&registry).unwrap();
        assert_eq!(found, vec!["alpha", "beta"]);

        workspace.add_existing(&registry, "alpha").unwrap();
        assert_eq!(workspace.modules()[0].vcs, "fake");
        assert_eq!(
            workspace.discover_unregistered(&registry).unwrap(),
            vec!["beta"]
        );

        let result = workspace.add_existing(&registry, "plain");
        assert!(matches!(result, Err(Error::UnsupportedVcs { .. })));
    }

    #[test]
    fn test_changed_modules() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let mut workspace = create_workspace(root);

        let mut backend = FakeBackend::new("fake", ".fake");
        for (name, status) in [
            ("clean", VcsStatus::default()),
            (
                "dirty",
                VcsStatus {
                    uncommitted: true,
                    ..VcsStatus::default()
                },
            ),
            (
                "ahead",
                VcsStatus {
                    unpublished: true,
                    ..VcsStatus::default()
                },
            ),
        ] {
            fs::create_dir_all(root.join(name)).unwrap();
            fs::write(root.join(name).join(".fake"), "").unwrap();
            backend.statuses.insert(root.join(name), status);
            workspace.add_module(Module::new(name, "fake")).unwrap();
        }
        workspace.add_module(Module::new("gone", "fake")).unwrap();
        let registry = VcsRegistry::new(vec![Box::new(backend)]);

        let names: Vec<String> = ["clean", "dirty", "ahead", "gone"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let changed = workspace.changed_modules(&registry, &names).unwrap();
        assert_eq!(changed, vec!["dirty", "ahead"]);
    }

    #[test]
    fn test_export_keeps_settings_and_modules() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = ConfigFile::in_memory();
        settings.set("gradle.wrapper", "true");
        let mut workspace =
            Workspace::create(temp_dir.path(), ConfigFile::in_memory(), &settings).unwrap();
        workspace
            .add_module(Module::new("lib", "fake").with_remote("https://example.com/lib.git"))
            .unwrap();
        workspace.add_module(Module::new("app", "fake")).unwrap();

        let exported = workspace.export(&fake_registry());
        assert_eq!(exported.get("gradle.wrapper"), Some("true"));
        assert_eq!(
            read_modules(&exported).unwrap(),
            vec![
                Module::new("lib", "fake").with_remote("https://example.com/lib.git"),
                Module::new("app", "fake"),
            ]
        );
    }

    #[test]
    fn test_add_from_locator_checks_out() {
        let temp_dir = TempDir::new().unwrap();
        let mut workspace = create_workspace(temp_dir.path());
        let registry = fake_registry();

        let module = workspace
            .add_from_locator(&registry, "https://example.com/org/lib-core.git", "fake", None)
            .unwrap();
        assert_eq!(module.name, "lib-core");
        assert_eq!(
            module.remote.as_deref(),
            Some("https://example.com/org/lib-core.git")
        );
        assert!(temp_dir.path().join("lib-core").join(".fake").exists());

        let duplicate = workspace.add_from_locator(
            &registry,
            "https://example.com/other/lib-core.git",
            "fake",
            None,
        );
        assert!(matches!(duplicate, Err(Error::DuplicateModule { .. })));

        let unknown =
            workspace.add_from_locator(&registry, "https://example.com/x.git", "hg", None);
        assert!(matches!(unknown, Err(Error::UnknownVcsType { .. })));
    }
}
