//! # Build Tool Integration
//!
//! The build tool is an external collaborator: pride never builds anything
//! itself. It asks the tool for the project tree of every module, runs tasks
//! from the workspace root and optionally generates a wrapper.
//!
//! [`BuildTool`] is the narrow contract; [`GradleBuildTool`] implements it by
//! shelling out to Gradle. The executable is chosen per directory: a
//! `gradlew` wrapper in the directory wins, then `<gradle.home>/bin/gradle`,
//! then `gradle` from `PATH`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

use crate::config::{RuntimeConfig, GRADLE_HOME};
use crate::error::{Error, Result};
use crate::model::ProjectModel;

/// Marker preceding the JSON project tree in the init script's output.
const MODEL_MARKER: &str = "PRIDE-PROJECT-MODEL:";

/// Gradle init script printing the evaluated project tree as JSON.
const MODEL_INIT_SCRIPT: &str = r#"
gradle.projectsEvaluated { g ->
    def describe
    describe = { p ->
        [
            name: p.name,
            path: p.path,
            projectDir: p.projectDir.absolutePath,
            children: p.childProjects.values().collect { describe(it) }
        ]
    }
    println "PRIDE-PROJECT-MODEL:" + groovy.json.JsonOutput.toJson(describe(g.rootProject))
}
"#;

/// Operations pride needs from the build tool.
pub trait BuildTool {
    /// Resolve the project tree rooted at `directory`.
    fn fetch_project_model(&self, directory: &Path) -> Result<ProjectModel>;

    /// Run `tasks` with `arguments` in `directory`, blocking until done.
    fn run_build(&self, directory: &Path, tasks: &[String], arguments: &[String]) -> Result<()>;

    /// Generate a wrapper script in `directory`.
    fn generate_wrapper(&self, directory: &Path) -> Result<()>;
}

/// Gradle, driven through its command-line client.
#[derive(Debug, Clone, Default)]
pub struct GradleBuildTool {
    gradle_home: Option<PathBuf>,
    verbose: bool,
}

impl GradleBuildTool {
    pub fn new(gradle_home: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            gradle_home,
            verbose,
        }
    }

    pub fn from_config(config: &RuntimeConfig, verbose: bool) -> Self {
        Self::new(config.get(GRADLE_HOME).map(PathBuf::from), verbose)
    }

    /// The executable to run in `directory`.
    pub fn executable(&self, directory: &Path) -> PathBuf {
        let wrapper = directory.join(if cfg!(windows) { "gradlew.bat" } else { "gradlew" });
        if wrapper.is_file() {
            return wrapper;
        }
        match &self.gradle_home {
            Some(home) => home.join("bin").join("gradle"),
            None => PathBuf::from("gradle"),
        }
    }

    fn command(&self, directory: &Path) -> Command {
        let mut command = Command::new(self.executable(directory));
        command.current_dir(directory);
        if self.verbose {
            command.arg("--info");
        }
        command
    }

    fn describe(&self, directory: &Path, args: &[String]) -> String {
        let mut parts = vec![self.executable(directory).display().to_string()];
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }

    fn run(&self, directory: &Path, args: &[String]) -> Result<()> {
        let description = self.describe(directory, args);
        debug!("Running {} in {}", description, directory.display());
        let status = self
            .command(directory)
            .args(args)
            .status()
            .map_err(|e| Error::BuildTool {
                command: description.clone(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(Error::BuildTool {
                command: description,
                message: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

/// Extract the project tree from the init script's output.
pub fn parse_model_output(directory: &Path, stdout: &str) -> Result<ProjectModel> {
    let json = stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix(MODEL_MARKER))
        .ok_or_else(|| Error::ProjectModel {
            directory: directory.to_path_buf(),
            message: "the build did not report a project model".to_string(),
        })?;
    serde_json::from_str(json).map_err(|e| Error::ProjectModel {
        directory: directory.to_path_buf(),
        message: format!("invalid project model: {}", e),
    })
}

impl BuildTool for GradleBuildTool {
    fn fetch_project_model(&self, directory: &Path) -> Result<ProjectModel> {
        let model_error = |message: String| Error::ProjectModel {
            directory: directory.to_path_buf(),
            message,
        };

        // Gradle picks the script language from the extension
        let mut script = tempfile::Builder::new()
            .prefix("pride-project-model-")
            .suffix(".gradle")
            .tempfile()
            .map_err(|e| model_error(e.to_string()))?;
        script
            .as_file_mut()
            .write_all(MODEL_INIT_SCRIPT.as_bytes())
            .map_err(|e| model_error(e.to_string()))?;

        debug!("Fetching project model in {}", directory.display());
        let output = Command::new(self.executable(directory))
            .current_dir(directory)
            .arg("--quiet")
            .arg("--init-script")
            .arg(script.path())
            .arg("help")
            .stdin(Stdio::null())
            .output();

        let output = output.map_err(|e| model_error(e.to_string()))?;
        if !output.status.success() {
            return Err(model_error(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        parse_model_output(directory, &String::from_utf8_lossy(&output.stdout))
    }

    fn run_build(&self, directory: &Path, tasks: &[String], arguments: &[String]) -> Result<()> {
        let args: Vec<String> = tasks.iter().chain(arguments).cloned().collect();
        self.run(directory, &args)
    }

    fn generate_wrapper(&self, directory: &Path) -> Result<()> {
        self.run(directory, &["wrapper".to_string()])
    }
}
