//! # Output and Reporting
//!
//! User-facing output is written through a [`Reporter`], an explicit sink
//! handed to every component that talks to the operator: the batch executor,
//! the initializer and the commands. One reporter lives for one command
//! invocation. Diagnostics meant for developers go through the `log` facade
//! instead.
//!
//! ## Respecting User Preferences
//!
//! Colour handling honours:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::cell::RefCell;
use std::env;

use console::style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// In auto mode, colors are disabled if `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stderr is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stderr().features().colors_supported()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Sink for messages addressed to the operator.
pub trait Reporter {
    /// A regular line of output.
    fn info(&self, message: &str);

    /// Something went wrong but the command carries on.
    fn warn(&self, message: &str);

    /// Progress of a multi-module operation; `index` is zero-based.
    fn progress(&self, index: usize, count: usize, action: &str, item: &str);
}

/// Reporter writing to the terminal: info to stdout, warnings to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    config: OutputConfig,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(config: OutputConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        if self.config.use_color {
            eprintln!("{} {}", style("warning:").yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    fn progress(&self, index: usize, count: usize, action: &str, item: &str) {
        if !self.verbose {
            return;
        }
        let counter = format!("[{}/{}]", index + 1, count);
        if self.config.use_color {
            println!("{} {} {}", style(counter).dim(), action, style(item).bold());
        } else {
            println!("{} {} {}", counter, action, item);
        }
    }
}

/// Reporter that keeps every line in memory, for tests and for callers that
/// post-process output.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: RefCell<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line reported so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Only the warning lines, without their prefix.
    pub fn warnings(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|line| line.strip_prefix("warning: "))
            .map(str::to_string)
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(format!("warning: {}", message));
    }

    fn progress(&self, index: usize, count: usize, action: &str, item: &str) {
        self.lines
            .borrow_mut()
            .push(format!("[{}/{}] {} {}", index + 1, count, action, item));
    }
}
