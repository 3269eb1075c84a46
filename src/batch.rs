//! # Batch Execution
//!
//! Multi-module commands apply one action to a list of modules. The
//! [`BatchExecutor`] runs the action in input order, reports progress and
//! collects per-module failures instead of stopping at the first one.
//!
//! Two modes exist:
//!
//! - **Tolerant** (the default): every item is attempted. Failures are warned
//!   about as they happen and summarized in one aggregate error at the end.
//! - **Strict**: the first failure stops the batch. The remaining items are
//!   recorded as skipped and the original error is surfaced unchanged.

use log::debug;

use crate::error::{Error, Result};
use crate::output::Reporter;
use crate::workspace::Module;

/// Something a batch can report on by name.
pub trait BatchItem {
    fn item_name(&self) -> &str;
}

impl BatchItem for Module {
    fn item_name(&self) -> &str {
        &self.name
    }
}

impl BatchItem for String {
    fn item_name(&self) -> &str {
        self
    }
}

impl BatchItem for &str {
    fn item_name(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    Tolerant,
    Strict,
}

/// A failed item and the error it produced.
#[derive(Debug)]
pub struct ItemFailure {
    pub name: String,
    pub error: Error,
}

/// What happened to each item of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub action: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<ItemFailure>,
    pub skipped: Vec<String>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_names(&self) -> Vec<String> {
        self.failed.iter().map(|f| f.name.clone()).collect()
    }

    /// Collapse into one aggregate error naming every failed item.
    pub fn into_result(self) -> Result<()> {
        if self.failed.is_empty() {
            return Ok(());
        }
        let details = self
            .failed
            .iter()
            .map(|f| format!("\t* {}: {}", f.name, f.error))
            .collect::<Vec<_>>()
            .join("\n");
        Err(Error::PartialBatchFailure {
            action: self.action,
            modules: self.failed.into_iter().map(|f| f.name).collect(),
            details,
        })
    }

    /// Surface the first failure as-is.
    pub fn into_first_error(self) -> Result<()> {
        match self.failed.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(()),
        }
    }
}

/// Runs one action over a list of items.
pub struct BatchExecutor<'a> {
    action: String,
    reporter: &'a dyn Reporter,
    mode: BatchMode,
}

impl<'a> BatchExecutor<'a> {
    /// A tolerant executor; `action` labels progress lines and the summary.
    pub fn new(action: impl Into<String>, reporter: &'a dyn Reporter) -> Self {
        Self {
            action: action.into(),
            reporter,
            mode: BatchMode::Tolerant,
        }
    }

    pub fn strict(mut self) -> Self {
        self.mode = BatchMode::Strict;
        self
    }

    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    /// Apply `action` to every item in order. The closure receives the item,
    /// its zero-based index and the item count.
    pub fn execute<T, F>(&self, items: &[T], mut action: F) -> BatchOutcome
    where
        T: BatchItem,
        F: FnMut(&T, usize, usize) -> Result<()>,
    {
        let count = items.len();
        let mut outcome = BatchOutcome {
            action: self.action.clone(),
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        };

        for (index, item) in items.iter().enumerate() {
            let name = item.item_name();
            if self.mode == BatchMode::Strict && !outcome.failed.is_empty() {
                outcome.skipped.push(name.to_string());
                continue;
            }

            self.reporter.progress(index, count, &self.action, name);
            match action(item, index, count) {
                Ok(()) => outcome.succeeded.push(name.to_string()),
                Err(error) => {
                    match self.mode {
                        BatchMode::Tolerant => {
                            self.reporter.warn(&format!("{}: {}", name, error));
                        }
                        BatchMode::Strict => {
                            debug!("{} {} failed: {}", self.action, name, error);
                        }
                    }
                    outcome.failed.push(ItemFailure {
                        name: name.to_string(),
                        error,
                    });
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemoryReporter;

    fn fail_on(target: &'static str) -> impl FnMut(&&str, usize, usize) -> Result<()> {
        move |item: &&str, _: usize, _: usize| {
            if *item == target {
                Err(Error::ModuleNotFound {
                    name: item.to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_tolerant_batch_reports_only_failed_items() {
        let reporter = MemoryReporter::new();
        let executor = BatchExecutor::new("Removing", &reporter);

        let outcome = executor.execute(&["a", "b", "c"], fail_on("b"));
        assert_eq!(outcome.succeeded, vec!["a", "c"]);
        assert_eq!(outcome.failed_names(), vec!["b"]);
        assert!(outcome.skipped.is_empty());
        assert_eq!(reporter.warnings().len(), 1);

        match outcome.into_result() {
            Err(Error::PartialBatchFailure {
                action,
                modules,
                details,
            }) => {
                assert_eq!(action, "Removing");
                assert_eq!(modules, vec!["b"]);
                assert!(details.starts_with("\t* b: "));
            }
            other => panic!("expected PartialBatchFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_batch_stops_at_first_failure() {
        let reporter = MemoryReporter::new();
        let executor = BatchExecutor::new("Fetching", &reporter).strict();
        assert_eq!(executor.mode(), BatchMode::Strict);

        let outcome = executor.execute(&["a", "b", "c"], fail_on("b"));
        assert_eq!(outcome.succeeded, vec!["a"]);
        assert_eq!(outcome.failed_names(), vec!["b"]);
        assert_eq!(outcome.skipped, vec!["c"]);
        assert!(reporter.warnings().is_empty());

        assert!(matches!(
            outcome.into_first_error(),
            Err(Error::ModuleNotFound { .. })
        ));
    }

    #[test]
    fn test_progress_lines() {
        let reporter = MemoryReporter::new();
        let outcome =
            BatchExecutor::new("Checking", &reporter).execute(&["x", "y"], |_, _, _| Ok(()));
        assert!(outcome.is_success());
        assert!(outcome.into_result().is_ok());
        assert_eq!(reporter.lines(), vec!["[1/2] Checking x", "[2/2] Checking y"]);
    }

    #[test]
    fn test_empty_batch() {
        let reporter = MemoryReporter::new();
        let items: Vec<String> = Vec::new();
        let outcome = BatchExecutor::new("Removing", &reporter).execute(&items, |_, _, _| Ok(()));
        assert!(outcome.succeeded.is_empty());
        assert!(outcome.into_first_error().is_ok());
    }
}
