//! Batch outcome and activity log

use std::path::{Path, PathBuf};

use crate::rules::RouteMatch;
use crate::transfer::{TransferError, TransferMode};

/// Why a file was left untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Several rules matched and the policy does not choose
    Ambiguous,
    /// The caller gave no answer
    NoSelection,
    /// The answer was not a valid 1-based candidate number
    OutOfRange(usize),
    /// The answer was not a number
    Unparsable(String),
    /// The session ended before the file was processed
    NotReached,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Ambiguous => write!(f, "multiple rules match"),
            SkipReason::NoSelection => write!(f, "no rule selected"),
            SkipReason::OutOfRange(n) => write!(f, "invalid choice {}", n),
            SkipReason::Unparsable(input) => write!(f, "could not parse choice '{}'", input),
            SkipReason::NotReached => write!(f, "not processed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transferred {
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug)]
pub struct FailedTransfer {
    pub source: PathBuf,
    pub error: TransferError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub source: PathBuf,
    pub reason: SkipReason,
    /// Matching rules, when the skip came from an unresolved conflict
    pub candidates: Vec<RouteMatch>,
}

/// A log entry for activity tracking
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub level: LogLevel,
    pub message: String,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Everything that happened in one routing batch
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<Transferred>,
    pub failed: Vec<FailedTransfer>,
    pub skipped: Vec<Skipped>,
    pub log: Vec<LogEntry>,
}

impl BatchReport {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when nothing failed and nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub(super) fn record_start(&mut self, files: usize, base: &Path, mode: TransferMode) {
        let action = match mode {
            TransferMode::Move => "move",
            TransferMode::Copy => "copy",
        };
        self.log(
            LogLevel::Info,
            format!("Routing {} files ({}) into {}", files, action, base.display()),
            None,
        );
    }

    pub(super) fn record_success(
        &mut self,
        source: PathBuf,
        destination: PathBuf,
        mode: TransferMode,
    ) {
        self.log(
            LogLevel::Success,
            format!(
                "{}: {} -> {}",
                mode.verb(),
                source.display(),
                destination.display()
            ),
            Some(source.clone()),
        );
        self.succeeded.push(Transferred {
            source,
            destination,
        });
    }

    pub(super) fn record_failure(&mut self, source: PathBuf, error: TransferError) {
        self.log(
            LogLevel::Error,
            format!("Failed: {} -> {}", source.display(), error),
            Some(source.clone()),
        );
        self.failed.push(FailedTransfer { source, error });
    }

    pub(super) fn record_skip(
        &mut self,
        source: PathBuf,
        reason: SkipReason,
        candidates: Vec<RouteMatch>,
    ) {
        self.log(
            LogLevel::Warning,
            format!("Skipped: {} ({})", source.display(), reason),
            Some(source.clone()),
        );
        self.skipped.push(Skipped {
            source,
            reason,
            candidates,
        });
    }

    fn log(&mut self, level: LogLevel, message: String, file: Option<PathBuf>) {
        self.log.push(LogEntry {
            timestamp: chrono::Local::now(),
            level,
            message,
            file,
        });
    }

    /// One-line totals
    pub fn summary(&self) -> String {
        format!(
            "Done: {} processed, {} failed, {} skipped",
            self.succeeded_count(),
            self.failed_count(),
            self.skipped_count()
        )
    }
}
