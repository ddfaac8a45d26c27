//! Step-wise batch routing with an explicit pending-choice state

use std::collections::VecDeque;
use std::path::PathBuf;
use tracing::{info, warn};

use super::report::{BatchReport, SkipReason};
use super::{Decision, Router};
use crate::rules::RouteMatch;
use crate::transfer::transfer;

/// An ambiguous file waiting for the caller to pick a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChoice {
    pub file: PathBuf,
    /// Matching rules in rule order
    pub candidates: Vec<RouteMatch>,
}

impl PendingChoice {
    /// Candidate targets numbered from 1, one per line
    pub fn prompt(&self) -> String {
        let mut text = format!("Multiple rules match {}:\n", self.file.display());
        for (i, candidate) in self.candidates.iter().enumerate() {
            text.push_str(&format!("{}) {}\n", i + 1, candidate.target));
        }
        text.push_str("Enter a number, or leave empty to skip this file: ");
        text
    }

    /// Interpret a raw 1-based answer. Empty, unparsable and out-of-range
    /// answers become skips with the matching reason.
    pub fn parse_selection(&self, input: Option<&str>) -> Selection {
        let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return Selection::Skip(SkipReason::NoSelection);
        };

        match raw.parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.candidates.len() => Selection::Candidate(n - 1),
            Ok(n) => Selection::Skip(SkipReason::OutOfRange(n)),
            Err(_) => Selection::Skip(SkipReason::Unparsable(raw.to_string())),
        }
    }
}

/// The caller's answer to a [`PendingChoice`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the candidates
    Candidate(usize),
    Skip(SkipReason),
}

/// Where a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A choice is pending; call [`RoutingSession::resolve`]
    NeedsChoice,
    /// Every file has been handled
    Finished,
}

/// Routes files one at a time, pausing on ambiguous files under the
/// interactive policy until the caller resolves them.
pub struct RoutingSession<'a> {
    router: &'a Router,
    queue: VecDeque<PathBuf>,
    pending: Option<PendingChoice>,
    report: BatchReport,
}

impl<'a> RoutingSession<'a> {
    pub(super) fn new(router: &'a Router, files: Vec<PathBuf>) -> Self {
        let mut report = BatchReport::default();
        report.record_start(files.len(), router.base(), router.mode());
        Self {
            router,
            queue: files.into(),
            pending: None,
            report,
        }
    }

    /// Process files until one needs a choice or the queue is empty
    pub fn advance(&mut self) -> Progress {
        if self.pending.is_some() {
            return Progress::NeedsChoice;
        }

        while let Some(file) = self.queue.pop_front() {
            match self.router.decide(&file) {
                Decision::Route { destination, .. } => self.transfer_one(file, destination),
                Decision::Skip(reason) => self.skip(file, reason, Vec::new()),
                Decision::Ambiguous(candidates) => {
                    info!(
                        "{} rules match {}, waiting for a choice",
                        candidates.len(),
                        file.display()
                    );
                    self.pending = Some(PendingChoice { file, candidates });
                    return Progress::NeedsChoice;
                }
            }
        }

        Progress::Finished
    }

    /// The file currently waiting for a choice
    pub fn pending(&self) -> Option<&PendingChoice> {
        self.pending.as_ref()
    }

    /// Apply the caller's answer to the pending file. No-op when nothing is pending.
    pub fn resolve(&mut self, selection: Selection) {
        let Some(PendingChoice { file, candidates }) = self.pending.take() else {
            return;
        };

        match selection {
            Selection::Candidate(index) if index < candidates.len() => {
                let destination = self.router.resolve_target(&candidates[index].target);
                self.transfer_one(file, destination);
            }
            Selection::Candidate(index) => {
                self.skip(file, SkipReason::OutOfRange(index + 1), candidates)
            }
            Selection::Skip(reason) => self.skip(file, reason, candidates),
        }
    }

    /// Files not yet handled, excluding a pending one
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Report so far
    pub fn report(&self) -> &BatchReport {
        &self.report
    }

    /// End the session. A still-pending file and unprocessed files are
    /// recorded as skipped.
    pub fn finish(mut self) -> BatchReport {
        if let Some(PendingChoice { file, candidates }) = self.pending.take() {
            self.skip(file, SkipReason::NoSelection, candidates);
        }
        while let Some(file) = self.queue.pop_front() {
            self.skip(file, SkipReason::NotReached, Vec::new());
        }
        self.report
    }

    fn transfer_one(&mut self, file: PathBuf, destination: PathBuf) {
        match transfer(&file, &destination, self.router.mode()) {
            Ok(final_path) => self.report.record_success(file, final_path, self.router.mode()),
            Err(e) => {
                warn!("Transfer failed for {}: {}", file.display(), e);
                self.report.record_failure(file, e);
            }
        }
    }

    fn skip(&mut self, file: PathBuf, reason: SkipReason, candidates: Vec<RouteMatch>) {
        info!("Skipping {}: {}", file.display(), reason);
        self.report.record_skip(file, reason, candidates);
    }
}
