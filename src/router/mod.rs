//! Routing orchestrator - decides a destination per file and transfers it

mod report;
mod session;

pub use report::{BatchReport, FailedTransfer, LogEntry, LogLevel, SkipReason, Skipped, Transferred};
pub use session::{PendingChoice, Progress, RoutingSession, Selection};

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::rules::{RouteMatch, RuleEngine};
use crate::transfer::TransferMode;

/// How to handle a file matched by more than one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Ask the caller to pick a candidate; no answer skips the file
    Interactive,
    /// Use the first matching rule in rule order
    AutoFirst,
    /// Record the file as skipped without asking
    Skip,
}

impl ConflictPolicy {
    /// Policy for headless use: the config's `auto_use_first_rule` flag, else skip
    pub fn headless(auto_use_first_rule: Option<bool>) -> Self {
        match auto_use_first_rule {
            Some(true) => ConflictPolicy::AutoFirst,
            _ => ConflictPolicy::Skip,
        }
    }
}

/// Outcome of evaluating one file before anything touches the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Transfer into `destination`
    Route {
        target: String,
        destination: PathBuf,
    },
    /// Several rules matched and the caller has to choose
    Ambiguous(Vec<RouteMatch>),
    /// Leave the file where it is
    Skip(SkipReason),
}

/// Per-file routing decisions over an immutable rule snapshot
#[derive(Debug, Clone)]
pub struct Router {
    engine: RuleEngine,
    base: PathBuf,
    mode: TransferMode,
    policy: ConflictPolicy,
}

impl Router {
    /// Create a router. `base` receives unmatched files and anchors relative targets.
    pub fn new(
        engine: RuleEngine,
        base: impl Into<PathBuf>,
        mode: TransferMode,
        policy: ConflictPolicy,
    ) -> Self {
        Self {
            engine,
            base: base.into(),
            mode,
            policy,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Decide where `file` goes. Pure: never touches the filesystem.
    pub fn decide(&self, file: &Path) -> Decision {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut matches = self.engine.match_routes(&name);

        match matches.len() {
            0 => {
                debug!("No rule for {}, using base folder", name);
                Decision::Route {
                    target: self.base.to_string_lossy().into_owned(),
                    destination: self.base.clone(),
                }
            }
            1 => {
                let target = matches.remove(0).target;
                self.route_to(target)
            }
            _ => match self.policy {
                ConflictPolicy::AutoFirst => {
                    debug!(
                        "{} rules matched {}, using first: {}",
                        matches.len(),
                        name,
                        matches[0].pattern
                    );
                    let target = matches.remove(0).target;
                    self.route_to(target)
                }
                ConflictPolicy::Interactive => Decision::Ambiguous(matches),
                ConflictPolicy::Skip => Decision::Skip(SkipReason::Ambiguous),
            },
        }
    }

    /// Absolute targets are used as-is, relative ones go under the base folder
    pub fn resolve_target(&self, target: &str) -> PathBuf {
        let path = Path::new(target);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    /// Decisions for every file without transferring anything
    pub fn preview<'a>(
        &self,
        files: impl IntoIterator<Item = &'a PathBuf>,
    ) -> Vec<(PathBuf, Decision)> {
        files
            .into_iter()
            .map(|file| (file.clone(), self.decide(file)))
            .collect()
    }

    /// Start a step-wise routing session over `files`
    pub fn session(&self, files: Vec<PathBuf>) -> RoutingSession<'_> {
        RoutingSession::new(self, files)
    }

    /// Route a whole batch, asking `chooser` for every ambiguous file.
    ///
    /// `chooser` receives the pending choice and returns the raw answer
    /// (1-based index). `None`, empty or invalid answers skip the file.
    pub fn route_all<F>(&self, files: Vec<PathBuf>, mut chooser: F) -> BatchReport
    where
        F: FnMut(&PendingChoice) -> Option<String>,
    {
        let mut session = self.session(files);
        while let Progress::NeedsChoice = session.advance() {
            let selection = match session.pending() {
                Some(pending) => pending.parse_selection(chooser(pending).as_deref()),
                None => break,
            };
            session.resolve(selection);
        }
        session.finish()
    }

    fn route_to(&self, target: String) -> Decision {
        let destination = self.resolve_target(&target);
        Decision::Route {
            target,
            destination,
        }
    }
}
