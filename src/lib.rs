//! filerouter - route files into subfolders by keyword rules
//!
//! Scans a folder for files matching keyword and extension filters, matches
//! each name against an ordered list of `pattern -> target` rules and copies
//! or moves it into the resolved folder without overwriting anything.

pub mod config;
pub mod router;
pub mod rules;
pub mod scanner;
pub mod suggest;
pub mod transfer;

pub use config::Config;
pub use router::{BatchReport, ConflictPolicy, Decision, PendingChoice, Router, RoutingSession};
pub use rules::{RouteMatch, Rule, RuleEngine, match_routes, normalize_extensions, parse_keywords};
pub use scanner::find_matching_files;
pub use suggest::suggest_rules;
pub use transfer::{TransferError, TransferMode, transfer};

/// Current version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
