//! Routing rules - keyword patterns mapped to destination folders

mod engine;
mod normalize;

pub use engine::{RuleEngine, match_routes};
pub use normalize::{file_matches, normalize_extensions, parse_keywords};

use serde::Serialize;

/// Separator between keywords inside a rule pattern
pub const PATTERN_SEPARATOR: char = '|';

/// A rule that routes files whose name contains one of its keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Keywords joined by `|`, e.g. `"试卷|卷子"`
    pub pattern: String,

    /// Destination folder, absolute or relative to the base destination
    pub target: String,
}

impl Rule {
    /// Create a new rule
    pub fn new(pattern: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            target: target.into(),
        }
    }

    /// Lowercased, trimmed, non-empty keywords of this rule's pattern
    pub fn keywords(&self) -> impl Iterator<Item = String> + '_ {
        self.pattern
            .split(PATTERN_SEPARATOR)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase)
    }

    /// Check whether any keyword is a substring of the lowercased file name
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.keywords().any(|k| lower.contains(&k))
    }
}

/// A rule that matched a file name, in rule order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub pattern: String,
    pub target: String,
}

impl From<&Rule> for RouteMatch {
    fn from(rule: &Rule) -> Self {
        Self {
            pattern: rule.pattern.clone(),
            target: rule.target.clone(),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.target)
    }
}
