//! Rule engine - evaluates the ordered rule list against file names

use tracing::{debug, trace};

use super::{RouteMatch, Rule};

/// Ordered list of routing rules. Earlier rules win ties.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create a new rule engine with the given rules
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Return every rule matching `file_name`, in rule order.
    ///
    /// A rule contributes at most one entry even if several of its keywords
    /// match. Choosing among multiple matches is left to the caller.
    pub fn match_routes(&self, file_name: &str) -> Vec<RouteMatch> {
        match_routes(file_name, &self.rules)
    }

    /// Get all rules
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Consume the engine, returning its rules
    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    /// Append a rule. Pattern and target are trimmed; returns false if either is empty.
    pub fn add_rule(&mut self, pattern: &str, target: &str) -> bool {
        let (pattern, target) = (pattern.trim(), target.trim());
        if pattern.is_empty() || target.is_empty() {
            return false;
        }
        self.rules.push(Rule::new(pattern, target));
        true
    }

    /// Remove a rule by index
    pub fn remove_rule(&mut self, index: usize) -> Option<Rule> {
        if index < self.rules.len() {
            Some(self.rules.remove(index))
        } else {
            None
        }
    }

    /// Swap a rule with its predecessor. Returns false at the top or out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.rules.len() {
            return false;
        }
        self.rules.swap(index - 1, index);
        true
    }

    /// Swap a rule with its successor. Returns false at the bottom or out of range.
    pub fn move_down(&mut self, index: usize) -> bool {
        match index.checked_add(1) {
            Some(next) if next < self.rules.len() => {
                self.rules.swap(index, next);
                true
            }
            _ => false,
        }
    }
}

/// Match a file name against an ordered rule slice
pub fn match_routes(file_name: &str, rules: &[Rule]) -> Vec<RouteMatch> {
    let matches: Vec<RouteMatch> = rules
        .iter()
        .filter(|rule| {
            let hit = rule.matches(file_name);
            if !hit {
                trace!("Rule '{}' did not match {}", rule.pattern, file_name);
            }
            hit
        })
        .map(RouteMatch::from)
        .collect();

    debug!("{} rule(s) matched {}", matches.len(), file_name);
    matches
}
