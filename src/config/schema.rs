//! Configuration schema

use crate::rules::{Rule, normalize_extensions, parse_keywords};
use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// Scan keywords, insertion ordered and unique
    pub keywords: IndexSet<String>,

    /// Extensions to scan for, lowercase without leading dot
    pub exts: Vec<String>,

    /// Scan subdirectories
    pub recursive: bool,

    /// Ordered routing rules
    pub routes: Vec<Rule>,

    /// Copy instead of move
    pub copy_mode: bool,

    /// Resolve ambiguous matches with the first rule instead of asking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_use_first_rule: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: IndexSet::new(),
            exts: default_exts(),
            recursive: true,
            routes: default_routes(),
            copy_mode: false,
            auto_use_first_rule: None,
        }
    }
}

fn default_exts() -> Vec<String> {
    ["pdf", "doc", "docx", "txt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_routes() -> Vec<Rule> {
    vec![Rule::new("试卷|卷子", "试卷"), Rule::new("练习|作业", "练习")]
}

impl Config {
    /// Build a config from an arbitrary JSON value, keeping defaults for
    /// anything missing or of the wrong type.
    ///
    /// `routes` may be the current list of `{pattern, target}` objects or the
    /// legacy `{pattern: target}` map. Malformed rule entries are dropped; a
    /// list with no usable entries keeps the default rules.
    pub fn from_value(value: &Value) -> Self {
        let mut config = Self::default();
        let Some(obj) = value.as_object() else {
            debug!("Config document is not an object, using defaults");
            return config;
        };

        if let Some(keywords) = string_list(obj, "keywords") {
            config.keywords = keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(exts) = string_list(obj, "exts") {
            config.exts = normalize_extensions(&exts.join(","));
        }
        if let Some(recursive) = obj.get("recursive").and_then(Value::as_bool) {
            config.recursive = recursive;
        }
        if let Some(copy_mode) = obj.get("copy_mode").and_then(Value::as_bool) {
            config.copy_mode = copy_mode;
        }
        config.auto_use_first_rule = obj.get("auto_use_first_rule").and_then(Value::as_bool);

        match obj.get("routes") {
            Some(Value::Array(items)) => {
                let rules: Vec<Rule> = items.iter().filter_map(rule_from_entry).collect();
                if !rules.is_empty() {
                    config.routes = rules;
                }
            }
            Some(Value::Object(map)) => {
                debug!("Converting legacy map-shaped routes ({} entries)", map.len());
                config.routes = map
                    .iter()
                    .map(|(pattern, target)| Rule::new(pattern.clone(), scalar_to_string(target)))
                    .collect();
            }
            _ => {}
        }

        config
    }

    /// Keywords as a plain list, in insertion order
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords.iter().cloned().collect()
    }

    /// Parse `text` and append keywords not already present. Returns how many were added.
    pub fn add_keywords(&mut self, text: &str) -> usize {
        parse_keywords(text)
            .into_iter()
            .filter(|k| self.keywords.insert(k.clone()))
            .count()
    }

    /// Remove all keywords
    pub fn clear_keywords(&mut self) {
        self.keywords.clear();
    }

    /// Replace the extension filter with normalized `text`
    pub fn set_extensions(&mut self, text: &str) {
        self.exts = normalize_extensions(text);
    }
}

/// Array-of-strings field; non-string elements are skipped
fn string_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = obj.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

fn rule_from_entry(entry: &Value) -> Option<Rule> {
    let obj = entry.as_object()?;
    let pattern = obj.get("pattern")?;
    let target = obj.get("target")?;
    Some(Rule::new(scalar_to_string(pattern), scalar_to_string(target)))
}

/// Strings are taken verbatim, other values use their JSON text
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.keywords.is_empty());
        assert_eq!(config.exts, vec!["pdf", "doc", "docx", "txt"]);
        assert!(config.recursive);
        assert!(!config.copy_mode);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0], Rule::new("试卷|卷子", "试卷"));
        assert_eq!(config.auto_use_first_rule, None);
    }

    #[test]
    fn test_parse_full_config() {
        let value = json!({
            "keywords": ["试卷", "练习"],
            "exts": ["pdf"],
            "recursive": false,
            "routes": [{"pattern": "a|b", "target": "ab"}],
            "copy_mode": true,
            "auto_use_first_rule": true
        });

        let config = Config::from_value(&value);
        assert_eq!(config.keyword_list(), vec!["试卷", "练习"]);
        assert_eq!(config.exts, vec!["pdf"]);
        assert!(!config.recursive);
        assert!(config.copy_mode);
        assert_eq!(config.routes, vec![Rule::new("a|b", "ab")]);
        assert_eq!(config.auto_use_first_rule, Some(true));
    }

    #[test]
    fn test_legacy_map_routes_keep_order() {
        let value: Value =
            serde_json::from_str(r#"{"routes": {"zeta": "Z", "alpha": "A", "mid": "M"}}"#).unwrap();

        let config = Config::from_value(&value);
        assert_eq!(
            config.routes,
            vec![
                Rule::new("zeta", "Z"),
                Rule::new("alpha", "A"),
                Rule::new("mid", "M"),
            ]
        );
    }

    #[test]
    fn test_malformed_rules_dropped() {
        let value = json!({
            "routes": [
                {"pattern": "ok", "target": "dir"},
                {"pattern": "missing target"},
                "not an object",
                {"pattern": 42, "target": "numbers"}
            ]
        });

        let config = Config::from_value(&value);
        assert_eq!(
            config.routes,
            vec![Rule::new("ok", "dir"), Rule::new("42", "numbers")]
        );
    }

    #[test]
    fn test_empty_rule_list_keeps_defaults() {
        let config = Config::from_value(&json!({"routes": [{"bogus": 1}]}));
        assert_eq!(config.routes, Config::default().routes);
    }

    #[test]
    fn test_wrong_types_keep_defaults() {
        let value = json!({"recursive": "yes", "exts": "pdf", "copy_mode": 1});
        assert_eq!(Config::from_value(&value), Config::default());
        assert_eq!(Config::from_value(&json!([1, 2, 3])), Config::default());
    }

    #[test]
    fn test_loaded_lists_are_normalized() {
        let value = json!({"keywords": ["a", "a", " b "], "exts": [".PDF", "txt", "pdf"]});
        let config = Config::from_value(&value);
        assert_eq!(config.keyword_list(), vec!["a", "b"]);
        assert_eq!(config.exts, vec!["pdf", "txt"]);
    }

    #[test]
    fn test_add_and_clear_keywords() {
        let mut config = Config::default();
        assert_eq!(config.add_keywords("试卷, 练习"), 2);
        assert_eq!(config.add_keywords("练习 行测"), 1);
        assert_eq!(config.keyword_list(), vec!["试卷", "练习", "行测"]);

        config.clear_keywords();
        assert!(config.keywords.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(value["exts"], json!(["pdf", "doc", "docx", "txt"]));
        assert_eq!(value["routes"][1], json!({"pattern": "练习|作业", "target": "练习"}));
        assert_eq!(value["keywords"], json!([]));
        assert!(value.get("auto_use_first_rule").is_none());
    }
}
