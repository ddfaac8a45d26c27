//! Normalization of free-text keyword and extension input

use indexmap::IndexSet;
use regex::Regex;
use std::sync::LazyLock;

static EXT_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,，]+").expect("invalid extension separator regex"));

static KEYWORD_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ ,，;；/|\t\n]+").expect("invalid keyword separator regex")
});

/// Parse an extension list such as `"pdf, .TXT，doc"` into `["pdf", "txt", "doc"]`.
///
/// Entries are trimmed, stripped of a single leading dot and lowercased.
/// Empty input means "no extension filter" and yields an empty list.
pub fn normalize_extensions(text: &str) -> Vec<String> {
    let exts: IndexSet<String> = EXT_SEPARATORS
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let part = part.strip_prefix('.').unwrap_or(part);
            part.to_lowercase()
        })
        .filter(|ext| !ext.is_empty())
        .collect();

    exts.into_iter().collect()
}

/// Parse keyword input split on spaces, commas, semicolons, slashes, pipes,
/// tabs and newlines. Duplicates collapse, first occurrence wins.
pub fn parse_keywords(text: &str) -> Vec<String> {
    let keywords: IndexSet<String> = KEYWORD_SEPARATORS
        .split(text.trim())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();

    keywords.into_iter().collect()
}

/// Check a file name against the scan filters.
///
/// An empty extension list accepts every name; an empty keyword list
/// accepts every name. Both comparisons are case-insensitive.
pub fn file_matches(name: &str, keywords: &[String], extensions: &[String]) -> bool {
    let lower = name.to_lowercase();

    if !extensions.is_empty()
        && !extensions
            .iter()
            .any(|ext| lower.ends_with(&format!(".{}", ext)))
    {
        return false;
    }

    if keywords.is_empty() {
        return true;
    }

    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}
