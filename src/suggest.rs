//! Rule suggestions from the most frequent words in file names

use indexmap::IndexMap;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::scanner::walk_recursive;

/// Splits names on anything that is neither a word character nor a CJK ideograph
static TOKEN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\u{4e00}-\u{9fff}]+").expect("invalid token regex"));

/// Tokens shorter than this are ignored
const MIN_TOKEN_CHARS: usize = 2;

/// Count name tokens of every file under `folder` and return the `top_n`
/// most common, ties in first-seen order. A missing folder yields nothing.
pub fn suggest_rules(folder: &Path, top_n: usize) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    if folder.is_dir() {
        walk_recursive(folder, &mut |path: PathBuf| {
            let Some(stem) = path.file_stem() else {
                return;
            };
            for token in tokenize(&stem.to_string_lossy()) {
                *counts.entry(token).or_insert(0) += 1;
            }
        });
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}

fn tokenize(stem: &str) -> Vec<String> {
    TOKEN_SEPARATORS
        .split(stem)
        .map(str::trim)
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}
