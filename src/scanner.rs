//! Directory scanning with keyword and extension filters

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::rules::file_matches;

/// Collect files under `folder` whose names pass the keyword and extension filters.
///
/// A missing or non-directory `folder` yields an empty list. Recursive mode
/// walks subdirectories depth-first and never follows symlinked directories.
/// Results are in traversal order.
pub fn find_matching_files(
    folder: &Path,
    keywords: &[String],
    extensions: &[String],
    recursive: bool,
) -> Vec<PathBuf> {
    let mut found = Vec::new();

    if !folder.is_dir() {
        debug!("Not a directory, nothing to scan: {}", folder.display());
        return found;
    }

    let mut visit = |path: PathBuf| {
        let matched = path
            .file_name()
            .map(|name| file_matches(&name.to_string_lossy(), keywords, extensions))
            .unwrap_or(false);
        if matched {
            found.push(path);
        }
    };

    if recursive {
        walk_recursive(folder, &mut visit);
    } else {
        match fs::read_dir(folder) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_file() {
                        visit(path);
                    }
                }
            }
            Err(e) => warn!("Failed to scan directory {}: {}", folder.display(), e),
        }
    }

    info!(
        "Scan of {}: {} matching files (recursive: {})",
        folder.display(),
        found.len(),
        recursive
    );
    found
}

/// Depth-first walk handing every regular file to `visit`.
/// Unreadable directories are logged and skipped.
pub(crate) fn walk_recursive(path: &Path, visit: &mut dyn FnMut(PathBuf)) {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read directory {}: {}", path.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(ft) = entry.file_type() else {
            continue;
        };
        if ft.is_symlink() {
            // Symlinked files still count, symlinked directories are not entered
            if entry.path().is_file() {
                visit(entry.path());
            }
            continue;
        }
        if ft.is_dir() {
            walk_recursive(&entry.path(), visit);
        } else if ft.is_file() {
            visit(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn fixture() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("数学试卷.pdf"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::write(root.join("photo.PDF"), "x").unwrap();
        fs::create_dir_all(root.join("sub").join("deeper")).unwrap();
        fs::write(root.join("sub").join("练习.pdf"), "x").unwrap();
        fs::write(root.join("sub").join("deeper").join("试卷2.doc"), "x").unwrap();
        temp
    }

    #[test]
    fn test_missing_folder_is_empty() {
        let result = find_matching_files(Path::new("/does/not/exist"), &[], &[], true);
        assert!(result.is_empty());
    }

    #[test]
    fn test_file_is_not_a_folder() {
        let temp = fixture();
        let result = find_matching_files(&temp.path().join("notes.txt"), &[], &[], true);
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_keywords_with_extension_filter() {
        let temp = fixture();
        let result = find_matching_files(temp.path(), &[], &strings(&["pdf"]), true);
        assert_eq!(names(&result), strings(&["photo.PDF", "数学试卷.pdf", "练习.pdf"]));
    }

    #[test]
    fn test_non_recursive_lists_top_level_only() {
        let temp = fixture();
        let result = find_matching_files(temp.path(), &[], &[], false);
        assert_eq!(names(&result), strings(&["notes.txt", "photo.PDF", "数学试卷.pdf"]));
    }

    #[test]
    fn test_keywords_and_extensions_combine() {
        let temp = fixture();
        let result = find_matching_files(
            temp.path(),
            &strings(&["试卷"]),
            &strings(&["pdf", "doc"]),
            true,
        );
        assert_eq!(names(&result), strings(&["数学试卷.pdf", "试卷2.doc"]));
    }

    #[test]
    fn test_directories_are_not_results() {
        let temp = fixture();
        let result = find_matching_files(temp.path(), &strings(&["sub"]), &[], true);
        assert!(result.is_empty());
    }
}
