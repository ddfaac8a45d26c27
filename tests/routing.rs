use assert_fs::prelude::*;
use filerouter::router::SkipReason;
use filerouter::{
    Config, ConflictPolicy, Router, RuleEngine, TransferMode, find_matching_files,
    normalize_extensions, parse_keywords,
};
use predicates::prelude::*;

fn default_router(base: &std::path::Path, mode: TransferMode, policy: ConflictPolicy) -> Router {
    Router::new(RuleEngine::new(Config::default().routes), base, mode, policy)
}

#[test]
fn batch_routes_unmatched_single_and_conflicting_files() {
    let src = assert_fs::TempDir::new().unwrap();
    let dst = assert_fs::TempDir::new().unwrap();
    src.child("数学卷子.pdf").write_str("exam").unwrap();
    src.child("英语作业.docx").write_str("homework").unwrap();
    src.child("试卷练习.txt").write_str("both").unwrap();
    src.child("notes.txt").write_str("plain").unwrap();
    src.child("photo.png").touch().unwrap();

    let config = Config::default();
    let files = find_matching_files(src.path(), &config.keyword_list(), &config.exts, true);
    assert_eq!(files.len(), 4);

    let router = default_router(dst.path(), TransferMode::Move, ConflictPolicy::AutoFirst);
    let report = router.route_all(files, |_| panic!("auto-first never asks"));

    assert_eq!(report.succeeded_count(), 4);
    assert_eq!(report.skipped_count(), 0);
    assert_eq!(report.failed_count(), 0);

    dst.child("试卷/数学卷子.pdf").assert(predicate::path::exists());
    dst.child("练习/英语作业.docx").assert(predicate::path::exists());
    // First rule wins the conflict
    dst.child("试卷/试卷练习.txt").assert(predicate::path::exists());
    dst.child("notes.txt").assert("plain");
    src.child("数学卷子.pdf").assert(predicate::path::missing());
    src.child("photo.png").assert(predicate::path::exists());
}

#[test]
fn skip_policy_leaves_conflicting_file_in_place() {
    let src = assert_fs::TempDir::new().unwrap();
    let dst = assert_fs::TempDir::new().unwrap();
    src.child("试卷作业.pdf").touch().unwrap();

    let router = default_router(dst.path(), TransferMode::Move, ConflictPolicy::Skip);
    let report = router.route_all(vec![src.child("试卷作业.pdf").to_path_buf()], |_| None);

    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::Ambiguous);
    src.child("试卷作业.pdf").assert(predicate::path::exists());
    dst.child("试卷").assert(predicate::path::missing());
}

#[test]
fn interactive_choice_picks_numbered_candidate() {
    let src = assert_fs::TempDir::new().unwrap();
    let dst = assert_fs::TempDir::new().unwrap();
    src.child("卷子作业.pdf").touch().unwrap();

    let router = default_router(dst.path(), TransferMode::Copy, ConflictPolicy::Interactive);
    let mut asked = 0;
    let report = router.route_all(vec![src.child("卷子作业.pdf").to_path_buf()], |pending| {
        asked += 1;
        assert_eq!(pending.candidates.len(), 2);
        Some("2\n".to_string())
    });

    assert_eq!(asked, 1);
    assert_eq!(report.succeeded_count(), 1);
    dst.child("练习/卷子作业.pdf").assert(predicate::path::exists());
    src.child("卷子作业.pdf").assert(predicate::path::exists());
}

#[test]
fn copying_twice_never_overwrites() {
    let src = assert_fs::TempDir::new().unwrap();
    let dst = assert_fs::TempDir::new().unwrap();
    src.child("report.pdf").write_str("v1").unwrap();

    let router = default_router(dst.path(), TransferMode::Copy, ConflictPolicy::Skip);
    let file = src.child("report.pdf").to_path_buf();

    router.route_all(vec![file.clone()], |_| None);
    src.child("report.pdf").write_str("v2").unwrap();
    let report = router.route_all(vec![file], |_| None);

    assert_eq!(report.succeeded[0].destination, dst.path().join("report(1).pdf"));
    dst.child("report.pdf").assert("v1");
    dst.child("report(1).pdf").assert("v2");
}

#[test]
fn scan_filters_by_keyword_extension_and_depth() {
    let src = assert_fs::TempDir::new().unwrap();
    src.child("Math_Exam.PDF").touch().unwrap();
    src.child("exam.png").touch().unwrap();
    src.child("letter.pdf").touch().unwrap();
    src.child("deep/nested/final exam.doc").touch().unwrap();

    let keywords = parse_keywords("exam");
    let exts = normalize_extensions(".pdf, doc");

    let mut found = find_matching_files(src.path(), &keywords, &exts, true);
    found.sort();
    assert_eq!(
        found,
        vec![
            src.path().join("Math_Exam.PDF"),
            src.path().join("deep/nested/final exam.doc"),
        ]
    );

    let top_level = find_matching_files(src.path(), &keywords, &exts, false);
    assert_eq!(top_level, vec![src.path().join("Math_Exam.PDF")]);
}

#[test]
fn legacy_config_with_route_map_loads_in_order() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("config.json");
    file.write_str(
        r#"{
            "keywords": [" exam ", "exam", ""],
            "exts": [".PDF", "txt"],
            "routes": {"zeta": "Z", "alpha|beta": "A"},
            "auto_use_first_rule": true
        }"#,
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.keyword_list(), vec!["exam"]);
    assert_eq!(config.exts, vec!["pdf", "txt"]);
    assert!(config.recursive);
    assert_eq!(config.auto_use_first_rule, Some(true));

    let patterns: Vec<&str> = config.routes.iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(patterns, vec!["zeta", "alpha|beta"]);

    // Saving writes the list form back
    config.save(Some(file.path())).unwrap();
    file.assert(predicate::str::contains(r#""pattern": "zeta""#));
    let reloaded = Config::load(Some(file.path())).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn corrupt_config_falls_back_to_defaults() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("config.json");
    file.write_str("{ not json").unwrap();

    assert!(Config::load(Some(file.path())).is_err());
    assert_eq!(Config::load_or_default(Some(file.path())), Config::default());
}
