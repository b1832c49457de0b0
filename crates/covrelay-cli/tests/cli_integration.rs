//! Integration tests for the covrelay-cli commands.
//!
//! These tests exercise the same code paths as the binary, using temporary
//! directories for the host config and coverage output.

use std::path::Path;

use covrelay_cli::commands;

fn write_config(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_load_host_config_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "covrelay.yaml",
        "reporters: [coverage, coveralls]\ncoverageReporter:\n  type: lcov\n  dir: out\n",
    );

    let host = commands::load_host_config(&path).unwrap();
    assert_eq!(host.reporters, vec!["coverage", "coveralls"]);
}

#[test]
fn test_load_host_config_missing_file() {
    let err = commands::load_host_config("/definitely/not/here/covrelay.yaml").unwrap_err();
    assert!(err.contains("covrelay.yaml"));
}

#[tokio::test]
async fn test_resolve_accepts_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "covrelay.json",
        &serde_json::json!({
            "reporters": ["coverage", "coveralls"],
            "basePath": dir.path(),
            "coverageReporter": { "type": "lcov", "dir": "coverage" },
            "coverallsReporter": { "repoToken": "secret" }
        })
        .to_string(),
    );

    commands::resolve::run(&path).await.unwrap();
}

#[tokio::test]
async fn test_resolve_rejects_reporter_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "covrelay.yaml",
        "reporters: [coveralls, coverage]\ncoverageReporter:\n  dir: coverage\n",
    );

    let err = commands::resolve::run(&path).await.unwrap_err();
    assert!(err.contains("coverage reporter should precede coveralls"));
}

#[tokio::test]
async fn test_locate_merges_nested_traces() {
    let dir = tempfile::tempdir().unwrap();
    for browser in ["Chrome", "Firefox"] {
        let sub = dir.path().join(browser);
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("lcov.info"), "TN:\nend_of_record\n").unwrap();
    }

    commands::locate::run(&dir.path().to_string_lossy(), "lcov.info")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_publish_rejects_wrong_reporter_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "covrelay.yaml",
        "reporters: [coveralls]\ncoverageReporter:\n  dir: coverage\n",
    );

    let err = commands::publish::run(&path, Some("http://127.0.0.1:9"))
        .await
        .unwrap_err();
    assert!(err.contains("coverage reporter should precede coveralls"));
}

#[tokio::test]
async fn test_publish_auto_watch_skips_upload() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "covrelay.json",
        &serde_json::json!({
            "reporters": ["coverage", "coveralls"],
            "basePath": dir.path(),
            "autoWatch": true,
            "coverageReporter": { "type": "lcov", "dir": "coverage" }
        })
        .to_string(),
    );

    // Nothing exists under coverage/ and the endpoint is unreachable:
    // only a skipped upload can succeed here.
    commands::publish::run(&path, Some("http://127.0.0.1:9"))
        .await
        .unwrap();
}
