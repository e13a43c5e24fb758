//! Full pipeline test against a real git repository. Skipped when git is
//! not installed.

use std::path::Path;
use std::process::Command;

use crank_changelog::{ChangelogUpdater, UpdateOutcome};
use crank_core::config::Config;
use crank_scm::detect_provider;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(repo)
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test Author")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .expect("failed to spawn git");
    assert!(status.success(), "git {:?} failed", args);
}

#[test]
fn test_changelog_update_and_idempotence() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = tempfile::TempDir::new().unwrap();
    let repo = temp.path();
    git(repo, &["init", "-q"]);

    std::fs::write(repo.join("package.json"), r#"{ "version": "1.0.0" }"#).unwrap();
    std::fs::write(repo.join("Changelog.md"), "").unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-m", "Initial commit"]);

    let config = Config {
        target: repo.to_path_buf(),
        ..Default::default()
    };

    // first run records version 1.0.0 with the single commit
    let provider = detect_provider(&config.target).unwrap();
    let outcome = ChangelogUpdater::new(&config, provider).run().unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            version: "1.0.0".into(),
            change_count: 1
        }
    );

    let content = std::fs::read_to_string(repo.join("Changelog.md")).unwrap();
    assert!(content.contains("1.0.0"));
    assert_eq!(content.matches("Initial commit").count(), 1);

    // second immediate run must not touch the file
    let provider = detect_provider(&config.target).unwrap();
    let outcome = ChangelogUpdater::new(&config, provider).run().unwrap();
    assert_eq!(outcome, UpdateOutcome::UpToDate);
    assert_eq!(
        std::fs::read_to_string(repo.join("Changelog.md")).unwrap(),
        content
    );
}
