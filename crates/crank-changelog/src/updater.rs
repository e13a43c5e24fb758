//! The changelog update pipeline
//!
//! Strictly sequential steps, each gated on the previous one's output:
//! load the ledger from the existing changelog, resolve the current change
//! ID, fetch changes since the last recorded release, resolve the target
//! version, filter and transform, render, and prepend. Every unmet
//! precondition is a clean early return, not an error, so re-running the
//! command when nothing changed is a safe no-op.

use std::path::Path;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crank_core::config::Config;
use crank_core::error::Result;
use crank_core::types::{Record, ReleaseRecord};
use crank_core::{filter, version_file};
use crank_scm::ScmProvider;

use crate::ledger::VersionLedger;
use crate::registry;

/// How one run of the pipeline ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new release section was prepended to the changelog
    Updated {
        version: String,
        change_count: usize,
    },
    /// The working copy sits at the last recorded change ID
    UpToDate,
    /// The target's version is already in the changelog
    VersionRecorded { version: String },
    /// Every change was filtered away and skipEmpty is set
    NoChanges,
    /// A release-level filter vetoed the release
    ReleaseSkipped,
}

/// Sequences one changelog update against a single working copy
pub struct ChangelogUpdater<'a> {
    config: &'a Config,
    provider: Box<dyn ScmProvider>,
}

impl<'a> ChangelogUpdater<'a> {
    pub fn new(config: &'a Config, provider: Box<dyn ScmProvider>) -> Self {
        Self { config, provider }
    }

    /// Run the pipeline to completion or to its first stop condition
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<UpdateOutcome> {
        let target = &self.config.target;
        let changelog_cfg = &self.config.changelog;

        let template = registry::load_template(changelog_cfg, target)?;
        let changelog_path = target.join(&changelog_cfg.file);
        let existing = read_or_empty(&changelog_path)?;

        let ledger = VersionLedger::derive(&template, &existing)?;
        let current = self.provider.current_change_id()?;
        debug!(
            scm = self.provider.name(),
            current = %current,
            recorded = ledger.len(),
            "resolved current change"
        );

        let baseline = ledger.latest_change_id();
        if baseline == Some(current.as_str()) {
            info!(current = %current, "changelog already up to date");
            return Ok(UpdateOutcome::UpToDate);
        }

        let changes = self.provider.list_changes(baseline, &current)?;

        let version = version_file::read_version(target)?;
        if ledger.contains_version(&version) {
            info!(version = %version, "version already recorded");
            return Ok(UpdateOutcome::VersionRecorded { version });
        }

        let records: Vec<Record> = changes
            .iter()
            .map(|change| change.to_record(&changelog_cfg.changes.dateformat))
            .collect();
        let records = filter::apply(records, &changelog_cfg.changes.filters)?;
        if records.is_empty() && changelog_cfg.releases.skip_empty {
            info!(version = %version, "no changes to record");
            return Ok(UpdateOutcome::NoChanges);
        }

        let change_count = records.len();
        let release = ReleaseRecord {
            version: version.clone(),
            date: Utc::now(),
            changeid: current,
            changes: records,
        };
        let releases = filter::apply(
            vec![release.to_record(&changelog_cfg.versions.dateformat)],
            &changelog_cfg.versions.filters,
        )?;
        let Some(release) = releases.into_iter().next() else {
            info!(version = %version, "release vetoed by filter");
            return Ok(UpdateOutcome::ReleaseSkipped);
        };

        let rendered = template.render(&Value::Object(release))?;
        std::fs::write(&changelog_path, format!("{rendered}{existing}"))?;
        info!(
            version = %version,
            change_count,
            path = %changelog_path.display(),
            "changelog updated"
        );

        Ok(UpdateOutcome::Updated {
            version,
            change_count,
        })
    }
}

/// Read the changelog, treating an absent file as empty content
fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use crank_core::config::FilterRule;
    use crank_core::filter::SKIP_SENTINEL;
    use crank_core::types::ChangeRecord;
    use crank_scm::Result as ScmResult;
    use tempfile::TempDir;

    /// Provider backed by canned data, for driving the pipeline without a
    /// real working copy
    struct FakeScm {
        head: String,
        history: Vec<ChangeRecord>,
    }

    impl ScmProvider for FakeScm {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn current_change_id(&self) -> ScmResult<String> {
            Ok(self.head.clone())
        }

        fn list_changes(&self, from: Option<&str>, _to: &str) -> ScmResult<Vec<ChangeRecord>> {
            let changes = match from {
                None => self.history.clone(),
                Some(from) => self
                    .history
                    .iter()
                    .skip_while(|c| c.changeid != from)
                    .skip(1)
                    .cloned()
                    .collect(),
            };
            Ok(changes)
        }
    }

    fn change(id: &str, message: &str) -> ChangeRecord {
        ChangeRecord::new(
            id,
            "Test Author",
            DateTime::from_timestamp(1_336_469_120, 0).unwrap(),
            message,
        )
    }

    fn setup(version: &str) -> (TempDir, Config) {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            format!(r#"{{ "version": "{version}" }}"#),
        )
        .unwrap();
        std::fs::write(temp.path().join("Changelog.md"), "").unwrap();

        let config = Config {
            target: temp.path().to_path_buf(),
            ..Default::default()
        };
        (temp, config)
    }

    fn read_changelog(temp: &TempDir) -> String {
        std::fs::read_to_string(temp.path().join("Changelog.md")).unwrap()
    }

    #[test]
    fn test_first_release_from_empty_changelog() {
        let (temp, config) = setup("1.0.0");
        let provider = Box::new(FakeScm {
            head: "abc1".into(),
            history: vec![change("abc1", "Initial commit")],
        });

        let outcome = ChangelogUpdater::new(&config, provider).run().unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                version: "1.0.0".into(),
                change_count: 1
            }
        );

        let content = read_changelog(&temp);
        assert!(content.contains("1.0.0"));
        assert!(content.contains("Initial commit"));
        assert_eq!(content.matches("Initial commit").count(), 1);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let (temp, config) = setup("1.0.0");
        let make_provider = || {
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "Initial commit")],
            })
        };

        ChangelogUpdater::new(&config, make_provider()).run().unwrap();
        let after_first = read_changelog(&temp);

        let outcome = ChangelogUpdater::new(&config, make_provider()).run().unwrap();
        assert_eq!(outcome, UpdateOutcome::UpToDate);
        assert_eq!(read_changelog(&temp), after_first);
    }

    #[test]
    fn test_version_already_recorded() {
        let (temp, config) = setup("1.0.0");
        ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "Initial commit")],
            }),
        )
        .run()
        .unwrap();

        // new commits land, but the version file was never bumped
        let outcome = ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "def2".into(),
                history: vec![change("abc1", "Initial commit"), change("def2", "more work")],
            }),
        )
        .run()
        .unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::VersionRecorded {
                version: "1.0.0".into()
            }
        );
        assert!(!read_changelog(&temp).contains("more work"));
    }

    #[test]
    fn test_new_release_prepends() {
        let (temp, mut config) = setup("1.0.0");
        ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "Initial commit")],
            }),
        )
        .run()
        .unwrap();

        std::fs::write(
            temp.path().join("package.json"),
            r#"{ "version": "1.1.0" }"#,
        )
        .unwrap();
        config.target = temp.path().to_path_buf();

        let outcome = ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "def2".into(),
                history: vec![change("abc1", "Initial commit"), change("def2", "add feature")],
            }),
        )
        .run()
        .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                version: "1.1.0".into(),
                change_count: 1
            }
        );

        let content = read_changelog(&temp);
        let newer = content.find("1.1.0").unwrap();
        let older = content.find("1.0.0").unwrap();
        assert!(newer < older, "new release must be prepended");
        assert!(content.contains("add feature"));
    }

    #[test]
    fn test_skip_empty_release() {
        let (temp, mut config) = setup("1.0.0");
        config.changelog.releases.skip_empty = true;
        config.changelog.changes.filters = vec![FilterRule {
            subject: "message".into(),
            pattern: "^.*$".into(),
            replacement: SKIP_SENTINEL.into(),
        }];

        let outcome = ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "noise")],
            }),
        )
        .run()
        .unwrap();

        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert_eq!(read_changelog(&temp), "");
    }

    #[test]
    fn test_release_vetoed_by_versions_filter() {
        let (temp, mut config) = setup("1.0.0-beta.1");
        config.changelog.versions.filters = vec![FilterRule {
            subject: "version".into(),
            pattern: r"^.*-beta.*$".into(),
            replacement: SKIP_SENTINEL.into(),
        }];

        let outcome = ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "work in progress")],
            }),
        )
        .run()
        .unwrap();

        assert_eq!(outcome, UpdateOutcome::ReleaseSkipped);
        assert_eq!(read_changelog(&temp), "");
    }

    #[test]
    fn test_change_filter_rewrites_messages() {
        let (temp, mut config) = setup("1.0.0");
        config.changelog.changes.filters = vec![FilterRule {
            subject: "message".into(),
            pattern: r"^bug (\d+): ".into(),
            replacement: "[#$1] ".into(),
        }];

        ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "bug 42: fix crash")],
            }),
        )
        .run()
        .unwrap();

        assert!(read_changelog(&temp).contains("[#42] fix crash"));
    }

    #[test]
    fn test_missing_version_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Changelog.md"), "").unwrap();
        let config = Config {
            target: temp.path().to_path_buf(),
            ..Default::default()
        };

        let result = ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "Initial commit")],
            }),
        )
        .run();
        assert!(result.is_err());
    }

    #[test]
    fn test_absent_changelog_is_created() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{ "version": "1.0.0" }"#,
        )
        .unwrap();
        let config = Config {
            target: temp.path().to_path_buf(),
            ..Default::default()
        };

        let outcome = ChangelogUpdater::new(
            &config,
            Box::new(FakeScm {
                head: "abc1".into(),
                history: vec![change("abc1", "Initial commit")],
            }),
        )
        .run()
        .unwrap();

        assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
        assert!(temp.path().join("Changelog.md").exists());
    }
}
