//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for crank
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of the working copy to operate on
    pub target: PathBuf,

    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: PathBuf::from("."),
            changelog: ChangelogConfig::default(),
        }
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file, relative to the target directory
    pub file: String,

    /// Template name. Built-in names (`md`, `txt`) resolve to embedded
    /// templates; anything else is a file path relative to the target.
    /// `None` derives the name from the changelog file extension.
    pub template: Option<String>,

    /// Per-change date format and filters
    pub changes: RecordConfig,

    /// Per-release date format and filters
    pub versions: RecordConfig,

    /// Release-level behavior
    pub releases: ReleasesConfig,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: "Changelog.md".into(),
            template: None,
            changes: RecordConfig::default(),
            versions: RecordConfig::default(),
            releases: ReleasesConfig::default(),
        }
    }
}

/// Date format and filter list for one record level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// strftime format, or "default"
    pub dateformat: String,

    /// Ordered filter rules
    pub filters: Vec<FilterRule>,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            dateformat: "default".into(),
            filters: Vec::new(),
        }
    }
}

/// Release-level options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasesConfig {
    /// Skip writing a release whose filtered change list is empty
    #[serde(rename = "skipEmpty")]
    pub skip_empty: bool,
}

/// One pattern-substitution rule applied to a named record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Field the rule applies to
    pub subject: String,
    /// Regular expression to match
    pub pattern: String,
    /// Replacement text; the skip sentinel drops the record
    pub replacement: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.target, PathBuf::from("."));
        assert_eq!(config.changelog.file, "Changelog.md");
        assert!(config.changelog.template.is_none());
        assert_eq!(config.changelog.changes.dateformat, "default");
        assert!(config.changelog.changes.filters.is_empty());
        assert!(!config.changelog.releases.skip_empty);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(
            r#"{ "changelog": { "file": "HISTORY.txt", "releases": { "skipEmpty": true } } }"#,
        )
        .unwrap();
        assert_eq!(config.changelog.file, "HISTORY.txt");
        assert!(config.changelog.releases.skip_empty);
        // untouched fields keep their defaults
        assert_eq!(config.changelog.versions.dateformat, "default");
    }

    #[test]
    fn test_deserialize_filter_rule() {
        let rule: FilterRule = serde_json::from_str(
            r#"{ "subject": "message", "pattern": "^wip.*$", "replacement": "--CRANK:SKIP--" }"#,
        )
        .unwrap();
        assert_eq!(rule.subject, "message");
        assert_eq!(rule.replacement, "--CRANK:SKIP--");
    }
}
