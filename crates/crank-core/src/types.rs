//! Core data records for crank
//!
//! An SCM provider produces [`ChangeRecord`]s; the changelog pipeline turns
//! them into generic string-field records (JSON maps) so that filtering and
//! template rendering can stay agnostic of the concrete shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates;

/// A generic record with named fields, as consumed by the filter engine
/// and the template renderer.
pub type Record = Map<String, Value>;

/// One commit/revision as reported by a source-control backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Opaque change identifier (git hash, svn revision)
    pub changeid: String,
    /// Human name of the author/committer
    pub author: String,
    /// When the change was committed
    pub date: DateTime<Utc>,
    /// Commit message
    pub message: String,
}

impl ChangeRecord {
    /// Create a new change record
    pub fn new(
        changeid: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            changeid: changeid.into(),
            author: author.into(),
            date,
            message: message.into(),
        }
    }

    /// Convert to a generic record, formatting the date with `dateformat`
    pub fn to_record(&self, dateformat: &str) -> Record {
        let mut record = Map::new();
        record.insert("changeid".into(), Value::String(self.changeid.clone()));
        record.insert("author".into(), Value::String(self.author.clone()));
        record.insert(
            "date".into(),
            Value::String(dates::format_date(&self.date, dateformat)),
        );
        record.insert("message".into(), Value::String(self.message.clone()));
        record
    }
}

/// One version's worth of aggregated changes, rendered as one changelog
/// section. Built once per changelog run.
#[derive(Debug, Clone)]
pub struct ReleaseRecord {
    /// Version being recorded
    pub version: String,
    /// When the release was cut
    pub date: DateTime<Utc>,
    /// Change identifier the release was cut at
    pub changeid: String,
    /// Changes in the release, already filtered and date-formatted
    pub changes: Vec<Record>,
}

impl ReleaseRecord {
    /// Convert to a generic record, formatting the release date with
    /// `dateformat`
    pub fn to_record(&self, dateformat: &str) -> Record {
        let mut record = Map::new();
        record.insert("version".into(), Value::String(self.version.clone()));
        record.insert(
            "date".into(),
            Value::String(dates::format_date(&self.date, dateformat)),
        );
        record.insert("changeid".into(), Value::String(self.changeid.clone()));
        record.insert(
            "changes".into(),
            Value::Array(self.changes.iter().cloned().map(Value::Object).collect()),
        );
        record
    }
}
