//! Subversion backend
//!
//! Detection checks for a `.svn` control directory directly in the target.
//! The current revision comes from the `Revision` field of `svn info`;
//! history comes from `svn log` requested in reverse so the rendered
//! changelog reads chronologically.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, instrument};

use crank_core::error::ScmError;
use crank_core::types::ChangeRecord;

use crate::process::run_command;
use crate::provider::ScmProvider;
use crate::Result;

/// Subversion working-copy provider
pub struct SvnScm {
    target: PathBuf,
}

impl SvnScm {
    /// Probe whether `target` is an svn working copy
    pub fn detect(target: &Path) -> Option<Self> {
        if target.join(".svn").exists() {
            debug!(target = %target.display(), "found svn control directory");
            Some(Self {
                target: target.to_path_buf(),
            })
        } else {
            None
        }
    }
}

impl ScmProvider for SvnScm {
    fn name(&self) -> &'static str {
        "svn"
    }

    fn current_change_id(&self) -> Result<String> {
        let raw = run_command("svn", &["info"], &self.target)?;
        let info = parse_info(&raw);
        info.into_iter()
            .find(|(key, _)| key == "Revision")
            .map(|(_, value)| value)
            .ok_or_else(|| ScmError::ParseFailed("svn info has no Revision field".into()))
    }

    #[instrument(skip(self), fields(target = %self.target.display()))]
    fn list_changes(&self, from: Option<&str>, to: &str) -> Result<Vec<ChangeRecord>> {
        let range = revision_range(from, to)?;
        let raw = run_command("svn", &["log", "-r", &range], &self.target)?;
        parse_log(&raw)
    }
}

/// Build the `-r` argument. svn ranges are inclusive on both ends and are
/// requested newest-first here so the changelog reads up; the `from`
/// revision itself is excluded by asking from `from + 1`.
fn revision_range(from: Option<&str>, to: &str) -> Result<String> {
    match from {
        Some(from) => {
            let from: u64 = from
                .parse()
                .map_err(|_| ScmError::ParseFailed(format!("invalid svn revision '{from}'")))?;
            Ok(format!("{to}:{}", from + 1))
        }
        None => Ok(format!("{to}:1")),
    }
}

/// Parse the colon-delimited key/value output of `svn info`
fn parse_info(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| {
            line.split_once(": ")
                .map(|(key, value)| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Parse `svn log` output: revision blocks delimited by separator lines of
/// dashes, each starting with a header of the form
/// `r<revision> | <author> | <date> | <n> lines`.
fn parse_log(raw: &str) -> Result<Vec<ChangeRecord>> {
    // The separator svn prints is a fixed 72-dash line; match any long run.
    let separator =
        Regex::new(r"(?m)^-{10,}\r?\n?").map_err(|e| ScmError::ParseFailed(e.to_string()))?;

    let mut changes = Vec::new();
    for entry in separator.split(raw) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let mut lines = entry.lines();
        let header = lines
            .next()
            .ok_or_else(|| ScmError::ParseFailed("empty svn log entry".into()))?;
        let fields: Vec<&str> = header.split(" | ").collect();
        if fields.len() < 3 || !fields[0].starts_with('r') {
            return Err(ScmError::ParseFailed(format!(
                "malformed svn log header: {header}"
            )));
        }

        let changeid = fields[0][1..].to_string();
        let author = fields[1].to_string();
        let date = parse_date(fields[2])?;

        // One blank line separates the header from the message body.
        let message: Vec<&str> = lines.skip(1).collect();

        changes.push(ChangeRecord {
            changeid,
            author,
            date,
            message: message.join("\n"),
        });
    }
    Ok(changes)
}

/// Parse the date field, e.g. `2012-05-08 09:45:20 -0700 (Tue, 08 May 2012)`.
/// Only the first three tokens carry information.
fn parse_date(field: &str) -> Result<DateTime<Utc>> {
    let stamp: Vec<&str> = field.split_whitespace().take(3).collect();
    if stamp.len() < 3 {
        return Err(ScmError::ParseFailed(format!("bad svn date: {field}")));
    }
    DateTime::parse_from_str(&stamp.join(" "), "%Y-%m-%d %H:%M:%S %z")
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| ScmError::ParseFailed(format!("bad svn date: {field}")))
}
