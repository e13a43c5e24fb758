//! Git backend
//!
//! Detection walks ancestor directories looking for a `.git` control
//! directory. The current change ID is resolved by chasing symbolic refs
//! from `HEAD` without invoking git at all; history comes from
//! `git log --pretty=raw --date-order` parsed line by line.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use tracing::{debug, instrument};

use crank_core::error::ScmError;
use crank_core::types::ChangeRecord;

use crate::process::run_command;
use crate::provider::ScmProvider;
use crate::Result;

/// Git working-copy provider
pub struct GitScm {
    target: PathBuf,
    repo: PathBuf,
}

impl GitScm {
    /// Probe whether `target` is inside a git working copy. Walks up from
    /// `target` until a `.git` directory is found; `None` means git does
    /// not govern this path.
    pub fn detect(target: &Path) -> Option<Self> {
        let target = if target.is_absolute() {
            target.to_path_buf()
        } else {
            std::env::current_dir().ok()?.join(target)
        };

        for dir in target.ancestors() {
            let repo = dir.join(".git");
            if repo.exists() {
                debug!(repo = %repo.display(), "found git control directory");
                return Some(Self { target, repo });
            }
        }
        None
    }

    /// Resolve a ref file to a literal hash, following `ref: <path>`
    /// indirections recursively.
    fn read_ref(&self, name: &str) -> Result<String> {
        let content = std::fs::read_to_string(self.repo.join(name)).map_err(ScmError::Io)?;
        if let Some(next) = content.strip_prefix("ref: ") {
            return self.read_ref(next.trim());
        }
        Ok(content.trim().to_string())
    }
}

impl ScmProvider for GitScm {
    fn name(&self) -> &'static str {
        "git"
    }

    fn current_change_id(&self) -> Result<String> {
        self.read_ref("HEAD")
    }

    #[instrument(skip(self), fields(target = %self.target.display()))]
    fn list_changes(&self, from: Option<&str>, to: &str) -> Result<Vec<ChangeRecord>> {
        let revs = match from {
            Some(from) => format!("{from}..{to}"),
            None => to.to_string(),
        };
        let target = self.target.to_string_lossy();
        let raw = run_command(
            "git",
            &["log", "--pretty=raw", "--date-order", &revs, "--", &target],
            &self.target,
        )?;
        parse_raw_log(&raw)
    }
}

/// Accumulator for one commit block of `--pretty=raw` output
struct RawCommit {
    commit: String,
    author: Option<String>,
    committer: Option<String>,
    message: Vec<String>,
}

impl RawCommit {
    fn new(hash: &str) -> Self {
        Self {
            commit: hash.to_string(),
            author: None,
            committer: None,
            message: Vec::new(),
        }
    }

    /// Convert the accumulated block into a change record. The committer
    /// line (author as fallback) ends in `<epoch-seconds> <tz-offset>`;
    /// the offset is discarded and the rest of the line is the identity.
    fn into_record(self) -> Result<ChangeRecord> {
        let who = self
            .committer
            .or(self.author)
            .ok_or_else(|| ScmError::ParseFailed(format!("commit {} has no author", self.commit)))?;

        let mut parts: Vec<&str> = who.split(' ').collect();
        parts.pop(); // timezone offset
        let epoch = parts
            .pop()
            .ok_or_else(|| ScmError::ParseFailed(format!("malformed identity line: {who}")))?;
        let seconds: i64 = epoch
            .parse()
            .map_err(|_| ScmError::ParseFailed(format!("bad commit timestamp: {epoch}")))?;
        let date = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| ScmError::ParseFailed(format!("timestamp out of range: {seconds}")))?;

        // Subject line only; the raw body stays out of the changelog.
        let message = self.message.first().cloned().unwrap_or_default();

        Ok(ChangeRecord {
            changeid: self.commit,
            author: parts.join(" "),
            date,
            message,
        })
    }
}

/// Parse `git log --pretty=raw` output into change records, preserving the
/// order git emitted.
fn parse_raw_log(raw: &str) -> Result<Vec<ChangeRecord>> {
    let mut changes = Vec::new();
    let mut current: Option<RawCommit> = None;

    for line in raw.lines() {
        if line.is_empty() {
            continue;
        }
        // Message lines are indented by four spaces. Single-space
        // continuations (gpgsig blocks) are not message text.
        if let Some(message) = line.strip_prefix("    ") {
            if let Some(commit) = current.as_mut() {
                commit.message.push(message.to_string());
            }
            continue;
        }
        if line.starts_with(' ') {
            continue;
        }

        let (key, rest) = line.split_once(' ').unwrap_or((line, ""));
        match key {
            "commit" => {
                if let Some(done) = current.take() {
                    changes.push(done.into_record()?);
                }
                current = Some(RawCommit::new(rest));
            }
            "author" => {
                if let Some(commit) = current.as_mut() {
                    commit.author = Some(rest.to_string());
                }
            }
            "committer" => {
                if let Some(commit) = current.as_mut() {
                    commit.committer = Some(rest.to_string());
                }
            }
            // tree, parent, gpgsig and friends carry nothing we record
            _ => {}
        }
    }
    if let Some(done) = current.take() {
        changes.push(done.into_record()?);
    }

    Ok(changes)
}
