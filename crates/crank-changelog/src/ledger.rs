//! Version ledger derived from the changelog file
//!
//! The changelog is its own database: previously recorded releases are
//! recovered by matching the template's recognizer against the existing
//! text. Entries are kept in document order, and because new sections are
//! always prepended, the first entry is the most recently recorded release.

use tracing::debug;

use crank_core::error::ChangelogError;

use crate::template::Template;

/// Previously recorded `(version, changeid)` pairs, newest first
#[derive(Debug, Clone, Default)]
pub struct VersionLedger {
    entries: Vec<(String, String)>,
}

impl VersionLedger {
    /// Reconstruct the ledger by matching the template recognizer against
    /// the changelog text. The template must carry `{{version}}` and
    /// `{{changeid}}` placeholders.
    pub fn derive(template: &Template, changelog: &str) -> Result<Self, ChangelogError> {
        let recognizer = template.recognizer()?;

        let names: Vec<&str> = recognizer.capture_names().flatten().collect();
        if !names.contains(&"version") {
            return Err(ChangelogError::MissingLedgerCapture("version"));
        }
        if !names.contains(&"changeid") {
            return Err(ChangelogError::MissingLedgerCapture("changeid"));
        }

        let mut entries = Vec::new();
        for caps in recognizer.captures_iter(changelog) {
            if let (Some(version), Some(changeid)) = (caps.name("version"), caps.name("changeid"))
            {
                entries.push((
                    version.as_str().to_string(),
                    changeid.as_str().to_string(),
                ));
            }
        }

        debug!(releases = entries.len(), "ledger derived from changelog");
        Ok(Self { entries })
    }

    /// The change ID of the most recently recorded release, the high-water
    /// mark for "changes since"
    pub fn latest_change_id(&self) -> Option<&str> {
        self.entries.first().map(|(_, changeid)| changeid.as_str())
    }

    /// Whether a version has already been recorded
    pub fn contains_version(&self, version: &str) -> bool {
        self.entries.iter().any(|(v, _)| v == version)
    }

    /// Recorded `(version, changeid)` pairs in document order
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
