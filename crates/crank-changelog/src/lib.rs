//! Changelog synthesis for crank
//!
//! Reads the existing changelog to recover the last recorded release,
//! queries an SCM provider for changes since then, filters and transforms
//! them, renders a new section through the configured template, and
//! prepends it. The changelog file is the durable record; no sidecar
//! database exists.

pub mod ledger;
pub mod registry;
pub mod template;
pub mod updater;

pub use ledger::VersionLedger;
pub use template::Template;
pub use updater::{ChangelogUpdater, UpdateOutcome};
