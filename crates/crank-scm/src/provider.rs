//! The SCM provider contract and backend detection

use std::path::Path;

use tracing::{debug, info};

use crank_core::types::ChangeRecord;

use crate::git::GitScm;
use crate::svn::SvnScm;
use crate::Result;

/// Capability contract implemented by every source-control backend.
///
/// Detection is not part of the trait: each backend exposes a `detect`
/// constructor that returns `None` when it does not govern the target,
/// so [`detect_provider`] can try them in turn.
pub trait ScmProvider {
    /// Backend name for diagnostics
    fn name(&self) -> &'static str;

    /// The change identifier the working copy currently sits at
    fn current_change_id(&self) -> Result<String>;

    /// Changes after `from` up to and including `to`, in the order the
    /// backend naturally emits for a chronological changelog. `None` for
    /// `from` means the beginning of history.
    fn list_changes(&self, from: Option<&str>, to: &str) -> Result<Vec<ChangeRecord>>;
}

/// Probe all registered backends against `target`, first match wins.
pub fn detect_provider(target: &Path) -> Result<Box<dyn ScmProvider>> {
    if let Some(git) = GitScm::detect(target) {
        info!(target = %target.display(), "detected git working copy");
        return Ok(Box::new(git));
    }
    if let Some(svn) = SvnScm::detect(target) {
        info!(target = %target.display(), "detected svn working copy");
        return Ok(Box::new(svn));
    }
    debug!(target = %target.display(), "no backend recognized the target");
    Err(crank_core::error::ScmError::NoProvider(target.to_path_buf()))
}
