//! System command invocation for SCM backends

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crank_core::error::ScmError;

use crate::Result;

/// Run `program` with `args` in `cwd` and return its stdout. A non-zero
/// exit becomes an [`ScmError::CommandFailed`] carrying the stderr text.
pub(crate) fn run_command(program: &str, args: &[&str], cwd: &Path) -> Result<String> {
    debug!(program, ?args, cwd = %cwd.display(), "running scm command");
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(ScmError::Io)?;

    if !output.status.success() {
        return Err(ScmError::CommandFailed {
            command: format!("{} {}", program, args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
