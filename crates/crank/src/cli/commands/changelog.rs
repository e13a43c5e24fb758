//! Changelog command

use clap::Args;
use console::style;
use tracing::info;

use crank_changelog::{ChangelogUpdater, UpdateOutcome};
use crank_core::config::load_config;
use crank_scm::detect_provider;

use crate::cli::{output, Cli};

/// Update the changelog with changes since the last release
#[derive(Debug, Args)]
pub struct ChangelogCommand {}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = load_config(&cli.config_path())?;
        info!(target = %config.target.display(), "executing changelog command");

        let provider = detect_provider(&config.target)?;
        let outcome = ChangelogUpdater::new(&config, provider).run()?;

        if cli.quiet {
            return Ok(());
        }
        match outcome {
            UpdateOutcome::Updated {
                version,
                change_count,
            } => {
                let changes = if change_count == 1 { "change" } else { "changes" };
                output::success(&format!(
                    "Recorded {} ({} {}) in {}",
                    style(&version).green().bold(),
                    change_count,
                    changes,
                    style(config.changelog.file).cyan()
                ));
            }
            UpdateOutcome::UpToDate => output::notice("no changes since last crank"),
            UpdateOutcome::VersionRecorded { version } => {
                output::notice(&format!("version {version} already recorded"));
            }
            UpdateOutcome::NoChanges => output::notice("no changes to record"),
            UpdateOutcome::ReleaseSkipped => output::notice("release skipped by filter"),
        }

        Ok(())
    }
}
