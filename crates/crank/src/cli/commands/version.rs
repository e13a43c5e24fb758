//! Version bump command

use clap::Args;
use console::style;
use tracing::info;

use crank_core::config::load_config;
use crank_core::version_file::{self, BumpLevel};

use crate::cli::{output, Cli};

/// Increment the version number
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Which component to bump
    #[arg(value_name = "LEVEL", default_value = "patch")]
    pub level: String,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let config = load_config(&cli.config_path())?;
        let level: BumpLevel = self.level.parse()?;
        info!(level = %self.level, target = %config.target.display(), "executing version command");

        let current = version_file::read_version(&config.target)?;
        let next = version_file::bump(&current, level)?;
        version_file::write_version(&config.target, &next)?;

        if !cli.quiet {
            output::success(&format!(
                "{} {}",
                style(&next).green().bold(),
                version_file::version_file_path(&config.target).display()
            ));
        }
        Ok(())
    }
}
