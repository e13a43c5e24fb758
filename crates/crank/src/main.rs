//! crank - release chores for one working copy at a time

mod cli;
mod exit_codes;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crank_core::error::{ConfigError, CrankError, ScmError, VersionError};

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose);

    if let Err(err) = cli.execute() {
        cli::output::error(&format!("{err:#}"));
        std::process::exit(exit_code(&err));
    }
}

/// Map an error chain to a process exit code
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<CrankError>() {
        return match err {
            CrankError::Config(_) => exit_codes::CONFIG_ERROR,
            CrankError::Scm(_) => exit_codes::SCM_ERROR,
            CrankError::Version(_) => exit_codes::VERSION_ERROR,
            _ => exit_codes::ERROR,
        };
    }
    if err.is::<ConfigError>() {
        exit_codes::CONFIG_ERROR
    } else if err.is::<ScmError>() {
        exit_codes::SCM_ERROR
    } else if err.is::<VersionError>() {
        exit_codes::VERSION_ERROR
    } else {
        exit_codes::ERROR
    }
}

/// Set up tracing with two layers:
/// - Console: controlled by RUST_LOG (default: warn, or debug with --verbose)
/// - File: always debug-level JSON to ~/.crank/logs/
fn init_tracing(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(log_dir) = log_directory() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "crank.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_filter(console_filter),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_filter(EnvFilter::new("debug")),
            )
            .init();

        return Some(guard);
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(console_filter),
        )
        .init();

    None
}

/// Returns the log directory path, creating it if needed.
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".crank").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}
