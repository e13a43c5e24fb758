//! Error types for crank

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CrankError
pub type Result<T> = std::result::Result<T, CrankError>;

/// Main error type for crank operations
#[derive(Debug, Error)]
pub enum CrankError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Source-control errors
    #[error(transparent)]
    Scm(#[from] ScmError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Version-file errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Filter-rule errors
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl CrankError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration {}: {}", .path.display(), .source)]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Source-control errors
#[derive(Debug, Error)]
pub enum ScmError {
    /// No registered provider recognized the target directory
    #[error("No suitable source-control system found at {}", .0.display())]
    NoProvider(PathBuf),

    /// Underlying SCM command exited non-zero
    #[error("SCM command failed: {command}: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// SCM output did not match the expected shape
    #[error("Failed to parse SCM output: {0}")]
    ParseFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Template could not be resolved to content
    #[error("Changelog template not found: {0}")]
    TemplateNotFound(String),

    /// Template tag was opened but never closed
    #[error("Unclosed template tag")]
    UnclosedTag,

    /// Section was opened but never closed
    #[error("Unclosed template section: {0}")]
    UnclosedSection(String),

    /// Section close without a matching open
    #[error("Unexpected section close: {0}")]
    UnexpectedSectionEnd(String),

    /// Recognizer is missing a capture the ledger needs
    #[error("Template has no {{{{{0}}}}} placeholder, cannot track releases")]
    MissingLedgerCapture(&'static str),

    /// Derived recognizer failed to compile
    #[error("Template recognizer error: {0}")]
    Regex(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Version-file errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Version file has no "version" field
    #[error("No version field in {}", .0.display())]
    MissingField(PathBuf),

    /// Unknown bump level
    #[error("Invalid bump level '{0}', expected major, minor, or patch")]
    InvalidBumpLevel(String),

    /// Version string is not valid semver
    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),

    /// Version file is not valid JSON
    #[error("Failed to parse version file: {0}")]
    Parse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filter-rule errors
#[derive(Debug, Error)]
pub enum FilterError {
    /// Filter rule pattern failed to compile
    #[error("Invalid filter pattern '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}
