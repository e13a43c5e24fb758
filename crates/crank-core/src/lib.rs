//! Core functionality for crank release management
//!
//! Shared types, configuration, error taxonomy, the generic record filter
//! engine, and version-file access used by the SCM and changelog crates.

pub mod config;
pub mod dates;
pub mod error;
pub mod filter;
pub mod types;
pub mod version_file;

pub use config::Config;
pub use error::{CrankError, Result};
pub use types::{ChangeRecord, Record, ReleaseRecord};
