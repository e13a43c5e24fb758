//! Source-control providers for crank
//!
//! One [`ScmProvider`] contract over git and svn working copies. Backends
//! are probed in turn; command-line output contracts are parsed here and
//! surfaced as [`crank_core::types::ChangeRecord`]s.

pub mod git;
mod process;
pub mod provider;
pub mod svn;

pub use git::GitScm;
pub use provider::{detect_provider, ScmProvider};
pub use svn::SvnScm;

/// Result type for SCM operations
pub type Result<T> = std::result::Result<T, crank_core::error::ScmError>;
