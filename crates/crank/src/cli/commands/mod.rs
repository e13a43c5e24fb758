//! CLI command implementations

mod changelog;
mod version;

pub use changelog::ChangelogCommand;
pub use version::VersionCommand;
