//! Configuration system for crank

mod loader;
mod merge;
mod types;

pub use loader::*;
pub use merge::*;
pub use types::*;
