//! Exit codes for the CLI

#![allow(dead_code)]

/// Success, including "nothing to do" early terminations
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// Source-control error
pub const SCM_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;
