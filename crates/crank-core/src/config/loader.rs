//! Configuration loading

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

use super::merge::deep_merge;
use super::types::Config;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "crank.json";

/// Load configuration from a JSON file, overlaying it onto the hardcoded
/// defaults with a deep merge. A missing file is not an error: defaults
/// apply unchanged.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "no config file found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(ConfigError::Io(e)),
    };
    info!(path = %path.display(), "loading config");

    let overlay: Value = serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;

    let mut base = serde_json::to_value(Config::default()).map_err(|source| {
        ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        }
    })?;
    deep_merge(&mut base, overlay);

    let config: Config =
        serde_json::from_value(base).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(target = %config.target.display(), "config loaded");
    Ok(config)
}
