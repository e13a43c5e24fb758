//! Reading and bumping the target's version file
//!
//! The version lives in a JSON `package.json` beside the code, in a
//! top-level `version` field. The changelog pipeline only reads it; the
//! `version` command rewrites it.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use semver::Version;
use serde_json::Value;
use tracing::info;

use crate::error::VersionError;

/// Name of the version file inside the target directory
pub const VERSION_FILE: &str = "package.json";

/// Which semver component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    Major,
    Minor,
    Patch,
}

impl FromStr for BumpLevel {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            other => Err(VersionError::InvalidBumpLevel(other.to_string())),
        }
    }
}

/// Path of the version file inside `target`
pub fn version_file_path(target: &Path) -> PathBuf {
    target.join(VERSION_FILE)
}

/// Read the version string from `<target>/package.json`
pub fn read_version(target: &Path) -> Result<String, VersionError> {
    let path = version_file_path(target);
    let content = std::fs::read_to_string(&path)?;
    let value: Value = serde_json::from_str(&content)?;
    value
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(VersionError::MissingField(path))
}

/// Increment `version` at `level`, resetting the lower components
pub fn bump(version: &str, level: BumpLevel) -> Result<String, VersionError> {
    let parsed = Version::parse(version)?;
    let next = match level {
        BumpLevel::Major => Version::new(parsed.major + 1, 0, 0),
        BumpLevel::Minor => Version::new(parsed.major, parsed.minor + 1, 0),
        BumpLevel::Patch => Version::new(parsed.major, parsed.minor, parsed.patch + 1),
    };
    Ok(next.to_string())
}

/// Rewrite `<target>/package.json` with a new version, preserving every
/// other field
pub fn write_version(target: &Path, version: &str) -> Result<(), VersionError> {
    let path = version_file_path(target);
    let content = std::fs::read_to_string(&path)?;
    let mut value: Value = serde_json::from_str(&content)?;
    match value.as_object_mut() {
        Some(map) => {
            map.insert("version".into(), Value::String(version.to_string()));
        }
        None => return Err(VersionError::MissingField(path)),
    }
    let formatted = serde_json::to_string_pretty(&value)?;
    std::fs::write(&path, formatted + "\n")?;
    info!(version, path = %path.display(), "version file updated");
    Ok(())
}
