//! Template resolution
//!
//! Template names map to templates compiled into the binary; any other
//! name is treated as a path to a template file relative to the target
//! directory. When no name is configured, the changelog file's extension
//! picks the template.

use std::path::Path;

use tracing::debug;

use crank_core::config::ChangelogConfig;
use crank_core::error::ChangelogError;

use crate::template::Template;

/// Look up a built-in template by name
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "md" => Some(include_str!("../templates/md.mu")),
        "txt" => Some(include_str!("../templates/txt.mu")),
        _ => None,
    }
}

/// Resolve and parse the template for a changelog configuration
pub fn load_template(config: &ChangelogConfig, target: &Path) -> Result<Template, ChangelogError> {
    let name = match &config.template {
        Some(name) => name.clone(),
        None => Path::new(&config.file)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_string)
            .ok_or_else(|| ChangelogError::TemplateNotFound(config.file.clone()))?,
    };

    if let Some(source) = builtin(&name) {
        debug!(name = %name, "using built-in template");
        return Template::parse(source);
    }

    let path = target.join(&name);
    debug!(path = %path.display(), "loading template file");
    let source = std::fs::read_to_string(&path)
        .map_err(|_| ChangelogError::TemplateNotFound(path.display().to_string()))?;
    Template::parse(&source)
}
