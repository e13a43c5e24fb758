//! Output formatting utilities

use console::style;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an informational notice
pub fn notice(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Print an error message to stderr
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}
