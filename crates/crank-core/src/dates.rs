//! Date formatting for changelog entries

use chrono::{DateTime, Utc};

/// Format used when the config asks for "default"
pub const DEFAULT_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// Format a timestamp with a strftime format string. The literal
/// `"default"` selects [`DEFAULT_DATE_FORMAT`].
pub fn format_date(date: &DateTime<Utc>, format: &str) -> String {
    let format = if format == "default" {
        DEFAULT_DATE_FORMAT
    } else {
        format
    };
    date.format(format).to_string()
}
