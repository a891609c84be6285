//! Date formatting for repository timestamps

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

/// Default format for the "last updated" date
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Check that a strftime format string is usable
pub fn is_valid_format(format: &str) -> bool {
    !format.trim().is_empty() && !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Format a timestamp as a local calendar date
///
/// # Arguments
/// * `timestamp` - UTC timestamp as reported by the API
/// * `format` - strftime format; falls back to [`DEFAULT_DATE_FORMAT`] if invalid
pub fn format_local_date(timestamp: &DateTime<Utc>, format: &str) -> String {
    let format = if is_valid_format(format) { format } else { DEFAULT_DATE_FORMAT };
    timestamp.with_timezone(&Local).format(format).to_string()
}

/// Render the "Last updated: ..." line shown under each repository
pub fn last_updated_label(timestamp: &DateTime<Utc>, format: &str) -> String {
    format!("Last updated: {}", format_local_date(timestamp, format))
}
