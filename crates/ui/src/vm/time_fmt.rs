use chrono::{DateTime, Utc};

/// Wall-clock time shown next to console entries.
#[must_use]
pub fn format_clock_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M:%S").to_string()
}
