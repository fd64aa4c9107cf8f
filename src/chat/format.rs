//! Display formatting for counts, durations and message times

use chrono::{DateTime, Local, Utc};

/// Compact form of large counts: `1.5K`, `2.3M`
///
/// # Examples
///
/// ```
/// use swarmchat::chat::format::format_number;
///
/// assert_eq!(format_number(999), "999");
/// assert_eq!(format_number(1_500), "1.5K");
/// assert_eq!(format_number(2_300_000), "2.3M");
/// ```
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Minutes as `"45m"` or `"2h 5m"`
pub fn format_duration(minutes: u64) -> String {
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Local wall-clock time of a message, `HH:MM`
pub fn format_message_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Local calendar date used for date separators
pub fn format_message_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%A, %B %-d, %Y")
        .to_string()
}

/// Signed percentage with an arrow, `"▲ 12%"`, `"▼ 3%"` or `"0%"`
pub fn format_trend(trend: i64) -> String {
    match trend.signum() {
        1 => format!("▲ {}%", trend),
        -1 => format!("▼ {}%", trend.abs()),
        _ => "0%".to_string(),
    }
}
