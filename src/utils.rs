//! Formatting helpers shared by the TUI and the `list` command.

use chrono::{Local, TimeZone};
use unicode_width::UnicodeWidthChar;

const BYTE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Human-readable size with one decimal, 1024 base: `1536` -> `"1.5 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, BYTE_UNITS[unit])
}

/// Compact duration: `"2d 3h 4m"`, `"3h 4m 5s"`, `"4m 5s"` or `"5s"`.
pub fn format_time_delta(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Local time of a Unix timestamp, or `"Unknown"` for 0.
pub fn format_timestamp(epoch_secs: u64) -> String {
    if epoch_secs == 0 {
        return "Unknown".to_string();
    }
    let Ok(secs) = i64::try_from(epoch_secs) else {
        return "Unknown".to_string();
    };
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Truncate `s` to at most `max_width` terminal columns, ending in "..."
/// when cut. Wide characters count as two columns.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    let (budget, suffix) = if max_width > 3 {
        (max_width - 3, "...")
    } else {
        (max_width, "")
    };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(suffix);
    out
}
