//! Token status display for temporal claims.
//!
//! Renders the [`StatusLine`]s computed by `core::status` as
//! human-readable lines with color coding:
//! - Expired tokens: red
//! - Valid tokens: green
//! - Not-yet-valid tokens: yellow

use colored::Colorize;

use crate::core::status::StatusLine;
use crate::core::timestamp::format_instant;

/// Render `seconds` as at most two units, largest first (`"2h 5m"`).
pub fn humanize_duration(seconds: i64) -> String {
    const UNITS: [(i64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

    let mut remaining = seconds.unsigned_abs();
    let mut parts = Vec::new();
    for (size, suffix) in UNITS {
        let size = size.unsigned_abs();
        if remaining >= size {
            parts.push(format!("{}{suffix}", remaining / size));
            remaining %= size;
        }
        if parts.len() == 2 {
            break;
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Plain-text description of one status line.
pub fn describe(line: &StatusLine) -> String {
    match line {
        StatusLine::Expired { at, seconds_ago } => format!(
            "✗ Token expired at {} ({} ago)",
            format_instant(at),
            humanize_duration(*seconds_ago)
        ),
        StatusLine::ExpiresIn { at, seconds_left } => format!(
            "✓ Token expires at {} (in {})",
            format_instant(at),
            humanize_duration(*seconds_left)
        ),
        StatusLine::NoExpiration => "No expiration claim found".to_string(),
        StatusLine::NotYetValid { at, seconds_left } => format!(
            "⚠ Token not valid yet. Valid from {} (in {})",
            format_instant(at),
            humanize_duration(*seconds_left)
        ),
        StatusLine::ValidSince { at, seconds_ago } => format!(
            "✓ Token valid since {} ({} ago)",
            format_instant(at),
            humanize_duration(*seconds_ago)
        ),
        StatusLine::IssuedAt { at, seconds_ago } if *seconds_ago < 0 => format!(
            "Issued at: {} (in {}, clock skew?)",
            format_instant(at),
            humanize_duration(*seconds_ago)
        ),
        StatusLine::IssuedAt { at, seconds_ago } => format!(
            "Issued at: {} ({} ago)",
            format_instant(at),
            humanize_duration(*seconds_ago)
        ),
        StatusLine::Unrecognized { claim } => format!("Unrecognized '{claim}' value"),
    }
}

/// Colored description of one status line.
pub fn render_line(line: &StatusLine) -> String {
    let text = describe(line);
    match line {
        StatusLine::Expired { .. } => text.red().to_string(),
        StatusLine::ExpiresIn { .. } | StatusLine::ValidSince { .. } => text.green().to_string(),
        StatusLine::NotYetValid { .. } | StatusLine::Unrecognized { .. } => {
            text.yellow().to_string()
        }
        StatusLine::NoExpiration | StatusLine::IssuedAt { .. } => text,
    }
}
