//! Detection of claim values that look like points in time.
//!
//! Claims arrive as untyped JSON, so a timestamp may be an integer, a
//! float, a numeric string or one of several textual date formats.
//! Anything that parses must still land in a plausible window
//! (2000-01-01 through 2100-01-01 UTC, inclusive) to count, which keeps
//! small unrelated integers such as `"count": 100` from being shown as
//! dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

/// 2000-01-01T00:00:00Z.
pub const MIN_TIMESTAMP: i64 = 946_684_800;

/// 2100-01-01T00:00:00Z.
pub const MAX_TIMESTAMP: i64 = 4_102_444_800;

/// Textual formats, tried in order; the first that parses wins.
const TEXT_FORMATS: &[TextFormat] = &[
    TextFormat::Rfc3339,
    TextFormat::Naive("%Y-%m-%dT%H:%M:%S"),
    TextFormat::Naive("%Y-%m-%d %H:%M:%S"),
    TextFormat::Date("%Y-%m-%d"),
    // RFC 1123
    TextFormat::NamedZone("%a, %d %b %Y %H:%M:%S %Z"),
    // RFC 1123 with numeric zone
    TextFormat::Offset("%a, %d %b %Y %H:%M:%S %z"),
    // RFC 822
    TextFormat::NamedZone("%d %b %y %H:%M %Z"),
    // RFC 822 with numeric zone
    TextFormat::Offset("%d %b %y %H:%M %z"),
    // RFC 850
    TextFormat::NamedZone("%A, %d-%b-%y %H:%M:%S %Z"),
];

#[derive(Debug, Clone, Copy)]
enum TextFormat {
    /// RFC 3339 with a mandatory offset.
    Rfc3339,
    /// Date and time without any zone, read as UTC.
    Naive(&'static str),
    /// Date only, midnight UTC.
    Date(&'static str),
    /// Trailing alphabetic zone abbreviation, which is not resolved and
    /// is read as UTC.
    NamedZone(&'static str),
    /// Trailing numeric `+hhmm` offset.
    Offset(&'static str),
}

impl TextFormat {
    fn parse(self, s: &str) -> Option<DateTime<Utc>> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Self::Naive(fmt) => NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|t| t.and_utc()),
            Self::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| t.and_utc()),
            Self::NamedZone(fmt) => {
                let zone = s.rsplit(' ').next()?;
                if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
                    return None;
                }
                NaiveDateTime::parse_from_str(s, fmt)
                    .ok()
                    .map(|t| t.and_utc())
            }
            Self::Offset(fmt) => DateTime::parse_from_str(s, fmt)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Classify `value` as a timestamp, returning the instant if it is one.
///
/// Never fails loudly: booleans, nulls, arrays, objects, unparseable
/// strings, out-of-range numbers and instants outside the plausible
/// window all yield `None`.
pub fn try_parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let instant = match value {
        Value::Number(n) => DateTime::from_timestamp(seconds_from_number(n)?, 0)?,
        Value::String(s) => parse_text(s)?,
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => return None,
    };

    (MIN_TIMESTAMP..=MAX_TIMESTAMP)
        .contains(&instant.timestamp())
        .then_some(instant)
}

/// Convert a JSON number to whole seconds.
///
/// Integers are taken as-is; unsigned values beyond `i64::MAX` are
/// rejected. Floats are truncated toward zero after checking they are
/// finite and fit in an `i64`.
pub fn seconds_from_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return None;
    }
    n.as_f64().and_then(seconds_from_f64)
}

/// Truncate a float to whole seconds, rejecting non-finite or
/// out-of-range values.
pub fn seconds_from_f64(f: f64) -> Option<i64> {
    // i64::MAX is not representable; 2^63 is the first value that overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !f.is_finite() || f >= LIMIT || f < -LIMIT {
        return None;
    }
    Some(f.trunc() as i64)
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    if let Some(t) = TEXT_FORMATS.iter().find_map(|format| format.parse(s)) {
        return Some(t);
    }
    let seconds = s.parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}

/// Render an instant as RFC 3339 in UTC with whole seconds.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
