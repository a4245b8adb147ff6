//! Terminal-safe rendering of attacker-controlled strings.
//!
//! Decoded JWT claims come straight from whoever minted the token, so
//! every string is passed through [`sanitize_string`] before it is
//! displayed. Control characters become visible escapes and the
//! invisible code points used in text-rendering spoofing (zero-width
//! characters, bidirectional overrides and isolates, BOM) are escaped
//! instead of passed through.

use std::fmt::Write;

use serde_json::{Map, Value};

/// Escape control and spoofing characters in `s` for display.
///
/// - `\n`, `\r`, `\t` become the two-character escapes `\n`, `\r`, `\t`.
/// - Other C0 controls (0x00-0x1F, including ESC) and DEL become `\xHH`.
/// - C1 controls (U+0080-U+009F) become `\uHHHH`.
/// - U+200B-U+200F, U+202A-U+202E, U+2066-U+2069 and U+FEFF become `\uHHHH`.
///
/// Everything else passes through unchanged.
pub fn sanitize_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{00}'..='\u{1F}' | '\u{7F}' => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if is_escaped_unicode(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Sanitize every string in `value`, object keys included.
///
/// Used for structured output so JSON consumers that print fields get
/// the same protection as the pretty renderer.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(s)),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(sanitize_map(map)),
        other => other.clone(),
    }
}

/// [`sanitize_value`] for a whole object.
pub fn sanitize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (sanitize_string(key), sanitize_value(value)))
        .collect()
}

/// C1 controls plus the code points usable for display spoofing.
fn is_escaped_unicode(c: char) -> bool {
    matches!(
        c,
        '\u{80}'..='\u{9F}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}'
    )
}
