//! Single-line rendering of decoded JSON values.
//!
//! Top-level arrays are shown inline while short, objects are
//! summarised by key count. Inside arrays, nested values are expanded
//! recursively with object keys sorted. Every string goes through
//! [`sanitize_string`].

use serde_json::{Map, Value};

use super::sanitize::sanitize_string;

/// Arrays longer than this are summarised instead of listed.
pub const MAX_INLINE_ARRAY_ITEMS: usize = 10;

/// Render a claim or header value for single-line display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(items) if items.len() > MAX_INLINE_ARRAY_ITEMS => {
            format!("[array with {} items]", items.len())
        }
        Value::Array(items) => format_inline_array(items),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => format!("{{object with {} keys}}", map.len()),
        Value::String(s) => sanitize_string(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// Render a value that appears inside an array, expanding containers.
fn format_nested_value(value: &Value) -> String {
    match value {
        Value::Array(items) => format_inline_array(items),
        Value::Object(map) => format_inline_object(map),
        Value::String(s) => sanitize_string(s),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

fn format_inline_array(items: &[Value]) -> String {
    let rendered: Vec<String> = items.iter().map(format_nested_value).collect();
    format!("[{}]", rendered.join(", "))
}

fn format_inline_object(map: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    let rendered: Vec<String> = keys
        .into_iter()
        .map(|key| format!("{}: {}", sanitize_string(key), format_nested_value(&map[key])))
        .collect();
    format!("{{{}}}", rendered.join(", "))
}
