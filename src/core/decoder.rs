//! JWT decoding logic.
//!
//! Handles splitting a raw JWT string into its three parts (header,
//! payload, signature), base64url-decoding the header and payload
//! segments, and parsing each as a JSON object. The signature segment is
//! kept as its raw base64url text.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

use crate::error::JwtDebugError;

/// Inputs up to this many characters are quoted whole in errors.
const SNIPPET_MAX_CHARS: usize = 20;

/// Characters kept before the ellipsis when an input is truncated.
const SNIPPET_KEEP_CHARS: usize = 17;

/// The decoded parts of a JWT.
///
/// Implements a custom `Debug` that redacts `claims` and `signature`
/// to prevent accidental leakage of sensitive claim data.
pub struct DecodedToken {
    /// The parsed JWT header (typically contains `alg` and `typ`).
    pub header: Map<String, Value>,
    /// The parsed JWT payload.
    pub claims: Map<String, Value>,
    /// The raw base64url-encoded signature segment.
    pub signature: String,
}

/// Custom `Debug` that redacts claims and signature to prevent
/// accidental leakage through debug formatting or error chains.
impl fmt::Debug for DecodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("header", &self.header)
            .field("claims", &"[REDACTED]")
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

impl DecodedToken {
    /// The `alg` header parameter, if present and a string.
    pub fn algorithm(&self) -> Option<&str> {
        self.header.get("alg").and_then(Value::as_str)
    }
}

/// Decode a raw JWT string into its constituent parts.
///
/// Splits the token on `.` separators, base64url-decodes the header
/// and payload segments, and parses them as JSON objects. The signature
/// is returned as its raw base64url-encoded string.
///
/// # Errors
///
/// Returns an error if the token doesn't have exactly three non-empty
/// parts, if base64url decoding fails, or if a segment is not a JSON
/// object. Errors quote only a truncated snippet of the input.
pub fn decode_token(token: &str) -> Result<DecodedToken, JwtDebugError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(JwtDebugError::InvalidTokenFormat {
            parts: parts.len(),
            snippet: snippet(token),
        });
    }

    let header = decode_segment(parts[0], "header", token)?;
    let claims = decode_segment(parts[1], "payload", token)?;
    let signature = parts[2].to_string();

    Ok(DecodedToken {
        header,
        claims,
        signature,
    })
}

/// Base64url-decode a segment and parse it as a JSON object.
fn decode_segment(
    encoded: &str,
    segment_name: &str,
    token: &str,
) -> Result<Map<String, Value>, JwtDebugError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| JwtDebugError::Base64DecodeError {
            segment: segment_name.to_string(),
            snippet: snippet(token),
        })?;

    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| JwtDebugError::JsonParseError {
            segment: segment_name.to_string(),
            reason: e.to_string(),
            snippet: snippet(token),
        })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(JwtDebugError::JsonParseError {
            segment: segment_name.to_string(),
            reason: "expected a JSON object".to_string(),
            snippet: snippet(token),
        }),
    }
}

/// Decode the signature segment from base64url into raw bytes.
pub fn decode_signature(signature: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(signature)
}

/// A short, display-safe prefix of `input` for error messages.
///
/// Never returns the full token when it is longer than a few characters,
/// so errors can be logged without leaking credentials.
pub fn snippet(input: &str) -> String {
    let clean = crate::core::sanitize::sanitize_string(input);
    if clean.chars().count() <= SNIPPET_MAX_CHARS {
        clean
    } else {
        let kept: String = clean.chars().take(SNIPPET_KEEP_CHARS).collect();
        format!("{kept}...")
    }
}
