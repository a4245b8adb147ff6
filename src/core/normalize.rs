//! Extraction of a candidate JWT from noisy input.
//!
//! Users paste tokens from many places: `Authorization` headers,
//! cookies, JSON API responses. In smart mode the first JWT-shaped run
//! is pulled out of the surrounding text. The match is purely on shape:
//! header and payload segments must start with `eyJ` (base64 of `{"`)
//! and the signature must be a non-empty base64url run.

use std::sync::LazyLock;

use regex::Regex;

static JWT_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"eyJ[A-Za-z0-9_-]*\.eyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]+")
        .expect("JWT shape pattern is a valid regex")
});

/// Trim `input` and, unless `strict`, extract the first JWT-shaped run.
///
/// When nothing JWT-shaped is found the trimmed input is returned
/// unchanged so that parsing reports a precise format error.
pub fn normalize(input: &str, strict: bool) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() || strict {
        return trimmed.to_string();
    }

    match JWT_SHAPE.find(trimmed) {
        Some(m) => {
            if m.start() != 0 || m.end() != trimmed.len() {
                tracing::debug!(
                    skipped_prefix = m.start(),
                    skipped_suffix = trimmed.len() - m.end(),
                    "extracted token from surrounding text"
                );
            }
            m.as_str().to_string()
        }
        None => {
            tracing::debug!("no JWT-shaped substring found; using trimmed input");
            trimmed.to_string()
        }
    }
}
