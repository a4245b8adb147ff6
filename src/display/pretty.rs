//! Human-readable rendering of a decoded token.
//!
//! Each section is rendered to a `String` so the layout can be tested
//! without capturing stdout. Keys are padded to a common width; every
//! key and value that came from the token is sanitized first.

use colored::Colorize;
use serde_json::{Map, Value};

use super::token_status;
use crate::core::claims::{ClassifiedClaim, classify};
use crate::core::decoder::decode_signature;
use crate::core::format::format_value;
use crate::core::sanitize::sanitize_string;
use crate::core::status::StatusLine;
use crate::core::timestamp::format_instant;
use crate::error::VerificationError;

/// Section heading colors.
#[derive(Debug, Clone, Copy)]
pub enum Section {
    Header,
    Claims,
    Signature,
    Expiration,
}

impl Section {
    /// Colored heading, e.g. `HEADER:`.
    pub fn title(self) -> String {
        match self {
            Self::Header => "HEADER:".blue().bold().to_string(),
            Self::Claims => "CLAIMS:".green().bold().to_string(),
            Self::Signature => "SIGNATURE:".yellow().bold().to_string(),
            Self::Expiration => "EXPIRATION:".cyan().bold().to_string(),
        }
    }
}

/// `label:` padded so values line up at `width` + 2.
fn padded(indent: &str, label: &str, width: usize) -> String {
    let pad = width.saturating_sub(label.chars().count()) + 1;
    format!("{indent}{}:{}", label.cyan(), " ".repeat(pad))
}

/// Header entries, keys sorted.
pub fn render_header(header: &Map<String, Value>) -> String {
    if header.is_empty() {
        return "  No header information available\n".to_string();
    }

    let entries: Vec<(String, &Value)> = header
        .iter()
        .map(|(key, value)| (sanitize_string(key), value))
        .collect();
    let width = entries
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (key, value) in &entries {
        out.push_str(&padded("  ", key, width));
        out.push_str(&format_value(value));
        out.push('\n');
    }
    out
}

/// Claims split into standard and custom sections.
pub fn render_claims(claims: &Map<String, Value>) -> String {
    let classified = classify(claims);
    if classified.standard.is_empty() && classified.custom.is_empty() {
        return "  No claims present\n".to_string();
    }
    let width = classified.label_width();

    let mut out = String::new();
    if !classified.standard.is_empty() {
        out.push_str(&format!("  {}\n", "Standard Claims:".green().bold()));
        for claim in &classified.standard {
            push_claim(&mut out, claim, width);
        }
    }
    if !classified.custom.is_empty() {
        if !classified.standard.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("  {}\n", "Custom Claims:".green().bold()));
        for claim in &classified.custom {
            push_claim(&mut out, claim, width);
        }
    }
    out
}

fn push_claim(out: &mut String, claim: &ClassifiedClaim<'_>, width: usize) {
    let display = claim.display();
    out.push_str(&padded("    ", &claim.label, width));
    out.push_str(&display.text);
    if let Some(instant) = display.instant {
        out.push_str(&format!(" ({})", format_instant(&instant).yellow()));
    }
    out.push('\n');
}

/// The raw signature segment, plus its hex form when requested.
pub fn render_signature(signature: &str, decode: bool) -> String {
    const WIDTH: usize = "Decoded (hex)".len();

    let mut out = format!(
        "{}{}\n",
        padded("  ", "Raw", WIDTH),
        sanitize_string(signature)
    );
    if decode {
        match decode_signature(signature) {
            Ok(bytes) => out.push_str(&format!(
                "{}{}\n",
                padded("  ", "Decoded (hex)", WIDTH),
                hex::encode(bytes)
            )),
            Err(e) => out.push_str(&format!(
                "{}Error decoding: {e}\n",
                padded("  ", "Decoded", WIDTH)
            )),
        }
    }
    out
}

/// One line per temporal status.
pub fn render_expiration(lines: &[StatusLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}\n", token_status::render_line(line)))
        .collect()
}

/// The verification verdict line.
pub fn render_verdict(result: &Result<(), VerificationError>) -> String {
    match result {
        Ok(()) => "✓ Signature verified successfully".green().to_string(),
        Err(e) => format!("✗ Signature verification failed: {e}").red().to_string(),
    }
}

/// Sorted `key: value` lines without alignment, for `--output raw`.
pub fn render_raw(map: &Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        out.push_str(&format!("{}: {}\n", sanitize_string(key), format_value(value)));
    }
    out
}
