//! Partitioning of decoded claims into registered and custom claims.
//!
//! Registered claims come out in a fixed order with human labels;
//! everything else is sorted by key. Time-bearing values are paired with
//! the instant they denote so the display layer can show both.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::format::format_value;
use super::sanitize::sanitize_string;
use super::timestamp::try_parse_timestamp;

/// The registered claim names with their labels, in display order.
pub const STANDARD_CLAIMS: [(&str, &str); 7] = [
    ("iss", "Issuer"),
    ("sub", "Subject"),
    ("aud", "Audience"),
    ("exp", "Expiration"),
    ("nbf", "Not Before"),
    ("iat", "Issued At"),
    ("jti", "JWT ID"),
];

/// Registered claims whose values are always checked for timestamps.
const TIME_CLAIMS: [&str; 3] = ["exp", "nbf", "iat"];

/// Label for a registered claim name, if it is one.
pub fn standard_label(key: &str) -> Option<&'static str> {
    STANDARD_CLAIMS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, label)| *label)
}

/// One claim ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedClaim<'a> {
    /// The claim name as it appears in the token.
    pub key: &'a str,
    /// Human label for registered claims, the sanitized key otherwise.
    pub label: String,
    /// The raw claim value.
    pub value: &'a Value,
}

impl ClassifiedClaim<'_> {
    /// Render the value, attaching the instant when it is a timestamp.
    ///
    /// For registered claims only `exp`, `nbf` and `iat` are inspected;
    /// every custom claim is inspected opportunistically.
    pub fn display(&self) -> DisplayValue {
        let check_time = standard_label(self.key).is_none() || TIME_CLAIMS.contains(&self.key);
        DisplayValue {
            text: format_value(self.value),
            instant: if check_time {
                try_parse_timestamp(self.value)
            } else {
                None
            },
        }
    }
}

/// A formatted value plus the instant it denotes, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    /// Sanitized single-line rendering of the raw value.
    pub text: String,
    /// Set when the value was classified as a timestamp.
    pub instant: Option<DateTime<Utc>>,
}

/// Claims split into registered (catalog order) and custom (key order).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifiedClaims<'a> {
    pub standard: Vec<ClassifiedClaim<'a>>,
    pub custom: Vec<ClassifiedClaim<'a>>,
}

impl ClassifiedClaims<'_> {
    /// Width of the longest label, for column alignment.
    pub fn label_width(&self) -> usize {
        self.standard
            .iter()
            .chain(&self.custom)
            .map(|claim| claim.label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// Partition `claims` into registered and custom claims.
///
/// Performs no validation: an empty claim set yields two empty lists.
pub fn classify(claims: &Map<String, Value>) -> ClassifiedClaims<'_> {
    let standard = STANDARD_CLAIMS
        .iter()
        .filter_map(|(name, label)| {
            claims.get(*name).map(|value| ClassifiedClaim {
                key: *name,
                label: (*label).to_string(),
                value,
            })
        })
        .collect();

    let mut custom: Vec<ClassifiedClaim<'_>> = claims
        .iter()
        .filter(|(key, _)| standard_label(key).is_none())
        .map(|(key, value)| ClassifiedClaim {
            key: key.as_str(),
            label: sanitize_string(key),
            value,
        })
        .collect();
    custom.sort_by(|a, b| a.key.cmp(b.key));

    ClassifiedClaims { standard, custom }
}
