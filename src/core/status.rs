//! Temporal status of a token's `exp`, `nbf` and `iat` claims.
//!
//! Unlike claim classification this does not apply the plausibility
//! window: an `exp` of `100` is simply a token that expired in 1970.
//! The current time is passed in so results are reproducible.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::timestamp::seconds_from_number;

/// One line of the expiration report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusLine {
    /// `exp` is in the past.
    Expired { at: DateTime<Utc>, seconds_ago: i64 },
    /// `exp` is now or in the future.
    ExpiresIn { at: DateTime<Utc>, seconds_left: i64 },
    /// There is no `exp` claim.
    NoExpiration,
    /// `nbf` is in the future.
    NotYetValid { at: DateTime<Utc>, seconds_left: i64 },
    /// `nbf` is now or in the past.
    ValidSince { at: DateTime<Utc>, seconds_ago: i64 },
    /// When the token was issued.
    IssuedAt { at: DateTime<Utc>, seconds_ago: i64 },
    /// The claim is present but not a usable number of seconds.
    Unrecognized { claim: &'static str },
}

enum ClaimTime {
    Absent,
    At(DateTime<Utc>),
    Unrecognized,
}

fn claim_time(claims: &Map<String, Value>, name: &str) -> ClaimTime {
    match claims.get(name) {
        None => ClaimTime::Absent,
        Some(Value::Number(n)) => seconds_from_number(n)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map_or(ClaimTime::Unrecognized, ClaimTime::At),
        Some(_) => ClaimTime::Unrecognized,
    }
}

/// Evaluate the temporal claims of `claims` against `now`.
pub fn evaluate(claims: &Map<String, Value>, now: DateTime<Utc>) -> Vec<StatusLine> {
    let mut lines = Vec::new();

    match claim_time(claims, "exp") {
        ClaimTime::Absent => lines.push(StatusLine::NoExpiration),
        ClaimTime::Unrecognized => lines.push(StatusLine::Unrecognized { claim: "exp" }),
        ClaimTime::At(at) if now > at => lines.push(StatusLine::Expired {
            at,
            seconds_ago: (now - at).num_seconds(),
        }),
        ClaimTime::At(at) => lines.push(StatusLine::ExpiresIn {
            at,
            seconds_left: (at - now).num_seconds(),
        }),
    }

    match claim_time(claims, "nbf") {
        ClaimTime::Absent => {}
        ClaimTime::Unrecognized => lines.push(StatusLine::Unrecognized { claim: "nbf" }),
        ClaimTime::At(at) if now < at => lines.push(StatusLine::NotYetValid {
            at,
            seconds_left: (at - now).num_seconds(),
        }),
        ClaimTime::At(at) => lines.push(StatusLine::ValidSince {
            at,
            seconds_ago: (now - at).num_seconds(),
        }),
    }

    match claim_time(claims, "iat") {
        ClaimTime::Absent => {}
        ClaimTime::Unrecognized => lines.push(StatusLine::Unrecognized { claim: "iat" }),
        ClaimTime::At(at) => lines.push(StatusLine::IssuedAt {
            at,
            seconds_ago: (now - at).num_seconds(),
        }),
    }

    lines
}
