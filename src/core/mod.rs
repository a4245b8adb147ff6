//! Core business logic for JWT inspection.
//!
//! This module contains the token interpretation pipeline separated from
//! CLI concerns. All types and functions here are testable without the
//! CLI layer.

use std::path::PathBuf;

pub mod claims;
pub mod decoder;
pub mod format;
pub mod normalize;
pub mod sanitize;
pub mod status;
pub mod timestamp;
pub mod verifier;

/// Settings consumed by the per-token pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectOptions {
    /// Disable smart token extraction.
    pub strict: bool,
    /// Forgive `exp`/`nbf` failures during verification.
    pub ignore_expiration: bool,
    /// Key material used for verification.
    pub key_file: Option<PathBuf>,
    /// Render the signature segment as hex.
    pub decode_signature: bool,
}
