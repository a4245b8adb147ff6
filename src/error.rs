//! Domain error types for jwtdebug.
//!
//! All business-logic errors are defined here using `thiserror`.
//! These errors are converted to user-friendly messages and process
//! exit codes at the CLI boundary.

use std::fmt;
use std::process::ExitCode;

use thiserror::Error;

/// Process exit statuses reported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    InvalidToken = 2,
    VerificationFailed = 3,
    ConfigError = 4,
}

impl ExitStatus {
    /// Numeric process exit code.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Errors raised while reading, parsing or configuring token inspection.
#[derive(Debug, Error)]
pub enum JwtDebugError {
    /// The token does not split into three non-empty segments.
    #[error(
        "invalid token format: expected 3 non-empty parts separated by '.', got {parts} (token: {snippet})"
    )]
    InvalidTokenFormat {
        /// Number of dot-separated segments found.
        parts: usize,
        /// Truncated prefix of the offending input.
        snippet: String,
    },

    /// Failed to decode a base64url-encoded token segment.
    #[error("failed to decode {segment}: invalid base64url encoding (token: {snippet})")]
    Base64DecodeError {
        /// Which segment failed to decode (e.g., "header", "payload").
        segment: String,
        /// Truncated prefix of the offending input.
        snippet: String,
    },

    /// Failed to parse decoded segment content as a JSON object.
    #[error("failed to parse {segment} as JSON: {reason} (token: {snippet})")]
    JsonParseError {
        /// Which segment failed to parse (e.g., "header", "payload").
        segment: String,
        /// Description of the parsing failure.
        reason: String,
        /// Truncated prefix of the offending input.
        snippet: String,
    },

    /// No token was provided via any input method.
    #[error("no token provided: pass a token as an argument, via --token-env, or through stdin")]
    NoTokenProvided,

    /// The `--token-env` value is not a usable variable name.
    #[error("invalid environment variable name '{name}'")]
    InvalidEnvVarName {
        /// The rejected name.
        name: String,
    },

    /// The specified environment variable is not set.
    #[error("environment variable '{name}' is not set")]
    EnvVarNotFound {
        /// Name of the missing environment variable.
        name: String,
    },

    /// A single stdin line exceeded the read bound.
    #[error("input line exceeds maximum length of {limit} bytes")]
    InputTooLarge {
        /// The bound in bytes.
        limit: u64,
    },

    /// Reading standard input failed.
    #[error("failed to read stdin: {reason}")]
    StdinError {
        /// Description of the read failure.
        reason: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("failed to load config file '{path}': {reason}")]
    ConfigLoad {
        /// Path of the configuration file.
        path: String,
        /// Description of the failure.
        reason: String,
    },

    /// The configuration file could not be written.
    #[error("failed to save config file '{path}': {reason}")]
    ConfigSave {
        /// Path of the configuration file.
        path: String,
        /// Description of the failure.
        reason: String,
    },
}

impl JwtDebugError {
    /// Exit status the CLI reports for this error.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::InvalidTokenFormat { .. }
            | Self::Base64DecodeError { .. }
            | Self::JsonParseError { .. } => ExitStatus::InvalidToken,
            Self::ConfigLoad { .. } | Self::ConfigSave { .. } => ExitStatus::ConfigError,
            _ => ExitStatus::Error,
        }
    }
}

/// A single reason a cryptographic check rejected a token.
///
/// Causes form a small tree: time faults found while validating claims
/// are grouped under [`FailureCause::InvalidClaims`], mirroring how the
/// validation error is reported as "claims invalid because expired".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The signature does not match the key.
    SignatureInvalid,
    /// The `exp` claim is in the past.
    Expired,
    /// The `nbf` claim is in the future.
    NotYetValid,
    /// Generic claims-validation wrapper around more specific causes.
    InvalidClaims(Vec<FailureCause>),
    /// A claim has the wrong shape (e.g. a non-numeric `exp`).
    MalformedClaims(String),
    /// The algorithm was refused.
    UnsupportedAlgorithm(String),
    /// Anything else reported by the JWT library.
    Other(String),
}

impl FailureCause {
    /// Whether this cause is a pure time fault (`exp` or `nbf`).
    pub fn is_time_fault(&self) -> bool {
        matches!(self, Self::Expired | Self::NotYetValid)
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignatureInvalid => f.write_str("signature is invalid"),
            Self::Expired => f.write_str("token has expired"),
            Self::NotYetValid => f.write_str("token is not valid yet"),
            Self::InvalidClaims(inner) if inner.is_empty() => f.write_str("token claims are invalid"),
            Self::InvalidClaims(inner) => {
                let reasons: Vec<String> = inner.iter().map(ToString::to_string).collect();
                write!(f, "token claims are invalid: {}", reasons.join(", "))
            }
            Self::MalformedClaims(reason) => write!(f, "malformed claims: {reason}"),
            Self::UnsupportedAlgorithm(alg) => write!(f, "unsupported algorithm: {alg}"),
            Self::Other(reason) => f.write_str(reason),
        }
    }
}

/// Flatten a cause tree into its leaves, dropping wrappers.
pub fn leaf_causes(causes: &[FailureCause]) -> Vec<&FailureCause> {
    let mut leaves = Vec::new();
    for cause in causes {
        match cause {
            FailureCause::InvalidClaims(inner) => leaves.extend(leaf_causes(inner)),
            other => leaves.push(other),
        }
    }
    leaves
}

/// Render the causes other than `primary` as a parenthesised suffix.
fn also(causes: &[FailureCause], primary: &FailureCause) -> String {
    let others: Vec<String> = leaf_causes(causes)
        .into_iter()
        .filter(|cause| *cause != primary)
        .map(ToString::to_string)
        .collect();
    if others.is_empty() {
        String::new()
    } else {
        format!(" (also: {})", others.join(", "))
    }
}

/// Errors returned by signature verification.
///
/// The rejection variants carry every collected [`FailureCause`] so the
/// caller can inspect co-occurring faults individually.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// No key file path was supplied.
    #[error("key file not provided (--key-file required)")]
    MissingKeyFile,

    /// The key file could not be used.
    #[error("failed to read key file '{path}': {reason}")]
    KeyFile {
        /// Path to the key file.
        path: String,
        /// Description of the read failure.
        reason: String,
    },

    /// The algorithm is outside the allow-list or has no backend.
    #[error("unsupported algorithm: {algorithm}")]
    UnsupportedAlgorithm {
        /// The algorithm that was encountered.
        algorithm: String,
    },

    /// The key file content does not fit the algorithm family.
    #[error("invalid {family} key material: {reason}")]
    InvalidKey {
        /// Key family expected by the algorithm.
        family: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// The token could not be parsed at all.
    #[error("cannot verify malformed token: {0}")]
    MalformedToken(#[from] JwtDebugError),

    /// The signature does not match.
    #[error("signature is invalid{}", also(.causes, &FailureCause::SignatureInvalid))]
    SignatureInvalid {
        /// All collected causes.
        causes: Vec<FailureCause>,
    },

    /// The token is expired.
    #[error("token has expired{}", also(.causes, &FailureCause::Expired))]
    Expired {
        /// All collected causes.
        causes: Vec<FailureCause>,
    },

    /// The token is not valid yet.
    #[error("token is not valid yet{}", also(.causes, &FailureCause::NotYetValid))]
    NotYetValid {
        /// All collected causes.
        causes: Vec<FailureCause>,
    },

    /// A claim is structurally invalid.
    #[error("malformed claims: {reason}")]
    MalformedClaims {
        /// Description of the first malformed claim.
        reason: String,
        /// All collected causes.
        causes: Vec<FailureCause>,
    },

    /// The JWT library rejected the token for another reason.
    #[error("{reason}")]
    Rejected {
        /// Description of the first unclassified cause.
        reason: String,
        /// All collected causes.
        causes: Vec<FailureCause>,
    },
}

impl VerificationError {
    /// The collected failure causes, empty for non-cryptographic failures.
    pub fn causes(&self) -> &[FailureCause] {
        match self {
            Self::SignatureInvalid { causes }
            | Self::Expired { causes }
            | Self::NotYetValid { causes }
            | Self::MalformedClaims { causes, .. }
            | Self::Rejected { causes, .. } => causes,
            _ => &[],
        }
    }

    /// Exit status the CLI reports for this error.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::MissingKeyFile | Self::KeyFile { .. } => ExitStatus::ConfigError,
            Self::MalformedToken(_) => ExitStatus::InvalidToken,
            _ => ExitStatus::VerificationFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_format_display_includes_count_and_snippet() {
        let err = JwtDebugError::InvalidTokenFormat {
            parts: 2,
            snippet: "abc.def".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid token format: expected 3 non-empty parts separated by '.', got 2 (token: abc.def)"
        );
    }

    #[test]
    fn test_base64_decode_error_display_includes_segment() {
        let err = JwtDebugError::Base64DecodeError {
            segment: "header".to_string(),
            snippet: "!!!".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to decode header: invalid base64url encoding (token: !!!)"
        );
    }

    #[test]
    fn test_json_parse_error_display_includes_segment_and_reason() {
        let err = JwtDebugError::JsonParseError {
            segment: "payload".to_string(),
            reason: "unexpected EOF".to_string(),
            snippet: "x".to_string(),
        };
        assert!(err.to_string().starts_with("failed to parse payload as JSON: unexpected EOF"));
    }

    #[test]
    fn test_no_token_provided_display() {
        let err = JwtDebugError::NoTokenProvided;
        assert!(err.to_string().contains("no token provided"));
        assert!(err.to_string().contains("--token-env"));
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_exit_status_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Error.code(), 1);
        assert_eq!(ExitStatus::InvalidToken.code(), 2);
        assert_eq!(ExitStatus::VerificationFailed.code(), 3);
        assert_eq!(ExitStatus::ConfigError.code(), 4);
    }

    #[test]
    fn test_token_errors_map_to_invalid_token_status() {
        let err = JwtDebugError::InvalidTokenFormat {
            parts: 1,
            snippet: String::new(),
        };
        assert_eq!(err.exit_status(), ExitStatus::InvalidToken);
        assert_eq!(JwtDebugError::NoTokenProvided.exit_status(), ExitStatus::Error);
    }

    #[test]
    fn test_key_file_errors_are_config_errors() {
        assert_eq!(
            VerificationError::MissingKeyFile.exit_status(),
            ExitStatus::ConfigError
        );
        let err = VerificationError::KeyFile {
            path: "/tmp/key.pem".to_string(),
            reason: "file not found".to_string(),
        };
        assert_eq!(err.exit_status(), ExitStatus::ConfigError);
        assert_eq!(
            err.to_string(),
            "failed to read key file '/tmp/key.pem': file not found"
        );
    }

    #[test]
    fn test_signature_invalid_display_lists_other_causes() {
        let err = VerificationError::SignatureInvalid {
            causes: vec![
                FailureCause::SignatureInvalid,
                FailureCause::InvalidClaims(vec![FailureCause::Expired]),
            ],
        };
        assert_eq!(
            err.to_string(),
            "signature is invalid (also: token has expired)"
        );
        assert_eq!(err.exit_status(), ExitStatus::VerificationFailed);
    }

    #[test]
    fn test_expired_display_without_other_causes() {
        let err = VerificationError::Expired {
            causes: vec![FailureCause::InvalidClaims(vec![FailureCause::Expired])],
        };
        assert_eq!(err.to_string(), "token has expired");
        assert_eq!(err.causes().len(), 1);
    }

    #[test]
    fn test_leaf_causes_flattens_wrappers() {
        let causes = vec![
            FailureCause::InvalidClaims(vec![FailureCause::Expired, FailureCause::NotYetValid]),
            FailureCause::Other("x".to_string()),
        ];
        let leaves = leaf_causes(&causes);
        assert_eq!(
            leaves,
            vec![
                &FailureCause::Expired,
                &FailureCause::NotYetValid,
                &FailureCause::Other("x".to_string())
            ]
        );
    }

    #[test]
    fn test_failure_cause_display() {
        assert_eq!(
            FailureCause::InvalidClaims(vec![FailureCause::Expired]).to_string(),
            "token claims are invalid: token has expired"
        );
        assert_eq!(
            FailureCause::UnsupportedAlgorithm("none".to_string()).to_string(),
            "unsupported algorithm: none"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwtDebugError>();
        assert_send_sync::<VerificationError>();
    }
}
