//! JWT signature verification.
//!
//! The algorithm declared in the token header selects how the key file
//! is interpreted (raw HMAC secret or PEM public key). Only the
//! algorithms in [`SupportedAlgorithm`] are accepted; anything else,
//! `none` included, is refused before key material is parsed.
//!
//! Signature and time validation are delegated to `jsonwebtoken`, except
//! for `ES512`, which that library lacks and which is checked with `p521`.
//! When validation fails, every contributing cause is collected so that
//! "ignore expiration" can be decided by walking the full cause set:
//! the token is accepted only when every cause is a time fault.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use p521::ecdsa::signature::Verifier as _;
use p521::ecdsa::{Signature as P521Signature, VerifyingKey as P521VerifyingKey};
use p521::pkcs8::DecodePublicKey;
use serde_json::{Map, Number, Value};
use zeroize::Zeroizing;

use crate::core::decoder::{DecodedToken, decode_token};
use crate::core::sanitize::sanitize_string;
use crate::core::timestamp::seconds_from_number;
use crate::error::{FailureCause, VerificationError, leaf_causes};

/// Maximum key file size in bytes (1 MiB).
pub const MAX_KEY_FILE_SIZE: u64 = 1_048_576;

/// Signature algorithms accepted for verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedAlgorithm {
    Hs256,
    Hs384,
    Hs512,
    Rs256,
    Rs384,
    Rs512,
    Ps256,
    Ps384,
    Ps512,
    Es256,
    Es384,
    Es512,
    EdDsa,
}

impl SupportedAlgorithm {
    /// Look up a JOSE `alg` name in the allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        let alg = match name {
            "HS256" => Self::Hs256,
            "HS384" => Self::Hs384,
            "HS512" => Self::Hs512,
            "RS256" => Self::Rs256,
            "RS384" => Self::Rs384,
            "RS512" => Self::Rs512,
            "PS256" => Self::Ps256,
            "PS384" => Self::Ps384,
            "PS512" => Self::Ps512,
            "ES256" => Self::Es256,
            "ES384" => Self::Es384,
            "ES512" => Self::Es512,
            "EdDSA" => Self::EdDsa,
            _ => return None,
        };
        Some(alg)
    }

    /// The JOSE `alg` name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
            Self::Rs256 => "RS256",
            Self::Rs384 => "RS384",
            Self::Rs512 => "RS512",
            Self::Ps256 => "PS256",
            Self::Ps384 => "PS384",
            Self::Ps512 => "PS512",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
            Self::EdDsa => "EdDSA",
        }
    }

    /// How key material must be interpreted for this algorithm.
    pub fn key_kind(self) -> KeyKind {
        match self {
            Self::Hs256 | Self::Hs384 | Self::Hs512 => KeyKind::HmacSecret,
            Self::Rs256
            | Self::Rs384
            | Self::Rs512
            | Self::Ps256
            | Self::Ps384
            | Self::Ps512 => KeyKind::RsaPem,
            Self::Es256 | Self::Es384 | Self::Es512 => KeyKind::EcPem,
            Self::EdDsa => KeyKind::EdPem,
        }
    }

    /// Which implementation checks signatures for this algorithm.
    fn backend(self) -> Backend {
        let alg = match self {
            Self::Hs256 => Algorithm::HS256,
            Self::Hs384 => Algorithm::HS384,
            Self::Hs512 => Algorithm::HS512,
            Self::Rs256 => Algorithm::RS256,
            Self::Rs384 => Algorithm::RS384,
            Self::Rs512 => Algorithm::RS512,
            Self::Ps256 => Algorithm::PS256,
            Self::Ps384 => Algorithm::PS384,
            Self::Ps512 => Algorithm::PS512,
            Self::Es256 => Algorithm::ES256,
            Self::Es384 => Algorithm::ES384,
            Self::Es512 => return Backend::P521,
            Self::EdDsa => Algorithm::EdDSA,
        };
        Backend::JsonWebToken(alg)
    }
}

#[derive(Debug, Clone, Copy)]
enum Backend {
    JsonWebToken(Algorithm),
    /// `jsonwebtoken` has no P-521 curve.
    P521,
}

/// Key-material parsing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Raw bytes used directly as the HMAC secret.
    HmacSecret,
    /// PEM-encoded RSA public key.
    RsaPem,
    /// PEM-encoded elliptic-curve public key.
    EcPem,
    /// PEM-encoded Ed25519 public key.
    EdPem,
}

impl KeyKind {
    fn family(self) -> &'static str {
        match self {
            Self::HmacSecret => "HMAC",
            Self::RsaPem => "RSA",
            Self::EcPem => "EC",
            Self::EdPem => "Ed25519",
        }
    }

    fn decoding_key(self, material: &[u8]) -> Result<DecodingKey, VerificationError> {
        let invalid = |reason: String| VerificationError::InvalidKey {
            family: self.family(),
            reason,
        };
        match self {
            Self::HmacSecret => {
                // A public key handed over as an HMAC secret is the classic
                // algorithm-confusion forgery.
                if is_public_key_pem(material) {
                    return Err(invalid(
                        "PEM key material cannot be used as an HMAC secret".to_string(),
                    ));
                }
                Ok(DecodingKey::from_secret(material))
            }
            Self::RsaPem => DecodingKey::from_rsa_pem(material).map_err(|e| invalid(e.to_string())),
            Self::EcPem => DecodingKey::from_ec_pem(material).map_err(|e| invalid(e.to_string())),
            Self::EdPem => DecodingKey::from_ed_pem(material).map_err(|e| invalid(e.to_string())),
        }
    }
}

/// True when `material` parses as a public key of any supported family.
fn is_public_key_pem(material: &[u8]) -> bool {
    DecodingKey::from_rsa_pem(material).is_ok()
        || DecodingKey::from_ec_pem(material).is_ok()
        || DecodingKey::from_ed_pem(material).is_ok()
        || p521_verifying_key(material).is_ok()
}

fn p521_verifying_key(material: &[u8]) -> Result<P521VerifyingKey, VerificationError> {
    let invalid = |reason: String| VerificationError::InvalidKey {
        family: KeyKind::EcPem.family(),
        reason,
    };
    let pem =
        std::str::from_utf8(material).map_err(|_| invalid("key is not PEM text".to_string()))?;
    let public_key =
        p521::PublicKey::from_public_key_pem(pem.trim()).map_err(|e| invalid(e.to_string()))?;
    P521VerifyingKey::from_affine(*public_key.as_affine()).map_err(|e| invalid(e.to_string()))
}

/// Check a fixed-size `r || s` P-521 signature over `header.payload`.
fn p521_signature_matches(token: &str, key: &P521VerifyingKey) -> bool {
    let Some((signing_input, signature)) = token.rsplit_once('.') else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(signature) else {
        return false;
    };
    let Ok(signature) = P521Signature::from_slice(&bytes) else {
        return false;
    };
    key.verify(signing_input.as_bytes(), &signature).is_ok()
}

/// Verify `token` with the key stored at `key_file`.
///
/// # Errors
///
/// - [`VerificationError::MissingKeyFile`] when no path is given.
/// - [`VerificationError::KeyFile`] when the file is missing, not a
///   regular file, larger than [`MAX_KEY_FILE_SIZE`], or unreadable.
/// - Any error of [`verify_with_key`].
pub fn verify(
    token: &str,
    key_file: Option<&Path>,
    ignore_expiration: bool,
) -> Result<(), VerificationError> {
    let path = key_file.ok_or(VerificationError::MissingKeyFile)?;
    let material = read_key_file(path)?;
    verify_with_key(token, &material, ignore_expiration)
}

/// Verify `token` against already-loaded key material.
///
/// With `ignore_expiration`, a failure is forgiven only when every
/// collected cause is `exp`/`nbf` related (see [`only_time_faults`]).
///
/// # Errors
///
/// Returns the malformed-token, unsupported-algorithm or invalid-key
/// error first encountered, or a rejection carrying all causes.
pub fn verify_with_key(
    token: &str,
    material: &[u8],
    ignore_expiration: bool,
) -> Result<(), VerificationError> {
    let decoded = decode_token(token)?;
    let algorithm = resolve_algorithm(&decoded)?;
    let now = chrono::Utc::now().timestamp();

    let mut causes = claim_shape_causes(&decoded.claims);
    match algorithm.backend() {
        Backend::JsonWebToken(alg) => {
            let key = algorithm.key_kind().decoding_key(material)?;
            tracing::debug!(algorithm = algorithm.name(), "verifying signature");

            let full = validation(alg, TimeChecks::All, true);
            if let Err(err) = decode::<Value>(token, &key, &full) {
                tracing::debug!(error = %err, "full validation failed; collecting causes");
                for cause in collect_causes(token, &key, alg, &err) {
                    if !causes.contains(&cause) {
                        causes.push(cause);
                    }
                }
            }
            push_time_faults(&mut causes, numeric_date_faults(&decoded.claims, now, true));
        }
        Backend::P521 => {
            let key = p521_verifying_key(material)?;
            tracing::debug!(algorithm = algorithm.name(), "verifying signature");

            if !p521_signature_matches(token, &key) {
                causes.push(FailureCause::SignatureInvalid);
            }
            push_time_faults(&mut causes, numeric_date_faults(&decoded.claims, now, false));
        }
    }

    if causes.is_empty() {
        return Ok(());
    }

    tracing::debug!(?causes, "verification causes");
    if ignore_expiration && only_time_faults(&causes) {
        tracing::debug!("only time faults found; ignoring them as requested");
        return Ok(());
    }
    Err(rejection(causes))
}

/// True when every cause is a time fault or a claims wrapper, and at
/// least one genuine time fault is present.
///
/// Walks wrapped causes recursively. An empty set, or a wrapper with
/// nothing time-related inside, is not forgiven.
pub fn only_time_faults(causes: &[FailureCause]) -> bool {
    fn walk(causes: &[FailureCause], found_time_fault: &mut bool) -> bool {
        causes.iter().all(|cause| match cause {
            FailureCause::InvalidClaims(inner) => walk(inner, found_time_fault),
            cause if cause.is_time_fault() => {
                *found_time_fault = true;
                true
            }
            _ => false,
        })
    }

    let mut found_time_fault = false;
    walk(causes, &mut found_time_fault) && found_time_fault
}

/// Check the header `alg` against the allow-list.
fn resolve_algorithm(decoded: &DecodedToken) -> Result<SupportedAlgorithm, VerificationError> {
    let name = decoded.algorithm();
    name.and_then(SupportedAlgorithm::from_name).ok_or_else(|| {
        let algorithm = name.map_or_else(|| "<missing>".to_string(), sanitize_string);
        tracing::debug!(%algorithm, "algorithm rejected by allow-list");
        VerificationError::UnsupportedAlgorithm { algorithm }
    })
}

/// `exp`/`nbf` values that are not NumericDates at all.
fn claim_shape_causes(claims: &Map<String, Value>) -> Vec<FailureCause> {
    ["exp", "nbf"]
        .into_iter()
        .filter(|name| claims.get(*name).is_some_and(|value| !value.is_number()))
        .map(|name| FailureCause::MalformedClaims(format!("'{name}' must be a NumericDate")))
        .collect()
}

/// Compare `exp`/`nbf` with `now`, with zero leeway.
///
/// `jsonwebtoken` only reads these claims as `u64` and skips any other
/// number, so with `skip_unsigned` only floats and negative values are
/// compared here. Without it every numeric value is.
fn numeric_date_faults(
    claims: &Map<String, Value>,
    now: i64,
    skip_unsigned: bool,
) -> Vec<FailureCause> {
    let seconds = |name: &str| match claims.get(name) {
        Some(Value::Number(n)) if !(skip_unsigned && n.is_u64()) => Some(numeric_date(n)),
        _ => None,
    };

    let mut faults = Vec::new();
    if seconds("exp").is_some_and(|exp| exp < now) {
        faults.push(FailureCause::Expired);
    }
    if seconds("nbf").is_some_and(|nbf| nbf > now) {
        faults.push(FailureCause::NotYetValid);
    }
    faults
}

/// Whole seconds, saturating at the ends of the `i64` range.
fn numeric_date(n: &Number) -> i64 {
    seconds_from_number(n).unwrap_or_else(|| {
        if n.as_f64().is_some_and(|f| f < 0.0) {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Merge time faults into the existing claims wrapper, if any.
fn push_time_faults(causes: &mut Vec<FailureCause>, faults: Vec<FailureCause>) {
    if faults.is_empty() {
        return;
    }
    let wrapper = causes.iter_mut().find_map(|cause| match cause {
        FailureCause::InvalidClaims(inner) => Some(inner),
        _ => None,
    });
    match wrapper {
        Some(inner) => {
            for fault in faults {
                if !inner.contains(&fault) {
                    inner.push(fault);
                }
            }
        }
        None => causes.push(FailureCause::InvalidClaims(faults)),
    }
}

#[derive(Debug, Clone, Copy)]
enum TimeChecks {
    Off,
    Expiration,
    NotBefore,
    All,
}

fn validation(alg: Algorithm, time: TimeChecks, check_signature: bool) -> Validation {
    let mut validation = Validation::new(alg);
    validation.leeway = 0;
    validation.validate_exp = matches!(time, TimeChecks::Expiration | TimeChecks::All);
    validation.validate_nbf = matches!(time, TimeChecks::NotBefore | TimeChecks::All);
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    if !check_signature {
        validation.insecure_disable_signature_validation();
    }
    validation
}

/// Fan a failed validation out into every co-occurring cause.
///
/// The library stops at the first fault, so signature and structure are
/// re-checked with time validation off, and `exp`/`nbf` are each
/// re-checked with signature validation off. Time faults are grouped
/// under [`FailureCause::InvalidClaims`].
fn collect_causes(
    token: &str,
    key: &DecodingKey,
    alg: Algorithm,
    primary: &JwtError,
) -> Vec<FailureCause> {
    let mut causes = Vec::new();

    if let Err(err) = decode::<Value>(token, key, &validation(alg, TimeChecks::Off, true)) {
        causes.push(cause_from_error(&err));
    }

    let mut time_faults = Vec::new();
    for (checks, fault) in [
        (TimeChecks::Expiration, FailureCause::Expired),
        (TimeChecks::NotBefore, FailureCause::NotYetValid),
    ] {
        if let Err(err) = decode::<Value>(token, key, &validation(alg, checks, false)) {
            if cause_from_error(&err) == fault {
                time_faults.push(fault);
            }
        }
    }
    if !time_faults.is_empty() {
        causes.push(FailureCause::InvalidClaims(time_faults));
    }

    if causes.is_empty() {
        causes.push(cause_from_error(primary));
    }
    causes
}

fn cause_from_error(err: &JwtError) -> FailureCause {
    match err.kind() {
        ErrorKind::InvalidSignature => FailureCause::SignatureInvalid,
        ErrorKind::ExpiredSignature => FailureCause::Expired,
        ErrorKind::ImmatureSignature => FailureCause::NotYetValid,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            FailureCause::UnsupportedAlgorithm("algorithm mismatch between token and key".to_string())
        }
        ErrorKind::Json(e) => FailureCause::MalformedClaims(e.to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            FailureCause::MalformedClaims(format!("missing required claim '{claim}'"))
        }
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            FailureCause::Other("invalid token structure".to_string())
        }
        ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidKeyFormat => {
            FailureCause::Other("key is not usable for this algorithm".to_string())
        }
        _ => FailureCause::Other("unexpected validation error".to_string()),
    }
}

/// Pick the caller-facing error for a non-forgiven cause set.
///
/// Priority: signature, algorithm, malformed claims, other, expired,
/// not yet valid.
fn rejection(causes: Vec<FailureCause>) -> VerificationError {
    let leaves: Vec<FailureCause> = leaf_causes(&causes).into_iter().cloned().collect();

    if leaves.contains(&FailureCause::SignatureInvalid) {
        return VerificationError::SignatureInvalid { causes };
    }
    for leaf in &leaves {
        if let FailureCause::UnsupportedAlgorithm(algorithm) = leaf {
            return VerificationError::UnsupportedAlgorithm {
                algorithm: algorithm.clone(),
            };
        }
    }
    for leaf in &leaves {
        if let FailureCause::MalformedClaims(reason) = leaf {
            return VerificationError::MalformedClaims {
                reason: reason.clone(),
                causes,
            };
        }
    }
    for leaf in &leaves {
        if let FailureCause::Other(reason) = leaf {
            return VerificationError::Rejected {
                reason: reason.clone(),
                causes,
            };
        }
    }
    if leaves.contains(&FailureCause::Expired) {
        return VerificationError::Expired { causes };
    }
    VerificationError::NotYetValid { causes }
}

/// Read key material with a size bound, holding it in a zeroizing buffer.
fn read_key_file(path: &Path) -> Result<Zeroizing<Vec<u8>>, VerificationError> {
    let key_file_error = |reason: String| VerificationError::KeyFile {
        path: path.display().to_string(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| key_file_error(e.to_string()))?;
    if !metadata.is_file() {
        return Err(key_file_error("not a regular file".to_string()));
    }
    if metadata.len() > MAX_KEY_FILE_SIZE {
        return Err(key_file_error(format!(
            "file exceeds maximum size of {MAX_KEY_FILE_SIZE} bytes"
        )));
    }

    let file = File::open(path).map_err(|e| key_file_error(e.to_string()))?;
    let mut material = Zeroizing::new(Vec::new());
    file.take(MAX_KEY_FILE_SIZE + 1)
        .read_to_end(&mut material)
        .map_err(|e| key_file_error(e.to_string()))?;
    // The file may have grown between the stat and the read.
    if material.len() as u64 > MAX_KEY_FILE_SIZE {
        return Err(key_file_error(format!(
            "file exceeds maximum size of {MAX_KEY_FILE_SIZE} bytes"
        )));
    }

    tracing::debug!(bytes = material.len(), "loaded key material");
    Ok(material)
}
