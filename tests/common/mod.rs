//! Shared test fixtures and helper utilities.
//!
//! Provides pre-built JWT tokens with known claims and helpers that sign
//! fresh tokens with the PEM fixtures under `tests/fixtures/`.
#![allow(dead_code)]

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use p521::ecdsa::signature::Signer;
use p521::ecdsa::{Signature, SigningKey};
use p521::pkcs8::DecodePrivateKey;
use serde_json::Value;
use tempfile::NamedTempFile;

/// A valid HS256-signed JWT for testing.
///
/// Header: `{"alg":"HS256","typ":"JWT"}`
/// Payload: `{"sub":"1234567890","name":"Test User","iat":1516239022}`
/// Secret: `"your-256-bit-secret"`
pub const VALID_HS256_TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IlRlc3QgVXNlciIsImlhdCI6MTUxNjIzOTAyMn0.\
     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

/// Minimal token: header `{"alg":"HS256"}`, payload `{"sub":"abc"}`,
/// signature segment `c2ln`.
pub const MINIMAL_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhYmMifQ.c2ln";

/// Header `{"alg":"none"}`, payload `{"sub":"x"}`.
pub const NONE_ALG_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJ4In0.c2ln";

/// A malformed token with only two parts (missing signature).
pub const MALFORMED_TOKEN_TWO_PARTS: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

/// A completely invalid token string.
pub const INVALID_TOKEN: &str = "not-a-valid-jwt";

/// HMAC secret used to sign test tokens for verify tests.
pub const HMAC_TEST_SECRET: &str = "verify-test-secret-key";

/// Path to the test RSA public key fixture.
pub const RSA_PUBLIC_KEY_PATH: &str = "tests/fixtures/rsa_public.pem";

/// Path to the test RSA private key fixture.
pub const RSA_PRIVATE_KEY_PATH: &str = "tests/fixtures/rsa_private.pem";

/// Path to the test EC public key fixture.
pub const EC_PUBLIC_KEY_PATH: &str = "tests/fixtures/ec_public.pem";

/// Path to the test EC private key fixture.
pub const EC_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec_private.pem";

/// Path to the test P-521 public key fixture.
pub const EC521_PUBLIC_KEY_PATH: &str = "tests/fixtures/ec521_public.pem";

/// Path to the test P-521 private key fixture.
pub const EC521_PRIVATE_KEY_PATH: &str = "tests/fixtures/ec521_private.pem";

/// Path to the test Ed25519 public key fixture.
pub const ED25519_PUBLIC_KEY_PATH: &str = "tests/fixtures/ed25519_public.pem";

/// Path to the test Ed25519 private key fixture.
pub const ED25519_PRIVATE_KEY_PATH: &str = "tests/fixtures/ed25519_private.pem";

/// Home directory with no config files, so the user's own settings
/// never leak into a test run.
pub const EMPTY_HOME: &str = "/nonexistent-jwtdebug-test-home";

fn sign(alg: Algorithm, key: &EncodingKey, claims: &Value) -> String {
    encode(&Header::new(alg), claims, key).unwrap()
}

/// Create an HS256-signed token with the given claims.
pub fn create_hs256_token(secret: &str, claims: &Value) -> String {
    sign(
        Algorithm::HS256,
        &EncodingKey::from_secret(secret.as_bytes()),
        claims,
    )
}

/// Create an RS256-signed token using the test RSA private key.
pub fn create_rs256_token(claims: &Value) -> String {
    let private_key = std::fs::read(RSA_PRIVATE_KEY_PATH).unwrap();
    let key = EncodingKey::from_rsa_pem(&private_key).unwrap();
    sign(Algorithm::RS256, &key, claims)
}

/// Create an ES256-signed token using the test EC private key.
pub fn create_es256_token(claims: &Value) -> String {
    let private_key = std::fs::read(EC_PRIVATE_KEY_PATH).unwrap();
    let key = EncodingKey::from_ec_pem(&private_key).unwrap();
    sign(Algorithm::ES256, &key, claims)
}

/// Create an ES512-signed token using the test P-521 private key.
///
/// `jsonwebtoken` cannot sign ES512, so the token is assembled by hand.
pub fn create_es512_token(claims: &Value) -> String {
    let pem = std::fs::read_to_string(EC521_PRIVATE_KEY_PATH).unwrap();
    let secret = p521::SecretKey::from_pkcs8_pem(&pem).unwrap();
    let signing_key = SigningKey::from_bytes(&secret.to_bytes()).unwrap();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES512","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    let signing_input = format!("{header}.{payload}");
    let signature: Signature = signing_key.sign(signing_input.as_bytes());
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

/// Create an EdDSA-signed token using the test Ed25519 private key.
pub fn create_eddsa_token(claims: &Value) -> String {
    let private_key = std::fs::read(ED25519_PRIVATE_KEY_PATH).unwrap();
    let key = EncodingKey::from_ed_pem(&private_key).unwrap();
    sign(Algorithm::EdDSA, &key, claims)
}

/// Write `contents` to a fresh temporary file (deleted on drop).
pub fn temp_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

/// A temporary key file holding [`HMAC_TEST_SECRET`].
pub fn hmac_key_file() -> NamedTempFile {
    temp_file(HMAC_TEST_SECRET.as_bytes())
}

/// Current Unix time in seconds.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Standard test claims used across verify tests.
pub fn standard_claims() -> Value {
    serde_json::json!({
        "sub": "1234567890",
        "name": "Test User",
        "iat": 1516239022
    })
}

/// Claims that expired an hour ago.
pub fn expired_claims() -> Value {
    serde_json::json!({
        "sub": "expired-user",
        "exp": now() - 3600
    })
}
