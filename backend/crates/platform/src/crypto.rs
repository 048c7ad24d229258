//! Cryptographic Utilities
//!
//! Random bytes, SHA-256 and HMAC-signed tokens used for session cookies.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derive a 32-byte signing key from an operator-supplied secret of any length.
pub fn derive_key(secret: &str) -> [u8; 32] {
    sha256(secret.as_bytes())
}

/// Sign `payload`, producing `"<payload>.<base64url(hmac)>"`.
///
/// `payload` must not contain `'.'`.
pub fn sign_token(key: &[u8; 32], payload: &str) -> String {
    let mut mac = mac(key);
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a token produced by [`sign_token`] and return its payload.
///
/// Signature comparison is constant time.
pub fn verify_token<'a>(key: &[u8; 32], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.split_once('.')?;
    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = mac(key);
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

fn mac(key: &[u8; 32]) -> HmacSha256 {
    <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC can take key of any size")
}
