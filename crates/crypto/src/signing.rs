//! Ed25519 signature primitive.
//!
//! Stateless sign/verify helpers over raw byte material. Key custody lives in
//! `photoproof-identity`; this module only knows how to turn bytes into
//! signatures and back, and how to name a public key.
//!
//! # Security Model
//!
//! - Secret key bytes passed in are copied into a `SigningKey`, which zeroizes
//!   itself on drop
//! - Verification uses `verify_strict`, rejecting small-order keys and
//!   non-canonical signatures
//! - Malformed material is an `Encoding` error; a well-formed but wrong
//!   signature is `Ok(false)`

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use photoproof_core::{Error, Result};

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 secret key length in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Sign `message` with a 32-byte Ed25519 secret key.
pub fn sign(message: &[u8], secret_key: &[u8; SECRET_KEY_LENGTH]) -> [u8; SIGNATURE_LENGTH] {
    let signing_key = SigningKey::from_bytes(secret_key);
    signing_key.sign(message).to_bytes()
}

/// Parse and validate a public key.
pub fn parse_public_key(public_key: &[u8]) -> Result<VerifyingKey> {
    let bytes: [u8; PUBLIC_KEY_LENGTH] = public_key.try_into().map_err(|_| {
        Error::Encoding(format!(
            "Invalid public key length: {} (expected {})",
            public_key.len(),
            PUBLIC_KEY_LENGTH
        ))
    })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| Error::Encoding(format!("Invalid public key: {}", e)))
}

/// Check `signature` over `message` under `public_key`.
///
/// # Returns
/// * `Ok(true)` - Signature is valid
/// * `Ok(false)` - Well-formed signature that does not verify
/// * `Err(Error::Encoding)` - Key or signature bytes are malformed
pub fn verify_signature(signature: &[u8], message: &[u8], public_key: &[u8]) -> Result<bool> {
    let verifying_key = parse_public_key(public_key)?;
    let signature = Signature::from_slice(signature).map_err(|_| {
        Error::Encoding(format!(
            "Invalid signature length: {} (expected {})",
            signature.len(),
            SIGNATURE_LENGTH
        ))
    })?;

    Ok(verifying_key.verify_strict(message, &signature).is_ok())
}

/// Stable public key identifier: first 16 bytes of BLAKE3(public key), hex.
pub fn key_id(public_key: &[u8]) -> String {
    let hash = blake3::hash(public_key);
    hex::encode(&hash.as_bytes()[..16])
}
