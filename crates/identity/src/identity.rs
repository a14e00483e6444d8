//! Signing identities and public keys.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use photoproof_core::{Error, Result};
use photoproof_crypto::signing::{self, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};

/// An Ed25519 public key, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Parse and validate public key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key = signing::parse_public_key(bytes)?;
        Ok(Self(key.to_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Stable identifier used in logs.
    pub fn key_id(&self) -> String {
        signing::key_id(&self.0)
    }

    /// Check a signature made by this key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        signing::verify_signature(signature, message, &self.0)
    }
}

impl TryFrom<Vec<u8>> for PublicKey {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl From<PublicKey> for Vec<u8> {
    fn from(key: PublicKey) -> Self {
        key.to_vec()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// An Ed25519 keypair whose secret half never leaves this value.
///
/// The secret key is zeroized on drop. There is deliberately no `Clone`.
pub struct SigningIdentity {
    signing_key: SigningKey,
    public_key: PublicKey,
    key_id: String,
}

impl SigningIdentity {
    /// Generate a fresh identity from OS randomness.
    pub fn generate() -> Self {
        let mut secret = [0u8; SECRET_KEY_LENGTH];
        OsRng.fill_bytes(&mut secret);
        let identity = Self::from_secret_bytes(&secret);
        secret.zeroize();
        identity
    }

    /// Build an identity from an existing 32-byte secret.
    pub fn from_secret_bytes(secret: &[u8; SECRET_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let public_key = PublicKey(signing_key.verifying_key().to_bytes());
        let key_id = public_key.key_id();
        Self {
            signing_key,
            public_key,
            key_id,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Sign `message` with the identity's secret key.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("key_id", &self.key_id)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}
