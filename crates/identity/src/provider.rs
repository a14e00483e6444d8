//! Signing identity provisioning.
//!
//! Hardware keystores and the software provider implement the same
//! [`KeyProvider`] trait so capture authorities do not care where their
//! key came from.

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Mutex;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::identity::SigningIdentity;
use photoproof_core::{Error, Result};
use photoproof_crypto::signing::SECRET_KEY_LENGTH;

/// Source of signing identities.
pub trait KeyProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Whether keys are held in dedicated hardware.
    fn is_hardware_backed(&self) -> bool;

    /// Provision a new signing identity.
    fn provision(&self) -> Result<SigningIdentity>;
}

enum Entropy {
    Os,
    Seeded(Mutex<ChaCha20Rng>),
}

/// Software key provider (development and testing).
///
/// Secrets live in process memory. A seeded provider yields the same
/// sequence of identities on every run.
pub struct SoftwareKeyProvider {
    entropy: Entropy,
}

impl SoftwareKeyProvider {
    pub fn new() -> Self {
        warn!("STATUS: SoftwareKeyProvider :: Hardware Root of Trust :: NOT IN USE");
        Self {
            entropy: Entropy::Os,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            entropy: Entropy::Seeded(Mutex::new(ChaCha20Rng::seed_from_u64(seed))),
        }
    }
}

impl Default for SoftwareKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SoftwareKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.entropy {
            Entropy::Os => "os",
            Entropy::Seeded(_) => "seeded",
        };
        f.debug_struct("SoftwareKeyProvider")
            .field("entropy", &mode)
            .finish()
    }
}

impl KeyProvider for SoftwareKeyProvider {
    fn name(&self) -> &str {
        "software"
    }

    fn is_hardware_backed(&self) -> bool {
        false
    }

    fn provision(&self) -> Result<SigningIdentity> {
        let mut secret = [0u8; SECRET_KEY_LENGTH];
        match &self.entropy {
            Entropy::Os => OsRng.fill_bytes(&mut secret),
            Entropy::Seeded(rng) => rng
                .lock()
                .map_err(|_| Error::Signing("Seeded key provider lock poisoned".to_string()))?
                .fill_bytes(&mut secret),
        }
        let identity = SigningIdentity::from_secret_bytes(&secret);
        secret.zeroize();

        info!(key_id = %identity.key_id(), provider = self.name(), "Provisioned signing identity");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_provider_is_not_hardware() {
        let provider = SoftwareKeyProvider::new();
        assert_eq!(provider.name(), "software");
        assert!(!provider.is_hardware_backed());
    }

    #[test]
    fn test_provisions_distinct_identities() {
        let provider = SoftwareKeyProvider::new();
        let a = provider.provision().unwrap();
        let b = provider.provision().unwrap();
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn test_seeded_provider_is_reproducible() {
        let first: Vec<_> = {
            let provider = SoftwareKeyProvider::seeded(42);
            (0..3).map(|_| provider.provision().unwrap().public_key()).collect()
        };
        let second: Vec<_> = {
            let provider = SoftwareKeyProvider::seeded(42);
            (0..3).map(|_| provider.provision().unwrap().public_key()).collect()
        };
        assert_eq!(first, second);
        assert_ne!(first[0], first[1]);
    }

    #[test]
    fn test_provider_as_trait_object() {
        let provider: Box<dyn KeyProvider> = Box::new(SoftwareKeyProvider::seeded(1));
        let identity = provider.provision().unwrap();
        let signature = identity.sign(b"msg");
        assert!(identity.public_key().verify(b"msg", &signature).unwrap());
    }
}
