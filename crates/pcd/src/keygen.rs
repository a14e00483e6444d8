//! Key generation for permissible transformations.
//!
//! Each descriptor is turned into a binding, compiled, and run through the
//! backend's setup. Descriptors are independent, so with the `parallel`
//! feature they fan out over rayon; results are merged back in declaration
//! order and the first failure (in that order) fails the whole call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::registry::TransformationRegistry;
use crate::transformation::{BindingInputs, TransformationDescriptor, TransformationTag};
use photoproof_core::{Error, KeyScope, KeygenConfig, Result};
use photoproof_crypto::zk::{ProvingBackend, ProvingKey, VerifyingKey};
use photoproof_identity::PublicKey;

/// Proving and verifying key for one transformation. Immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    pub tag: TransformationTag,
    pub proving_key: ProvingKey,
    pub verifying_key: VerifyingKey,
}

/// Key pairs by transformation tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRing {
    scope: KeyScope,
    /// Signer the circuits were bound to, for per-authority rings.
    signer: Option<PublicKey>,
    keys: BTreeMap<TransformationTag, KeyPair>,
}

impl KeyRing {
    pub fn scope(&self) -> KeyScope {
        self.scope
    }

    pub fn signer(&self) -> Option<&PublicKey> {
        self.signer.as_ref()
    }

    pub fn get(&self, tag: TransformationTag) -> Option<&KeyPair> {
        self.keys.get(&tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = TransformationTag> + '_ {
        self.keys.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Runs setup for a set of permissible transformations.
#[derive(Clone)]
pub struct KeyGenerator {
    backend: Arc<dyn ProvingBackend>,
    registry: TransformationRegistry,
    config: KeygenConfig,
}

impl KeyGenerator {
    pub fn new(
        backend: Arc<dyn ProvingBackend>,
        registry: TransformationRegistry,
        config: KeygenConfig,
    ) -> Self {
        Self {
            backend,
            registry,
            config,
        }
    }

    /// Keys in the scope named by the generator's configuration: bound to
    /// `signer` for per-authority scope, signer-independent for shared.
    pub fn generate_configured(
        &self,
        signer: &PublicKey,
        permissible: &[TransformationDescriptor],
    ) -> Result<KeyRing> {
        match self.config.scope {
            KeyScope::PerAuthority => self.generate(signer, permissible),
            KeyScope::Shared => self.generate_shared(permissible),
        }
    }

    /// Keys bound to `signer`: usable only by that authority.
    ///
    /// # Errors
    /// `UnregisteredTransformation` if the registry lacks a declared tag;
    /// `KeyGeneration` for the first descriptor whose setup fails.
    pub fn generate(
        &self,
        signer: &PublicKey,
        permissible: &[TransformationDescriptor],
    ) -> Result<KeyRing> {
        self.run(KeyScope::PerAuthority, Some(*signer), permissible)
    }

    /// Signer-independent keys, shareable across authorities.
    pub fn generate_shared(&self, permissible: &[TransformationDescriptor]) -> Result<KeyRing> {
        self.run(KeyScope::Shared, None, permissible)
    }

    fn run(
        &self,
        scope: KeyScope,
        signer: Option<PublicKey>,
        permissible: &[TransformationDescriptor],
    ) -> Result<KeyRing> {
        self.registry.ensure_covers(permissible)?;

        let job = |descriptor: &TransformationDescriptor| self.setup_one(scope, signer, descriptor);
        let results: Vec<Result<KeyPair>> = self.dispatch(permissible, job);

        let mut keys = BTreeMap::new();
        for result in results {
            let pair = result?;
            let tag = pair.tag;
            info!(
                tag = %tag,
                scope = scope.as_str(),
                vk = %pair.verifying_key.fingerprint(),
                "Generated transformation keys"
            );
            if keys.insert(tag, pair).is_some() {
                warn!(tag = %tag, "Transformation declared twice; keeping the last key pair");
            }
        }

        Ok(KeyRing {
            scope,
            signer,
            keys,
        })
    }

    #[cfg(feature = "parallel")]
    fn dispatch<F>(&self, permissible: &[TransformationDescriptor], job: F) -> Vec<Result<KeyPair>>
    where
        F: Fn(&TransformationDescriptor) -> Result<KeyPair> + Sync + Send,
    {
        if self.config.parallel {
            permissible.par_iter().map(job).collect()
        } else {
            permissible.iter().map(job).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch<F>(&self, permissible: &[TransformationDescriptor], job: F) -> Vec<Result<KeyPair>>
    where
        F: Fn(&TransformationDescriptor) -> Result<KeyPair>,
    {
        permissible.iter().map(job).collect()
    }

    fn setup_one(
        &self,
        scope: KeyScope,
        signer: Option<PublicKey>,
        descriptor: &TransformationDescriptor,
    ) -> Result<KeyPair> {
        let tag = descriptor.tag();
        let wrap = |e: Error| Error::KeyGeneration(format!("{}: {}", tag, e));

        let binding = self
            .registry
            .build(BindingInputs::for_setup(descriptor.clone(), scope, signer))
            .map_err(wrap)?;
        let cs = self.backend.compile(&binding.circuit()).map_err(wrap)?;
        let (proving_key, verifying_key) = self.backend.setup(&cs).map_err(wrap)?;

        Ok(KeyPair {
            tag,
            proving_key,
            verifying_key,
        })
    }
}

impl std::fmt::Debug for KeyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("backend", &self.backend.kind())
            .field("registry", &self.registry.tags().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}
