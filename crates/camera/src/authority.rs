//! Capture authority: signs images and proves them under its own keys.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::photograph::Photograph;
use photoproof_core::{Error, KeyScope, KeygenConfig, Result};
use photoproof_crypto::zk::ProvingBackend;
use photoproof_identity::{PublicKey, SigningIdentity};
use photoproof_image::{encode_bytes, ImageSource};
use photoproof_pcd::{
    BindingInputs, KeyGenerator, KeyRing, Proof, TransformationDescriptor, TransformationRegistry,
    TransformationTag,
};

/// Owns a signing identity and the key ring generated for its permissible
/// transformations. Every capture is appended to an in-memory log.
pub struct CaptureAuthority {
    identity: SigningIdentity,
    permissible: Vec<TransformationDescriptor>,
    keys: KeyRing,
    backend: Arc<dyn ProvingBackend>,
    registry: TransformationRegistry,
    photographs: Vec<Photograph>,
}

impl CaptureAuthority {
    /// Create an authority with the standard registry and generate its keys.
    ///
    /// # Errors
    /// `UnregisteredTransformation` or `KeyGeneration` from key generation.
    pub fn new(
        identity: SigningIdentity,
        permissible: Vec<TransformationDescriptor>,
        backend: Arc<dyn ProvingBackend>,
        config: &KeygenConfig,
    ) -> Result<Self> {
        Self::with_registry(
            identity,
            permissible,
            backend,
            TransformationRegistry::standard(),
            config,
        )
    }

    pub fn with_registry(
        identity: SigningIdentity,
        permissible: Vec<TransformationDescriptor>,
        backend: Arc<dyn ProvingBackend>,
        registry: TransformationRegistry,
        config: &KeygenConfig,
    ) -> Result<Self> {
        let generator = KeyGenerator::new(backend.clone(), registry.clone(), config.clone());
        let keys = generator.generate_configured(&identity.public_key(), &permissible)?;

        info!(
            key_id = %identity.key_id(),
            scope = keys.scope().as_str(),
            transformations = keys.len(),
            "Capture authority ready"
        );
        Ok(Self {
            identity,
            permissible,
            keys,
            backend,
            registry,
            photographs: Vec::new(),
        })
    }

    /// Create an authority around an existing shared key ring.
    ///
    /// # Errors
    /// `KeyGeneration` if the ring is not shared; `UnregisteredTransformation`
    /// if it lacks a permissible tag.
    pub fn with_shared_keys(
        identity: SigningIdentity,
        permissible: Vec<TransformationDescriptor>,
        backend: Arc<dyn ProvingBackend>,
        keys: KeyRing,
    ) -> Result<Self> {
        if keys.scope() != KeyScope::Shared {
            return Err(Error::KeyGeneration(format!(
                "Key ring scope is '{}'; only shared rings can be reused",
                keys.scope().as_str()
            )));
        }
        let registry = TransformationRegistry::standard();
        registry.ensure_covers(&permissible)?;
        if let Some(missing) = permissible.iter().find(|d| keys.get(d.tag()).is_none()) {
            return Err(Error::UnregisteredTransformation(format!(
                "shared key ring has no keys for '{}'",
                missing.tag()
            )));
        }

        info!(key_id = %identity.key_id(), "Capture authority adopted shared keys");
        Ok(Self {
            identity,
            permissible,
            keys,
            backend,
            registry,
            photographs: Vec::new(),
        })
    }

    /// Capture one image from `source`, sign it, and prove it unmodified.
    ///
    /// The identity key pair is looked up before the source is polled, so an
    /// authority without it never reads or signs anything. On any failure
    /// the log is left untouched.
    pub fn capture<S: ImageSource + ?Sized>(&mut self, source: &mut S) -> Result<Photograph> {
        let tag = TransformationTag::Identity;
        let pair = self.keys.get(tag).ok_or_else(|| {
            warn!(key_id = %self.identity.key_id(), tag = %tag, "Capture refused");
            Error::UnregisteredTransformation(format!("'{}' is not a permissible transformation", tag))
        })?;

        let image = source.next_image()?;
        let encoded = encode_bytes(&image)?;
        let signature = self.identity.sign(&encoded).to_vec();

        let binding = self.registry.build(BindingInputs::for_proving(
            TransformationDescriptor::Identity,
            self.keys.scope(),
            self.identity.public_key(),
            encoded,
            signature.clone(),
        ))?;
        let (secret_witness, public_witness) = binding.derive_witness(self.backend.as_ref())?;
        let cs = self.backend.compile(&binding.circuit())?;
        debug!(label = %cs.label, "Proving capture");
        let zk_proof = self.backend.prove(&cs, &pair.proving_key, &secret_witness)?;

        let proof = Proof {
            transformation: tag,
            key_scope: self.keys.scope(),
            signature,
            public_key: self.identity.public_key(),
            verifying_key: pair.verifying_key.clone(),
            zk_proof,
            public_witness,
        };
        let photograph = Photograph::from_parts(image, proof);
        self.photographs.push(photograph.clone());

        info!(
            key_id = %self.identity.key_id(),
            tag = %tag,
            photo_index = self.photographs.len() - 1,
            "Captured photograph"
        );
        Ok(photograph)
    }

    /// Every photograph captured so far, oldest first.
    pub fn photographs(&self) -> &[Photograph] {
        &self.photographs
    }

    pub fn public_key(&self) -> PublicKey {
        self.identity.public_key()
    }

    pub fn key_id(&self) -> &str {
        self.identity.key_id()
    }

    pub fn key_ring(&self) -> &KeyRing {
        &self.keys
    }

    pub fn permissible(&self) -> &[TransformationDescriptor] {
        &self.permissible
    }
}

impl std::fmt::Debug for CaptureAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureAuthority")
            .field("identity", &self.identity)
            .field("permissible", &self.permissible)
            .field("scope", &self.keys.scope())
            .field("photographs", &self.photographs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoproof_crypto::zk::TranscriptBackend;
    use photoproof_image::{FixedImageSource, RandomImageSource, RasterImage};

    fn authority(permissible: Vec<TransformationDescriptor>) -> CaptureAuthority {
        CaptureAuthority::new(
            SigningIdentity::generate(),
            permissible,
            Arc::new(TranscriptBackend::new()),
            &KeygenConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_capture_appends_to_log() {
        let mut camera = authority(vec![TransformationDescriptor::Identity]);
        let mut source = RandomImageSource::seeded(1);

        let first = camera.capture(&mut source).unwrap();
        let second = camera.capture(&mut source).unwrap();
        assert_eq!(camera.photographs(), &[first.clone(), second]);
        assert_eq!(first.proof().transformation, TransformationTag::Identity);
        assert_eq!(first.proof().public_key, camera.public_key());
        assert_eq!(first.proof().signature.len(), 64);
    }

    #[test]
    fn test_signature_covers_canonical_encoding() {
        let mut camera = authority(vec![TransformationDescriptor::Identity]);
        let mut source = FixedImageSource::new([RasterImage::white()]);
        let photo = camera.capture(&mut source).unwrap();

        let encoded = encode_bytes(photo.image()).unwrap();
        assert!(camera.public_key().verify(&encoded, &photo.proof().signature).unwrap());
    }

    #[test]
    fn test_capture_without_identity_key_never_polls() {
        let mut camera = authority(vec![]);
        let mut source = FixedImageSource::new([RasterImage::black()]);

        let result = camera.capture(&mut source);
        assert!(matches!(result, Err(Error::UnregisteredTransformation(_))));
        assert_eq!(source.polled(), 0);
        assert!(camera.photographs().is_empty());
    }

    #[test]
    fn test_failed_source_leaves_log_untouched() {
        let mut camera = authority(vec![TransformationDescriptor::Identity]);
        let mut source = FixedImageSource::new(Vec::new());
        assert!(matches!(camera.capture(&mut source), Err(Error::Io(_))));
        assert!(camera.photographs().is_empty());
    }

    #[test]
    fn test_unregistered_descriptor_fails_construction() {
        let result = CaptureAuthority::with_registry(
            SigningIdentity::generate(),
            vec![TransformationDescriptor::Identity],
            Arc::new(TranscriptBackend::new()),
            TransformationRegistry::new(),
            &KeygenConfig::default(),
        );
        assert!(matches!(result, Err(Error::UnregisteredTransformation(_))));
    }

    #[test]
    fn test_shared_keys() {
        let backend: Arc<dyn ProvingBackend> = Arc::new(TranscriptBackend::new());
        let generator = KeyGenerator::new(
            backend.clone(),
            TransformationRegistry::standard(),
            KeygenConfig::default(),
        );
        let shared = generator
            .generate_shared(&[TransformationDescriptor::Identity])
            .unwrap();

        let mut camera = CaptureAuthority::with_shared_keys(
            SigningIdentity::generate(),
            vec![TransformationDescriptor::Identity],
            backend.clone(),
            shared.clone(),
        )
        .unwrap();
        let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
        assert_eq!(photo.proof().key_scope, KeyScope::Shared);

        let own = generator
            .generate(&camera.public_key(), &[TransformationDescriptor::Identity])
            .unwrap();
        let result = CaptureAuthority::with_shared_keys(
            SigningIdentity::generate(),
            vec![TransformationDescriptor::Identity],
            backend,
            own,
        );
        assert!(matches!(result, Err(Error::KeyGeneration(_))));
    }

    #[test]
    fn test_photograph_json_roundtrip() {
        let mut camera = authority(vec![TransformationDescriptor::Identity]);
        let photo = camera.capture(&mut RandomImageSource::seeded(3)).unwrap();
        let json = serde_json::to_string(&photo).unwrap();
        assert_eq!(serde_json::from_str::<Photograph>(&json).unwrap(), photo);
    }
}
