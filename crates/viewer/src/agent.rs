//! Independent verification of photographs.
//!
//! The agent rebuilds the public witness from the photograph's image and
//! embedded public key alone, then asks the backend to check the embedded
//! proof against the embedded verifying key.

use std::sync::Arc;
use tracing::{info, warn};

use photoproof_camera::Photograph;
use photoproof_core::{Error, Result, VerifierConfig};
use photoproof_crypto::zk::{ProofBackendKind, ProvingBackend, PublicWitness};
use photoproof_identity::SigningIdentity;
use photoproof_image::encode_bytes;
use photoproof_pcd::{BindingInputs, Proof, TransformationDescriptor, TransformationRegistry, TransformationTag};

/// Outcome of checking one photograph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Rejected(Error),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

pub struct VerificationAgent {
    identity: SigningIdentity,
    backend: Arc<dyn ProvingBackend>,
    registry: TransformationRegistry,
    config: VerifierConfig,
}

impl VerificationAgent {
    pub fn new(
        identity: SigningIdentity,
        backend: Arc<dyn ProvingBackend>,
        config: VerifierConfig,
    ) -> Self {
        Self::with_registry(identity, backend, TransformationRegistry::standard(), config)
    }

    pub fn with_registry(
        identity: SigningIdentity,
        backend: Arc<dyn ProvingBackend>,
        registry: TransformationRegistry,
        config: VerifierConfig,
    ) -> Self {
        if !backend.kind().is_production_grade() {
            warn!(
                verifier = %identity.key_id(),
                backend = backend.kind().protocol(),
                "Verifier is using a reference proving backend"
            );
        }
        Self {
            identity,
            backend,
            registry,
            config,
        }
    }

    pub fn key_id(&self) -> &str {
        self.identity.key_id()
    }

    /// Check `photograph`.
    ///
    /// # Errors
    /// Only `UnregisteredTransformation`, when the proof names a
    /// transformation this agent has no binding for. Every cryptographic
    /// failure is a `Verdict::Rejected`.
    pub fn verify(&self, photograph: &Photograph) -> Result<Verdict> {
        let proof = photograph.proof();
        if !self.registry.contains(proof.transformation) {
            return Err(Error::UnregisteredTransformation(proof.transformation.to_string()));
        }

        let verdict = match self.check(photograph, proof) {
            Ok(()) => Verdict::Valid,
            Err(e @ Error::UnregisteredTransformation(_)) => return Err(e),
            Err(e) => Verdict::Rejected(e),
        };

        match &verdict {
            Verdict::Valid => info!(
                verifier = %self.key_id(),
                signer = %proof.public_key.key_id(),
                tag = %proof.transformation,
                "Photograph verified"
            ),
            Verdict::Rejected(reason) => warn!(
                verifier = %self.key_id(),
                signer = %proof.public_key.key_id(),
                tag = %proof.transformation,
                reason = reason.kind(),
                error = %reason,
                "Photograph rejected"
            ),
        }
        Ok(verdict)
    }

    fn check(&self, photograph: &Photograph, proof: &Proof) -> Result<()> {
        let kind = ProofBackendKind::from_protocol(&proof.zk_proof.protocol).ok_or_else(|| {
            Error::Verification(format!("Unknown proof protocol: {}", proof.zk_proof.protocol))
        })?;
        if !kind.is_production_grade() && !self.config.accept_reference_backend {
            return Err(Error::Verification(format!(
                "Proofs from the '{}' backend are not accepted",
                kind.protocol()
            )));
        }

        let recomputed = self.recompute_public_witness(photograph, proof)?;

        if self.config.compare_embedded_witness && recomputed != proof.public_witness {
            return Err(Error::WitnessMismatch(
                "Recomputed public witness differs from the embedded one".to_string(),
            ));
        }

        let valid = self
            .backend
            .verify(&proof.zk_proof, &proof.verifying_key, &recomputed)
            .map_err(|e| match e {
                Error::Verification(_) => e,
                other => Error::Verification(other.to_string()),
            })?;
        if !valid {
            return Err(Error::Verification(
                "Proof does not verify against the verifying key".to_string(),
            ));
        }
        Ok(())
    }

    fn recompute_public_witness(&self, photograph: &Photograph, proof: &Proof) -> Result<PublicWitness> {
        let encoded = encode_bytes(photograph.image())?;
        let descriptor = descriptor_for(proof.transformation);
        let binding = self.registry.build(BindingInputs::for_verification(
            descriptor,
            proof.key_scope,
            proof.public_key,
            encoded,
        ))?;
        binding.derive_public_witness(self.backend.as_ref())
    }
}

fn descriptor_for(tag: TransformationTag) -> TransformationDescriptor {
    match tag {
        TransformationTag::Identity => TransformationDescriptor::Identity,
    }
}

impl std::fmt::Debug for VerificationAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationAgent")
            .field("identity", &self.identity)
            .field("backend", &self.backend.kind())
            .field("config", &self.config)
            .finish()
    }
}
