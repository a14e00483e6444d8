//! Reference proving backend over keyed BLAKE3 transcripts.
//!
//! # Security Model
//!
//! - Setup draws a 32-byte trapdoor per circuit; the proving key and the
//!   verifying key both hold it, so the scheme is transparent
//! - A proof is `BLAKE3-keyed(trapdoor, domain || circuit digest || public witness)`
//! - The prover evaluates every constraint on the full assignment before
//!   emitting a proof, and refuses keys compiled for another circuit
//! - Nothing is hidden from a holder of the verifying key: this backend is
//!   NOT zero-knowledge and anyone with the verifying key can forge proofs
//!
//! Use it to exercise the capture/verify pipeline; deployments that need
//! real guarantees plug in a SNARK backend behind [`ProvingBackend`].

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

use super::backend::{
    ConstraintSystem, ProofBackendKind, ProvingBackend, ProvingKey, PublicWitness,
    SecretWitness, VerifyingKey, ZkProof,
};
use super::circuit::{Assignment, CircuitDescription, Constraint};
use crate::signing::verify_signature;
use photoproof_core::{Error, Result};

/// Curve label carried by proofs; field packing is over the BN254 scalar field.
pub const CURVE: &str = "bn254";

const PROOF_DOMAIN: &[u8] = b"photoproof/transcript/proof/v1";
const DIGEST_DOMAIN: &str = "photoproof/transcript/circuit/v1";

const DIGEST_LEN: usize = 32;
const TRAPDOOR_LEN: usize = 32;
const PROVING_KEY_LEN: usize = DIGEST_LEN + TRAPDOOR_LEN;
const VERIFYING_KEY_LEN: usize = DIGEST_LEN + 8 + TRAPDOOR_LEN;

/// Source of setup randomness.
#[derive(Clone)]
pub enum SetupEntropy {
    /// Operating system randomness.
    Os,
    /// Trapdoor derived from a seed and the circuit digest. Reproducible
    /// regardless of the order circuits are set up in.
    Seeded([u8; 32]),
}

impl fmt::Debug for SetupEntropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupEntropy::Os => f.write_str("Os"),
            SetupEntropy::Seeded(_) => f.write_str("Seeded([REDACTED])"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranscriptBackend {
    entropy: SetupEntropy,
}

impl TranscriptBackend {
    pub fn new() -> Self {
        Self {
            entropy: SetupEntropy::Os,
        }
    }

    /// Deterministic setup for tests and reproducible key material.
    pub fn seeded(seed: [u8; 32]) -> Self {
        Self {
            entropy: SetupEntropy::Seeded(seed),
        }
    }

    fn trapdoor(&self, digest: &[u8; 32]) -> Zeroizing<[u8; TRAPDOOR_LEN]> {
        let mut trapdoor = Zeroizing::new([0u8; TRAPDOOR_LEN]);
        match &self.entropy {
            SetupEntropy::Os => OsRng.fill_bytes(&mut trapdoor[..]),
            SetupEntropy::Seeded(seed) => {
                trapdoor.copy_from_slice(blake3::keyed_hash(seed, digest).as_bytes())
            }
        }
        trapdoor
    }

    fn tag(trapdoor: &[u8; TRAPDOOR_LEN], digest: &[u8], witness: &PublicWitness) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(trapdoor);
        hasher.update(PROOF_DOMAIN);
        hasher.update(digest);
        hasher.update(&witness.bytes);
        hasher.finalize()
    }

    fn check_labels(protocol: &str, artifact: &str) -> Result<()> {
        if protocol != ProofBackendKind::Transcript.protocol() {
            return Err(Error::Verification(format!(
                "Unsupported {} protocol: {}",
                artifact, protocol
            )));
        }
        Ok(())
    }

    fn evaluate(
        constraint: &Constraint,
        description: &CircuitDescription,
        assignment: &Assignment,
    ) -> Result<bool> {
        match constraint {
            Constraint::SignatureValid {
                public_key,
                message,
                signature,
            } => verify_signature(
                slot(assignment, signature)?,
                slot(assignment, message)?,
                slot(assignment, public_key)?,
            )
            .map_err(|e| Error::Proving(e.to_string())),
            Constraint::BoundEquals { slot: name, parameter } => {
                let bound = description.bound_parameters.get(parameter).ok_or_else(|| {
                    Error::Proving(format!("Parameter '{}' is not bound", parameter))
                })?;
                Ok(slot(assignment, name)? == bound.as_slice())
            }
        }
    }
}

fn slot<'a>(assignment: &'a Assignment, name: &str) -> Result<&'a [u8]> {
    assignment
        .get(name)
        .ok_or_else(|| Error::Proving(format!("Constraint input '{}' is unassigned", name)))
}

impl Default for TranscriptBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvingBackend for TranscriptBackend {
    fn kind(&self) -> ProofBackendKind {
        ProofBackendKind::Transcript
    }

    fn compile(&self, description: &CircuitDescription) -> Result<ConstraintSystem> {
        description.validate()?;
        let digest = blake3::derive_key(DIGEST_DOMAIN, &description.canonical_bytes());
        debug!(label = %description.label, digest = %hex::encode(&digest[..8]), "Compiled circuit");
        Ok(ConstraintSystem {
            label: description.label.clone(),
            digest,
            public_len: description.public_len(),
            description: description.clone(),
        })
    }

    fn setup(&self, cs: &ConstraintSystem) -> Result<(ProvingKey, VerifyingKey)> {
        if cs.public_len == 0 {
            return Err(Error::KeyGeneration(format!(
                "Circuit '{}' has no public inputs",
                cs.label
            )));
        }
        let trapdoor = self.trapdoor(&cs.digest);

        let mut pk_bytes = Vec::with_capacity(PROVING_KEY_LEN);
        pk_bytes.extend_from_slice(&cs.digest);
        pk_bytes.extend_from_slice(&trapdoor[..]);

        let mut vk_bytes = Vec::with_capacity(VERIFYING_KEY_LEN);
        vk_bytes.extend_from_slice(&cs.digest);
        vk_bytes.extend_from_slice(&(cs.public_len as u64).to_be_bytes());
        vk_bytes.extend_from_slice(&trapdoor[..]);

        let protocol = self.kind().protocol().to_string();
        Ok((
            ProvingKey {
                protocol: protocol.clone(),
                bytes: pk_bytes,
            },
            VerifyingKey {
                protocol,
                bytes: vk_bytes,
            },
        ))
    }

    fn derive_witness(
        &self,
        description: &CircuitDescription,
        assignment: &Assignment,
    ) -> Result<(SecretWitness, PublicWitness)> {
        assignment.check_complete(description)?;
        let public = PublicWitness::pack(description, assignment)?;
        let secret = SecretWitness {
            assignment: assignment.clone(),
            public: public.clone(),
        };
        Ok((secret, public))
    }

    fn derive_public_witness(
        &self,
        description: &CircuitDescription,
        assignment: &Assignment,
    ) -> Result<PublicWitness> {
        PublicWitness::pack(description, assignment)
    }

    fn prove(
        &self,
        cs: &ConstraintSystem,
        proving_key: &ProvingKey,
        witness: &SecretWitness,
    ) -> Result<ZkProof> {
        if proving_key.protocol != self.kind().protocol() {
            return Err(Error::Proving(format!(
                "Unsupported proving key protocol: {}",
                proving_key.protocol
            )));
        }
        if proving_key.bytes.len() != PROVING_KEY_LEN {
            return Err(Error::Proving(format!(
                "Invalid proving key size: expected {}, got {}",
                PROVING_KEY_LEN,
                proving_key.bytes.len()
            )));
        }
        let (digest, trapdoor) = proving_key.bytes.split_at(DIGEST_LEN);
        if digest != cs.digest {
            return Err(Error::Proving(format!(
                "Proving key was not generated for circuit '{}'",
                cs.label
            )));
        }

        witness
            .assignment
            .check_complete(&cs.description)
            .map_err(|e| Error::Proving(e.to_string()))?;
        let repacked = PublicWitness::pack(&cs.description, &witness.assignment)?;
        if repacked != witness.public {
            return Err(Error::Proving(
                "Public witness does not match the assignment".to_string(),
            ));
        }

        for constraint in &cs.description.constraints {
            if !Self::evaluate(constraint, &cs.description, &witness.assignment)? {
                return Err(Error::Proving(format!(
                    "Constraint not satisfied in circuit '{}': {:?}",
                    cs.label, constraint
                )));
            }
        }

        let mut key = Zeroizing::new([0u8; TRAPDOOR_LEN]);
        key.copy_from_slice(trapdoor);
        let tag = Self::tag(&key, &cs.digest, &witness.public);
        Ok(ZkProof {
            protocol: self.kind().protocol().to_string(),
            curve: CURVE.to_string(),
            bytes: tag.as_bytes().to_vec(),
        })
    }

    fn verify(
        &self,
        proof: &ZkProof,
        verifying_key: &VerifyingKey,
        public_witness: &PublicWitness,
    ) -> Result<bool> {
        Self::check_labels(&proof.protocol, "proof")?;
        Self::check_labels(&verifying_key.protocol, "verifying key")?;
        if proof.curve != CURVE {
            return Err(Error::Verification(format!(
                "Unsupported curve: {}",
                proof.curve
            )));
        }
        if verifying_key.bytes.len() != VERIFYING_KEY_LEN {
            return Err(Error::Verification(format!(
                "Invalid verifying key size: expected {}, got {}",
                VERIFYING_KEY_LEN,
                verifying_key.bytes.len()
            )));
        }
        let tag: [u8; 32] = proof.bytes.as_slice().try_into().map_err(|_| {
            Error::Verification(format!(
                "Invalid proof size: expected 32, got {}",
                proof.bytes.len()
            ))
        })?;

        let (digest, rest) = verifying_key.bytes.split_at(DIGEST_LEN);
        let (len_bytes, trapdoor) = rest.split_at(8);
        let mut len = [0u8; 8];
        len.copy_from_slice(len_bytes);
        let expected_len = u64::from_be_bytes(len);

        let elements = public_witness
            .elements()
            .map_err(|e| Error::Verification(e.to_string()))?;
        if elements.len() as u64 != expected_len {
            return Err(Error::Verification(format!(
                "Public witness has {} elements, verifying key expects {}",
                elements.len(),
                expected_len
            )));
        }

        let mut key = Zeroizing::new([0u8; TRAPDOOR_LEN]);
        key.copy_from_slice(trapdoor);
        // blake3::Hash equality is constant time.
        Ok(Self::tag(&key, digest, public_witness) == blake3::Hash::from(tag))
    }
}
