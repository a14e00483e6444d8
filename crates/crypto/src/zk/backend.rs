//! Proving backend interface and the artifacts it exchanges.
//!
//! Every artifact is a byte holder tagged with the protocol that produced
//! it, so keys, proofs and witnesses can be stored or shipped without the
//! backend that made them.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::circuit::{Assignment, CircuitDescription, FieldEncoding};
use super::field::{deserialize_elements, reduce_be_bytes, serialize_elements, split_halves};
use super::poseidon::commit_bytes;
use photoproof_core::{Error, Result};

/// Known proof systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProofBackendKind {
    /// Keyed-hash transcript. Transparent, not zero-knowledge.
    Transcript,
    /// Groth16 SNARK.
    Groth16,
    /// PLONK.
    Plonk,
}

impl ProofBackendKind {
    /// Whether proofs from this backend carry real soundness and zero knowledge.
    pub fn is_production_grade(self) -> bool {
        matches!(self, ProofBackendKind::Groth16 | ProofBackendKind::Plonk)
    }

    /// Protocol label written into keys and proofs.
    pub fn protocol(self) -> &'static str {
        match self {
            ProofBackendKind::Transcript => "transcript-blake3",
            ProofBackendKind::Groth16 => "groth16",
            ProofBackendKind::Plonk => "plonk",
        }
    }

    pub fn from_protocol(protocol: &str) -> Option<Self> {
        match protocol {
            "transcript-blake3" => Some(ProofBackendKind::Transcript),
            "groth16" => Some(ProofBackendKind::Groth16),
            "plonk" => Some(ProofBackendKind::Plonk),
            _ => None,
        }
    }
}

/// A compiled circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSystem {
    pub label: String,
    /// Identity of the compiled circuit; keys are bound to it.
    pub digest: [u8; 32],
    /// Field elements in the public witness.
    pub public_len: usize,
    pub description: CircuitDescription,
}

/// Proving key. Zeroized on drop.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ProvingKey {
    #[zeroize(skip)]
    pub protocol: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ProvingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvingKey")
            .field("protocol", &self.protocol)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Verifying key. Public material, embedded in every proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    pub protocol: String,
    pub bytes: Vec<u8>,
}

impl VerifyingKey {
    /// Short hex fingerprint for logs.
    pub fn fingerprint(&self) -> String {
        hex::encode(&blake3::hash(&self.bytes).as_bytes()[..8])
    }
}

/// Zero-knowledge proof object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof {
    /// Protocol identifier (e.g., "groth16")
    pub protocol: String,
    /// Elliptic curve identifier (e.g., "bn254")
    pub curve: String,
    pub bytes: Vec<u8>,
}

/// Public witness: canonical serialization of the public field elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicWitness {
    pub bytes: Vec<u8>,
}

impl PublicWitness {
    pub fn from_elements(elements: &[Fr]) -> Result<Self> {
        Ok(Self {
            bytes: serialize_elements(elements)?,
        })
    }

    pub fn elements(&self) -> Result<Vec<Fr>> {
        deserialize_elements(&self.bytes)
    }

    /// Pack the public slots of `assignment` in declaration order.
    pub fn pack(description: &CircuitDescription, assignment: &Assignment) -> Result<Self> {
        assignment.check_public(description)?;

        let mut elements = Vec::with_capacity(description.public_len());
        for slot in &description.public_inputs {
            let value = assignment
                .public
                .get(&slot.name)
                .ok_or_else(|| Error::Encoding(format!("Missing public input '{}'", slot.name)))?;
            match slot.encoding {
                Some(FieldEncoding::SplitHalves) => {
                    let bytes: &[u8; 32] = value.as_slice().try_into().map_err(|_| {
                        Error::Encoding(format!("Input '{}' is not 32 bytes", slot.name))
                    })?;
                    elements.extend_from_slice(&split_halves(bytes));
                }
                Some(FieldEncoding::ScalarCommitment) => {
                    elements.push(reduce_be_bytes(value));
                    elements.push(commit_bytes(value)?);
                }
                None => {
                    return Err(Error::Encoding(format!(
                        "Public input '{}' has no field encoding",
                        slot.name
                    )))
                }
            }
        }
        Self::from_elements(&elements)
    }
}

/// Full assignment plus its packed public part. Secret values are zeroized on drop.
#[derive(Clone)]
pub struct SecretWitness {
    pub assignment: Assignment,
    pub public: PublicWitness,
}

impl fmt::Debug for SecretWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretWitness")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Drop for SecretWitness {
    fn drop(&mut self) {
        for value in self.assignment.secret.values_mut() {
            value.zeroize();
        }
    }
}

/// Trait for proof systems (dependency injection).
///
/// Implementations must be deterministic in `derive_witness` and
/// `derive_public_witness`: the verifier recomputes the public witness and
/// compares it with the one the prover used.
pub trait ProvingBackend: Send + Sync {
    fn kind(&self) -> ProofBackendKind;

    /// Compile a description into a constraint system.
    ///
    /// # Errors
    /// `CircuitCompile` if the description is rejected.
    fn compile(&self, description: &CircuitDescription) -> Result<ConstraintSystem>;

    /// Produce the key pair for a compiled circuit.
    ///
    /// # Errors
    /// `KeyGeneration` on setup failure.
    fn setup(&self, cs: &ConstraintSystem) -> Result<(ProvingKey, VerifyingKey)>;

    /// # Errors
    /// `Encoding` if the assignment does not fit the description.
    fn derive_witness(
        &self,
        description: &CircuitDescription,
        assignment: &Assignment,
    ) -> Result<(SecretWitness, PublicWitness)>;

    /// Public witness only; secret slots may be absent.
    ///
    /// # Errors
    /// `Encoding` if the public side of the assignment does not fit.
    fn derive_public_witness(
        &self,
        description: &CircuitDescription,
        assignment: &Assignment,
    ) -> Result<PublicWitness>;

    /// # Errors
    /// `Proving` if the key does not match the circuit or a constraint fails.
    fn prove(
        &self,
        cs: &ConstraintSystem,
        proving_key: &ProvingKey,
        witness: &SecretWitness,
    ) -> Result<ZkProof>;

    /// `Ok(false)` for a well-formed proof that does not verify.
    ///
    /// # Errors
    /// `Verification` for malformed or foreign artifacts.
    fn verify(
        &self,
        proof: &ZkProof,
        verifying_key: &VerifyingKey,
        public_witness: &PublicWitness,
    ) -> Result<bool>;
}
