//! Cryptographic primitives for the PhotoProof provenance system.
//!
//! # Core Capabilities
//!
//! - **Digital Signatures**: Ed25519 sign/verify over raw bytes
//! - **Field Packing**: BN254 scalar-field encodings of circuit inputs
//! - **Commitments**: circomlib-compatible Poseidon over lossless limbs
//! - **Proving Backends**: the [`zk::ProvingBackend`] seam and a reference
//!   transcript backend
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Secrets must never be logged; key material is redacted in `Debug`
//! - Secret witness values and proving keys are zeroized after use

pub mod signing;
pub mod zk;

pub use signing::{key_id, sign, verify_signature};

pub use zk::{
    Assignment, CircuitDescription, ConstraintSystem, ProofBackendKind, ProvingBackend,
    ProvingKey, PublicWitness, SecretWitness, TranscriptBackend, VerifyingKey, ZkProof,
};
