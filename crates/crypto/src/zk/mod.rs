//! Zero-knowledge circuit plumbing.
//!
//! Circuit descriptions, BN254 field packing, Poseidon commitments, the
//! [`ProvingBackend`] interface and a transparent reference backend.

pub mod backend;
pub mod circuit;
pub mod field;
pub mod poseidon;
pub mod transcript;

pub use backend::{
    ConstraintSystem, ProofBackendKind, ProvingBackend, ProvingKey, PublicWitness, SecretWitness,
    VerifyingKey, ZkProof,
};
pub use circuit::{Assignment, CircuitDescription, Constraint, FieldEncoding, InputSlot};
pub use transcript::{SetupEntropy, TranscriptBackend};
