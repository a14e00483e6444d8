//! Signing identities for PhotoProof capture and verification agents.
//!
//! # Core Concepts
//!
//! - **Signing Identity**: an Ed25519 keypair owned by exactly one agent
//! - **Public Key**: the shareable half, embedded in every proof
//! - **Key Provider**: pluggable provisioning (software now, hardware keystores
//!   behind the same trait)
//!
//! # Security Model
//!
//! - Secret keys never leave their `SigningIdentity` and are zeroized on drop
//! - Identities are referred to by key id in logs, never by key material

pub mod identity;
pub mod provider;

pub use identity::{PublicKey, SigningIdentity};
pub use provider::{KeyProvider, SoftwareKeyProvider};

// Re-export core types for convenience
pub use photoproof_core::{Error, Result};
