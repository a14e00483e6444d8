//! Permissible transformations and their circuit bindings.
//!
//! A transformation is identified by a [`TransformationTag`]. Its
//! [`TransformationBinding`] turns concrete inputs (signer key, image
//! encoding, signature) into a circuit description and an input assignment.
//! Dispatch is always by tag through the registry; new transformations add a
//! variant here and a constructor there.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use photoproof_core::{Error, KeyScope, Result};
use photoproof_crypto::zk::{
    Assignment, CircuitDescription, ProvingBackend, PublicWitness, SecretWitness,
};
use photoproof_identity::PublicKey;

/// Stable identifier of a transformation type; the key-ring map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformationTag {
    /// The delivered image is exactly the signed capture.
    Identity,
}

impl TransformationTag {
    pub fn as_str(self) -> &'static str {
        match self {
            TransformationTag::Identity => "identity",
        }
    }
}

impl fmt::Display for TransformationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformationTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "identity" => Ok(TransformationTag::Identity),
            other => Err(Error::UnregisteredTransformation(other.to_string())),
        }
    }
}

/// A permissible transformation as declared by a capture authority.
///
/// Variants carry whatever parameters their binding needs beyond the
/// signer key and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TransformationDescriptor {
    Identity,
}

impl TransformationDescriptor {
    pub fn tag(&self) -> TransformationTag {
        match self {
            TransformationDescriptor::Identity => TransformationTag::Identity,
        }
    }
}

/// Material a registry constructor builds a binding from.
///
/// Setup passes neither image nor signature; verification passes the image
/// encoding only; capture passes all three.
#[derive(Debug, Clone)]
pub struct BindingInputs {
    pub descriptor: TransformationDescriptor,
    pub scope: KeyScope,
    /// Required for per-authority circuits and for any witness derivation.
    pub signer: Option<PublicKey>,
    /// Canonical image encoding.
    pub image: Option<Vec<u8>>,
    pub signature: Option<Vec<u8>>,
}

impl BindingInputs {
    pub fn for_setup(
        descriptor: TransformationDescriptor,
        scope: KeyScope,
        signer: Option<PublicKey>,
    ) -> Self {
        Self {
            descriptor,
            scope,
            signer,
            image: None,
            signature: None,
        }
    }

    pub fn for_verification(
        descriptor: TransformationDescriptor,
        scope: KeyScope,
        signer: PublicKey,
        image: Vec<u8>,
    ) -> Self {
        Self {
            descriptor,
            scope,
            signer: Some(signer),
            image: Some(image),
            signature: None,
        }
    }

    pub fn for_proving(
        descriptor: TransformationDescriptor,
        scope: KeyScope,
        signer: PublicKey,
        image: Vec<u8>,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            descriptor,
            scope,
            signer: Some(signer),
            image: Some(image),
            signature: Some(signature),
        }
    }
}

/// The constraint-system-producing object for one transformation.
pub trait TransformationBinding: Send + Sync {
    fn tag(&self) -> TransformationTag;

    /// Circuit description handed to the backend.
    fn circuit(&self) -> CircuitDescription;

    /// Full assignment, secret inputs included.
    ///
    /// # Errors
    /// `Encoding` if the binding was built without secret material.
    fn assignment(&self) -> Result<Assignment>;

    /// Public inputs only.
    fn public_assignment(&self) -> Result<Assignment>;

    /// (secret witness, public witness) through `backend`.
    fn derive_witness(
        &self,
        backend: &dyn ProvingBackend,
    ) -> Result<(SecretWitness, PublicWitness)> {
        backend.derive_witness(&self.circuit(), &self.assignment()?)
    }

    /// Public witness through `backend`, from public inputs alone.
    fn derive_public_witness(&self, backend: &dyn ProvingBackend) -> Result<PublicWitness> {
        backend.derive_public_witness(&self.circuit(), &self.public_assignment()?)
    }
}
