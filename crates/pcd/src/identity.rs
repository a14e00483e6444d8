//! Identity transformation: the delivered image is the one the signer signed.
//!
//! # Circuit
//!
//! - public `signer` (32 bytes, split into two 128-bit halves)
//! - public `image` (canonical encoding; reduced scalar plus limb commitment)
//! - secret `signature` (64 bytes)
//! - constraint: `signature` is a valid Ed25519 signature over `image` under `signer`
//!
//! Public witness: `[signer_hi, signer_lo, image_scalar, image_commitment]`.
//!
//! Per-authority circuits also fix the signer key as a bound parameter and
//! require the public `signer` slot to equal it, so the resulting keys only
//! ever prove statements about that signer.

use tracing::debug;

use crate::transformation::{
    BindingInputs, TransformationBinding, TransformationDescriptor, TransformationTag,
};
use photoproof_core::{Error, KeyScope, Result};
use photoproof_crypto::signing::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use photoproof_crypto::zk::{Assignment, CircuitDescription, Constraint, FieldEncoding};
use photoproof_identity::PublicKey;
use photoproof_image::{encode_bytes, RasterImage, ENCODED_LEN};

pub const SIGNER_SLOT: &str = "signer";
pub const IMAGE_SLOT: &str = "image";
pub const SIGNATURE_SLOT: &str = "signature";

#[derive(Debug, Clone)]
pub struct IdentityTransformation {
    scope: KeyScope,
    signer: Option<PublicKey>,
    image: Option<Vec<u8>>,
    signature: Option<Vec<u8>>,
}

impl IdentityTransformation {
    /// Binding for key generation. Per-authority scope requires the signer.
    pub fn for_setup(scope: KeyScope, signer: Option<PublicKey>) -> Result<Self> {
        if scope == KeyScope::PerAuthority && signer.is_none() {
            return Err(Error::Encoding(
                "Per-authority identity circuit needs a signer key".to_string(),
            ));
        }
        Ok(Self {
            scope,
            signer,
            image: None,
            signature: None,
        })
    }

    /// Binding with every input, as used by a capture authority.
    pub fn prover(
        scope: KeyScope,
        signer: PublicKey,
        image: Vec<u8>,
        signature: Vec<u8>,
    ) -> Result<Self> {
        check_image(&image)?;
        if signature.len() != SIGNATURE_LENGTH {
            return Err(Error::Encoding(format!(
                "Signature is {} bytes (expected {})",
                signature.len(),
                SIGNATURE_LENGTH
            )));
        }
        Ok(Self {
            scope,
            signer: Some(signer),
            image: Some(image),
            signature: Some(signature),
        })
    }

    /// Binding with public inputs only, as rebuilt by a verifier.
    pub fn verifier(scope: KeyScope, signer: PublicKey, image: Vec<u8>) -> Result<Self> {
        check_image(&image)?;
        Ok(Self {
            scope,
            signer: Some(signer),
            image: Some(image),
            signature: None,
        })
    }

    /// Registry constructor.
    pub fn construct(inputs: BindingInputs) -> Result<Box<dyn TransformationBinding>> {
        if inputs.descriptor != TransformationDescriptor::Identity {
            return Err(Error::UnregisteredTransformation(format!(
                "identity constructor cannot build {:?}",
                inputs.descriptor
            )));
        }
        let binding = match (inputs.signer, inputs.image, inputs.signature) {
            (Some(signer), Some(image), Some(signature)) => {
                Self::prover(inputs.scope, signer, image, signature)?
            }
            (Some(signer), Some(image), None) => Self::verifier(inputs.scope, signer, image)?,
            (signer, None, None) => Self::for_setup(inputs.scope, signer)?,
            _ => {
                return Err(Error::Encoding(
                    "Identity binding needs a signer and image alongside a signature".to_string(),
                ))
            }
        };
        Ok(Box::new(binding))
    }

    pub fn signer(&self) -> Option<&PublicKey> {
        self.signer.as_ref()
    }

    /// Check `image` against this binding's signer and signature directly.
    ///
    /// # Errors
    /// `Encoding` if the binding holds no signer or signature.
    pub fn attests(&self, image: &RasterImage) -> Result<bool> {
        let signer = self.require_signer()?;
        let signature = self
            .signature
            .as_deref()
            .ok_or_else(|| Error::Encoding("Binding holds no signature".to_string()))?;
        signer.verify(&encode_bytes(image)?, signature)
    }

    fn require_signer(&self) -> Result<&PublicKey> {
        self.signer
            .as_ref()
            .ok_or_else(|| Error::Encoding("Binding holds no signer key".to_string()))
    }

    fn require_image(&self) -> Result<&[u8]> {
        self.image
            .as_deref()
            .ok_or_else(|| Error::Encoding("Binding holds no image encoding".to_string()))
    }
}

fn check_image(image: &[u8]) -> Result<()> {
    if image.len() != ENCODED_LEN {
        return Err(Error::Encoding(format!(
            "Image encoding is {} bytes (expected {})",
            image.len(),
            ENCODED_LEN
        )));
    }
    Ok(())
}

impl TransformationBinding for IdentityTransformation {
    fn tag(&self) -> TransformationTag {
        TransformationTag::Identity
    }

    fn circuit(&self) -> CircuitDescription {
        let mut circuit = CircuitDescription::new(self.tag().as_str())
            .with_public(SIGNER_SLOT, PUBLIC_KEY_LENGTH, FieldEncoding::SplitHalves)
            .with_public(IMAGE_SLOT, ENCODED_LEN, FieldEncoding::ScalarCommitment)
            .with_secret(SIGNATURE_SLOT, SIGNATURE_LENGTH)
            .with_constraint(Constraint::SignatureValid {
                public_key: SIGNER_SLOT.to_string(),
                message: IMAGE_SLOT.to_string(),
                signature: SIGNATURE_SLOT.to_string(),
            });

        if let (KeyScope::PerAuthority, Some(signer)) = (self.scope, &self.signer) {
            circuit = circuit
                .with_bound_parameter(SIGNER_SLOT, signer.to_vec())
                .with_constraint(Constraint::BoundEquals {
                    slot: SIGNER_SLOT.to_string(),
                    parameter: SIGNER_SLOT.to_string(),
                });
        }
        debug!(scope = self.scope.as_str(), "Built identity circuit");
        circuit
    }

    fn assignment(&self) -> Result<Assignment> {
        let signature = self
            .signature
            .clone()
            .ok_or_else(|| Error::Encoding("Binding holds no signature".to_string()))?;
        Ok(self.public_assignment()?.with_secret(SIGNATURE_SLOT, signature))
    }

    fn public_assignment(&self) -> Result<Assignment> {
        Ok(Assignment::new()
            .with_public(SIGNER_SLOT, self.require_signer()?.to_vec())
            .with_public(IMAGE_SLOT, self.require_image()?.to_vec()))
    }
}
