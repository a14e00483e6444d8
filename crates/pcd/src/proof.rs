//! The proof object carried by every photograph.

use serde::{Deserialize, Serialize};

use crate::transformation::TransformationTag;
use photoproof_core::KeyScope;
use photoproof_crypto::zk::{PublicWitness, VerifyingKey, ZkProof};
use photoproof_identity::PublicKey;

/// Everything a verifier needs; contains no secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Transformation the proof attests to.
    pub transformation: TransformationTag,
    /// Scope of the keys the proof was made with.
    pub key_scope: KeyScope,
    /// Signature over the canonical image encoding.
    pub signature: Vec<u8>,
    pub public_key: PublicKey,
    pub verifying_key: VerifyingKey,
    pub zk_proof: ZkProof,
    /// Public witness the prover used.
    pub public_witness: PublicWitness,
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoproof_identity::SigningIdentity;

    #[test]
    fn test_proof_json_roundtrip() {
        let proof = Proof {
            transformation: TransformationTag::Identity,
            key_scope: KeyScope::PerAuthority,
            signature: vec![7; 64],
            public_key: SigningIdentity::generate().public_key(),
            verifying_key: VerifyingKey {
                protocol: "transcript-blake3".to_string(),
                bytes: vec![1; 72],
            },
            zk_proof: ZkProof {
                protocol: "transcript-blake3".to_string(),
                curve: "bn254".to_string(),
                bytes: vec![2; 32],
            },
            public_witness: PublicWitness { bytes: vec![3; 8] },
        };

        let json = serde_json::to_string(&proof).unwrap();
        assert!(json.contains(r#""transformation":"identity""#));
        assert_eq!(serde_json::from_str::<Proof>(&json).unwrap(), proof);
    }
}
