//! Poseidon hash functions for circuit commitments.
//!
//! circomlib-compatible Poseidon over the BN254 scalar field. The byte
//! commitment absorbs lossless 31-byte limbs, up to [`LIMBS_PER_ROUND`] per
//! permutation call, chained through an accumulator seeded with the input
//! length.

use super::field::to_limbs;
use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};
use photoproof_core::{Error, Result};

/// Limbs absorbed per call; the accumulator takes the twelfth input slot.
pub const LIMBS_PER_ROUND: usize = 11;

/// Poseidon over field elements (1 to 12 inputs).
pub fn poseidon_hash(inputs: &[Fr]) -> Result<Fr> {
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())
        .map_err(|err| Error::Encoding(format!("Poseidon setup failed: {}", err)))?;
    hasher
        .hash(inputs)
        .map_err(|err| Error::Encoding(format!("Poseidon hash failed: {}", err)))
}

/// Binding commitment to arbitrary-length bytes.
pub fn commit_bytes(bytes: &[u8]) -> Result<Fr> {
    let mut acc = Fr::from(bytes.len() as u64);
    let limbs = to_limbs(bytes);
    if limbs.is_empty() {
        return poseidon_hash(&[acc]);
    }

    for round in limbs.chunks(LIMBS_PER_ROUND) {
        let mut inputs = Vec::with_capacity(round.len() + 1);
        inputs.push(acc);
        inputs.extend_from_slice(round);
        acc = poseidon_hash(&inputs)?;
    }
    Ok(acc)
}
