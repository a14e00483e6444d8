//! BN254 scalar-field packing for circuit inputs.
//!
//! Byte material enters a circuit as elements of the BN254 scalar field. Two
//! packings are used:
//!
//! - **Reduction**: the bytes are read as one big-endian integer and reduced
//!   modulo the field prime. This is exact modular reduction over the whole
//!   input (no truncation), but it is many-to-one once the input is wider
//!   than the field, so it is never the only binding for long messages.
//! - **Limbs**: the bytes are cut into 31-byte chunks, each strictly smaller
//!   than the prime, so the packing is lossless.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use photoproof_core::{Error, Result};

/// Width of a canonical field element encoding.
pub const FIELD_BYTES: usize = 32;

/// Bytes per lossless limb (248 bits < 254-bit modulus).
pub const LIMB_BYTES: usize = 31;

/// Interpret `bytes` as a big-endian integer and reduce it modulo the BN254 scalar prime.
pub fn reduce_be_bytes(bytes: &[u8]) -> Fr {
    Fr::from_be_bytes_mod_order(bytes)
}

/// Canonical 32-byte big-endian encoding of a field element.
pub fn to_be_bytes(element: &Fr) -> [u8; FIELD_BYTES] {
    let bytes = element.into_bigint().to_bytes_be();
    let mut output = [0u8; FIELD_BYTES];
    let offset = FIELD_BYTES.saturating_sub(bytes.len());
    let start = bytes.len().saturating_sub(FIELD_BYTES);
    output[offset..].copy_from_slice(&bytes[start..]);
    output
}

/// Pack 32 bytes into two 128-bit elements (high half, low half).
pub fn split_halves(bytes: &[u8; 32]) -> [Fr; 2] {
    [
        Fr::from_be_bytes_mod_order(&bytes[..16]),
        Fr::from_be_bytes_mod_order(&bytes[16..]),
    ]
}

/// Lossless limb decomposition; the final limb may be shorter.
pub fn to_limbs(bytes: &[u8]) -> Vec<Fr> {
    bytes
        .chunks(LIMB_BYTES)
        .map(Fr::from_be_bytes_mod_order)
        .collect()
}

/// Canonical (compressed, arkworks) serialization of a vector of elements.
pub fn serialize_elements(elements: &[Fr]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(8 + elements.len() * FIELD_BYTES);
    elements
        .to_vec()
        .serialize_compressed(&mut out)
        .map_err(|e| Error::Encoding(format!("Field element serialization failed: {}", e)))?;
    Ok(out)
}

/// Inverse of [`serialize_elements`]; rejects trailing bytes.
pub fn deserialize_elements(mut bytes: &[u8]) -> Result<Vec<Fr>> {
    let elements = Vec::<Fr>::deserialize_compressed(&mut bytes)
        .map_err(|e| Error::Encoding(format!("Field element deserialization failed: {}", e)))?;
    if !bytes.is_empty() {
        return Err(Error::Encoding(format!(
            "{} trailing bytes after field elements",
            bytes.len()
        )));
    }
    Ok(elements)
}
