//! Canonical image encoding.
//!
//! # Byte layout
//!
//! ```text
//! u16 BE width || u16 BE height || (R, G, B) x PIXEL_COUNT   (772 bytes)
//! ```
//!
//! Pixels are written in row-major order. The encoding is a pure function of
//! pixel content and is what capture authorities sign.
//!
//! The scalar form reads those bytes as one big-endian integer and reduces it
//! modulo the BN254 scalar-field prime, re-serialized as 32 big-endian bytes.

use serde::{Deserialize, Serialize};

use crate::raster::{RasterImage, N, PIXEL_COUNT};
use photoproof_core::{Error, Result};
use photoproof_crypto::zk::field::{reduce_be_bytes, to_be_bytes};

/// Length of [`encode_bytes`] output.
pub const ENCODED_LEN: usize = 4 + 3 * PIXEL_COUNT;

/// Canonical byte encoding of an image.
///
/// # Errors
/// `Encoding` if the image does not hold exactly [`PIXEL_COUNT`] pixels.
pub fn encode_bytes(image: &RasterImage) -> Result<Vec<u8>> {
    let pixels = image.pixels();
    if pixels.len() != PIXEL_COUNT {
        return Err(Error::Encoding(format!(
            "Image has {} pixels (expected {})",
            pixels.len(),
            PIXEL_COUNT
        )));
    }

    let mut out = Vec::with_capacity(ENCODED_LEN);
    out.extend_from_slice(&(N as u16).to_be_bytes());
    out.extend_from_slice(&(N as u16).to_be_bytes());
    for pixel in pixels {
        out.extend_from_slice(&pixel.rgb);
    }
    Ok(out)
}

/// Field-scalar form of [`encode_bytes`]: exact reduction mod p, 32 bytes BE.
pub fn encode_scalar(image: &RasterImage) -> Result<[u8; 32]> {
    let bytes = encode_bytes(image)?;
    Ok(to_be_bytes(&reduce_be_bytes(&bytes)))
}

/// Both encodings of one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEncoding {
    pub bytes: Vec<u8>,
    pub scalar: [u8; 32],
}

impl CanonicalEncoding {
    pub fn of(image: &RasterImage) -> Result<Self> {
        let bytes = encode_bytes(image)?;
        let scalar = to_be_bytes(&reduce_be_bytes(&bytes));
        Ok(Self { bytes, scalar })
    }
}
