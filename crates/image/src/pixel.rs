//! Pixels and their packed 24-bit form.

use serde::{Deserialize, Serialize};

use photoproof_core::{Error, Result};

/// Largest valid packed value.
pub const MAX_PACKED: u32 = 0x00FF_FFFF;

/// Pack an RGB triple as `R<<16 | G<<8 | B`.
pub fn pack(rgb: [u8; 3]) -> u32 {
    (u32::from(rgb[0]) << 16) | (u32::from(rgb[1]) << 8) | u32::from(rgb[2])
}

/// Inverse of [`pack`] for values up to [`MAX_PACKED`]; higher bits are ignored.
pub fn unpack(packed: u32) -> [u8; 3] {
    [
        ((packed >> 16) & 0xFF) as u8,
        ((packed >> 8) & 0xFF) as u8,
        (packed & 0xFF) as u8,
    ]
}

/// Position of a pixel in an N×N grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelLocation {
    pub row: usize,
    pub col: usize,
    /// Row-major linear index, `row * N + col`.
    pub idx: usize,
}

impl PixelLocation {
    pub fn new(row: usize, col: usize, width: usize) -> Self {
        Self {
            row,
            col,
            idx: row * width + col,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub rgb: [u8; 3],
    pub packed: u32,
    pub loc: PixelLocation,
}

impl Pixel {
    pub fn new(rgb: [u8; 3], loc: PixelLocation) -> Self {
        Self {
            rgb,
            packed: pack(rgb),
            loc,
        }
    }

    /// Build a pixel from its packed form.
    ///
    /// # Errors
    /// `Encoding` if `packed` does not fit in 24 bits.
    pub fn from_packed(packed: u32, loc: PixelLocation) -> Result<Self> {
        if packed > MAX_PACKED {
            return Err(Error::Encoding(format!(
                "Packed pixel value {:#x} exceeds 24 bits",
                packed
            )));
        }
        Ok(Self {
            rgb: unpack(packed),
            packed,
            loc,
        })
    }
}
