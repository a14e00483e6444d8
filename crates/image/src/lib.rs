//! Raster images and their canonical encoding.
//!
//! - [`pixel`]: RGB pixels and the packed 24-bit form
//! - [`raster`]: fixed 16×16 images
//! - [`codec`]: canonical bytes and the BN254 scalar form
//! - [`source`]: image sources for capture

pub mod codec;
pub mod pixel;
pub mod raster;
pub mod source;

pub use codec::{encode_bytes, encode_scalar, CanonicalEncoding, ENCODED_LEN};
pub use pixel::{pack, unpack, Pixel, PixelLocation, MAX_PACKED};
pub use raster::{RasterImage, N, PIXEL_COUNT};
pub use source::{FixedImageSource, ImageSource, RandomImageSource};
