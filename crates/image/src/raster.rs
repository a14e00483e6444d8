//! Fixed-size raster images.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pixel::{Pixel, PixelLocation};
use photoproof_core::{Error, Result};

/// Side length of every image.
pub const N: usize = 16;

/// Number of pixels in an image.
pub const PIXEL_COUNT: usize = N * N;

/// An N×N grid of pixels in row-major order. Immutable once built; edits
/// produce a new image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct RasterImage {
    pixels: Vec<Pixel>,
}

impl RasterImage {
    /// Build an image from RGB triples in row-major order.
    ///
    /// # Errors
    /// `Encoding` unless exactly [`PIXEL_COUNT`] triples are given.
    pub fn from_rgb(rgb: Vec<[u8; 3]>) -> Result<Self> {
        if rgb.len() != PIXEL_COUNT {
            return Err(Error::Encoding(format!(
                "Image has {} pixels (expected {})",
                rgb.len(),
                PIXEL_COUNT
            )));
        }
        let pixels = rgb
            .into_iter()
            .enumerate()
            .map(|(idx, rgb)| Pixel::new(rgb, PixelLocation::new(idx / N, idx % N, N)))
            .collect();
        Ok(Self { pixels })
    }

    /// Build an image from packed values in row-major order.
    pub fn from_packed(packed: &[u32]) -> Result<Self> {
        if packed.len() != PIXEL_COUNT {
            return Err(Error::Encoding(format!(
                "Image has {} pixels (expected {})",
                packed.len(),
                PIXEL_COUNT
            )));
        }
        let pixels = packed
            .iter()
            .enumerate()
            .map(|(idx, &value)| Pixel::from_packed(value, PixelLocation::new(idx / N, idx % N, N)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pixels })
    }

    /// Solid-colour image.
    pub fn filled(rgb: [u8; 3]) -> Self {
        let pixels = (0..PIXEL_COUNT)
            .map(|idx| Pixel::new(rgb, PixelLocation::new(idx / N, idx % N, N)))
            .collect();
        Self { pixels }
    }

    pub fn black() -> Self {
        Self::filled([0, 0, 0])
    }

    pub fn white() -> Self {
        Self::filled([255, 255, 255])
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<&Pixel> {
        if row >= N || col >= N {
            return None;
        }
        self.pixels.get(row * N + col)
    }

    /// Copy of this image with the pixel at linear index `idx` replaced.
    ///
    /// # Errors
    /// `Encoding` if `idx` is out of range.
    pub fn with_pixel(&self, idx: usize, rgb: [u8; 3]) -> Result<Self> {
        if idx >= PIXEL_COUNT {
            return Err(Error::Encoding(format!(
                "Pixel index {} out of range (image has {})",
                idx, PIXEL_COUNT
            )));
        }
        let mut pixels = self.pixels.clone();
        pixels[idx] = Pixel::new(rgb, pixels[idx].loc);
        Ok(Self { pixels })
    }

    pub fn to_packed(&self) -> Vec<u32> {
        self.pixels.iter().map(|p| p.packed).collect()
    }

    /// Text rendering of the pixel grid (same as `Display`).
    pub fn render_rgb_grid(&self) -> String {
        self.to_string()
    }
}

impl TryFrom<Vec<u32>> for RasterImage {
    type Error = Error;

    fn try_from(packed: Vec<u32>) -> Result<Self> {
        Self::from_packed(&packed)
    }
}

impl From<RasterImage> for Vec<u32> {
    fn from(image: RasterImage) -> Self {
        image.to_packed()
    }
}

/// Grid of `(R, G, B)` triples, one row per line.
impl fmt::Display for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RGB Image:")?;
        for row in self.pixels.chunks(N) {
            for pixel in row {
                write!(
                    f,
                    "({:3}, {:3}, {:3}) ",
                    pixel.rgb[0], pixel.rgb[1], pixel.rgb[2]
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RasterImage {
        let rgb = (0..PIXEL_COUNT)
            .map(|i| [i as u8, 255 - i as u8, (i * 7 % 256) as u8])
            .collect();
        RasterImage::from_rgb(rgb).unwrap()
    }

    #[test]
    fn test_locations_are_unique_and_row_major() {
        let image = gradient();
        for (i, pixel) in image.pixels().iter().enumerate() {
            assert_eq!(pixel.loc.idx, i);
            assert_eq!(pixel.loc.row * N + pixel.loc.col, i);
        }
        assert_eq!(image.pixel(1, 2).map(|p| p.loc.idx), Some(18));
        assert!(image.pixel(N, 0).is_none());
    }

    #[test]
    fn test_wrong_size_rejected() {
        assert!(matches!(
            RasterImage::from_rgb(vec![[0, 0, 0]; PIXEL_COUNT - 1]),
            Err(Error::Encoding(_))
        ));
        assert!(matches!(
            RasterImage::from_packed(&[0; PIXEL_COUNT + 1]),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_with_pixel_leaves_original_untouched() {
        let original = RasterImage::black();
        let edited = original.with_pixel(5, [1, 0, 0]).unwrap();
        assert_eq!(original.pixels()[5].rgb, [0, 0, 0]);
        assert_eq!(edited.pixels()[5].rgb, [1, 0, 0]);
        assert_eq!(edited.pixels()[5].loc, original.pixels()[5].loc);
        assert!(original.with_pixel(PIXEL_COUNT, [0, 0, 0]).is_err());
    }

    #[test]
    fn test_display_grid() {
        let rendered = RasterImage::white().render_rgb_grid();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), N + 1);
        assert_eq!(lines[0], "RGB Image:");
        assert!(lines[1].starts_with("(255, 255, 255) "));
        assert_eq!(lines[1].matches('(').count(), N);
    }

    #[test]
    fn test_serde_as_packed() {
        let image = gradient();
        let json = serde_json::to_string(&image).unwrap();
        assert!(json.starts_with("[65280,"));
        assert_eq!(serde_json::from_str::<RasterImage>(&json).unwrap(), image);

        assert!(serde_json::from_str::<RasterImage>("[1,2,3]").is_err());
    }
}
