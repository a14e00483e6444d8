//! Image sources polled by capture authorities.

use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;
use tracing::debug;

use crate::raster::{RasterImage, PIXEL_COUNT};
use photoproof_core::{Error, Result};

/// Something that yields images, such as a sensor.
pub trait ImageSource {
    fn next_image(&mut self) -> Result<RasterImage>;
}

/// Uniformly random pixels.
#[derive(Debug)]
pub enum RandomImageSource {
    Os,
    Seeded(ChaCha20Rng),
}

impl RandomImageSource {
    pub fn new() -> Self {
        RandomImageSource::Os
    }

    pub fn seeded(seed: u64) -> Self {
        RandomImageSource::Seeded(ChaCha20Rng::seed_from_u64(seed))
    }

    fn draw<R: Rng>(rng: &mut R) -> Result<RasterImage> {
        let rgb = (0..PIXEL_COUNT).map(|_| rng.gen::<[u8; 3]>()).collect();
        RasterImage::from_rgb(rgb)
    }
}

impl Default for RandomImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for RandomImageSource {
    fn next_image(&mut self) -> Result<RasterImage> {
        let image = match self {
            RandomImageSource::Os => Self::draw(&mut OsRng)?,
            RandomImageSource::Seeded(rng) => Self::draw(rng)?,
        };
        debug!("Sampled random image");
        Ok(image)
    }
}

/// Replays a fixed queue of images, then fails.
#[derive(Debug, Clone, Default)]
pub struct FixedImageSource {
    queue: VecDeque<RasterImage>,
    polled: usize,
}

impl FixedImageSource {
    pub fn new(images: impl IntoIterator<Item = RasterImage>) -> Self {
        Self {
            queue: images.into_iter().collect(),
            polled: 0,
        }
    }

    /// Number of times `next_image` has been called.
    pub fn polled(&self) -> usize {
        self.polled
    }
}

impl ImageSource for FixedImageSource {
    fn next_image(&mut self) -> Result<RasterImage> {
        self.polled += 1;
        self.queue
            .pop_front()
            .ok_or_else(|| Error::Io("Image source exhausted".to_string()))
    }
}
