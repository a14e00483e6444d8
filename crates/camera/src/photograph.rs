//! Photographs: an image plus the proof of where it came from.

use serde::{Deserialize, Serialize};

use photoproof_image::RasterImage;
use photoproof_pcd::Proof;

/// A raster image and exactly one proof. Holds no secrets, so it can be
/// cloned and shared freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photograph {
    image: RasterImage,
    proof: Proof,
}

impl Photograph {
    /// Reassemble a photograph from stored or received parts. Nothing is
    /// checked here; that is the verifier's job.
    pub fn from_parts(image: RasterImage, proof: Proof) -> Self {
        Self { image, proof }
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn proof(&self) -> &Proof {
        &self.proof
    }

    pub fn into_parts(self) -> (RasterImage, Proof) {
        (self.image, self.proof)
    }
}
