//! Fixtures shared by the end-to-end tests

use std::sync::Arc;

use photoproof_camera::{CaptureAuthority, Photograph};
use photoproof_core::{KeygenConfig, VerifierConfig};
use photoproof_crypto::zk::{ProvingBackend, TranscriptBackend};
use photoproof_identity::{KeyProvider, SigningIdentity, SoftwareKeyProvider};
use photoproof_pcd::TransformationDescriptor;
use photoproof_viewer::VerificationAgent;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn reference_backend() -> Arc<dyn ProvingBackend> {
    Arc::new(TranscriptBackend::new())
}

pub fn seeded_backend(seed: u8) -> Arc<dyn ProvingBackend> {
    Arc::new(TranscriptBackend::seeded([seed; 32]))
}

/// A capture authority permitted only the identity transformation.
pub fn identity_camera(backend: Arc<dyn ProvingBackend>) -> CaptureAuthority {
    camera_with(backend, vec![TransformationDescriptor::Identity], &KeygenConfig::default())
}

pub fn camera_with(
    backend: Arc<dyn ProvingBackend>,
    permissible: Vec<TransformationDescriptor>,
    config: &KeygenConfig,
) -> CaptureAuthority {
    CaptureAuthority::new(SigningIdentity::generate(), permissible, backend, config)
        .expect("capture authority setup failed")
}

pub fn viewer(backend: Arc<dyn ProvingBackend>) -> VerificationAgent {
    viewer_with(backend, VerifierConfig::default())
}

pub fn viewer_with(backend: Arc<dyn ProvingBackend>, config: VerifierConfig) -> VerificationAgent {
    let identity = SoftwareKeyProvider::new()
        .provision()
        .expect("verifier identity provisioning failed");
    VerificationAgent::new(identity, backend, config)
}

/// Flip the low bit of one channel of one pixel, keeping the proof.
pub fn flip_channel(photo: &Photograph, idx: usize, channel: usize) -> Photograph {
    let (image, proof) = photo.clone().into_parts();
    let mut rgb = image.pixels()[idx].rgb;
    rgb[channel] ^= 1;
    let edited = image.with_pixel(idx, rgb).expect("pixel index in range");
    Photograph::from_parts(edited, proof)
}
