//! Capture-to-verification flows
//!
//! 1. A fresh capture verifies at an independent agent
//! 2. Any pixel edit is rejected
//! 3. Key material from another authority is rejected
//! 4. An authority without identity keys refuses to capture

use photoproof_camera::Photograph;
use photoproof_core::{Error, VerifierConfig};
use photoproof_core::KeyScope;
use photoproof_identity::SigningIdentity;
use photoproof_image::{encode_bytes, FixedImageSource, RandomImageSource, RasterImage};
use photoproof_pcd::{
    BindingInputs, TransformationDescriptor, TransformationRegistry, TransformationTag,
};
use photoproof_viewer::Verdict;

use crate::test_utils::*;

#[test]
fn test_random_capture_verifies() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer(backend);

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    assert_eq!(agent.verify(&photo).unwrap(), Verdict::Valid);
    assert_eq!(camera.photographs().len(), 1);

    // The signature in the proof covers the canonical encoding.
    let encoded = encode_bytes(photo.image()).unwrap();
    assert!(camera.public_key().verify(&encoded, &photo.proof().signature).unwrap());
}

#[test]
fn test_every_capture_in_log_verifies() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer(backend);

    let mut source = FixedImageSource::new([
        RasterImage::black(),
        RasterImage::white(),
        RasterImage::filled([12, 200, 77]),
    ]);
    for _ in 0..3 {
        camera.capture(&mut source).unwrap();
    }

    assert_eq!(camera.photographs().len(), 3);
    for photo in camera.photographs() {
        assert!(agent.verify(photo).unwrap().is_valid());
    }
}

#[test]
fn test_single_channel_edit_rejected() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer(backend);

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    for (idx, channel) in [(0, 0), (17, 1), (255, 2)] {
        let edited = flip_channel(&photo, idx, channel);
        assert!(
            matches!(agent.verify(&edited).unwrap(), Verdict::Rejected(_)),
            "edit at pixel {} channel {} was accepted",
            idx,
            channel
        );
    }
    assert!(agent.verify(&photo).unwrap().is_valid());
}

#[test]
fn test_edit_rejected_by_backend_alone() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer_with(
        backend,
        VerifierConfig {
            compare_embedded_witness: false,
            ..VerifierConfig::default()
        },
    );

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    let edited = flip_channel(&photo, 100, 1);
    assert!(matches!(
        agent.verify(&edited).unwrap(),
        Verdict::Rejected(Error::Verification(_))
    ));
}

#[test]
fn test_foreign_verifying_key_rejected() {
    init_tracing();
    let backend = reference_backend();
    let mut camera_a = identity_camera(backend.clone());
    let mut camera_b = identity_camera(backend.clone());
    let agent = viewer(backend);

    let photo_a = camera_a.capture(&mut RandomImageSource::new()).unwrap();
    let photo_b = camera_b.capture(&mut RandomImageSource::new()).unwrap();

    let (image, mut proof) = photo_a.into_parts();
    proof.verifying_key = photo_b.proof().verifying_key.clone();
    let spliced = Photograph::from_parts(image, proof);

    assert!(matches!(agent.verify(&spliced).unwrap(), Verdict::Rejected(_)));
    assert!(agent.verify(&photo_b).unwrap().is_valid());
}

#[test]
fn test_per_authority_key_cannot_prove_for_other_signer() {
    init_tracing();
    let backend = reference_backend();
    let mut camera_a = identity_camera(backend.clone());
    let camera_b = identity_camera(backend.clone());

    let photo = camera_a.capture(&mut RandomImageSource::new()).unwrap();
    let registry = TransformationRegistry::standard();

    // A's signed capture, pushed through B's per-authority circuit and key.
    let b_circuit = registry
        .build(BindingInputs::for_setup(
            TransformationDescriptor::Identity,
            KeyScope::PerAuthority,
            Some(camera_b.public_key()),
        ))
        .unwrap()
        .circuit();
    let a_assignment = registry
        .build(BindingInputs::for_proving(
            TransformationDescriptor::Identity,
            KeyScope::PerAuthority,
            camera_a.public_key(),
            encode_bytes(photo.image()).unwrap(),
            photo.proof().signature.clone(),
        ))
        .unwrap()
        .assignment()
        .unwrap();

    let cs = backend.compile(&b_circuit).unwrap();
    let (secret, _) = backend.derive_witness(&b_circuit, &a_assignment).unwrap();
    let b_pair = camera_b.key_ring().get(TransformationTag::Identity).unwrap();
    assert!(matches!(
        backend.prove(&cs, &b_pair.proving_key, &secret),
        Err(Error::Proving(_))
    ));
}

#[test]
fn test_substituted_public_key_rejected() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer(backend);

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    let (image, mut proof) = photo.into_parts();
    proof.public_key = SigningIdentity::generate().public_key();

    assert!(matches!(
        agent.verify(&Photograph::from_parts(image, proof)).unwrap(),
        Verdict::Rejected(Error::WitnessMismatch(_))
    ));
}

#[test]
fn test_empty_permissible_set_refuses_capture() {
    init_tracing();
    let mut camera = camera_with(reference_backend(), vec![], &Default::default());
    let mut source = FixedImageSource::new([RasterImage::white()]);

    let result = camera.capture(&mut source);
    assert!(matches!(result, Err(Error::UnregisteredTransformation(_))));
    assert_eq!(source.polled(), 0);
    assert!(camera.photographs().is_empty());
}

#[test]
fn test_photograph_survives_json_transport() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer(backend);

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    let json = serde_json::to_string(&photo).unwrap();
    let received: Photograph = serde_json::from_str(&json).unwrap();

    assert_eq!(received, photo);
    assert!(agent.verify(&received).unwrap().is_valid());
}

#[test]
fn test_reference_backend_refused_by_config() {
    init_tracing();
    let backend = reference_backend();
    let mut camera = identity_camera(backend.clone());
    let agent = viewer_with(
        backend,
        VerifierConfig {
            accept_reference_backend: false,
            ..VerifierConfig::default()
        },
    );

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    assert!(!agent.verify(&photo).unwrap().is_valid());
}
