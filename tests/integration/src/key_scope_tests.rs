//! Key scope and setup reproducibility

use photoproof_camera::{CaptureAuthority, Photograph};
use photoproof_core::{Config, KeyScope, KeygenConfig};
use photoproof_identity::{KeyProvider, SoftwareKeyProvider};
use photoproof_image::RandomImageSource;
use photoproof_pcd::{KeyGenerator, TransformationDescriptor, TransformationRegistry, TransformationTag};
use photoproof_viewer::Verdict;

use crate::test_utils::*;

#[test]
fn test_seeded_setup_is_reproducible() {
    init_tracing();
    let provision = || {
        SoftwareKeyProvider::seeded(7)
            .provision()
            .expect("seeded provisioning")
    };
    let a = CaptureAuthority::new(
        provision(),
        vec![TransformationDescriptor::Identity],
        seeded_backend(9),
        &KeygenConfig::default(),
    )
    .unwrap();
    let b = CaptureAuthority::new(
        provision(),
        vec![TransformationDescriptor::Identity],
        seeded_backend(9),
        &KeygenConfig {
            parallel: false,
            ..KeygenConfig::default()
        },
    )
    .unwrap();

    assert_eq!(a.public_key(), b.public_key());
    let vk = |c: &CaptureAuthority| {
        c.key_ring()
            .get(TransformationTag::Identity)
            .map(|pair| pair.verifying_key.clone())
    };
    assert_eq!(vk(&a), vk(&b));
}

#[test]
fn test_shared_keys_across_authorities() {
    init_tracing();
    let backend = reference_backend();
    let shared = KeyGenerator::new(
        backend.clone(),
        TransformationRegistry::standard(),
        KeygenConfig::default(),
    )
    .generate_shared(&[TransformationDescriptor::Identity])
    .unwrap();

    let agent = viewer(backend.clone());
    for _ in 0..2 {
        let mut camera = CaptureAuthority::with_shared_keys(
            SoftwareKeyProvider::new().provision().unwrap(),
            vec![TransformationDescriptor::Identity],
            backend.clone(),
            shared.clone(),
        )
        .unwrap();
        let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
        assert_eq!(photo.proof().key_scope, KeyScope::Shared);
        assert_eq!(agent.verify(&photo).unwrap(), Verdict::Valid);
    }
}

#[test]
fn test_shared_scope_from_toml_config() {
    init_tracing();
    let config = Config::from_toml_str(
        r#"
        [keygen]
        scope = "shared"
        parallel = false
        "#,
    )
    .unwrap();
    assert_eq!(config.keygen.scope, KeyScope::Shared);

    let backend = reference_backend();
    let mut camera = camera_with(
        backend.clone(),
        vec![TransformationDescriptor::Identity],
        &config.keygen,
    );
    assert_eq!(camera.key_ring().scope(), KeyScope::Shared);

    let photo = camera.capture(&mut RandomImageSource::new()).unwrap();
    assert!(viewer_with(backend, config.verifier).verify(&photo).unwrap().is_valid());
}

#[test]
fn test_verifying_key_from_other_scope_rejected() {
    init_tracing();
    let backend = reference_backend();
    let mut per_authority = identity_camera(backend.clone());
    let mut shared = camera_with(
        backend.clone(),
        vec![TransformationDescriptor::Identity],
        &KeygenConfig {
            scope: KeyScope::Shared,
            ..KeygenConfig::default()
        },
    );
    let agent = viewer(backend);

    let photo = per_authority.capture(&mut RandomImageSource::new()).unwrap();
    let other = shared.capture(&mut RandomImageSource::new()).unwrap();

    let (image, mut proof) = photo.into_parts();
    proof.verifying_key = other.proof().verifying_key.clone();
    assert!(!agent
        .verify(&Photograph::from_parts(image, proof))
        .unwrap()
        .is_valid());
}
