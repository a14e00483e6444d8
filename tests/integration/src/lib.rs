//! End-to-end tests for PhotoProof
//!
//! This test suite validates:
//! - Capture, signing, and proving on a capture authority
//! - Independent verification by a separate agent
//! - Rejection of edited images and mismatched key material
//! - Key scope handling and reproducible setup

pub mod test_utils;

#[cfg(test)]
mod provenance_tests;

#[cfg(test)]
mod key_scope_tests;
