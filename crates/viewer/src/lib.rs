//! Verification side of PhotoProof.
//!
//! A [`VerificationAgent`] checks a photograph using only public material:
//! the image, the signer's public key, and the proof's verifying key.

pub mod agent;

pub use agent::{VerificationAgent, Verdict};
