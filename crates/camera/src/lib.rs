//! Capture side of PhotoProof.
//!
//! A [`CaptureAuthority`] owns a signing identity and the keys for its
//! permissible transformations. Capturing polls an image source, signs the
//! canonical encoding, proves the identity transformation, and records the
//! resulting [`Photograph`].

pub mod authority;
pub mod photograph;

pub use authority::CaptureAuthority;
pub use photograph::Photograph;
