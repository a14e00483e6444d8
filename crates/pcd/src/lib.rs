//! Proof-carrying-data orchestration for photograph provenance.
//!
//! # Core Concepts
//!
//! - **Transformation**: a permissible edit, identified by tag
//! - **Binding**: turns a transformation and its inputs into a circuit and
//!   an input assignment
//! - **Registry**: explicit tag-to-constructor map, checked for coverage
//!   before any key generation
//! - **Key Ring**: one proving/verifying key pair per permissible tag
//! - **Proof**: the public record a verifier checks

pub mod identity;
pub mod keygen;
pub mod proof;
pub mod registry;
pub mod transformation;

pub use identity::IdentityTransformation;
pub use keygen::{KeyGenerator, KeyPair, KeyRing};
pub use proof::Proof;
pub use registry::{BindingConstructor, TransformationRegistry};
pub use transformation::{
    BindingInputs, TransformationBinding, TransformationDescriptor, TransformationTag,
};
