//! Core functionality for the PhotoProof provenance system.
//!
//! This crate provides the error taxonomy, configuration, and logging setup
//! used across the PhotoProof crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, KeyScope, KeygenConfig, LoggingConfig, VerifierConfig};
pub use error::{Error, Result};
