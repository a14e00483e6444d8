//! Configuration management for PhotoProof.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keygen: KeygenConfig,
    pub verifier: VerifierConfig,
    pub logging: LoggingConfig,
}

/// Whether proving/verifying keys are tied to one capture authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyScope {
    /// The signer's public key is bound into every circuit; keys are per authority.
    #[default]
    PerAuthority,
    /// The signer's public key is only a public input; keys may be reused
    /// across authorities. Must be opted into explicitly.
    Shared,
}

impl KeyScope {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyScope::PerAuthority => "per-authority",
            KeyScope::Shared => "shared",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeygenConfig {
    pub scope: KeyScope,
    /// Run setup for independent transformations on worker threads.
    pub parallel: bool,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            scope: KeyScope::PerAuthority,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Compare the recomputed public witness with the embedded one before
    /// running the backend check.
    pub compare_embedded_witness: bool,
    /// Accept proofs from backends that are not production grade.
    pub accept_reference_backend: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            compare_embedded_witness: true,
            accept_reference_backend: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn default_config() -> Self {
        Self::default()
    }
}
