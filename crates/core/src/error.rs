//! Error taxonomy shared by every PhotoProof crate.
//!
//! Each variant names the stage that failed. Capture and key generation
//! surface these directly; verification folds cryptographic failures into a
//! rejected verdict and only returns an error for unusable input.

use thiserror::Error;

/// Core error type for PhotoProof
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or undersized image, key, or witness material
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The signature primitive refused to sign or the key material is unusable
    #[error("Signing error: {0}")]
    Signing(String),

    /// The proving backend rejected a circuit description
    #[error("Circuit compile error: {0}")]
    CircuitCompile(String),

    /// Setup failed for a permissible transformation
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Proof generation failed (unsatisfied constraints, key/circuit mismatch)
    #[error("Proving error: {0}")]
    Proving(String),

    /// Recomputed public witness differs from the one carried in a proof
    #[error("Witness mismatch: {0}")]
    WitnessMismatch(String),

    /// The backend's proof check failed or errored
    #[error("Verification error: {0}")]
    Verification(String),

    /// No key pair or binding constructor exists for the requested transformation
    #[error("Unregistered transformation: {0}")]
    UnregisteredTransformation(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Short, stable name of the variant for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Encoding(_) => "encoding",
            Error::Signing(_) => "signing",
            Error::CircuitCompile(_) => "circuit_compile",
            Error::KeyGeneration(_) => "key_generation",
            Error::Proving(_) => "proving",
            Error::WitnessMismatch(_) => "witness_mismatch",
            Error::Verification(_) => "verification",
            Error::UnregisteredTransformation(_) => "unregistered_transformation",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for PhotoProof operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_stage_and_detail() {
        let err = Error::UnregisteredTransformation("identity".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Unregistered transformation"));
        assert!(msg.contains("identity"));
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(Error::WitnessMismatch(String::new()).kind(), "witness_mismatch");
        assert_eq!(Error::KeyGeneration(String::new()).kind(), "key_generation");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(msg) if msg.contains("missing.toml")));
    }
}
