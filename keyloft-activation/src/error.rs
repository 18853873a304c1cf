//! Error types for activation signing.

use thiserror::Error;

/// Errors produced while loading key material or signing activations.
///
/// Verification failure is deliberately not represented here: the verify
/// path answers a plain `bool` so callers cannot distinguish why a proof
/// was rejected.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// The key container is well formed but holds a non-Ed25519 key.
    #[error("key is not Ed25519: {0}")]
    KeyType(String),

    /// The PEM container itself could not be parsed.
    #[error("invalid key PEM: {0}")]
    InvalidPem(String),

    /// Raw key bytes do not form a valid Ed25519 key.
    #[error("invalid key bytes: {0}")]
    InvalidKey(String),

    /// The license key input failed to decode.
    #[error(transparent)]
    Format(#[from] keyloft_keys::KeyError),

    /// Key material could not be serialized to PEM.
    #[error("failed to encode key PEM: {0}")]
    PemEncode(String),
}

/// Result type for activation operations.
pub type ActivationResult<T> = Result<T, ActivationError>;
