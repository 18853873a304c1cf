//! Error types for the registry.

use thiserror::Error;

/// Errors surfaced by registry operations.
///
/// Cryptographic verification failure is not represented here:
/// [`LicenseRegistry::validate`](crate::LicenseRegistry::validate)
/// collapses every failure to `false` with no detail.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A storage invariant was violated: duplicate license key, or a
    /// second active license.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The license key input failed to decode.
    #[error(transparent)]
    Format(#[from] keyloft_keys::KeyError),

    /// Signing failed.
    #[error(transparent)]
    Activation(#[from] keyloft_activation::ActivationError),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Store(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
