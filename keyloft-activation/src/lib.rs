//! Machine-bound activation signing and verification for Keyloft.
//!
//! An activation is an Ed25519 signature binding one license key to one
//! machine. The authority holds the private key and signs; clients embed
//! only the public key and verify offline on every startup, without
//! contacting the authority again.
//!
//! # Design principles
//!
//! - **Explicit key state**: keys live in [`SigningContext`] /
//!   [`VerifyingContext`] values constructed once at startup and passed by
//!   reference, never in process globals.
//! - **Domain separation**: every signed message starts with a versioned
//!   protocol prefix, keeping activation signatures distinct from any
//!   other use of the same key pair.
//! - **Opaque failure**: [`VerifyingContext::verify`] answers `false` for
//!   every failure without saying why, so a failed check cannot be used
//!   as an oracle for what exactly was wrong.

mod context;
mod error;
mod message;

pub use context::{generate_keypair, SigningContext, VerifyingContext};
pub use error::{ActivationError, ActivationResult};
pub use message::{activation_message, ACTIVATION_DOMAIN_V1};
