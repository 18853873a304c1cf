//! Ed25519 signing and verifying contexts.
//!
//! Keys are exchanged as PEM: PKCS#8 for the private key, SubjectPublicKeyInfo
//! for the public key. The private key never leaves the issuing authority.

use crate::error::{ActivationError, ActivationResult};
use crate::message::activation_message;
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{
    spki, DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey,
};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use keyloft_keys::normalize;
use rand::rngs::OsRng;

/// Length of a hex-encoded Ed25519 signature (64 raw bytes).
const SIGNATURE_HEX_LEN: usize = ed25519_dalek::SIGNATURE_LENGTH * 2;

/// Authority-side signing state: the Ed25519 private key.
///
/// Construct one at startup and pass it by reference. It must never ship
/// in a client deployment; clients get only the matching
/// [`VerifyingContext`].
pub struct SigningContext {
    key: SigningKey,
}

impl SigningContext {
    /// Creates a context from a raw 32-byte secret key.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(bytes),
        }
    }

    /// Loads a context from a PKCS#8 PEM private key.
    ///
    /// # Errors
    ///
    /// [`ActivationError::KeyType`] when the container holds a key of
    /// another algorithm; [`ActivationError::InvalidPem`] when the
    /// container itself is malformed.
    pub fn from_pkcs8_pem(pem: &str) -> ActivationResult<Self> {
        match SigningKey::from_pkcs8_pem(pem) {
            Ok(key) => Ok(Self { key }),
            Err(ed25519_dalek::pkcs8::Error::PublicKey(err)) => {
                Err(ActivationError::KeyType(err.to_string()))
            }
            Err(err) => Err(ActivationError::InvalidPem(err.to_string())),
        }
    }

    /// Exports the private key as PKCS#8 PEM.
    ///
    /// # Errors
    ///
    /// Fails only if PKCS#8 serialization itself fails.
    pub fn to_pkcs8_pem(&self) -> ActivationResult<String> {
        let pem = self
            .key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| ActivationError::PemEncode(e.to_string()))?;
        Ok(pem.to_string())
    }

    /// Signs an activation for `(license_key, machine_id)`.
    ///
    /// The license key may be in either presentation; it is normalized to
    /// canonical hex before the message is built, so equivalent inputs
    /// produce the identical signature. Ed25519 signing is deterministic:
    /// repeated calls with the same inputs return the same 128-character
    /// lowercase hex signature.
    ///
    /// # Errors
    ///
    /// Propagates the codec error when the license key fails to decode.
    pub fn sign(&self, license_key: &str, machine_id: &str) -> ActivationResult<String> {
        let canonical = normalize(license_key)?;
        let message = activation_message(&canonical, machine_id);
        let signature = self.key.sign(&message);
        Ok(hex::encode(signature.to_bytes()))
    }

    /// Returns the matching verifying context.
    #[must_use]
    pub fn verifying_context(&self) -> VerifyingContext {
        VerifyingContext {
            key: self.key.verifying_key(),
        }
    }
}

impl std::fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningContext")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Client-side verification state: the Ed25519 public key.
#[derive(Debug, Clone)]
pub struct VerifyingContext {
    key: VerifyingKey,
}

impl VerifyingContext {
    /// Creates a context from a raw 32-byte public key.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are not a valid Ed25519 public key.
    pub fn from_bytes(bytes: &[u8; 32]) -> ActivationResult<Self> {
        VerifyingKey::from_bytes(bytes)
            .map(|key| Self { key })
            .map_err(|e| ActivationError::InvalidKey(e.to_string()))
    }

    /// Loads a context from a SubjectPublicKeyInfo PEM public key.
    ///
    /// # Errors
    ///
    /// [`ActivationError::KeyType`] when the container holds a key of
    /// another algorithm; [`ActivationError::InvalidPem`] when the
    /// container itself is malformed.
    pub fn from_public_key_pem(pem: &str) -> ActivationResult<Self> {
        match VerifyingKey::from_public_key_pem(pem) {
            Ok(key) => Ok(Self { key }),
            Err(spki::Error::OidUnknown { oid }) => {
                Err(ActivationError::KeyType(format!("algorithm {oid}")))
            }
            Err(err) => Err(ActivationError::InvalidPem(err.to_string())),
        }
    }

    /// Exports the public key as SubjectPublicKeyInfo PEM.
    ///
    /// # Errors
    ///
    /// Fails only if SPKI serialization itself fails.
    pub fn to_public_key_pem(&self) -> ActivationResult<String> {
        self.key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| ActivationError::PemEncode(e.to_string()))
    }

    /// Returns the raw 32-byte public key, for embedding in clients.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.key.to_bytes()
    }

    /// Checks an activation proof.
    ///
    /// Normalizes the license key first, so a word-format key verifies
    /// identically to its hex form. Returns `false` for any malformed
    /// input, decode failure, or signature mismatch; the reason is
    /// deliberately not distinguished.
    #[must_use]
    pub fn verify(&self, license_key: &str, machine_id: &str, activation_key_hex: &str) -> bool {
        let Ok(canonical) = normalize(license_key) else {
            return false;
        };
        let Some(signature) = decode_signature(activation_key_hex) else {
            return false;
        };
        let message = activation_message(&canonical, machine_id);
        self.key.verify(&message, &signature).is_ok()
    }
}

fn decode_signature(hex_input: &str) -> Option<Signature> {
    let trimmed = hex_input.trim();
    if trimmed.len() != SIGNATURE_HEX_LEN {
        return None;
    }
    let decoded = hex::decode(trimmed).ok()?;
    let bytes: [u8; ed25519_dalek::SIGNATURE_LENGTH] = decoded.try_into().ok()?;
    Some(Signature::from_bytes(&bytes))
}

/// Generates a fresh Ed25519 key pair as
/// `(private PKCS#8 PEM, public SubjectPublicKeyInfo PEM)`.
///
/// One-time bootstrap for a new authority; not part of steady-state
/// operation.
///
/// # Errors
///
/// Fails only if PEM serialization fails.
pub fn generate_keypair() -> ActivationResult<(String, String)> {
    let context = SigningContext {
        key: SigningKey::generate(&mut OsRng),
    };
    let private_pem = context.to_pkcs8_pem()?;
    let public_pem = context.verifying_context().to_public_key_pem()?;
    Ok((private_pem, public_pem))
}
