//! Canonical key representation and the hex codec.

use crate::error::{KeyError, KeyResult};
use crate::words::Dictionary;
use serde::{Deserialize, Serialize};

/// Size of a canonical license key in bytes.
pub const KEY_LEN: usize = 64;

/// Length of the hex presentation (two characters per byte).
pub const HEX_LEN: usize = KEY_LEN * 2;

/// The textual presentation of a license key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// 128 lowercase hexadecimal characters.
    Hex,
    /// 64 dictionary words in 16 hyphen-joined groups of 4.
    Word,
}

impl KeyFormat {
    /// Guesses the presentation of `input`.
    ///
    /// A string of exactly 128 hexadecimal characters is hex; anything
    /// else, in particular anything containing `-` or a space, is treated
    /// as word input. This is a best-effort heuristic for user-supplied
    /// text. Callers that know the format should use
    /// [`CanonicalKey::from_hex`] or [`CanonicalKey::from_words`] and skip
    /// the guess.
    #[must_use]
    pub fn detect(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.len() == HEX_LEN && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::Hex
        } else {
            Self::Word
        }
    }
}

/// A canonical 64-byte license key.
///
/// The byte value is the license's permanent identity; both textual
/// presentations round-trip losslessly through it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    bytes: [u8; KEY_LEN],
}

impl CanonicalKey {
    /// Creates a key from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Parses a key from its hex presentation.
    ///
    /// # Errors
    ///
    /// Fails unless the input is exactly 128 hexadecimal characters
    /// (either case).
    pub fn from_hex(input: &str) -> KeyResult<Self> {
        let trimmed = input.trim();
        if trimmed.len() != HEX_LEN {
            return Err(KeyError::HexLength {
                expected: HEX_LEN,
                actual: trimmed.len(),
            });
        }
        let decoded =
            hex::decode(trimmed).map_err(|_| KeyError::InvalidHex(trimmed.to_string()))?;
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self { bytes })
    }

    /// Parses a key from its word presentation using `dictionary`.
    ///
    /// # Errors
    ///
    /// Fails if the token count is not 64 or a token is not in the
    /// dictionary.
    pub fn from_words(input: &str, dictionary: &Dictionary) -> KeyResult<Self> {
        dictionary.decode(input)
    }

    /// Parses either presentation, dispatching on [`KeyFormat::detect`].
    pub fn parse(input: &str, dictionary: &Dictionary) -> KeyResult<Self> {
        match KeyFormat::detect(input) {
            KeyFormat::Hex => Self::from_hex(input),
            KeyFormat::Word => Self::from_words(input, dictionary),
        }
    }

    /// Returns the canonical lowercase hex presentation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the word presentation using `dictionary`.
    #[must_use]
    pub fn to_words(&self, dictionary: &Dictionary) -> String {
        dictionary.encode(self)
    }
}

impl std::fmt::Debug for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CanonicalKey({}..)", &self.to_hex()[..8])
    }
}

/// Converts either presentation of a license key to canonical lowercase
/// hex, using the embedded dictionary for word input.
///
/// # Errors
///
/// Propagates the codec error when the input is neither valid hex nor a
/// valid word encoding.
pub fn normalize(input: &str) -> KeyResult<String> {
    let key = CanonicalKey::parse(input, Dictionary::embedded())?;
    Ok(key.to_hex())
}
