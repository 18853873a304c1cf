//! Error types for license key encoding.

use thiserror::Error;

/// Errors produced while encoding or decoding license keys.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Hex input is not exactly the canonical length.
    #[error("license key must be {expected} hex characters, got {actual}")]
    HexLength { expected: usize, actual: usize },

    /// Hex input contains a non-hexadecimal character.
    #[error("license key contains a non-hex character: {0:?}")]
    InvalidHex(String),

    /// Word input does not contain exactly one word per key byte.
    #[error("license key must contain {expected} words, got {actual}")]
    WordCount { expected: usize, actual: usize },

    /// A word is not present in the dictionary.
    #[error("unknown word in license key: {0:?}")]
    UnknownWord(String),

    /// The dictionary has fewer entries than one per byte value.
    #[error("word dictionary needs at least {required} words, got {actual}")]
    DictionaryTooSmall { required: usize, actual: usize },

    /// The dictionary repeats a word within its significant range.
    #[error("word dictionary repeats {word:?} within its first {range} entries")]
    DuplicateWord { word: String, range: usize },
}

/// Result type for key encoding operations.
pub type KeyResult<T> = Result<T, KeyError>;
