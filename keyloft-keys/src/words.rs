//! The word presentation of license keys.
//!
//! Each byte of a key maps to one word from a 256-entry dictionary; the
//! 64 words are grouped 4 to a group, hyphens within a group and a single
//! space between groups. Decoding ignores case and also accepts a purely
//! hyphen-delimited string.

use crate::codec::{CanonicalKey, KEY_LEN};
use crate::error::{KeyError, KeyResult};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of words in one encoded key (one per byte).
pub const WORD_COUNT: usize = KEY_LEN;

/// Words per hyphen-joined group.
pub const GROUP_SIZE: usize = 4;

/// Entries of the dictionary that are semantically significant.
const CODE_PAGE_SIZE: usize = 256;

/// The embedded word list, one word per line. File order is the code
/// page: entry `n` encodes byte value `n`.
const EMBEDDED_WORDLIST: &str = include_str!("../assets/wordlist.txt");

static EMBEDDED: OnceLock<Dictionary> = OnceLock::new();

/// An ordered word dictionary mapping byte values to words.
///
/// Only the first 256 entries, in source order, are significant; that
/// order must never change once keys encoded with it have been issued.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<String>,
    index: HashMap<String, u8>,
}

impl Dictionary {
    /// Returns the dictionary embedded in this crate.
    ///
    /// # Panics
    ///
    /// Panics if the embedded word list is invalid. That is a defect in
    /// the shipped asset, surfaced the first time any word encoding runs
    /// and caught by this crate's tests; it is not recoverable by callers.
    #[must_use]
    pub fn embedded() -> &'static Self {
        EMBEDDED.get_or_init(|| {
            Self::parse(EMBEDDED_WORDLIST).expect("embedded word list is valid")
        })
    }

    /// Parses a dictionary from newline-separated words.
    ///
    /// # Errors
    ///
    /// Fails if fewer than 256 words are present, or the first 256
    /// contain a case-insensitive duplicate.
    pub fn parse(source: &str) -> KeyResult<Self> {
        let words: Vec<String> = source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if words.len() < CODE_PAGE_SIZE {
            return Err(KeyError::DictionaryTooSmall {
                required: CODE_PAGE_SIZE,
                actual: words.len(),
            });
        }

        let mut index = HashMap::with_capacity(CODE_PAGE_SIZE);
        for (value, word) in words.iter().take(CODE_PAGE_SIZE).enumerate() {
            if index.insert(word.to_uppercase(), value as u8).is_some() {
                return Err(KeyError::DuplicateWord {
                    word: word.clone(),
                    range: CODE_PAGE_SIZE,
                });
            }
        }

        Ok(Self { words, index })
    }

    /// Returns the word encoding a byte value.
    #[must_use]
    pub fn word(&self, value: u8) -> &str {
        &self.words[value as usize]
    }

    /// Looks up the byte value for a word, case-insensitively.
    #[must_use]
    pub fn value(&self, word: &str) -> Option<u8> {
        self.index.get(&word.to_uppercase()).copied()
    }

    /// Encodes a key as 16 space-separated groups of 4 hyphen-joined
    /// words.
    #[must_use]
    pub fn encode(&self, key: &CanonicalKey) -> String {
        let words: Vec<&str> = key.as_bytes().iter().map(|&b| self.word(b)).collect();
        words
            .chunks(GROUP_SIZE)
            .map(|group| group.join("-"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Decodes a word-format key.
    ///
    /// Accepts both the grouped presentation and a purely hyphen-delimited
    /// string; word lookup ignores case.
    ///
    /// # Errors
    ///
    /// Fails if the token count is not 64 or a token is unknown.
    pub fn decode(&self, input: &str) -> KeyResult<CanonicalKey> {
        let tokens: Vec<&str> = input
            .split(|c: char| c == ' ' || c == '-')
            .filter(|token| !token.is_empty())
            .collect();

        if tokens.len() != WORD_COUNT {
            return Err(KeyError::WordCount {
                expected: WORD_COUNT,
                actual: tokens.len(),
            });
        }

        let mut bytes = [0u8; KEY_LEN];
        for (slot, token) in bytes.iter_mut().zip(&tokens) {
            *slot = self
                .value(token)
                .ok_or_else(|| KeyError::UnknownWord((*token).to_string()))?;
        }

        Ok(CanonicalKey::from_bytes(bytes))
    }
}
