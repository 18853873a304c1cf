//! License key encoding and generation for Keyloft.
//!
//! A license key is 64 bytes of entropy with two lossless textual
//! presentations:
//!
//! - **Hex**: 128 lowercase hexadecimal characters.
//! - **Word**: 64 words from a fixed 256-word dictionary (one word per
//!   byte), arranged as 16 groups of 4 words, hyphens within a group and
//!   a single space between groups.
//!
//! The word dictionary ships with this crate as an embedded asset. Its
//! file order is the code page: reordering it would silently change the
//! meaning of every previously issued word-format key, so the asset is
//! versioned with the crate and must never be edited in place.

mod codec;
mod error;
mod forge;
mod words;

pub use codec::{normalize, CanonicalKey, KeyFormat, HEX_LEN, KEY_LEN};
pub use error::{KeyError, KeyResult};
pub use forge::generate_license_key;
pub use words::{Dictionary, GROUP_SIZE, WORD_COUNT};
