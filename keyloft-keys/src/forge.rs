//! License key generation.

use crate::codec::{CanonicalKey, KeyFormat, KEY_LEN};
use crate::words::Dictionary;
use rand::rngs::OsRng;
use rand::RngCore;

impl CanonicalKey {
    /// Draws a fresh key from the operating system's secure random source.
    ///
    /// No uniqueness check is made against previously issued keys; 512
    /// bits of entropy make a collision negligible, and the registry's
    /// storage constraint rejects one anyway.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }
}

/// Generates a fresh license key in the requested presentation.
#[must_use]
pub fn generate_license_key(format: KeyFormat) -> String {
    let key = CanonicalKey::random();
    match format {
        KeyFormat::Hex => key.to_hex(),
        KeyFormat::Word => key.to_words(Dictionary::embedded()),
    }
}
