//! Shared test helpers for activation tests.

#![allow(dead_code)]

use keyloft_activation::{SigningContext, VerifyingContext};
use keyloft_keys::{CanonicalKey, KEY_LEN};

/// Returns a deterministic signing/verifying pair from a fixed seed.
pub fn test_contexts() -> (SigningContext, VerifyingContext) {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    let signer = SigningContext::from_bytes(&seed);
    let verifier = signer.verifying_context();
    (signer, verifier)
}

/// Returns a fixed license key for signing tests.
pub fn test_license_key() -> CanonicalKey {
    let mut bytes = [0u8; KEY_LEN];
    for (i, b) in bytes.iter_mut().enumerate() {
        *b = (255 - i) as u8;
    }
    CanonicalKey::from_bytes(bytes)
}

/// Flips the lowest bit of the hex digit at `index`.
pub fn flip_hex_digit(hex: &str, index: usize) -> String {
    let mut chars: Vec<char> = hex.chars().collect();
    let digit = chars[index].to_digit(16).expect("hex digit");
    chars[index] = char::from_digit(digit ^ 1, 16).expect("hex digit");
    chars.into_iter().collect()
}
