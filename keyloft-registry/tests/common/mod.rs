//! Shared test helpers for registry tests.

#![allow(dead_code)]

use keyloft_activation::SigningContext;
use keyloft_registry::{LicenseRegistry, LicenseStore, MemoryStore};

/// Returns a deterministic signing context from a fixed seed.
pub fn test_signer() -> SigningContext {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    SigningContext::from_bytes(&seed)
}

/// Builds a registry over an empty in-memory store.
pub fn memory_registry() -> LicenseRegistry<MemoryStore> {
    LicenseRegistry::new(MemoryStore::new(), test_signer())
}

/// Builds a registry over any store.
pub fn registry_over<S: LicenseStore>(store: S) -> LicenseRegistry<S> {
    LicenseRegistry::new(store, test_signer())
}
