//! License and activation registry for Keyloft.
//!
//! Owns the persisted License and Activation records and the state
//! machine over them:
//!
//! - at most one License is active at any time, across the whole registry
//! - activations are signed proofs binding a license key to one machine
//! - revoked records are kept for the audit trail, never deleted
//!
//! Storage is a pluggable [`LicenseStore`]. [`MemoryStore`] backs tests
//! and embedding; [`SqliteStore`] persists to disk, with the database
//! enforcing the single-active invariant as a backstop behind the
//! transactional checks.

mod entities;
mod error;
mod memory;
mod registry;
mod sqlite;
mod store;

pub use entities::{Activation, License};
pub use error::{RegistryError, RegistryResult};
pub use memory::MemoryStore;
pub use registry::LicenseRegistry;
pub use sqlite::SqliteStore;
pub use store::LicenseStore;
