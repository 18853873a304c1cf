//! Core identifier types for the Keyloft licensing authority.
//!
//! Uses UUID v7 for time-ordered, globally unique identifiers.

mod ids;

pub use ids::{ActivationId, LicenseId};
