//! Persisted license and activation records.

use chrono::{DateTime, Utc};
use keyloft_types::{ActivationId, LicenseId};
use serde::{Deserialize, Serialize};

/// One issued license.
///
/// `license_key` is the canonical lowercase hex presentation and is
/// unique across the registry. At most one license may be active at any
/// time, registry-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: LicenseId,
    pub license_key: String,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    pub notes: Option<String>,
}

impl License {
    /// Creates a new active license around a canonical hex key.
    #[must_use]
    pub fn new(
        license_key: String,
        customer_name: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: LicenseId::new(),
            license_key,
            customer_name,
            created_at: Utc::now(),
            is_active: true,
            notes,
        }
    }
}

/// One signed, machine-bound activation of a license.
///
/// Rows are never deleted; deactivation flips `is_active` and stamps
/// `deactivated_at`, keeping the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub id: ActivationId,
    pub license_id: LicenseId,
    pub machine_id: String,
    pub activation_key: String,
    pub activated_at: DateTime<Utc>,
    pub is_active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl Activation {
    /// Creates a new active activation carrying a signature.
    #[must_use]
    pub fn new(license_id: LicenseId, machine_id: &str, activation_key: String) -> Self {
        Self {
            id: ActivationId::new(),
            license_id,
            machine_id: machine_id.to_string(),
            activation_key,
            activated_at: Utc::now(),
            is_active: true,
            deactivated_at: None,
        }
    }
}
