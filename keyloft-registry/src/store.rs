//! Storage abstraction for license and activation records.

use crate::entities::{Activation, License};
use crate::error::RegistryResult;
use chrono::{DateTime, Utc};
use keyloft_types::LicenseId;

/// Persistence collaborator for the registry.
///
/// Implementations must enforce two invariants atomically, rejecting the
/// losing writer with
/// [`RegistryError::Conflict`](crate::RegistryError::Conflict) even under
/// concurrent callers:
///
/// - `license_key` is unique across all licenses
/// - at most one license has `is_active = true`
pub trait LicenseStore {
    /// Persists a new license, enforcing both invariants.
    fn insert_license(&self, license: License) -> RegistryResult<License>;

    /// Looks up a license by id.
    fn license_by_id(&self, id: LicenseId) -> RegistryResult<Option<License>>;

    /// Looks up a license by canonical hex key.
    fn license_by_key(&self, license_key: &str) -> RegistryResult<Option<License>>;

    /// Returns the currently active license, if any.
    fn active_license(&self) -> RegistryResult<Option<License>>;

    /// Flips a license's active flag, enforcing the single-active
    /// invariant when activating. Idempotent when the flag already has
    /// the requested value.
    fn set_license_active(&self, id: LicenseId, active: bool) -> RegistryResult<License>;

    /// Returns all licenses in creation order.
    fn list_licenses(&self) -> RegistryResult<Vec<License>>;

    /// Persists a new activation record.
    fn insert_activation(&self, activation: Activation) -> RegistryResult<Activation>;

    /// Returns all activations for a license and machine pair.
    fn activations_for(
        &self,
        license_id: LicenseId,
        machine_id: &str,
    ) -> RegistryResult<Vec<Activation>>;

    /// Returns all activations recorded for a license.
    fn list_activations(&self, license_id: LicenseId) -> RegistryResult<Vec<Activation>>;

    /// Marks every active activation for the pair inactive, stamping
    /// `deactivated_at` with `when`. Returns how many records changed;
    /// idempotent.
    fn deactivate_activations(
        &self,
        license_id: LicenseId,
        machine_id: &str,
        when: DateTime<Utc>,
    ) -> RegistryResult<usize>;
}
