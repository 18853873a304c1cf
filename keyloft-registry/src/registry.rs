//! The license registry state machine.

use crate::entities::{Activation, License};
use crate::error::{RegistryError, RegistryResult};
use crate::store::LicenseStore;
use chrono::Utc;
use keyloft_activation::{SigningContext, VerifyingContext};
use keyloft_keys::{normalize, CanonicalKey};
use keyloft_types::LicenseId;
use tracing::{info, warn};

/// Authority-side owner of the license and activation lifecycle.
///
/// Holds the persistence collaborator together with an explicit signing
/// context; the matching verifying context is derived once at
/// construction for [`validate`](Self::validate).
pub struct LicenseRegistry<S> {
    store: S,
    signer: SigningContext,
    verifier: VerifyingContext,
}

impl<S: LicenseStore> LicenseRegistry<S> {
    /// Creates a registry over `store`, signing with `signer`.
    #[must_use]
    pub fn new(store: S, signer: SigningContext) -> Self {
        let verifier = signer.verifying_context();
        Self {
            store,
            signer,
            verifier,
        }
    }

    /// Issues a fresh license in the active state.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Conflict`] while another license is active;
    /// revoke that one first.
    pub fn issue(
        &self,
        customer_name: Option<String>,
        notes: Option<String>,
    ) -> RegistryResult<License> {
        let key = CanonicalKey::random();
        let license = self
            .store
            .insert_license(License::new(key.to_hex(), customer_name, notes))?;
        info!(license_id = %license.id, "issued license");
        Ok(license)
    }

    /// Revokes a license. Idempotent when already inactive.
    ///
    /// Revocation does not touch existing activation records; it only
    /// frees the single active slot for a future license.
    pub fn revoke(&self, id: LicenseId) -> RegistryResult<License> {
        let license = self.store.set_license_active(id, false)?;
        info!(license_id = %id, "revoked license");
        Ok(license)
    }

    /// Reinstates a revoked license, subject to the single-active
    /// invariant. Idempotent when already active.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Conflict`] when a different license is active.
    pub fn reinstate(&self, id: LicenseId) -> RegistryResult<License> {
        let license = self.store.set_license_active(id, true)?;
        info!(license_id = %id, "reinstated license");
        Ok(license)
    }

    /// Signs and records an activation binding `license_key` (either
    /// presentation) to `machine_id`.
    ///
    /// The referenced license must exist; its active flag is not
    /// consulted. Re-activating the same machine records a new proof
    /// without revoking the old one.
    pub fn activate(&self, license_key: &str, machine_id: &str) -> RegistryResult<Activation> {
        let canonical = normalize(license_key)?;
        let license = self
            .store
            .license_by_key(&canonical)?
            .ok_or_else(|| RegistryError::NotFound("license key not issued".to_string()))?;
        let activation_key = self.signer.sign(&canonical, machine_id)?;
        let activation = self
            .store
            .insert_activation(Activation::new(license.id, machine_id, activation_key))?;
        info!(
            license_id = %license.id,
            activation_id = %activation.id,
            "recorded activation"
        );
        Ok(activation)
    }

    /// Deactivates every active activation for the pair, stamping
    /// `deactivated_at`. Returns how many records changed; idempotent.
    pub fn deactivate(&self, license_id: LicenseId, machine_id: &str) -> RegistryResult<usize> {
        let changed = self
            .store
            .deactivate_activations(license_id, machine_id, Utc::now())?;
        info!(license_id = %license_id, changed, "deactivated activations");
        Ok(changed)
    }

    /// Checks an activation proof against both the persisted activation
    /// state and the signature.
    ///
    /// A cryptographically valid signature whose activation was revoked,
    /// or never recorded, is rejected. Returns `false` for every failure
    /// without distinguishing the reason.
    #[must_use]
    pub fn validate(&self, license_key: &str, machine_id: &str, activation_key: &str) -> bool {
        let Ok(canonical) = normalize(license_key) else {
            return false;
        };
        let Ok(Some(license)) = self.store.license_by_key(&canonical) else {
            return false;
        };
        let offered = activation_key.trim().to_ascii_lowercase();
        let recorded = match self.store.activations_for(license.id, machine_id) {
            Ok(rows) => rows
                .iter()
                .any(|a| a.is_active && a.activation_key == offered),
            Err(err) => {
                warn!(license_id = %license.id, error = %err, "activation lookup failed");
                return false;
            }
        };
        recorded && self.verifier.verify(&canonical, machine_id, &offered)
    }

    /// Looks up a license by id.
    pub fn license(&self, id: LicenseId) -> RegistryResult<Option<License>> {
        self.store.license_by_id(id)
    }

    /// Looks up a license by key, accepting either presentation.
    pub fn find_by_key(&self, license_key: &str) -> RegistryResult<Option<License>> {
        let canonical = normalize(license_key)?;
        self.store.license_by_key(&canonical)
    }

    /// Returns the currently active license, if any.
    pub fn active_license(&self) -> RegistryResult<Option<License>> {
        self.store.active_license()
    }

    /// Returns all licenses in creation order.
    pub fn licenses(&self) -> RegistryResult<Vec<License>> {
        self.store.list_licenses()
    }

    /// Returns all activations recorded for a license.
    pub fn activations(&self, license_id: LicenseId) -> RegistryResult<Vec<Activation>> {
        self.store.list_activations(license_id)
    }

    /// The verifying context clients embed.
    #[must_use]
    pub fn verifying_context(&self) -> &VerifyingContext {
        &self.verifier
    }
}
