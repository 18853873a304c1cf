//! In-memory store, for tests and embedding.

use crate::entities::{Activation, License};
use crate::error::{RegistryError, RegistryResult};
use crate::store::LicenseStore;
use chrono::{DateTime, Utc};
use keyloft_types::LicenseId;
use std::sync::Mutex;

/// A [`LicenseStore`] holding everything in process memory.
///
/// Every check-and-write runs under one mutex, so the invariants hold
/// under concurrent callers just as they do for the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    licenses: Vec<License>,
    activations: Vec<Activation>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LicenseStore for MemoryStore {
    fn insert_license(&self, license: License) -> RegistryResult<License> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .licenses
            .iter()
            .any(|l| l.license_key == license.license_key)
        {
            return Err(RegistryError::Conflict(
                "license key already issued".to_string(),
            ));
        }
        if license.is_active && inner.licenses.iter().any(|l| l.is_active) {
            return Err(RegistryError::Conflict(
                "another license is already active".to_string(),
            ));
        }
        inner.licenses.push(license.clone());
        Ok(license)
    }

    fn license_by_id(&self, id: LicenseId) -> RegistryResult<Option<License>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.licenses.iter().find(|l| l.id == id).cloned())
    }

    fn license_by_key(&self, license_key: &str) -> RegistryResult<Option<License>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .licenses
            .iter()
            .find(|l| l.license_key == license_key)
            .cloned())
    }

    fn active_license(&self) -> RegistryResult<Option<License>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.licenses.iter().find(|l| l.is_active).cloned())
    }

    fn set_license_active(&self, id: LicenseId, active: bool) -> RegistryResult<License> {
        let mut inner = self.inner.lock().unwrap();
        if active && inner.licenses.iter().any(|l| l.is_active && l.id != id) {
            return Err(RegistryError::Conflict(
                "another license is already active".to_string(),
            ));
        }
        let license = inner
            .licenses
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| RegistryError::NotFound(format!("license {id}")))?;
        license.is_active = active;
        Ok(license.clone())
    }

    fn list_licenses(&self) -> RegistryResult<Vec<License>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.licenses.clone())
    }

    fn insert_activation(&self, activation: Activation) -> RegistryResult<Activation> {
        let mut inner = self.inner.lock().unwrap();
        inner.activations.push(activation.clone());
        Ok(activation)
    }

    fn activations_for(
        &self,
        license_id: LicenseId,
        machine_id: &str,
    ) -> RegistryResult<Vec<Activation>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .activations
            .iter()
            .filter(|a| a.license_id == license_id && a.machine_id == machine_id)
            .cloned()
            .collect())
    }

    fn list_activations(&self, license_id: LicenseId) -> RegistryResult<Vec<Activation>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .activations
            .iter()
            .filter(|a| a.license_id == license_id)
            .cloned()
            .collect())
    }

    fn deactivate_activations(
        &self,
        license_id: LicenseId,
        machine_id: &str,
        when: DateTime<Utc>,
    ) -> RegistryResult<usize> {
        let mut inner = self.inner.lock().unwrap();
        let mut changed = 0;
        for activation in inner.activations.iter_mut().filter(|a| {
            a.license_id == license_id && a.machine_id == machine_id && a.is_active
        }) {
            activation.is_active = false;
            activation.deactivated_at = Some(when);
            changed += 1;
        }
        Ok(changed)
    }
}
