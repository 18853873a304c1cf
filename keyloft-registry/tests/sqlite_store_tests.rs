mod common;

use common::registry_over;
use keyloft_registry::{License, LicenseStore, RegistryError, SqliteStore};

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

// ── Registry flows over SQLite ───────────────────────────────────

#[test]
fn issue_activate_validate_over_sqlite() {
    let registry = registry_over(store());
    let license = registry.issue(Some("Acme Corp".to_string()), None).unwrap();
    let activation = registry.activate(&license.license_key, "machine-1").unwrap();
    assert!(registry.validate(&license.license_key, "machine-1", &activation.activation_key));
    assert!(!registry.validate(&license.license_key, "machine-2", &activation.activation_key));
}

#[test]
fn single_active_invariant_over_sqlite() {
    let registry = registry_over(store());
    let first = registry.issue(None, None).unwrap();
    assert!(matches!(
        registry.issue(None, None),
        Err(RegistryError::Conflict(_))
    ));
    registry.revoke(first.id).unwrap();
    registry.issue(None, None).unwrap();
}

#[test]
fn revoked_activation_rejected_over_sqlite() {
    let registry = registry_over(store());
    let license = registry.issue(None, None).unwrap();
    let activation = registry.activate(&license.license_key, "machine-1").unwrap();
    registry.deactivate(license.id, "machine-1").unwrap();
    assert!(!registry.validate(&license.license_key, "machine-1", &activation.activation_key));
    let rows = registry.activations(license.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].deactivated_at.is_some());
}

// ── Store-level invariants ───────────────────────────────────────

#[test]
fn duplicate_license_key_conflicts() {
    let store = store();
    let license = License::new("ab".repeat(64), None, None);
    let mut duplicate = License::new(license.license_key.clone(), None, None);
    duplicate.is_active = false;
    store.insert_license(license).unwrap();
    assert!(matches!(
        store.insert_license(duplicate),
        Err(RegistryError::Conflict(_))
    ));
}

#[test]
fn second_active_insert_conflicts() {
    let store = store();
    store.insert_license(License::new("ab".repeat(64), None, None)).unwrap();
    assert!(matches!(
        store.insert_license(License::new("cd".repeat(64), None, None)),
        Err(RegistryError::Conflict(_))
    ));
}

#[test]
fn inactive_licenses_can_accumulate() {
    let store = store();
    for i in 0..3 {
        let mut license = License::new(format!("{i:0128x}"), None, None);
        license.is_active = false;
        store.insert_license(license).unwrap();
    }
    assert_eq!(store.list_licenses().unwrap().len(), 3);
    assert!(store.active_license().unwrap().is_none());
}

#[test]
fn set_license_active_round_trips_state() {
    let store = store();
    let license = store.insert_license(License::new("ab".repeat(64), None, None)).unwrap();
    let revoked = store.set_license_active(license.id, false).unwrap();
    assert!(!revoked.is_active);
    let restored = store.set_license_active(license.id, true).unwrap();
    assert!(restored.is_active);
}

#[test]
fn set_active_on_unknown_license_is_not_found() {
    let store = store();
    assert!(matches!(
        store.set_license_active(keyloft_types::LicenseId::new(), false),
        Err(RegistryError::NotFound(_))
    ));
}

#[test]
fn entity_fields_survive_storage() {
    let store = store();
    let license = store
        .insert_license(License::new(
            "ab".repeat(64),
            Some("Acme Corp".to_string()),
            Some("site license".to_string()),
        ))
        .unwrap();
    let loaded = store.license_by_id(license.id).unwrap().unwrap();
    assert_eq!(loaded, license);
    let by_key = store.license_by_key(&license.license_key).unwrap().unwrap();
    assert_eq!(by_key.id, license.id);
}

// ── On-disk persistence ──────────────────────────────────────────

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keyloft.db");

    let (license_id, license_key, activation_key) = {
        let registry = registry_over(SqliteStore::open(&path).unwrap());
        let license = registry.issue(Some("Acme Corp".to_string()), None).unwrap();
        let activation = registry.activate(&license.license_key, "machine-1").unwrap();
        (license.id, license.license_key, activation.activation_key)
    };

    let registry = registry_over(SqliteStore::open(&path).unwrap());
    let loaded = registry.license(license_id).unwrap().unwrap();
    assert_eq!(loaded.license_key, license_key);
    assert!(loaded.is_active);
    assert!(registry.validate(&license_key, "machine-1", &activation_key));
}
