//! SQLite-backed store.
//!
//! Timestamps are stored as RFC 3339 text and identifiers as UUID text.
//! The single-active invariant is checked inside each transaction and
//! additionally enforced by a partial unique index, so a racing writer
//! that slips past the application check is still rejected atomically by
//! the database.

use crate::entities::{Activation, License};
use crate::error::{RegistryError, RegistryResult};
use crate::store::LicenseStore;
use chrono::{DateTime, Utc};
use keyloft_types::{ActivationId, LicenseId};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS licenses (
    id TEXT PRIMARY KEY,
    license_key TEXT NOT NULL UNIQUE,
    customer_name TEXT,
    created_at TEXT NOT NULL,
    is_active INTEGER NOT NULL,
    notes TEXT
);

-- Storage-layer backstop for the single-active invariant: at most one
-- row may carry is_active = 1.
CREATE UNIQUE INDEX IF NOT EXISTS idx_licenses_single_active
    ON licenses (is_active) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS activations (
    id TEXT PRIMARY KEY,
    license_id TEXT NOT NULL,
    machine_id TEXT NOT NULL,
    activation_key TEXT NOT NULL,
    activated_at TEXT NOT NULL,
    is_active INTEGER NOT NULL,
    deactivated_at TEXT,
    FOREIGN KEY (license_id) REFERENCES licenses (id)
);

CREATE INDEX IF NOT EXISTS idx_activations_license_machine
    ON activations (license_id, machine_id);
"#;

const LICENSE_COLUMNS: &str =
    "id, license_key, customer_name, created_at, is_active, notes";

const ACTIVATION_COLUMNS: &str =
    "id, license_id, machine_id, activation_key, activated_at, is_active, deactivated_at";

/// A [`LicenseStore`] persisting to a SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if needed) a database at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be opened or the schema cannot be
    /// applied.
    pub fn open(path: &Path) -> RegistryResult<Self> {
        let conn = Connection::open(path).map_err(sqlite_err)?;
        Self::with_connection(conn)
    }

    /// Opens a transient in-memory database.
    ///
    /// # Errors
    ///
    /// Fails when the schema cannot be applied.
    pub fn open_in_memory() -> RegistryResult<Self> {
        let conn = Connection::open_in_memory().map_err(sqlite_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> RegistryResult<Self> {
        conn.execute_batch(SCHEMA).map_err(sqlite_err)?;
        debug!("sqlite store ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl LicenseStore for SqliteStore {
    fn insert_license(&self, license: License) -> RegistryResult<License> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(sqlite_err)?;

        let duplicate: bool = tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM licenses WHERE license_key = ?1)",
                params![license.license_key],
                |row| row.get(0),
            )
            .map_err(sqlite_err)?;
        if duplicate {
            return Err(RegistryError::Conflict(
                "license key already issued".to_string(),
            ));
        }

        if license.is_active {
            let active: bool = tx
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM licenses WHERE is_active = 1)",
                    [],
                    |row| row.get(0),
                )
                .map_err(sqlite_err)?;
            if active {
                return Err(RegistryError::Conflict(
                    "another license is already active".to_string(),
                ));
            }
        }

        tx.execute(
            "INSERT INTO licenses (id, license_key, customer_name, created_at, is_active, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                license.id.to_string(),
                license.license_key,
                license.customer_name,
                license.created_at.to_rfc3339(),
                license.is_active,
                license.notes,
            ],
        )
        .map_err(sqlite_err)?;
        tx.commit().map_err(sqlite_err)?;

        debug!(license_id = %license.id, "inserted license");
        Ok(license)
    }

    fn license_by_id(&self, id: LicenseId) -> RegistryResult<Option<License>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {LICENSE_COLUMNS} FROM licenses WHERE id = ?1");
        optional(conn.query_row(&sql, params![id.to_string()], license_from_row))
    }

    fn license_by_key(&self, license_key: &str) -> RegistryResult<Option<License>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {LICENSE_COLUMNS} FROM licenses WHERE license_key = ?1");
        optional(conn.query_row(&sql, params![license_key], license_from_row))
    }

    fn active_license(&self) -> RegistryResult<Option<License>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {LICENSE_COLUMNS} FROM licenses WHERE is_active = 1");
        optional(conn.query_row(&sql, [], license_from_row))
    }

    fn set_license_active(&self, id: LicenseId, active: bool) -> RegistryResult<License> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(sqlite_err)?;

        if active {
            let other_active: bool = tx
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM licenses WHERE is_active = 1 AND id != ?1)",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .map_err(sqlite_err)?;
            if other_active {
                return Err(RegistryError::Conflict(
                    "another license is already active".to_string(),
                ));
            }
        }

        let changed = tx
            .execute(
                "UPDATE licenses SET is_active = ?2 WHERE id = ?1",
                params![id.to_string(), active],
            )
            .map_err(sqlite_err)?;
        if changed == 0 {
            return Err(RegistryError::NotFound(format!("license {id}")));
        }

        let sql = format!("SELECT {LICENSE_COLUMNS} FROM licenses WHERE id = ?1");
        let license = tx
            .query_row(&sql, params![id.to_string()], license_from_row)
            .map_err(sqlite_err)?;
        tx.commit().map_err(sqlite_err)?;

        debug!(license_id = %id, active, "updated license state");
        Ok(license)
    }

    fn list_licenses(&self) -> RegistryResult<Vec<License>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {LICENSE_COLUMNS} FROM licenses ORDER BY created_at");
        let mut stmt = conn.prepare(&sql).map_err(sqlite_err)?;
        let rows = stmt
            .query_map([], license_from_row)
            .map_err(sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_err)?;
        Ok(rows)
    }

    fn insert_activation(&self, activation: Activation) -> RegistryResult<Activation> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO activations \
             (id, license_id, machine_id, activation_key, activated_at, is_active, deactivated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                activation.id.to_string(),
                activation.license_id.to_string(),
                activation.machine_id,
                activation.activation_key,
                activation.activated_at.to_rfc3339(),
                activation.is_active,
                activation.deactivated_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(sqlite_err)?;
        debug!(activation_id = %activation.id, "inserted activation");
        Ok(activation)
    }

    fn activations_for(
        &self,
        license_id: LicenseId,
        machine_id: &str,
    ) -> RegistryResult<Vec<Activation>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {ACTIVATION_COLUMNS} FROM activations \
             WHERE license_id = ?1 AND machine_id = ?2 ORDER BY activated_at"
        );
        let mut stmt = conn.prepare(&sql).map_err(sqlite_err)?;
        let rows = stmt
            .query_map(params![license_id.to_string(), machine_id], activation_from_row)
            .map_err(sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_err)?;
        Ok(rows)
    }

    fn list_activations(&self, license_id: LicenseId) -> RegistryResult<Vec<Activation>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {ACTIVATION_COLUMNS} FROM activations \
             WHERE license_id = ?1 ORDER BY activated_at"
        );
        let mut stmt = conn.prepare(&sql).map_err(sqlite_err)?;
        let rows = stmt
            .query_map(params![license_id.to_string()], activation_from_row)
            .map_err(sqlite_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(sqlite_err)?;
        Ok(rows)
    }

    fn deactivate_activations(
        &self,
        license_id: LicenseId,
        machine_id: &str,
        when: DateTime<Utc>,
    ) -> RegistryResult<usize> {
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE activations SET is_active = 0, deactivated_at = ?3 \
                 WHERE license_id = ?1 AND machine_id = ?2 AND is_active = 1",
                params![license_id.to_string(), machine_id, when.to_rfc3339()],
            )
            .map_err(sqlite_err)?;
        debug!(license_id = %license_id, changed, "deactivated activations");
        Ok(changed)
    }
}

/// Maps a rusqlite error, turning constraint violations into conflicts so
/// the database backstop surfaces the same way as the transactional check.
fn sqlite_err(err: rusqlite::Error) -> RegistryError {
    match err {
        rusqlite::Error::SqliteFailure(e, message)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            RegistryError::Conflict(
                message.unwrap_or_else(|| "constraint violation".to_string()),
            )
        }
        other => RegistryError::Store(other.to_string()),
    }
}

/// Lifts `QueryReturnedNoRows` into `None`.
fn optional<T>(result: Result<T, rusqlite::Error>) -> RegistryResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(sqlite_err(err)),
    }
}

fn license_from_row(row: &Row<'_>) -> rusqlite::Result<License> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(3)?;
    Ok(License {
        id: LicenseId::parse(&id).map_err(|e| conversion_err(0, e))?,
        license_key: row.get(1)?,
        customer_name: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
        is_active: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn activation_from_row(row: &Row<'_>) -> rusqlite::Result<Activation> {
    let id: String = row.get(0)?;
    let license_id: String = row.get(1)?;
    let activated_at: String = row.get(4)?;
    let deactivated_at: Option<String> = row.get(6)?;
    Ok(Activation {
        id: ActivationId::parse(&id).map_err(|e| conversion_err(0, e))?,
        license_id: LicenseId::parse(&license_id).map_err(|e| conversion_err(1, e))?,
        machine_id: row.get(2)?,
        activation_key: row.get(3)?,
        activated_at: parse_timestamp(4, &activated_at)?,
        is_active: row.get(5)?,
        deactivated_at: deactivated_at
            .map(|raw| parse_timestamp(6, &raw))
            .transpose()?,
    })
}

fn parse_timestamp(index: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(index, e))
}

fn conversion_err(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}
