//! Snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the whole `AppState` as a single JSON blob keyed by name.
//! - Move unreadable snapshots aside so a fresh state can be started.
//!
//! # Invariants
//! - `save_state` replaces the blob atomically (single UPSERT).
//! - `load_state` validates decoded state before returning it.

use crate::db::DbError;
use crate::model::state::AppState;
use crate::model::validation::ValidationError;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key of the primary snapshot.
pub const DEFAULT_STATE_KEY: &str = "omnihub_state";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// Stored payload cannot be decoded or violates model invariants.
    InvalidData(String),
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state: {message}"),
            Self::Encode(err) => write!(f, "failed to encode state: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable snapshot storage used by `RecordStore`.
pub trait StateRepository {
    /// Loads the last saved snapshot, `None` when nothing was saved yet.
    fn load_state(&self) -> RepoResult<Option<AppState>>;
    /// Replaces the saved snapshot.
    fn save_state(&self, state: &AppState) -> RepoResult<()>;
    /// Moves the raw saved snapshot into backup storage and clears it.
    ///
    /// Returns `false` when there was nothing to move.
    fn quarantine_state(&self, reason: &str) -> RepoResult<bool>;
}

/// SQLite-backed snapshot repository.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Uses the default `omnihub_state` key.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, DEFAULT_STATE_KEY)
    }

    /// Uses a caller-chosen key, allowing several profiles in one file.
    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns how many quarantined snapshots exist for this key.
    pub fn backup_count(&self) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM app_state_backups WHERE key = ?1;",
            [self.key.as_str()],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn load_payload(&self) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM app_state WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load_state(&self) -> RepoResult<Option<AppState>> {
        let Some(payload) = self.load_payload()? else {
            return Ok(None);
        };

        let state = decode_state(&payload)?;
        debug!(
            "event=state_load module=repo status=ok key={} bytes={}",
            self.key,
            payload.len()
        );
        Ok(Some(state))
    }

    fn save_state(&self, state: &AppState) -> RepoResult<()> {
        state.validate()?;
        let payload = serde_json::to_string(state).map_err(RepoError::Encode)?;

        self.conn.execute(
            "INSERT INTO app_state (key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload.as_str()],
        )?;

        debug!(
            "event=state_save module=repo status=ok key={} bytes={}",
            self.key,
            payload.len()
        );
        Ok(())
    }

    fn quarantine_state(&self, reason: &str) -> RepoResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let moved = tx.execute(
            "INSERT INTO app_state_backups (key, payload, reason)
             SELECT key, payload, ?2 FROM app_state WHERE key = ?1;",
            params![self.key.as_str(), reason],
        )?;
        tx.execute("DELETE FROM app_state WHERE key = ?1;", [self.key.as_str()])?;
        tx.commit()?;

        if moved > 0 {
            warn!(
                "event=state_quarantine module=repo status=ok key={} reason={}",
                self.key, reason
            );
        }
        Ok(moved > 0)
    }
}

/// Decodes and validates a snapshot payload.
pub fn decode_state(payload: &str) -> RepoResult<AppState> {
    let state: AppState = serde_json::from_str(payload)
        .map_err(|err| RepoError::InvalidData(format!("undecodable snapshot: {err}")))?;
    state
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("snapshot violates invariants: {err}")))?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::{decode_state, RepoError};
    use crate::model::state::AppState;

    #[test]
    fn empty_object_decodes_to_default_state() {
        let state = decode_state("{}").unwrap();
        assert_eq!(state, AppState::default());
    }

    #[test]
    fn garbage_payload_is_invalid_data() {
        let err = decode_state("not json").unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("undecodable")));
    }

    #[test]
    fn payload_breaking_invariants_is_invalid_data() {
        let payload = r#"{"settings":{"theme":"Classic","mode":"light","font":"f","currency":"XYZ",
            "pomodoroWork":25,"pomodoroBreak":5,"notificationsEnabled":false,
            "budgets":{"daily":1.0,"weekly":1.0,"monthly":1.0}}}"#;
        let err = decode_state(payload).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("currency")));
    }
}
