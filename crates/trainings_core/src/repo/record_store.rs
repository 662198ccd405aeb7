//! Record store contract and SQLite key-value implementation.
//!
//! # Responsibility
//! - Persist the whole entry collection as one JSON value under a fixed key.
//! - Report never-initialized state separately from corrupt state.
//!
//! # Invariants
//! - `save` replaces the full value; there are no partial writes.
//! - `load` never returns a partially decoded collection.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::entry::{decode_entries, encode_entries, Entry, EntryCodecError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Default store name, mirrored from the host app's private preferences file.
pub const DEFAULT_STORE_NAME: &str = "EntrenamientosPrefs";
/// Fixed key holding the serialized entry collection.
pub const TRAININGS_KEY: &str = "entrenamientos_list";

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Stored text exists but does not decode to an entry sequence.
    CorruptState(EntryCodecError),
    /// Collection could not be encoded before writing.
    Encode(EntryCodecError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::CorruptState(err) => write!(f, "corrupt persisted state: {err}"),
            Self::Encode(err) => write!(f, "failed to encode entries: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::CorruptState(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for the single entry collection.
pub trait RecordStore {
    /// Overwrites the stored collection.
    fn save(&self, entries: &[Entry]) -> StoreResult<()>;
    /// Returns `None` when nothing was ever saved.
    fn load(&self) -> StoreResult<Option<Vec<Entry>>>;
    /// Removes the stored collection, as if it was never saved.
    fn clear(&self) -> StoreResult<()>;
    /// Returns whether a value exists, without decoding it.
    fn exists(&self) -> StoreResult<bool>;
}

/// SQLite-backed record store.
///
/// Owns its connection; dropping the store releases the database handle.
pub struct SqliteRecordStore {
    conn: Connection,
    store_name: String,
}

impl SqliteRecordStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection, store_name: impl Into<String>) -> Self {
        Self {
            conn,
            store_name: store_name.into(),
        }
    }

    /// Opens (or creates) a store database file.
    pub fn open(path: impl AsRef<Path>, store_name: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?, store_name))
    }

    /// Opens a throwaway in-memory store.
    pub fn open_in_memory(store_name: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?, store_name))
    }

    /// Reads the raw stored text under `key`.
    pub fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM key_values WHERE store_name = ?1 AND key = ?2;",
                params![self.store_name, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Writes raw text under `key`, replacing any previous value.
    pub fn write_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO key_values (store_name, key, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(store_name, key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.store_name, key, value],
        )?;
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn save(&self, entries: &[Entry]) -> StoreResult<()> {
        let json = encode_entries(entries).map_err(StoreError::Encode)?;
        self.write_raw(TRAININGS_KEY, &json)
    }

    fn load(&self) -> StoreResult<Option<Vec<Entry>>> {
        match self.read_raw(TRAININGS_KEY)? {
            Some(json) => decode_entries(&json)
                .map(Some)
                .map_err(StoreError::CorruptState),
            None => Ok(None),
        }
    }

    fn clear(&self) -> StoreResult<()> {
        self.conn.execute(
            "DELETE FROM key_values WHERE store_name = ?1 AND key = ?2;",
            params![self.store_name, TRAININGS_KEY],
        )?;
        Ok(())
    }

    fn exists(&self) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM key_values WHERE store_name = ?1 AND key = ?2
            );",
            params![self.store_name, TRAININGS_KEY],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn save(&self, entries: &[Entry]) -> StoreResult<()> {
        (**self).save(entries)
    }

    fn load(&self) -> StoreResult<Option<Vec<Entry>>> {
        (**self).load()
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }

    fn exists(&self) -> StoreResult<bool> {
        (**self).exists()
    }
}
