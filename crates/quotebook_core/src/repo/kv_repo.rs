//! Key-value storage contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide string slots addressed by key, mirroring browser storage.
//! - Durable scope is backed by SQLite; session scope lives in memory.
//!
//! # Invariants
//! - `set` replaces any prior value for the key.
//! - `remove` of a missing key is not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by key-value backends and slot encoding.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode(serde_json::Error),
    Poisoned(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode stored value: {err}"),
            Self::Poisoned(scope) => write!(f, "{scope} storage lock poisoned"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Poisoned(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// String slots addressed by key.
pub trait KeyValueStorage: Send {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Lets one backend be shared, e.g. between a store and a test that inspects it.
impl<T: KeyValueStorage + Sync + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Durable storage over the `kv_entries` table.
pub struct SqliteKeyValueStorage {
    conn: Connection,
}

impl SqliteKeyValueStorage {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStorage for SqliteKeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-scoped storage; contents vanish when the value is dropped.
#[derive(Default)]
pub struct MemoryKeyValueStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Poisoned("session"))
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage};
    use crate::db::open_db_in_memory;

    fn exercise(storage: &dyn KeyValueStorage) {
        assert_eq!(storage.get("quotes").unwrap(), None);

        storage.set("quotes", "[]").unwrap();
        assert_eq!(storage.get("quotes").unwrap().as_deref(), Some("[]"));

        storage.set("quotes", "[1]").unwrap();
        assert_eq!(storage.get("quotes").unwrap().as_deref(), Some("[1]"));

        storage.remove("quotes").unwrap();
        storage.remove("quotes").unwrap();
        assert_eq!(storage.get("quotes").unwrap(), None);
    }

    #[test]
    fn sqlite_storage_overwrites_and_removes() {
        let storage = SqliteKeyValueStorage::new(open_db_in_memory().unwrap());
        exercise(&storage);
    }

    #[test]
    fn memory_storage_overwrites_and_removes() {
        exercise(&MemoryKeyValueStorage::new());
    }

    #[test]
    fn keys_are_independent() {
        let storage = SqliteKeyValueStorage::new(open_db_in_memory().unwrap());
        storage.set("quotes", "[]").unwrap();
        storage.set("selectedCategory", "Life").unwrap();

        assert_eq!(storage.get("quotes").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            storage.get("selectedCategory").unwrap().as_deref(),
            Some("Life")
        );
    }
}
