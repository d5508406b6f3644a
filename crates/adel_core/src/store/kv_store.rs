//! Key-value store contract plus SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Persist string values under stable string keys.
//! - Write multi-key updates atomically where the backend allows it.
//!
//! # Invariants
//! - `set` overwrites any previous value for the key.
//! - `set_many` on SQLite commits all entries or none.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error for key-value reads and writes.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Backend refused the operation (quota, permissions, closed handle).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "key-value store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
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

/// String key-value storage contract.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes several entries. Backends with transactions override this to
    /// make the write atomic.
    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        (**self).set_many(entries)
    }
}

/// SQLite-backed key-value store over the `kv_store` table.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        upsert(&self.conn, key, value)?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            upsert(&tx, key, value)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, value],
    )
}

/// Process-local store for hosts without durable storage, and for tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};

    #[test]
    fn sqlite_store_overwrites_existing_key() {
        let store = SqliteKeyValueStore::open_in_memory().unwrap();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = SqliteKeyValueStore::open_in_memory().unwrap();
        assert_eq!(store.get("absent").unwrap(), None);
        assert_eq!(MemoryKeyValueStore::new().get("absent").unwrap(), None);
    }

    #[test]
    fn memory_store_set_many_writes_all_entries() {
        let store = MemoryKeyValueStore::new();
        store.set_many(&[("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}
