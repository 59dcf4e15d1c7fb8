//! Durable key-value storage contracts.
//!
//! # Responsibility
//! - Provide a `localStorage`-shaped string key/value surface to the store and
//!   the app coordinator.
//! - Keep SQLite details behind the `KeyValueStorage` trait.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key (no partial writes).
//! - Readers observe their own writes immediately (single process, synchronous).
//! - Concurrent writers from other processes are not coordinated; last write
//!   wins.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteKeyValueStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Transport-level failure of the durable backing.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "storage backend error: {err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
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

/// String key/value storage with whole-value replacement semantics.
pub trait KeyValueStorage {
    /// Returns the stored value, or `None` when the key was never written or
    /// has been removed.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
    /// Lists all keys in ascending order.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
