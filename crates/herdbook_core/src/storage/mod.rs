//! Key-value persistence collaborators for the herd store.
//!
//! # Responsibility
//! - Define the get/set/remove contract the store persists through.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Values are whole documents; there is no partial update path.
//! - `get` on a never-set key returns `Ok(None)`, not an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_kv;
pub mod sqlite_kv;

pub use memory_kv::MemoryKeyValueStore;
pub use sqlite_kv::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a persistence collaborator.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend refused or could not complete the call.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
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

/// Durable key-value contract consumed by `HerdStore`.
///
/// Single client assumed: no other process writes the same keys.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key was never set.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Overwrites the value for `key`.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes the value for `key`. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}
