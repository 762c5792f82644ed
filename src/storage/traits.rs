//! Session store trait and error types

use thiserror::Error;

/// Errors that can occur during session store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for session store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for session store backends
///
/// The store holds two kinds of entries: scalar values (`set`/`get`/`delete`)
/// and append-only lists (`list_push`/`list_pop`/`list_length`). Lists are
/// FIFO: `list_push` appends at the tail, `list_pop` removes from the head.
///
/// All keys are fully qualified by the caller; session isolation is achieved
/// by prefixing every key with the session id (see [`crate::session::SessionId`]).
/// `clear` removes every entry, scalar or list, under a given prefix.
///
/// Implementations must be safe to share across tasks (`Send + Sync`).
pub trait SessionStore: Send + Sync {
    /// Sets a scalar value, replacing any existing value for the key
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Gets a scalar value, or `None` if the key is absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Deletes the given scalar keys (absent keys are ignored)
    fn delete(&self, keys: &[&str]) -> StoreResult<()>;

    /// Appends a value at the tail of the list stored at `key`
    fn list_push(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes and returns the value at the head of the list, or `None` if empty
    fn list_pop(&self, key: &str) -> StoreResult<Option<String>>;

    /// Returns the number of values in the list stored at `key`
    fn list_length(&self, key: &str) -> StoreResult<u64>;

    /// Removes every scalar and list entry whose key starts with `prefix`
    fn clear(&self, prefix: &str) -> StoreResult<()>;
}
