//! SQLite session store
//!
//! Persistent backend for session state. Scalars live in `session_kv`; lists
//! live in `session_list`, ordered by rowid so that push/pop behave as a FIFO
//! queue.

use crate::storage::traits::{SessionStore, StoreResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed session store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a session store at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Creates the session store tables if they do not exist
fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS session_kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_list (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            key   TEXT NOT NULL,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_session_list_key ON session_list(key);
    ",
    )?;
    Ok(())
}

impl SessionStore for SqliteStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO session_kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row(
                "SELECT value FROM session_kv WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn delete(&self, keys: &[&str]) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        for key in keys {
            conn.execute("DELETE FROM session_kv WHERE key = ?1", params![key])?;
        }
        Ok(())
    }

    fn list_push(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO session_list (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn list_pop(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().unwrap();

        let head: Option<(i64, String)> = conn
            .query_row(
                "SELECT id, value FROM session_list WHERE key = ?1 ORDER BY id LIMIT 1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match head {
            Some((id, value)) => {
                conn.execute("DELETE FROM session_list WHERE id = ?1", params![id])?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn list_length(&self, key: &str) -> StoreResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM session_list WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn clear(&self, prefix: &str) -> StoreResult<()> {
        // substr comparison instead of LIKE so that '_' in keys is not a wildcard
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM session_kv WHERE substr(key, 1, length(?1)) = ?1",
            params![prefix],
        )?;
        conn.execute(
            "DELETE FROM session_list WHERE substr(key, 1, length(?1)) = ?1",
            params![prefix],
        )?;
        Ok(())
    }
}
