//! Session store backends
//!
//! This module defines the [`SessionStore`] trait — the key-value surface the
//! analyzer keeps all per-session state behind — and two backends: a
//! persistent SQLite store and an in-memory store. Every key written through
//! this trait is namespaced by a session-id prefix, which is what guarantees
//! that concurrent sessions never observe each other's state.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{SessionStore, StoreError, StoreResult};
