//! In-memory session store
//!
//! Backend for tests and ephemeral deployments where analysis state does not
//! need to survive a restart.

use crate::storage::traits::{SessionStore, StoreResult};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// In-memory session store backend
#[derive(Default)]
pub struct MemoryStore {
    scalars: Mutex<HashMap<String, String>>,
    lists: Mutex<HashMap<String, VecDeque<String>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.scalars
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.scalars.lock().unwrap().get(key).cloned())
    }

    fn delete(&self, keys: &[&str]) -> StoreResult<()> {
        let mut scalars = self.scalars.lock().unwrap();
        for key in keys {
            scalars.remove(*key);
        }
        Ok(())
    }

    fn list_push(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lists
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(value.to_string());
        Ok(())
    }

    fn list_pop(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(|list| list.pop_front()))
    }

    fn list_length(&self, key: &str) -> StoreResult<u64> {
        Ok(self
            .lists
            .lock()
            .unwrap()
            .get(key)
            .map(|list| list.len() as u64)
            .unwrap_or(0))
    }

    fn clear(&self, prefix: &str) -> StoreResult<()> {
        self.scalars
            .lock()
            .unwrap()
            .retain(|key, _| !key.starts_with(prefix));
        self.lists
            .lock()
            .unwrap()
            .retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}
