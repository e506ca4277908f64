//! In-process key-value store.
//!
//! Used by tests and by the `memory` storage backend. Nothing survives the
//! process.

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(
        &self,
        op: &'static str,
        key: &str,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::backend(op, key, "memory store mutex poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries("get", key)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries("set", key)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries("remove", key)?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries("clear", "*")?.clear();
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Result<String, StorageError>,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries("update", key)?;
        let next = f(entries.get(key).map(String::as_str))?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}
