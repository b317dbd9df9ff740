//! In-memory slot store

use std::collections::HashMap;
use std::sync::Mutex;
use crate::storage::{KeyValueStore, StorageError};

/// Key-value store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Connection("memory store lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Connection("memory store lock poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
