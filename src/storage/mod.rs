//! Storage layer for persisting habit data
//!
//! Persistence is a key-value store of whole JSON records: one slot holds
//! the habit collection and one holds the user profile. The SQLite backend
//! is used by the server; the in-memory backend backs tests.

pub mod memory;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use memory::*;
pub use sqlite::*;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use crate::domain::{Habit, UserConfig};

/// Slot holding the serialized habit collection
pub const HABITS_KEY: &str = "habitflow_pro_data";

/// Slot holding the serialized user profile
pub const PROFILE_KEY: &str = "habitflow_pro_user";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Raw key-value access every backend provides
pub trait KeyValueStore {
    /// Read a slot; `None` if it was never written
    fn get_value(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot's content
    fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Trait defining the persistence port for the habit tracker
///
/// Records are read and written whole. A slot holding malformed JSON loads
/// as the empty/default value with a warning instead of failing. Within the
/// habit collection each habit is read on its own, so one unreadable habit
/// is skipped without losing the rest.
pub trait HabitStorage {
    /// Load the habit collection (empty if absent)
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Replace the persisted habit collection
    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError>;

    /// Load the user profile (defaults if absent)
    fn load_profile(&self) -> Result<UserConfig, StorageError>;

    /// Replace the persisted user profile
    fn save_profile(&self, profile: &UserConfig) -> Result<(), StorageError>;
}

impl<T: KeyValueStore> HabitStorage for T {
    fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let records: Vec<Value> = decode_slot(HABITS_KEY, self.get_value(HABITS_KEY)?);
        let total = records.len();
        let habits: Vec<Habit> = records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<Habit>(record) {
                Ok(habit) => Some(habit),
                Err(e) => {
                    warn!("Skipping unreadable habit in slot {}: {}", HABITS_KEY, e);
                    None
                }
            })
            .collect();
        if habits.len() < total {
            warn!("Loaded {} of {} stored habits", habits.len(), total);
        }
        Ok(habits)
    }

    fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        self.put_value(HABITS_KEY, &encode_slot(&habits)?)
    }

    fn load_profile(&self) -> Result<UserConfig, StorageError> {
        Ok(decode_slot(PROFILE_KEY, self.get_value(PROFILE_KEY)?))
    }

    fn save_profile(&self, profile: &UserConfig) -> Result<(), StorageError> {
        self.put_value(PROFILE_KEY, &encode_slot(profile)?)
    }
}

fn encode_slot<T: Serialize + ?Sized>(value: &T) -> Result<String, StorageError> {
    Ok(serde_json::to_string(value)?)
}

/// Parse a slot, falling back to the default on absence or bad JSON
fn decode_slot<T: DeserializeOwned + Default>(key: &str, raw: Option<String>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring malformed data in slot {}: {}", key, e);
            T::default()
        }
    }
}
