//! SQLite implementation of the habit storage interface
//!
//! Each slot is one row of the `kv_store` table holding a JSON document.

use std::path::PathBuf;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::{migrations, KeyValueStore, StorageError};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// the key-value operations the `HabitStorage` port is built on.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStorage {
    fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;

        tracing::debug!("Wrote slot {} ({} bytes)", key, value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, HabitKind, Ledger, LogMode, NewHabit, UserConfig};
    use crate::storage::{HabitStorage, HABITS_KEY};
    use tempfile::TempDir;

    #[test]
    fn test_empty_database_loads_defaults() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert!(storage.load_habits().unwrap().is_empty());
        assert_eq!(storage.load_profile().unwrap(), UserConfig::default());
    }

    #[test]
    fn test_habits_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("habits.db");

        let mut ledger = Ledger::default();
        let id = ledger
            .create_habit(NewHabit {
                name: "Meditate".to_string(),
                kind: HabitKind::Constructive,
                mode: LogMode::Counted,
                unit: Some("min".to_string()),
            })
            .unwrap()
            .id
            .clone();
        ledger.log_activity(&id, true, 20, "", &FixedClock::at(2026, 10, 19, 6, 0, 0));

        {
            let storage = SqliteStorage::new(path.clone()).unwrap();
            storage.save_habits(ledger.habits()).unwrap();
        }

        let storage = SqliteStorage::new(path).unwrap();
        let loaded = storage.load_habits().unwrap();
        assert_eq!(loaded, ledger.habits());
        assert_eq!(loaded[0].total_logs, 20);
    }

    #[test]
    fn test_put_value_overwrites() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.put_value("k", "1").unwrap();
        storage.put_value("k", "2").unwrap();
        assert_eq!(storage.get_value("k").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.get_value("missing").unwrap(), None);
    }

    #[test]
    fn test_malformed_slot_falls_back_to_empty() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.put_value(HABITS_KEY, "[{\"broken\":").unwrap();
        assert!(storage.load_habits().unwrap().is_empty());
    }
}
