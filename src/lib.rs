//! Public library interface for the HabitFlow MCP server
//!
//! This module exports the habit ledger, its derived views and the server
//! that exposes them to MCP clients over JSON-RPC.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod analytics;
pub mod domain;
pub mod export;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{AnalyticsEngine, DashboardSummary, ReminderTracker};
pub use domain::*;
pub use export::{ExportError, ExportFlow};
pub use mcp::McpServer;
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which persisted record a tool call changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    None,
    Habits,
    Profile,
}

/// Habit tracker state behind the MCP server
///
/// Owns the in-memory ledger and profile, the clock, the reminder tracker
/// and the storage they are mirrored to.
pub struct HabitFlowServer<S: HabitStorage = SqliteStorage> {
    storage: S,
    ledger: Ledger,
    profile: UserConfig,
    clock: Box<dyn Clock>,
    reminders: ReminderTracker,
    export_dir: PathBuf,
}

impl HabitFlowServer<SqliteStorage> {
    /// Create a server over the SQLite database at `db_path`
    ///
    /// This will initialize the database schema if it doesn't already exist
    /// and load the persisted ledger and profile.
    pub async fn new(db_path: PathBuf, export_dir: PathBuf) -> Result<Self, ServerError> {
        info!("Initializing HabitFlow server with database: {:?}", db_path);
        let storage = SqliteStorage::new(db_path)?;
        Self::with_storage(storage, Box::new(SystemClock), export_dir)
    }
}

impl<S: HabitStorage> HabitFlowServer<S> {
    /// Create a server over any storage backend and clock
    pub fn with_storage(storage: S, clock: Box<dyn Clock>, export_dir: PathBuf) -> Result<Self, ServerError> {
        let habits = storage.load_habits()?;
        let profile = storage.load_profile()?;
        info!("Loaded {} habit(s) from storage", habits.len());

        Ok(Self {
            storage,
            ledger: Ledger::new(habits),
            profile,
            clock,
            reminders: ReminderTracker::new(),
            export_dir,
        })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        info!("Starting MCP server with {} habit(s)", self.ledger.habits().len());
        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn profile(&self) -> &UserConfig {
        &self.profile
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Today's date according to the server clock
    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    /// Persist whatever a tool call changed, returning whether anything was written
    ///
    /// Failures are logged and leave the in-memory state as it is. With the
    /// persistence setting off, habit changes stay in memory only; the
    /// profile is always saved so the setting itself survives a restart.
    pub(crate) fn commit(&self, tool: &str, mutation: Mutation) -> bool {
        if mutation == Mutation::None {
            return false;
        }
        if self.profile.settings.audit {
            info!(target: "habitflow_mcp::audit", "{} changed {:?}", tool, mutation);
        }

        let result = match mutation {
            Mutation::Habits if !self.profile.settings.persistence => {
                debug!("Persistence disabled; keeping {} change in memory", tool);
                return false;
            }
            Mutation::Habits => self.storage.save_habits(self.ledger.habits()),
            Mutation::Profile => self.storage.save_profile(&self.profile),
            Mutation::None => return false,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist {:?} after {}: {}", mutation, tool, e);
                false
            }
        }
    }

    /// Developer console footer appended to tool results
    pub(crate) fn diagnostics(&self, tool: &str, mutation: Mutation, persisted: bool) -> String {
        let habits = self.ledger.habits();
        format!(
            "\n\n[dev] tool={} mutation={:?} persisted={} habits={} entries={} today={}",
            tool,
            mutation,
            persisted,
            habits.len(),
            habits.iter().map(|h| h.entry_count()).sum::<usize>(),
            self.today()
        )
    }
}
