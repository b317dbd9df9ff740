//! Domain module containing the habit ledger and its data types
//!
//! This module defines the core entities (Habit, DayBucket, LogEntry), the
//! ledger engine that mutates them, the streak calculation, the user profile
//! and the clock capability the ledger reads "now" from.

pub mod clock;
pub mod entry;
pub mod habit;
pub mod ledger;
pub mod profile;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use clock::*;
pub use entry::*;
pub use habit::*;
pub use ledger::*;
pub use profile::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
