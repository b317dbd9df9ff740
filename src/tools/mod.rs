//! MCP tools for habit management
//!
//! Each tool is a parameter struct (deserialized from the call arguments,
//! with a derived JSON schema), a response struct carrying the text shown
//! to the client, and a function over the domain state. Tools never touch
//! storage; the server persists after any response that reports a change.

pub mod analytics;
pub mod create;
pub mod export;
pub mod insights;
pub mod list;
pub mod log;
pub mod logs;
pub mod profile;
pub mod status;
pub mod update;

// Re-export tool functions for easy access
pub use analytics::*;
pub use create::*;
pub use export::*;
pub use insights::*;
pub use list::*;
pub use log::*;
pub use logs::*;
pub use profile::*;
pub use status::*;
pub use update::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use crate::domain::{DomainError, Habit, HabitId, Ledger};
use crate::export::ExportError;

/// Errors a tool reports back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Look a habit up by the id string a client sent
pub(crate) fn find_habit<'a>(ledger: &'a Ledger, raw_id: &str) -> Result<&'a Habit, ToolError> {
    let habit_id = parse_habit_id(raw_id)?;
    ledger.get(&habit_id).ok_or_else(|| ToolError::HabitNotFound {
        habit_id: habit_id.to_string(),
    })
}

pub(crate) fn parse_habit_id(raw_id: &str) -> Result<HabitId, ToolError> {
    let habit_id = HabitId::from_string(raw_id);
    if habit_id.as_str().is_empty() {
        return Err(ToolError::Validation("Habit ID cannot be empty".to_string()));
    }
    Ok(habit_id)
}

/// Accept an amount as a JSON number or numeric string
///
/// Anything else reads as NaN, which the ledger coerces to 1.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }))
}
