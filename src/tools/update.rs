//! Tools for renaming and deleting habits
//!
//! This module implements the habit_rename and habit_delete MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::Ledger;
use crate::tools::{find_habit, ToolError};

/// Parameters for renaming a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RenameHabitParams {
    /// ID of the habit to rename
    pub habit_id: String,
    /// New display name
    pub name: String,
}

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    /// ID of the habit to delete, together with its whole log history
    pub habit_id: String,
}

/// Response from renaming or deleting a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub changed: bool,
    pub message: String,
}

/// Rename an existing habit
pub fn rename_habit(ledger: &mut Ledger, params: RenameHabitParams) -> Result<UpdateHabitResponse, ToolError> {
    let habit = find_habit(ledger, &params.habit_id)?;
    let (habit_id, old_name) = (habit.id.clone(), habit.name.clone());

    let changed = ledger.rename_habit(&habit_id, &params.name)?;
    let new_name = ledger.get(&habit_id).map(|h| h.name.clone()).unwrap_or_default();

    Ok(UpdateHabitResponse {
        changed,
        message: format!("✏️ Renamed '{}' to '{}'", old_name, new_name),
    })
}

/// Delete a habit and its history
pub fn delete_habit(ledger: &mut Ledger, params: DeleteHabitParams) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = find_habit(ledger, &params.habit_id)?.id.clone();
    let removed = ledger
        .remove_habit(&habit_id)
        .ok_or_else(|| ToolError::HabitNotFound { habit_id: habit_id.to_string() })?;

    Ok(UpdateHabitResponse {
        changed: true,
        message: format!(
            "🗑️ Deleted '{}' and its {} log entr{}",
            removed.name,
            removed.entry_count(),
            if removed.entry_count() == 1 { "y" } else { "ies" }
        ),
    })
}
