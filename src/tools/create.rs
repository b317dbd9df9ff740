//! Tool for creating new habits
//!
//! This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{HabitKind, Ledger, LogMode, NewHabit};
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// "constructive" (good) or "destructive" (bad)
    pub kind: String,
    /// "tally" (one unit per log) or "counted" (amount per log); defaults to tally
    #[serde(default)]
    pub mode: Option<String>,
    /// Unit label for counted habits, e.g. "pages" or "km"
    #[serde(default)]
    pub unit: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit in the ledger
pub fn create_habit(ledger: &mut Ledger, params: CreateHabitParams) -> Result<CreateHabitResponse, ToolError> {
    let kind = HabitKind::parse(&params.kind).ok_or_else(|| {
        ToolError::Validation(format!(
            "Invalid kind '{}'. Valid options: constructive, destructive",
            params.kind
        ))
    })?;

    let mode = match params.mode.as_deref() {
        Some(raw) if !raw.trim().is_empty() => LogMode::parse(raw).ok_or_else(|| {
            ToolError::Validation(format!("Invalid mode '{}'. Valid options: tally, counted", raw))
        })?,
        _ => LogMode::Tally,
    };

    let habit = ledger.create_habit(NewHabit {
        name: params.name,
        kind,
        mode,
        unit: params.unit,
    })?;

    let unit_note = if habit.unit.is_empty() {
        String::new()
    } else {
        format!(", measured in {}", habit.unit)
    };

    Ok(CreateHabitResponse {
        habit_id: habit.id.to_string(),
        message: format!(
            "✅ Created {} habit '{}' ({}{})\nHabit ID: {}",
            kind.display_name().to_lowercase(),
            habit.name,
            mode.display_name().to_lowercase(),
            unit_note,
            habit.id
        ),
    })
}
