//! Tool for listing habits
//!
//! This module implements the habit_list MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{AnalyticsEngine, HabitOverview};
use crate::domain::{HabitKind, Ledger};
use crate::tools::ToolError;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only list habits of this kind: "constructive" or "destructive" (optional)
    #[serde(default)]
    pub kind: Option<String>,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitOverview>,
    pub message: String,
}

/// List habits with their totals and the last 7 days of activity
pub fn list_habits(ledger: &Ledger, today: NaiveDate, params: ListHabitsParams) -> Result<ListHabitsResponse, ToolError> {
    let kind = match params.kind.as_deref() {
        Some(raw) => Some(HabitKind::parse(raw).ok_or_else(|| {
            ToolError::Validation(format!("Invalid kind '{}'. Valid options: constructive, destructive", raw))
        })?),
        None => None,
    };

    let engine = AnalyticsEngine::new();
    let habits: Vec<HabitOverview> = ledger
        .habits()
        .iter()
        .filter(|h| kind.map_or(true, |k| h.kind == k))
        .map(|h| engine.habit_overview(h, today))
        .collect();

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                let week: String = h
                    .recent_activity
                    .iter()
                    .map(|d| if d.active { '■' } else { '□' })
                    .collect();
                format!(
                    "🎯 **{}** ({}, {})\n   ID: {} | {} | Today: {} | Last 7 days: {}",
                    h.name,
                    h.kind.display_name(),
                    h.mode.display_name(),
                    h.id,
                    h.totals_display,
                    h.today_count,
                    week
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("📋 **Habits** ({})\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
