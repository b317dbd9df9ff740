//! Tools for logging and undoing habit activity
//!
//! This module implements the habit_log and habit_undo MCP tools. Both go
//! through the ledger engine, which decides what actually changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{Clock, Ledger, Streak, MAX_LOG_AMOUNT};
use crate::tools::{find_habit, lenient_amount, ToolError};

/// Parameters for logging activity on a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogHabitParams {
    /// ID of the habit to log
    pub habit_id: String,
    /// Amount to log, at most 10000 (defaults to 1; non-numeric or below 1 counts as 1)
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<f64>,
    /// Unit for this entry on counted habits (defaults to the habit's unit)
    #[serde(default)]
    pub unit: Option<String>,
}

/// Parameters for undoing today's activity on a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UndoLogParams {
    /// ID of the habit to undo
    pub habit_id: String,
    /// Units to remove from today on tally habits (defaults to 1).
    /// Counted habits always undo their most recent entry.
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<f64>,
}

/// Response from a log or undo action
#[derive(Debug, Serialize)]
pub struct LogHabitResponse {
    /// Whether the ledger changed
    pub changed: bool,
    pub total_logs: u64,
    pub today_count: u64,
    pub current_streak: u32,
    pub message: String,
}

/// Log activity on a habit for today
pub fn log_habit(ledger: &mut Ledger, clock: &dyn Clock, params: LogHabitParams) -> Result<LogHabitResponse, ToolError> {
    let habit_id = find_habit(ledger, &params.habit_id)?.id.clone();
    let amount = params.amount.unwrap_or(1.0);
    if amount.floor() > f64::from(MAX_LOG_AMOUNT) {
        return Err(ToolError::Validation(format!(
            "Amount {} is too large; a single log can carry at most {}",
            amount, MAX_LOG_AMOUNT
        )));
    }
    let changed = ledger.log_activity(&habit_id, true, amount, params.unit.as_deref().unwrap_or(""), clock);
    respond(ledger, clock, &params.habit_id, changed, true)
}

/// Undo activity logged today on a habit
pub fn undo_log(ledger: &mut Ledger, clock: &dyn Clock, params: UndoLogParams) -> Result<LogHabitResponse, ToolError> {
    let habit_id = find_habit(ledger, &params.habit_id)?.id.clone();
    let amount = params.amount.unwrap_or(1.0);
    let changed = ledger.log_activity(&habit_id, false, amount, "", clock);
    respond(ledger, clock, &params.habit_id, changed, false)
}

fn respond(
    ledger: &Ledger,
    clock: &dyn Clock,
    raw_id: &str,
    changed: bool,
    increment: bool,
) -> Result<LogHabitResponse, ToolError> {
    let today = clock.today();
    let habit = find_habit(ledger, raw_id)?;
    let today_count = habit.bucket_for(today).map_or(0, |b| b.count);
    let streak = Streak::calculate(ledger.habits(), today);

    let message = match (changed, increment) {
        (true, true) => format!(
            "🔥 Logged '{}'. Today: {} | {} | Streak: {} day{}",
            habit.name,
            today_count,
            habit.totals_display(),
            streak.current_streak,
            if streak.current_streak == 1 { "" } else { "s" }
        ),
        (true, false) => format!(
            "↩️ Undid activity on '{}'. Today: {} | {}",
            habit.name,
            today_count,
            habit.totals_display()
        ),
        (false, _) => format!("Nothing logged today for '{}', nothing to undo.", habit.name),
    };

    Ok(LogHabitResponse {
        changed,
        total_logs: habit.total_logs,
        today_count,
        current_streak: streak.current_streak,
        message,
    })
}
