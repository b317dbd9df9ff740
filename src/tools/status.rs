//! Tool for checking overall progress and streaks
//!
//! This module implements the habit_status MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{AnalyticsEngine, DashboardSummary};
use crate::domain::Ledger;
use crate::tools::ToolError;

/// Parameters for checking status (none required)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatusParams {}

/// Response from checking status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub summary: DashboardSummary,
    pub message: String,
}

/// Dashboard summary across all habits
pub fn get_habit_status(ledger: &Ledger, today: NaiveDate, _params: StatusParams) -> Result<StatusResponse, ToolError> {
    let summary = AnalyticsEngine::new().dashboard(ledger.habits(), today);

    let last_logged = summary
        .streak
        .last_logged
        .map(|d| d.to_string())
        .unwrap_or_else(|| "never".to_string());

    let message = format!(
        "📊 **Status for {}**\n\
         - Total activity: {}\n\
         - Active habits: {}\n\
         - Constructive logs: {}\n\
         - Destructive logs: {}\n\
         - 🔥 Streak: {} day{} (last log: {})\n\n{}",
        today,
        summary.total_activity,
        summary.active_habits,
        summary.constructive_logs,
        summary.destructive_logs,
        summary.streak.current_streak,
        if summary.streak.current_streak == 1 { "" } else { "s" },
        last_logged,
        summary.streak_message
    );

    Ok(StatusResponse { summary, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, HabitKind, LogMode, NewHabit};

    #[test]
    fn test_status_reports_streak() {
        let mut ledger = Ledger::default();
        let id = ledger
            .create_habit(NewHabit {
                name: "Floss".to_string(),
                kind: HabitKind::Constructive,
                mode: LogMode::Tally,
                unit: None,
            })
            .unwrap()
            .id
            .clone();
        ledger.log_activity(&id, true, 1, "", &FixedClock::at(2026, 10, 18, 22, 0, 0));
        ledger.log_activity(&id, true, 1, "", &FixedClock::at(2026, 10, 19, 22, 0, 0));

        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let response = get_habit_status(&ledger, today, StatusParams::default()).unwrap();

        assert_eq!(response.summary.streak.current_streak, 2);
        assert!(response.message.contains("Streak: 2 days (last log: 2026-10-19)"));
    }
}
