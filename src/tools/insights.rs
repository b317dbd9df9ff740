//! Tools for the daily insight and reminders
//!
//! This module implements the habit_insights and habit_reminders MCP tools.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{assistant_context, daily_insight, unlogged_constructive, Insight, Reminder, ReminderTracker};
use crate::domain::{Ledger, Settings};
use crate::tools::ToolError;

/// Parameters for the daily insight
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct InsightsParams {
    /// Also return the assistant context summarizing the user's habits
    #[serde(default)]
    pub include_context: bool,
}

/// Parameters for checking reminders (none required)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RemindersParams {}

/// Response with today's insight
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insight: Insight,
    pub context: Option<String>,
    pub message: String,
}

/// Response from a reminder check
#[derive(Debug, Serialize)]
pub struct RemindersResponse {
    /// Set when a reminder fired on this call
    pub reminder: Option<Reminder>,
    /// Constructive habits with nothing logged today
    pub unlogged: Vec<String>,
    pub message: String,
}

/// Today's coaching tip
pub fn get_habit_insights(ledger: &Ledger, today: NaiveDate, params: InsightsParams) -> Result<InsightsResponse, ToolError> {
    let insight = daily_insight(ledger.habits(), today);
    let context = params.include_context.then(|| assistant_context(ledger.habits()));

    let mut message = format!("💡 **{}**\n{}", insight.title, insight.body);
    if let Some(context) = &context {
        message.push_str(&format!("\n\nContext: {}", context));
    }

    Ok(InsightsResponse { insight, context, message })
}

/// Check for unlogged constructive habits, firing at most one reminder a day
pub fn check_reminders(
    ledger: &Ledger,
    tracker: &mut ReminderTracker,
    settings: &Settings,
    today: NaiveDate,
    _params: RemindersParams,
) -> Result<RemindersResponse, ToolError> {
    let unlogged = unlogged_constructive(ledger.habits(), today);
    let reminder = tracker.check(ledger.habits(), settings, today);

    let message = match (&reminder, settings.notifications_enabled) {
        (Some(reminder), _) => format!("🔔 {}", reminder.message),
        (None, false) => "Notifications are turned off.".to_string(),
        (None, true) if unlogged.is_empty() => "All constructive habits are logged today. 🎉".to_string(),
        (None, true) => format!(
            "Already reminded today. Still unlogged: {}",
            unlogged.join(", ")
        ),
    };

    Ok(RemindersResponse { reminder, unlogged, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::DAILY_INSIGHTS;
    use crate::domain::{HabitKind, LogMode, NewHabit};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_insight_with_context() {
        let mut ledger = Ledger::default();
        ledger
            .create_habit(NewHabit {
                name: "Yoga".to_string(),
                kind: HabitKind::Constructive,
                mode: LogMode::Tally,
                unit: None,
            })
            .unwrap();

        let response = get_habit_insights(&ledger, today(), InsightsParams { include_context: true }).unwrap();
        assert_eq!(response.insight, DAILY_INSIGHTS[1]);
        assert!(response.context.unwrap().contains("Yoga"));

        let plain = get_habit_insights(&ledger, today(), InsightsParams::default()).unwrap();
        assert!(plain.context.is_none());
    }

    #[test]
    fn test_reminder_messages() {
        let mut ledger = Ledger::default();
        ledger
            .create_habit(NewHabit {
                name: "Yoga".to_string(),
                kind: HabitKind::Constructive,
                mode: LogMode::Tally,
                unit: None,
            })
            .unwrap();
        let mut tracker = ReminderTracker::new();
        let settings = Settings::default();

        let first = check_reminders(&ledger, &mut tracker, &settings, today(), RemindersParams::default()).unwrap();
        assert!(first.reminder.is_some());
        assert!(first.message.contains("You haven't logged Yoga today"));

        let second = check_reminders(&ledger, &mut tracker, &settings, today(), RemindersParams::default()).unwrap();
        assert!(second.reminder.is_none());
        assert_eq!(second.unlogged, vec!["Yoga"]);
        assert!(second.message.starts_with("Already reminded today"));
    }
}
