//! Once-a-day reminder for constructive habits not yet logged today

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use crate::domain::{Habit, HabitKind, Settings};

/// A reminder ready to be shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub date: NaiveDate,
    pub habit_names: Vec<String>,
    pub message: String,
}

/// Remembers the day the last reminder fired
#[derive(Debug, Clone, Default)]
pub struct ReminderTracker {
    last_shown: Option<NaiveDate>,
}

impl ReminderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_shown(&self) -> Option<NaiveDate> {
        self.last_shown
    }

    /// Produce today's reminder, at most once per calendar day
    pub fn check(&mut self, habits: &[Habit], settings: &Settings, today: NaiveDate) -> Option<Reminder> {
        if !settings.notifications_enabled || self.last_shown == Some(today) {
            return None;
        }

        let names = unlogged_constructive(habits, today);
        if names.is_empty() {
            return None;
        }

        self.last_shown = Some(today);
        debug!("Reminder fired for {} habit(s)", names.len());
        Some(Reminder {
            date: today,
            message: reminder_message(&names),
            habit_names: names,
        })
    }
}

/// Names of constructive habits with no bucket for `today`
pub fn unlogged_constructive(habits: &[Habit], today: NaiveDate) -> Vec<String> {
    habits
        .iter()
        .filter(|h| h.kind == HabitKind::Constructive && h.bucket_for(today).is_none())
        .map(|h| h.name.clone())
        .collect()
}

pub fn reminder_message(names: &[String]) -> String {
    format!("Reminder: You haven't logged {} today. Keep the flow!", names.join(", "))
}
