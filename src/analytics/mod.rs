//! Analytics engine for the derived views of the habit collection
//!
//! Every view here is a pure function of the habits and "today": the
//! dashboard summary, per-habit overviews, chart series, the activity
//! calendar, reminders and the daily insight.

pub mod feed;
pub mod insights;
pub mod reminders;
pub mod series;

pub use feed::*;
pub use insights::*;
pub use reminders::*;
pub use series::*;

use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::{Habit, HabitId, HabitKind, LogMode, Streak};

/// Headline numbers shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Log actions across all habits
    pub total_activity: usize,
    pub active_habits: usize,
    pub constructive_logs: usize,
    pub destructive_logs: usize,
    pub streak: Streak,
    pub streak_message: String,
}

/// Per-habit card: identity, totals and the last 7 days
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitOverview {
    pub id: HabitId,
    pub name: String,
    pub kind: HabitKind,
    pub mode: LogMode,
    pub unit: Option<String>,
    pub total_logs: u64,
    pub totals_display: String,
    /// Units logged today
    pub today_count: u64,
    pub recent_activity: Vec<ActivityDay>,
}

/// Analytics engine for processing habit data
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Dashboard summary as of `today`
    pub fn dashboard(&self, habits: &[Habit], today: NaiveDate) -> DashboardSummary {
        let streak = Streak::calculate(habits, today);
        DashboardSummary {
            total_activity: total_activity(habits),
            active_habits: habits.len(),
            constructive_logs: activity_for_kind(habits, HabitKind::Constructive),
            destructive_logs: activity_for_kind(habits, HabitKind::Destructive),
            streak_message: streak.motivational_message(),
            streak,
        }
    }

    /// Overview card for one habit
    pub fn habit_overview(&self, habit: &Habit, today: NaiveDate) -> HabitOverview {
        HabitOverview {
            id: habit.id.clone(),
            name: habit.name.clone(),
            kind: habit.kind,
            mode: habit.mode,
            unit: Some(habit.unit.clone()).filter(|u| !u.is_empty()),
            total_logs: habit.total_logs,
            totals_display: habit.totals_display(),
            today_count: habit.bucket_for(today).map_or(0, |b| b.count),
            recent_activity: recent_activity(habit, today),
        }
    }

    /// Chart series for the requested habits over `range`
    pub fn series(&self, habits: &[Habit], requested: &[HabitId], range: TimeRange, today: NaiveDate) -> Series {
        let selected = select_habits(habits, requested);
        build_series(&selected, range, today)
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}
