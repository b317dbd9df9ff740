//! Streak calculation
//!
//! The streak is global: it counts consecutive calendar days, walking back
//! from today, on which at least one habit has a day bucket. Per-habit
//! history only matters through the set of dates it contributes.

use std::collections::BTreeSet;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use crate::domain::Habit;

/// Calculated streak information across all habits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    /// Consecutive days ending today with at least one log
    pub current_streak: u32,
    /// Most recent date with any log (None if never logged)
    pub last_logged: Option<NaiveDate>,
    /// Number of distinct dates with any log
    pub active_days: u32,
}

impl Streak {
    /// Calculate the streak as of `today`
    pub fn calculate(habits: &[Habit], today: NaiveDate) -> Self {
        let dates = logged_dates(habits);

        let mut current_streak = 0;
        let mut checking_date = today;
        // A streak can never be longer than the number of logged dates
        for _ in 0..dates.len() {
            if dates.contains(&checking_date) {
                current_streak += 1;
                checking_date = checking_date - Duration::days(1);
            } else {
                break;
            }
        }

        Self {
            current_streak,
            last_logged: dates.iter().next_back().copied(),
            active_days: dates.len() as u32,
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "No logs today yet. Every streak starts with a single entry.".to_string(),
            1 => "Day one is on the board. Keep the momentum going.".to_string(),
            2..=6 => format!("{} days in a row. The routine is taking shape.", self.current_streak),
            7..=29 => format!("{} days strong. You're in the groove now!", self.current_streak),
            _ => format!("{} days of unbroken logging. Remarkable consistency.", self.current_streak),
        }
    }
}

/// Distinct dates on which any habit has a bucket
pub fn logged_dates(habits: &[Habit]) -> BTreeSet<NaiveDate> {
    habits
        .iter()
        .flat_map(|h| h.day_buckets.iter().map(|b| b.date))
        .collect()
}
