//! Flattened log feed and activity counts
//!
//! The feed expands every entry of every habit into one row. It backs the
//! recent-logs list, the full logs table and the log feed CSV export.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use crate::domain::{Habit, HabitId, HabitKind, TIME_FORMAT};

/// One log action, flattened out of its habit and day bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub habit_id: HabitId,
    pub habit_name: String,
    pub kind: HabitKind,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveTime,
    /// Logged amount for Counted entries, `None` for taps
    pub value: Option<u32>,
    pub unit: Option<String>,
}

impl FeedEntry {
    /// Short description used in feeds (e.g. "07:30:00 · 2026-10-19 · 5 km")
    pub fn describe(&self) -> String {
        let mut line = format!("{} · {}", self.time.format(TIME_FORMAT), self.date);
        if let Some(value) = self.value {
            line.push_str(&format!(" · {} {}", value, self.unit.as_deref().unwrap_or("")));
        }
        line.trim_end().to_string()
    }
}

/// Every entry across all habits, newest first
///
/// Entries with the same date and time keep their collection order.
pub fn flatten_log_feed(habits: &[Habit]) -> Vec<FeedEntry> {
    let mut feed: Vec<FeedEntry> = habits
        .iter()
        .flat_map(|habit| {
            habit.day_buckets.iter().flat_map(move |bucket| {
                bucket.entries.iter().map(move |entry| FeedEntry {
                    habit_id: habit.id.clone(),
                    habit_name: habit.name.clone(),
                    kind: habit.kind,
                    date: bucket.date,
                    time: entry.time(),
                    value: entry.value(),
                    unit: entry.unit().map(str::to_string),
                })
            })
        })
        .collect();

    feed.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
    feed
}

/// Number of log actions (entries, not summed amounts) across all habits
pub fn total_activity(habits: &[Habit]) -> usize {
    habits.iter().map(Habit::entry_count).sum()
}

/// Number of log actions on habits of the given kind
pub fn activity_for_kind(habits: &[Habit], kind: HabitKind) -> usize {
    habits
        .iter()
        .filter(|h| h.kind == kind)
        .map(Habit::entry_count)
        .sum()
}

fn serialize_time<S: serde::Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(TIME_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, Ledger, LogMode, NewHabit};

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::default();
        let run = ledger
            .create_habit(NewHabit {
                name: "Run".to_string(),
                kind: HabitKind::Constructive,
                mode: LogMode::Counted,
                unit: Some("km".to_string()),
            })
            .unwrap()
            .id
            .clone();
        let snack = ledger
            .create_habit(NewHabit {
                name: "Snack".to_string(),
                kind: HabitKind::Destructive,
                mode: LogMode::Tally,
                unit: None,
            })
            .unwrap()
            .id
            .clone();

        ledger.log_activity(&run, true, 5, "", &FixedClock::at(2026, 10, 18, 7, 0, 0));
        ledger.log_activity(&snack, true, 2, "", &FixedClock::at(2026, 10, 19, 15, 30, 0));
        ledger.log_activity(&run, true, 3, "", &FixedClock::at(2026, 10, 19, 8, 0, 0));
        ledger
    }

    #[test]
    fn test_feed_is_newest_first() {
        let ledger = sample_ledger();
        let feed = flatten_log_feed(ledger.habits());

        assert_eq!(feed.len(), 4);
        assert_eq!(feed[0].habit_name, "Snack");
        assert_eq!(feed[0].value, None);
        assert_eq!(feed[2].habit_name, "Run");
        assert_eq!(feed[2].value, Some(3));
        assert_eq!(feed[2].unit.as_deref(), Some("km"));
        assert_eq!(feed[3].date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
    }

    #[test]
    fn test_activity_counts_entries_not_amounts() {
        let ledger = sample_ledger();
        assert_eq!(total_activity(ledger.habits()), 4);
        assert_eq!(activity_for_kind(ledger.habits(), HabitKind::Constructive), 2);
        assert_eq!(activity_for_kind(ledger.habits(), HabitKind::Destructive), 2);
    }

    #[test]
    fn test_describe_entry() {
        let feed = flatten_log_feed(sample_ledger().habits());
        assert_eq!(feed[0].describe(), "15:30:00 · 2026-10-19");
        assert_eq!(feed[2].describe(), "08:00:00 · 2026-10-19 · 3 km");
    }
}
