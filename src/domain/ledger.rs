//! Habit log ledger
//!
//! The ledger owns the habit collection and is the only place that mutates
//! log history. Every mutation computes a complete replacement for the one
//! habit it touches and swaps it in, so callers never observe a half-applied
//! change. The engine does no I/O; persisting the collection after a change
//! is the caller's job.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use crate::domain::{
    coerce_amount, Clock, DayBucket, DomainError, Habit, HabitId, LogEntry, NewHabit,
    MAX_LOG_AMOUNT,
};

/// The in-memory habit collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    habits: Vec<Habit>,
}

impl Ledger {
    pub fn new(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, habit_id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == habit_id)
    }

    /// Create a habit through the creation boundary and append it
    pub fn create_habit(&mut self, request: NewHabit) -> Result<&Habit, DomainError> {
        let habit = Habit::new(request)?;
        debug!("Created habit {} ({})", habit.name, habit.id);
        self.habits.push(habit);
        Ok(&self.habits[self.habits.len() - 1])
    }

    /// Log (`increment = true`) or undo (`increment = false`) activity
    ///
    /// Unknown ids and retractions with nothing to remove are silent no-ops.
    /// Returns whether the collection changed.
    pub fn log_activity(
        &mut self,
        habit_id: &HabitId,
        increment: bool,
        amount: impl Into<f64>,
        unit: &str,
        clock: &dyn Clock,
    ) -> bool {
        let amount = coerce_amount(amount.into());
        let Some(slot) = self.habits.iter_mut().find(|h| &h.id == habit_id) else {
            debug!("Ignoring log for unknown habit {}", habit_id);
            return false;
        };

        match apply_log(slot, increment, amount, unit, clock.now()) {
            Some(updated) => {
                debug!(
                    "{} {} on {} -> total {}",
                    if increment { "Logged" } else { "Retracted" },
                    amount,
                    updated.name,
                    updated.total_logs
                );
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Rename a habit; unknown ids are ignored
    pub fn rename_habit(&mut self, habit_id: &HabitId, name: &str) -> Result<bool, DomainError> {
        let Some(slot) = self.habits.iter_mut().find(|h| &h.id == habit_id) else {
            return Ok(false);
        };
        let mut updated = slot.clone();
        updated.rename(name)?;
        *slot = updated;
        Ok(true)
    }

    /// Delete a habit, returning it if it existed
    pub fn remove_habit(&mut self, habit_id: &HabitId) -> Option<Habit> {
        let index = self.habits.iter().position(|h| &h.id == habit_id)?;
        let removed = self.habits.remove(index);
        debug!("Removed habit {} ({})", removed.name, removed.id);
        Some(removed)
    }

    /// Drop every log from every habit, keeping the habits themselves
    pub fn clear_logs(&mut self) -> bool {
        let mut changed = false;
        for habit in self.habits.iter_mut().filter(|h| h.total_logs > 0 || !h.day_buckets.is_empty()) {
            habit.total_logs = 0;
            habit.day_buckets.clear();
            changed = true;
        }
        changed
    }
}

/// Compute the result of one log action on a habit
///
/// Returns `None` when the action leaves the habit unchanged.
pub fn apply_log(
    habit: &Habit,
    increment: bool,
    amount: u32,
    unit: &str,
    now: NaiveDateTime,
) -> Option<Habit> {
    let amount = amount.clamp(1, MAX_LOG_AMOUNT);
    if increment {
        Some(append(habit, amount, unit, now))
    } else {
        retract(habit, amount, now.date())
    }
}

fn append(habit: &Habit, amount: u32, unit: &str, now: NaiveDateTime) -> Habit {
    let mut updated = habit.clone();
    let today = now.date();

    let new_entries: Vec<LogEntry> = if habit.is_counted() {
        let resolved_unit = if unit.is_empty() { habit.unit.as_str() } else { unit };
        vec![LogEntry::count(now.time(), amount, resolved_unit)]
    } else {
        (0..amount).map(|_| LogEntry::tap(now.time())).collect()
    };

    let index = bucket_index(&updated, today).unwrap_or_else(|| {
        updated.day_buckets.push(DayBucket::new(today));
        updated.day_buckets.len() - 1
    });
    let bucket = &mut updated.day_buckets[index];
    bucket.count += u64::from(amount);
    bucket.entries.extend(new_entries);
    updated.total_logs += u64::from(amount);

    updated
}

fn retract(habit: &Habit, amount: u32, today: NaiveDate) -> Option<Habit> {
    let index = bucket_index(habit, today)?;
    let mut updated = habit.clone();
    let bucket = &mut updated.day_buckets[index];

    let removed = if habit.is_counted() && !bucket.entries.is_empty() {
        // Undo exactly the most recent action, whatever amount was asked for
        let last = bucket.entries.pop()?;
        let value = u64::from(last.amount());
        bucket.count = bucket.count.saturating_sub(value);
        value
    } else {
        let removable = u64::from(amount).min(habit.total_logs).min(bucket.count);
        if removable == 0 {
            return None;
        }
        bucket.count -= removable;
        for _ in 0..removable {
            if bucket.entries.pop().is_none() {
                break;
            }
        }
        removable
    };

    let emptied = bucket.count == 0;
    updated.total_logs = updated.total_logs.saturating_sub(removed);
    if emptied {
        updated.day_buckets.remove(index);
    }

    Some(updated)
}

fn bucket_index(habit: &Habit, date: NaiveDate) -> Option<usize> {
    habit.day_buckets.iter().position(|b| b.date == date)
}
