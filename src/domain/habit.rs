//! Habit entity and the habit-creation boundary
//!
//! This module defines the Habit struct, the `NewHabit` request that creates
//! one, and the name validation shared by creation and rename.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{DayBucket, DomainError, HabitId, HabitKind, LogMode};

/// Longest accepted habit name, in characters
const MAX_NAME_LEN: usize = 100;

/// Longest accepted unit label, in characters
const MAX_UNIT_LEN: usize = 20;

/// A habit and its full log history
///
/// Field names on the wire match the ledgers older clients persisted
/// (`type`, `totalLogs`, `logs`), so a saved collection round-trips as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Doomscrolling")
    pub name: String,
    /// Whether logging this habit is a positive or negative behavior
    #[serde(rename = "type")]
    pub kind: HabitKind,
    /// Tally (one unit per tap) or Counted (amount per action)
    #[serde(default)]
    pub mode: LogMode,
    /// Unit label for Counted habits (e.g., "pages", "km"); empty otherwise
    #[serde(default)]
    pub unit: String,
    /// Running sum of every logged amount
    #[serde(rename = "totalLogs", default)]
    pub total_logs: u64,
    /// One bucket per date with at least one log, in insertion order
    #[serde(rename = "logs", default)]
    pub day_buckets: Vec<DayBucket>,
}

/// Input accepted by the habit-creation boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub kind: HabitKind,
    pub mode: LogMode,
    pub unit: Option<String>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The name is trimmed and must not be empty. The unit is kept only for
    /// Counted habits.
    pub fn new(request: NewHabit) -> Result<Self, DomainError> {
        let name = Self::validate_name(&request.name)?;

        let unit = match request.mode {
            LogMode::Counted => Self::validate_unit(request.unit.as_deref().unwrap_or(""))?,
            LogMode::Tally => String::new(),
        };

        Ok(Self {
            id: HabitId::new(),
            name,
            kind: request.kind,
            mode: request.mode,
            unit,
            total_logs: 0,
            day_buckets: Vec::new(),
        })
    }

    /// Rename the habit, validating the new name
    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = Self::validate_name(name)?;
        Ok(())
    }

    pub fn is_counted(&self) -> bool {
        self.mode == LogMode::Counted
    }

    /// Bucket for a given date, if any logs exist on it
    pub fn bucket_for(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.day_buckets.iter().find(|b| b.date == date)
    }

    /// Number of discrete log actions across all days
    pub fn entry_count(&self) -> usize {
        self.day_buckets.iter().map(|b| b.entries.len()).sum()
    }

    /// Whether any amount was logged on the given date
    pub fn has_activity_on(&self, date: NaiveDate) -> bool {
        self.bucket_for(date).map_or(false, |b| b.count > 0)
    }

    /// Get a display string for the habit totals (e.g., "3 log(s) · 45 min")
    pub fn totals_display(&self) -> String {
        match self.mode {
            LogMode::Tally => format!("{} logs", self.total_logs),
            LogMode::Counted => {
                let unit = if self.unit.is_empty() { "total" } else { self.unit.as_str() };
                format!("{} log(s) · {} {}", self.entry_count(), self.total_logs, unit)
            }
        }
    }

    /// Check the ledger invariants for this habit
    ///
    /// `total_logs` must equal the sum of bucket counts, which must equal the
    /// sum of the entry amounts, and no bucket may be empty.
    pub fn is_consistent(&self) -> bool {
        let bucket_sum: u64 = self.day_buckets.iter().map(|b| b.count).sum();
        let entry_sum: u64 = self.day_buckets.iter().map(DayBucket::entry_total).sum();
        let no_empty = self.day_buckets.iter().all(|b| b.count > 0);
        no_empty && self.total_logs == bucket_sum && bucket_sum == entry_sum
    }

    // Validation helper methods

    /// Validate habit name according to business rules, returning it trimmed
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(
                format!("Habit name cannot be longer than {} characters", MAX_NAME_LEN)
            ));
        }

        Ok(trimmed.to_string())
    }

    fn validate_unit(unit: &str) -> Result<String, DomainError> {
        let trimmed = unit.trim();
        if trimmed.chars().count() > MAX_UNIT_LEN {
            return Err(DomainError::InvalidValue {
                message: format!("Unit cannot be longer than {} characters", MAX_UNIT_LEN)
            });
        }
        Ok(trimmed.to_string())
    }
}
