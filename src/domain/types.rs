//! Core types and enums used throughout the domain layer
//!
//! This module defines the identifier type and the two habit classifiers
//! (kind and logging mode) shared by Habit, the ledger and the derived views.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a habit
///
/// Identifiers are opaque strings. New habits get a UUID v4, but ledgers
/// saved by older clients carry other shapes (e.g. millisecond timestamps),
/// so any non-empty string is accepted when loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (from storage or a tool call)
    pub fn from_string(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether logging a habit is a positive or a negative behavior
///
/// Persisted with the labels `Good` / `Bad` so existing ledgers load as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitKind {
    /// A habit the user wants more of
    #[serde(rename = "Good")]
    Constructive,
    /// A habit the user wants less of
    #[serde(rename = "Bad")]
    Destructive,
}

impl HabitKind {
    /// Get the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            HabitKind::Constructive => "Constructive",
            HabitKind::Destructive => "Destructive",
        }
    }

    /// Label used in persisted data and in the CSV `Type` column
    pub fn label(&self) -> &'static str {
        match self {
            HabitKind::Constructive => "Good",
            HabitKind::Destructive => "Bad",
        }
    }

    /// Parse a kind from user input, accepting both naming schemes
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "constructive" | "good" | "positive" => Some(HabitKind::Constructive),
            "destructive" | "bad" | "negative" => Some(HabitKind::Destructive),
            _ => None,
        }
    }
}

/// How a single log action is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogMode {
    /// One unit per tap, stored as a bare timestamp
    #[default]
    #[serde(rename = "quick")]
    Tally,
    /// A user-supplied amount with an optional unit label
    #[serde(rename = "count")]
    Counted,
}

impl LogMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            LogMode::Tally => "Tally",
            LogMode::Counted => "Counted",
        }
    }

    /// Parse a mode from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tally" | "quick" | "tap" => Some(LogMode::Tally),
            "counted" | "count" => Some(LogMode::Counted),
            _ => None,
        }
    }
}
