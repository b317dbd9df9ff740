//! CSV export of the habit collection
//!
//! Two flows exist: the per-entry log feed and the per-day summary. Both are
//! plain comma-joined lines with no quoting, newline separated, and no
//! trailing newline.

use std::fs;
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use crate::analytics::flatten_log_feed;
use crate::domain::{Habit, TIME_FORMAT};

const LOG_FEED_HEADER: &str = "Habit Name,Date,Time,Type,Value,Unit";
const DAILY_SUMMARY_HEADER: &str = "Habit Name,Date,Count,Type";

/// Errors that can occur while writing an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export directory unavailable: {path}")]
    Directory { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which export to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExportFlow {
    /// One row per log entry, newest first
    #[default]
    LogFeed,
    /// One row per habit per logged day
    DailySummary,
}

impl ExportFlow {
    /// File name for an export taken on `today`
    pub fn file_name(&self, today: NaiveDate) -> String {
        match self {
            ExportFlow::LogFeed => format!("auristitutum_logs_{}.csv", today.format("%Y-%m-%d")),
            ExportFlow::DailySummary => format!("habitflow_pro_logs_{}.csv", today.format("%Y-%m-%d")),
        }
    }

    /// Render the CSV content for this flow
    pub fn render(&self, habits: &[Habit]) -> String {
        match self {
            ExportFlow::LogFeed => log_feed_csv(habits),
            ExportFlow::DailySummary => daily_summary_csv(habits),
        }
    }
}

/// The log feed as CSV: name, date, time, type, value, unit
pub fn log_feed_csv(habits: &[Habit]) -> String {
    let mut lines = vec![LOG_FEED_HEADER.to_string()];
    lines.extend(flatten_log_feed(habits).into_iter().map(|entry| {
        format!(
            "{},{},{},{},{},{}",
            entry.habit_name,
            entry.date.format("%Y-%m-%d"),
            entry.time.format(TIME_FORMAT),
            entry.kind.label(),
            entry.value.map(|v| v.to_string()).unwrap_or_default(),
            entry.unit.unwrap_or_default()
        )
    }));
    lines.join("\n")
}

/// One row per day bucket, in collection then bucket order
pub fn daily_summary_csv(habits: &[Habit]) -> String {
    let mut lines = vec![DAILY_SUMMARY_HEADER.to_string()];
    for habit in habits {
        for bucket in &habit.day_buckets {
            lines.push(format!(
                "{},{},{},{}",
                habit.name,
                bucket.date.format("%Y-%m-%d"),
                bucket.count,
                habit.kind.label()
            ));
        }
    }
    lines.join("\n")
}

/// Write an export into `dir`, returning the path of the written file
pub fn write_export(
    dir: &Path,
    flow: ExportFlow,
    habits: &[Habit],
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    if !dir.is_dir() {
        return Err(ExportError::Directory { path: dir.display().to_string() });
    }

    let path = dir.join(flow.file_name(today));
    fs::write(&path, flow.render(habits))?;
    info!("Exported {:?} to {}", flow, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, HabitKind, Ledger, LogMode, NewHabit};
    use tempfile::TempDir;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::default();
        let read = ledger
            .create_habit(NewHabit {
                name: "Read".to_string(),
                kind: HabitKind::Constructive,
                mode: LogMode::Counted,
                unit: Some("pages".to_string()),
            })
            .unwrap()
            .id
            .clone();
        let vape = ledger
            .create_habit(NewHabit {
                name: "Vape".to_string(),
                kind: HabitKind::Destructive,
                mode: LogMode::Tally,
                unit: None,
            })
            .unwrap()
            .id
            .clone();

        ledger.log_activity(&read, true, 12, "", &FixedClock::at(2026, 10, 18, 21, 0, 0));
        ledger.log_activity(&vape, true, 1, "", &FixedClock::at(2026, 10, 19, 10, 15, 0));
        ledger.log_activity(&vape, true, 1, "", &FixedClock::at(2026, 10, 19, 12, 0, 0));
        ledger
    }

    #[test]
    fn test_log_feed_csv() {
        let csv = log_feed_csv(ledger().habits());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Habit Name,Date,Time,Type,Value,Unit");
        assert_eq!(lines[1], "Vape,2026-10-19,12:00:00,Bad,,");
        assert_eq!(lines[3], "Read,2026-10-18,21:00:00,Good,12,pages");
        assert_eq!(lines.len(), 4);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_daily_summary_csv() {
        let csv = daily_summary_csv(ledger().habits());
        assert_eq!(
            csv,
            "Habit Name,Date,Count,Type\nRead,2026-10-18,12,Good\nVape,2026-10-19,2,Bad"
        );
        assert_eq!(daily_summary_csv(&[]), DAILY_SUMMARY_HEADER);
    }

    #[test]
    fn test_write_export_creates_named_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("exports");
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let path = write_export(&target, ExportFlow::DailySummary, ledger().habits(), today).unwrap();
        assert_eq!(path.file_name().unwrap(), "habitflow_pro_logs_2026-10-19.csv");
        assert!(fs::read_to_string(&path).unwrap().starts_with(DAILY_SUMMARY_HEADER));

        let feed = write_export(&target, ExportFlow::LogFeed, &[], today).unwrap();
        assert_eq!(feed.file_name().unwrap(), "auristitutum_logs_2026-10-19.csv");
    }
}
