//! Tools for charts and the activity calendar
//!
//! This module implements the habit_analytics and habit_calendar MCP tools.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{calendar_month, AnalyticsEngine, CalendarDay, Series, TimeRange, MAX_COMPARED_HABITS};
use crate::domain::{HabitId, Ledger};
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for a chart series
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct AnalyticsParams {
    /// Habits to compare, at most 5 (defaults to the first habit)
    #[serde(default)]
    pub habit_ids: Vec<String>,
    /// "daily", "weekly", "monthly" or "yearly" (default weekly)
    #[serde(default)]
    pub range: Option<String>,
}

/// Parameters for the activity calendar
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarParams {
    /// Calendar year (defaults to the current year)
    #[serde(default)]
    pub year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    #[serde(default)]
    pub month: Option<u32>,
}

/// Response with a chart series
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub series: Series,
    pub message: String,
}

/// Response with a calendar grid
#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<CalendarDay>>,
    pub logged_days: usize,
    pub message: String,
}

/// Build a chart series for up to five habits
pub fn get_analytics(ledger: &Ledger, today: NaiveDate, params: AnalyticsParams) -> Result<AnalyticsResponse, ToolError> {
    let range = match params.range.as_deref() {
        Some(raw) => TimeRange::parse(raw).ok_or_else(|| {
            ToolError::Validation(format!("Invalid range '{}'. Valid options: daily, weekly, monthly, yearly", raw))
        })?,
        None => TimeRange::Weekly,
    };
    if params.habit_ids.len() > MAX_COMPARED_HABITS {
        return Err(ToolError::Validation(format!(
            "At most {} habits can be compared at once",
            MAX_COMPARED_HABITS
        )));
    }

    let requested = params
        .habit_ids
        .iter()
        .map(|raw| parse_habit_id(raw))
        .collect::<Result<Vec<HabitId>, _>>()?;

    let series = AnalyticsEngine::new().series(ledger.habits(), &requested, range, today);

    let message = if series.habit_ids.is_empty() {
        "No habits to chart yet.".to_string()
    } else if !series.has_data {
        format!("No {} activity for the selected habits yet.", range.name())
    } else {
        let names: Vec<String> = series
            .habit_ids
            .iter()
            .filter_map(|id| ledger.get(id).map(|h| h.name.clone()))
            .collect();
        let rows = series
            .points
            .iter()
            .map(|p| {
                let values: Vec<String> = p.values.iter().map(|v| v.value.to_string()).collect();
                format!("{:>5} | {}", p.label, values.join(" | "))
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("📈 **{} activity**: {}\n{}", range.name(), names.join(" | "), rows)
    };

    Ok(AnalyticsResponse { series, message })
}

/// Month grid marking the days with any log
pub fn get_calendar(ledger: &Ledger, today: NaiveDate, params: CalendarParams) -> Result<CalendarResponse, ToolError> {
    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(ToolError::Validation(format!("Invalid month {}. Use 1-12", month)));
    }

    let cells = calendar_month(ledger.habits(), year, month);
    let logged_days = cells.iter().flatten().filter(|d| d.logged).count();

    let mut grid = String::from("Su Mo Tu We Th Fr Sa\n");
    for (i, cell) in cells.iter().enumerate() {
        match cell {
            Some(day) if day.logged => grid.push_str(&format!("{:>2}*", day.date.day())),
            Some(day) => grid.push_str(&format!("{:>2} ", day.date.day())),
            None => grid.push_str("   "),
        }
        if i % 7 == 6 {
            grid.push('\n');
        }
    }

    let message = format!(
        "🗓️ **{}-{:02}**: {} day(s) with activity (*)\n{}",
        year,
        month,
        logged_days,
        grid.trim_end()
    );

    Ok(CalendarResponse { year, month, cells, logged_days, message })
}
