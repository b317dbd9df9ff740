//! Chart series, activity calendar and recent-activity strips
//!
//! All projections here are recomputed from the habit collection on every
//! call; nothing is cached.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use crate::domain::{logged_dates, Habit, HabitId};

/// Most habits a single chart compares
pub const MAX_COMPARED_HABITS: usize = 5;

/// Time window of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// 24 hourly buckets for today
    Daily,
    /// The last 7 days
    Weekly,
    /// The last 30 days
    Monthly,
    /// 12 points, one month apart
    Yearly,
}

impl TimeRange {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Some(TimeRange::Daily),
            "weekly" | "week" => Some(TimeRange::Weekly),
            "monthly" | "month" => Some(TimeRange::Monthly),
            "yearly" | "year" => Some(TimeRange::Yearly),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeRange::Daily => "daily",
            TimeRange::Weekly => "weekly",
            TimeRange::Monthly => "monthly",
            TimeRange::Yearly => "yearly",
        }
    }

    /// Number of points in the series
    pub fn len(&self) -> usize {
        match self {
            TimeRange::Daily => 24,
            TimeRange::Weekly => 7,
            TimeRange::Monthly => 30,
            TimeRange::Yearly => 12,
        }
    }
}

/// Value of one habit at one point of a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitValue {
    pub habit_id: HabitId,
    pub value: u64,
}

/// One labelled point of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub values: Vec<HabitValue>,
}

/// A chart-ready series for the selected habits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub range: TimeRange,
    pub habit_ids: Vec<HabitId>,
    pub points: Vec<SeriesPoint>,
    /// Whether any selected habit has a non-zero value in the window
    pub has_data: bool,
}

/// Resolve which habits a chart shows
///
/// Unknown ids are dropped, duplicates collapse, at most
/// `MAX_COMPARED_HABITS` are kept, and an empty selection falls back to the
/// first habit in the collection.
pub fn select_habits<'a>(habits: &'a [Habit], requested: &[HabitId]) -> Vec<&'a Habit> {
    let mut selected: Vec<&Habit> = Vec::new();
    for id in requested {
        if selected.len() == MAX_COMPARED_HABITS {
            break;
        }
        if selected.iter().any(|h| &h.id == id) {
            continue;
        }
        if let Some(habit) = habits.iter().find(|h| &h.id == id) {
            selected.push(habit);
        }
    }
    if selected.is_empty() {
        selected.extend(habits.first());
    }
    selected
}

/// Build the series for `selected` over `range`, as of `today`
pub fn build_series(selected: &[&Habit], range: TimeRange, today: NaiveDate) -> Series {
    let points: Vec<SeriesPoint> = match range {
        TimeRange::Daily => (0..24u32)
            .map(|hour| SeriesPoint {
                label: format!("{:02}:00", hour),
                values: selected
                    .iter()
                    .map(|habit| HabitValue {
                        habit_id: habit.id.clone(),
                        value: hourly_total(habit, today, hour),
                    })
                    .collect(),
            })
            .collect(),
        _ => (0..range.len())
            .rev()
            .map(|offset| {
                let date = point_date(range, today, offset as u32);
                SeriesPoint {
                    label: point_label(range, date),
                    values: selected
                        .iter()
                        .map(|habit| HabitValue {
                            habit_id: habit.id.clone(),
                            value: habit.bucket_for(date).map_or(0, |b| b.count),
                        })
                        .collect(),
                }
            })
            .collect(),
    };

    let has_data = points
        .iter()
        .any(|p| p.values.iter().any(|v| v.value > 0));

    Series {
        range,
        habit_ids: selected.iter().map(|h| h.id.clone()).collect(),
        points,
        has_data,
    }
}

/// Units logged during one hour of `date`
fn hourly_total(habit: &Habit, date: NaiveDate, hour: u32) -> u64 {
    habit
        .bucket_for(date)
        .map(|bucket| {
            bucket
                .entries
                .iter()
                .filter(|e| e.hour() == hour)
                .map(|e| u64::from(e.amount()))
                .sum()
        })
        .unwrap_or(0)
}

/// Date of the point `offset` steps before today
fn point_date(range: TimeRange, today: NaiveDate, offset: u32) -> NaiveDate {
    match range {
        // Same day-of-month, `offset` months back (clamped to month end)
        TimeRange::Yearly => today.checked_sub_months(Months::new(offset)).unwrap_or(today),
        _ => today - Duration::days(i64::from(offset)),
    }
}

fn point_label(range: TimeRange, date: NaiveDate) -> String {
    match range {
        TimeRange::Daily | TimeRange::Weekly => date.format("%a").to_string(),
        TimeRange::Monthly => date.day().to_string(),
        TimeRange::Yearly => date.format("%b").to_string(),
    }
}

/// One cell of the monthly activity calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Whether any habit has a log on this date
    pub logged: bool,
}

/// Calendar grid for a month, Sunday first
///
/// Leading `None` cells pad the first week up to the weekday of the 1st.
/// Returns an empty grid for an invalid year/month.
pub fn calendar_month(habits: &[Habit], year: i32, month: u32) -> Vec<Option<CalendarDay>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let dates = logged_dates(habits);

    let mut cells: Vec<Option<CalendarDay>> =
        vec![None; first.weekday().num_days_from_sunday() as usize];
    let mut date = first;
    while date.month() == month {
        cells.push(Some(CalendarDay { date, logged: dates.contains(&date) }));
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }
    cells
}

/// One day of a habit's recent-activity strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub label: String,
    pub is_today: bool,
    pub active: bool,
}

/// The last 7 days of one habit, oldest first
pub fn recent_activity(habit: &Habit, today: NaiveDate) -> Vec<ActivityDay> {
    (0..7i64)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            ActivityDay {
                date,
                label: date.format("%a").to_string(),
                is_today: offset == 0,
                active: habit.has_activity_on(date),
            }
        })
        .collect()
}
