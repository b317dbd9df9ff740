//! Log entries and per-day buckets
//!
//! A `LogEntry` is one atomic log action. Inside the crate it is a tagged
//! record; on disk it keeps the pipe-delimited string encoding older ledgers
//! were written with (`HH:MM:SS` or `HH:MM:SS|amount|unit`). `encode` and
//! `decode` are the only places that know about that format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::{NaiveDate, NaiveTime, Timelike};
use tracing::warn;

/// Time format used for entry timestamps (24-hour, no timezone)
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Separator of the legacy composite encoding
const FIELD_SEPARATOR: char = '|';

/// One atomic log action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// A single Tally unit logged at `time`
    Tap { time: NaiveTime },
    /// A Counted action of `amount` units
    Count {
        time: NaiveTime,
        amount: u32,
        unit: String,
    },
}

impl LogEntry {
    pub fn tap(time: NaiveTime) -> Self {
        LogEntry::Tap { time: truncate_to_seconds(time) }
    }

    pub fn count(time: NaiveTime, amount: u32, unit: impl Into<String>) -> Self {
        LogEntry::Count {
            time: truncate_to_seconds(time),
            amount: amount.max(1),
            unit: unit.into(),
        }
    }

    pub fn time(&self) -> NaiveTime {
        match self {
            LogEntry::Tap { time } | LogEntry::Count { time, .. } => *time,
        }
    }

    /// Number of units this entry contributes to its bucket
    pub fn amount(&self) -> u32 {
        match self {
            LogEntry::Tap { .. } => 1,
            LogEntry::Count { amount, .. } => *amount,
        }
    }

    /// Value shown in feeds and exports; taps have none
    pub fn value(&self) -> Option<u32> {
        match self {
            LogEntry::Tap { .. } => None,
            LogEntry::Count { amount, .. } => Some(*amount),
        }
    }

    /// Unit label, `None` for taps and for counts logged without a unit
    pub fn unit(&self) -> Option<&str> {
        match self {
            LogEntry::Count { unit, .. } if !unit.is_empty() => Some(unit),
            _ => None,
        }
    }

    pub fn hour(&self) -> u32 {
        self.time().hour()
    }

    /// Encode into the persisted string form
    pub fn encode(&self) -> String {
        match self {
            LogEntry::Tap { time } => time.format(TIME_FORMAT).to_string(),
            LogEntry::Count { time, amount, unit } => format!(
                "{}{sep}{}{sep}{}",
                time.format(TIME_FORMAT),
                amount,
                unit,
                sep = FIELD_SEPARATOR
            ),
        }
    }

    /// Decode the persisted string form
    ///
    /// Decoding never fails: a stored entry always keeps its place in the
    /// bucket so the bucket count still matches its entries. A composite
    /// whose amount is not a positive integer decodes with an amount of 1,
    /// the same value retraction has always assumed for it.
    pub fn decode(raw: &str) -> Self {
        let mut parts = raw.split(FIELD_SEPARATOR);
        let time = parse_time(raw, parts.next().unwrap_or_default());

        match parts.next() {
            None => LogEntry::Tap { time },
            Some(amount_part) => {
                let amount = amount_part
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|a| *a > 0)
                    .unwrap_or(1);
                let unit = parts.next().unwrap_or_default().to_string();
                LogEntry::Count { time, amount, unit }
            }
        }
    }
}

/// Read a stored time of day
///
/// Some clients wrote the first hour after midnight as `24`, which reads as
/// `00`. A time that cannot be read at all falls back to midnight.
fn parse_time(raw_entry: &str, time_part: &str) -> NaiveTime {
    let time_part = time_part.trim();
    if let Ok(time) = NaiveTime::parse_from_str(time_part, TIME_FORMAT) {
        return time;
    }

    let mut fields = time_part.split(':').map(|f| f.trim().parse::<u32>().ok());
    let lenient = match (fields.next().flatten(), fields.next().flatten()) {
        (Some(hour), Some(minute)) => {
            let second = fields.next().flatten().unwrap_or(0);
            NaiveTime::from_hms_opt(if hour == 24 { 0 } else { hour }, minute, second)
        }
        _ => None,
    };

    lenient.unwrap_or_else(|| {
        warn!("Unreadable time in log entry '{}', using 00:00:00", raw_entry);
        NaiveTime::MIN
    })
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for LogEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LogEntry::decode(&raw))
    }
}

/// All log actions of one habit on one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// Calendar date key (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Sum of the amounts logged on this date
    pub count: u64,
    /// Log actions in the order they were appended
    #[serde(default)]
    pub entries: Vec<LogEntry>,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            entries: Vec::new(),
        }
    }

    /// Sum of the amounts encoded in the entries
    pub fn entry_total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.amount())).sum()
    }
}

/// Largest amount a single log action may carry
pub const MAX_LOG_AMOUNT: u32 = 10_000;

/// Coerce a raw logged amount the way the log controls always have:
/// `max(1, floor(amount))`, with NaN and zero treated as 1. Amounts above
/// `MAX_LOG_AMOUNT` are clamped to it.
pub fn coerce_amount(raw: f64) -> u32 {
    if raw.is_nan() || raw == 0.0 {
        return 1;
    }
    raw.floor().clamp(1.0, f64::from(MAX_LOG_AMOUNT)) as u32
}

fn truncate_to_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}
