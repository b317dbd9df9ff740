//! Clock capability
//!
//! Everything that needs "today" or "now" asks a `Clock` instead of reading
//! the host clock directly, so tests can pin the date.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Source of the current host-local date and time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn time(&self) -> NaiveTime {
        self.now().time()
    }
}

/// Reads the host's local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Fixed clock at the given date and time of day
    ///
    /// Out-of-range components fall back to midnight on the Unix epoch.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
        let time = NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN);
        Self(date.and_time(time))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_splits_date_and_time() {
        let clock = FixedClock::at(2026, 10, 19, 14, 30, 5);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(clock.time(), NaiveTime::from_hms_opt(14, 30, 5).unwrap());
    }
}
