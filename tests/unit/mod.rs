/// Unit tests for the habit ledger through the public API
use chrono::NaiveDate;
use habitflow_mcp::*;
use serde_json::json;

#[cfg(test)]
mod ledger_unit_tests {
    use super::*;

    fn new_habit(name: &str, kind: HabitKind, mode: LogMode, unit: Option<&str>) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            kind,
            mode,
            unit: unit.map(str::to_string),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_habit_creation_validates_name() {
        let habit = Habit::new(new_habit("  Morning Run ", HabitKind::Constructive, LogMode::Tally, Some("km")));
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Morning Run");
        // Tally habits carry no unit
        assert_eq!(habit.unit, "");
        assert_eq!(habit.total_logs, 0);

        assert!(Habit::new(new_habit("   ", HabitKind::Constructive, LogMode::Tally, None)).is_err());
    }

    #[test]
    fn test_amount_coercion() {
        assert_eq!(coerce_amount(f64::NAN), 1);
        assert_eq!(coerce_amount(0.0), 1);
        assert_eq!(coerce_amount(-4.0), 1);
        assert_eq!(coerce_amount(2.9), 2);
        assert_eq!(coerce_amount(40.0), 40);
    }

    #[test]
    fn test_tally_undo_is_clamped_to_today() {
        let mut ledger = Ledger::default();
        let id = ledger
            .create_habit(new_habit("Coffee", HabitKind::Destructive, LogMode::Tally, None))
            .unwrap()
            .id
            .clone();

        let yesterday = FixedClock::at(2026, 10, 18, 8, 0, 0);
        let today = FixedClock::at(2026, 10, 19, 8, 0, 0);
        assert!(ledger.log_activity(&id, true, 3, "", &yesterday));
        assert!(ledger.log_activity(&id, true, 2, "", &today));

        // Asking for more than today's count only removes today's units
        assert!(ledger.log_activity(&id, false, 10, "", &today));
        let habit = ledger.get(&id).unwrap();
        assert_eq!(habit.total_logs, 3);
        assert!(habit.bucket_for(date(2026, 10, 19)).is_none());
        assert!(habit.is_consistent());

        // Nothing left today: undo is a no-op
        assert!(!ledger.log_activity(&id, false, 1, "", &today));
    }

    #[test]
    fn test_counted_entries_keep_their_unit() {
        let mut ledger = Ledger::default();
        let id = ledger
            .create_habit(new_habit("Water", HabitKind::Constructive, LogMode::Counted, Some("glasses")))
            .unwrap()
            .id
            .clone();
        let clock = FixedClock::at(2026, 10, 19, 13, 5, 9);

        ledger.log_activity(&id, true, 2, "", &clock);
        ledger.log_activity(&id, true, 1, "litres", &clock);

        let bucket = ledger.get(&id).unwrap().bucket_for(clock.today()).unwrap();
        assert_eq!(bucket.count, 3);
        assert_eq!(bucket.entries[0].unit(), Some("glasses"));
        assert_eq!(bucket.entries[1].unit(), Some("litres"));
        assert_eq!(bucket.entry_total(), bucket.count);
    }

    #[test]
    fn test_legacy_ledger_loads() {
        let stored = json!([{
            "id": "1700000000000",
            "name": "Journal",
            "type": "Good",
            "mode": "count",
            "unit": "pages",
            "totalLogs": 5,
            "logs": [
                { "date": "2026-10-18", "count": 5, "entries": ["21:30:00|3|pages", "22:00:00|2|pages"] }
            ]
        }]);

        let habits: Vec<Habit> = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(habits[0].kind, HabitKind::Constructive);
        assert_eq!(habits[0].mode, LogMode::Counted);
        assert_eq!(habits[0].day_buckets[0].entries[0].amount(), 3);

        // Saving writes the same shape back
        assert_eq!(serde_json::to_value(&habits).unwrap(), stored);
    }

    #[test]
    fn test_streak_counts_back_from_today() {
        let mut ledger = Ledger::default();
        let id = ledger
            .create_habit(new_habit("Run", HabitKind::Constructive, LogMode::Tally, None))
            .unwrap()
            .id
            .clone();
        for day in [15, 17, 18, 19] {
            ledger.log_activity(&id, true, 1, "", &FixedClock::at(2026, 10, day, 7, 0, 0));
        }

        let streak = Streak::calculate(ledger.habits(), date(2026, 10, 19));
        assert_eq!(streak.current_streak, 3);
        assert_eq!(streak.active_days, 4);
        assert_eq!(streak.last_logged, Some(date(2026, 10, 19)));

        let broken = Streak::calculate(ledger.habits(), date(2026, 10, 21));
        assert_eq!(broken.current_streak, 0);
    }

    #[test]
    fn test_clear_logs_keeps_habits() {
        let mut ledger = Ledger::default();
        let id = ledger
            .create_habit(new_habit("Games", HabitKind::Destructive, LogMode::Tally, None))
            .unwrap()
            .id
            .clone();
        ledger.log_activity(&id, true, 4, "", &FixedClock::at(2026, 10, 19, 20, 0, 0));

        assert!(ledger.clear_logs());
        assert_eq!(ledger.habits().len(), 1);
        assert_eq!(ledger.habits()[0].total_logs, 0);
        assert!(!ledger.clear_logs());
    }

    #[test]
    fn test_dashboard_splits_by_kind() {
        let mut ledger = Ledger::default();
        let good = ledger
            .create_habit(new_habit("Read", HabitKind::Constructive, LogMode::Tally, None))
            .unwrap()
            .id
            .clone();
        let bad = ledger
            .create_habit(new_habit("Scroll", HabitKind::Destructive, LogMode::Tally, None))
            .unwrap()
            .id
            .clone();
        let clock = FixedClock::at(2026, 10, 19, 10, 0, 0);
        ledger.log_activity(&good, true, 2, "", &clock);
        ledger.log_activity(&bad, true, 5, "", &clock);

        let summary = AnalyticsEngine::new().dashboard(ledger.habits(), clock.today());
        assert_eq!(summary.total_activity, 7);
        assert_eq!(summary.constructive_logs, 2);
        assert_eq!(summary.destructive_logs, 5);
        assert_eq!(summary.streak.current_streak, 1);
    }
}
