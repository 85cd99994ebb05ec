//! In-memory request counters.
//!
//! Counters live for the lifetime of the process. The daily counter is reset
//! lazily: the first write after the local date changes zeroes it.

use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Raw counter values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub today: u64,
    pub success_count: u64,
    pub failure_count: u64,
}

impl Stats {
    /// Percentage of successful requests, rounded to the nearest integer.
    pub fn success_rate(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        ((self.success_count as f64 / self.total as f64) * 100.0).round() as u64
    }
}

/// Public view served by `/stats`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total: u64,
    pub today: u64,
    pub success_rate: u64,
}

struct CounterState {
    stats: Stats,
    day: NaiveDate,
}

/// Request counters shared by the handlers.
pub struct StatsCounter {
    state: Mutex<CounterState>,
}

impl StatsCounter {
    pub fn new() -> Self {
        Self::starting_on(Local::now().date_naive())
    }

    /// Create a counter whose current day is `day`.
    pub fn starting_on(day: NaiveDate) -> Self {
        Self {
            state: Mutex::new(CounterState {
                stats: Stats::default(),
                day,
            }),
        }
    }

    /// Record a completed request.
    pub fn record(&self, success: bool) {
        self.record_on(success, Local::now().date_naive());
    }

    /// Record a completed request as of `day`.
    pub fn record_on(&self, success: bool, day: NaiveDate) {
        if let Ok(mut state) = self.state.lock() {
            if state.day != day {
                state.stats.today = 0;
                state.day = day;
            }

            state.stats.total += 1;
            state.stats.today += 1;
            if success {
                state.stats.success_count += 1;
            } else {
                state.stats.failure_count += 1;
            }
        }
    }

    /// Current counter values.
    pub fn snapshot(&self) -> Stats {
        self.state
            .lock()
            .map(|state| state.stats)
            .unwrap_or_default()
    }

    pub fn report(&self) -> StatsReport {
        let stats = self.snapshot();
        StatsReport {
            total: stats.total,
            today: stats.today,
            success_rate: stats.success_rate(),
        }
    }
}

impl Default for StatsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn empty_counter_reports_zero_rate() {
        let counter = StatsCounter::starting_on(day(1));
        assert_eq!(
            counter.report(),
            StatsReport {
                total: 0,
                today: 0,
                success_rate: 0
            }
        );
    }

    #[test]
    fn counts_successes_and_failures() {
        let counter = StatsCounter::starting_on(day(1));
        counter.record_on(true, day(1));
        counter.record_on(false, day(1));
        counter.record_on(true, day(1));

        let stats = counter.snapshot();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.today, 3);
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.failure_count, 1);
        assert_eq!(stats.success_rate(), 67);
    }

    #[test]
    fn rate_rounds_half_up() {
        let stats = Stats {
            total: 8,
            today: 8,
            success_count: 1,
            failure_count: 7,
        };
        // 12.5%
        assert_eq!(stats.success_rate(), 13);
    }

    #[test]
    fn today_resets_on_first_write_of_a_new_day() {
        let counter = StatsCounter::starting_on(day(1));
        counter.record_on(true, day(1));
        counter.record_on(true, day(1));

        // Reading does not reset.
        assert_eq!(counter.snapshot().today, 2);

        counter.record_on(false, day(2));
        let stats = counter.snapshot();
        assert_eq!(stats.today, 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success_count, 2);
    }

    #[test]
    fn report_serializes_camel_case() {
        let counter = StatsCounter::starting_on(day(1));
        counter.record_on(true, day(1));
        let json = serde_json::to_value(counter.report()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 1, "today": 1, "successRate": 100})
        );
    }
}
