//! Injectable clock and lookback-window derivation.
//!
//! "Now" enters the pipeline only through the `Clock` trait, so window
//! derivation and everything downstream is testable without wall-clock
//! time.

use chrono::{Datelike, Duration, NaiveDate};

/// Source of the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation used by the CLI.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Fixed date for tests.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Start of the trailing one-year window ending at `end`: the same month
/// and day in the previous year. Feb 29 clamps to Feb 28.
pub fn one_year_before(end: NaiveDate) -> NaiveDate {
    end.with_year(end.year() - 1).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(end.year() - 1, 2, 28).expect("Feb 28 exists in every year")
    })
}

/// Fetch window for a run: `(start, end)` with `end` = today.
///
/// `lookback_days` substitutes a fixed day-count window for the default
/// trailing calendar year.
pub fn lookback_window(clock: &dyn Clock, lookback_days: Option<i64>) -> (NaiveDate, NaiveDate) {
    let end = clock.today();
    let start = match lookback_days {
        Some(days) => end - Duration::days(days),
        None => one_year_before(end),
    };
    (start, end)
}
