//! Property tests for alignment and aggregation invariants.
//!
//! Uses proptest to verify:
//! 1. The aligned date set is exactly the intersection of the inputs' dates
//! 2. Equal weights make every price field the arithmetic mean
//! 3. Output volume is the exact sum of constituent volumes
//! 4. Output is strictly ascending by date

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tmi_core::composite::{aggregate, equal_weights};
use tmi_core::domain::Bar;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_volume() -> impl Strategy<Value = f64> {
    (1.0..1_000_000.0_f64).prop_map(|v| v.round())
}

/// One symbol's series: unique dates drawn from a 15-day pool.
fn arb_series() -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::btree_map(0i64..15, (arb_price(), arb_volume()), 1..12).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(offset, (close, volume))| Bar {
                date: base_date() + Duration::days(offset),
                open: close - 1.0,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume,
            })
            .collect()
    })
}

/// Two to four symbols with independent date coverage.
fn arb_input() -> impl Strategy<Value = HashMap<String, Vec<Bar>>> {
    prop::collection::vec(arb_series(), 2..5).prop_map(|series| {
        series
            .into_iter()
            .enumerate()
            .map(|(i, bars)| (format!("SYM{i}"), bars))
            .collect()
    })
}

fn date_intersection(series: &HashMap<String, Vec<Bar>>) -> Vec<NaiveDate> {
    let mut sets = series
        .values()
        .map(|bars| bars.iter().map(|b| b.date).collect::<BTreeSet<_>>());
    let first = sets.next().unwrap_or_default();
    let common = sets.fold(first, |acc, set| acc.intersection(&set).copied().collect());
    common.into_iter().collect()
}

// ── 1. Alignment correctness ─────────────────────────────────────────

proptest! {
    /// No date appears in the output that is absent from any one input,
    /// and every common date appears exactly once.
    #[test]
    fn aligned_dates_equal_the_set_intersection(series in arb_input()) {
        let symbols: Vec<String> = series.keys().cloned().collect();
        let out = aggregate(&series, &equal_weights(&symbols)).unwrap();

        let got: Vec<NaiveDate> = out.iter().map(|c| c.date).collect();
        prop_assert_eq!(got, date_intersection(&series));
    }
}

// ── 2. Weighted-mean property ────────────────────────────────────────

proptest! {
    /// With weights 1/N, each output price field is the arithmetic mean
    /// of the per-symbol fields on that date.
    #[test]
    fn equal_weights_yield_the_arithmetic_mean(series in arb_input()) {
        let symbols: Vec<String> = series.keys().cloned().collect();
        let n = symbols.len() as f64;
        let out = aggregate(&series, &equal_weights(&symbols)).unwrap();

        for composite in &out {
            let on_date: Vec<&Bar> = series
                .values()
                .map(|bars| {
                    bars.iter()
                        .find(|b| b.date == composite.date)
                        .expect("aligned date present in every series")
                })
                .collect();

            let mean = |f: fn(&Bar) -> f64| on_date.iter().map(|b| f(b)).sum::<f64>() / n;
            prop_assert!((composite.open - mean(|b| b.open)).abs() < 1e-9);
            prop_assert!((composite.high - mean(|b| b.high)).abs() < 1e-9);
            prop_assert!((composite.low - mean(|b| b.low)).abs() < 1e-9);
            prop_assert!((composite.close - mean(|b| b.close)).abs() < 1e-9);
        }
    }
}

// ── 3. Volume-sum property ───────────────────────────────────────────

proptest! {
    /// Output volume is the exact sum of per-symbol volumes, never
    /// divided by N.
    #[test]
    fn volume_is_the_exact_sum(series in arb_input()) {
        let symbols: Vec<String> = series.keys().cloned().collect();
        let out = aggregate(&series, &equal_weights(&symbols)).unwrap();

        for composite in &out {
            let total: f64 = series
                .values()
                .map(|bars| {
                    bars.iter()
                        .find(|b| b.date == composite.date)
                        .expect("aligned date present in every series")
                        .volume
                })
                .sum();
            prop_assert_eq!(composite.volume, total);
        }
    }
}

// ── 4. Order preservation ────────────────────────────────────────────

proptest! {
    /// Output is strictly ascending by date with no duplicates.
    #[test]
    fn output_is_strictly_ascending(series in arb_input()) {
        let symbols: Vec<String> = series.keys().cloned().collect();
        let out = aggregate(&series, &equal_weights(&symbols)).unwrap();

        for pair in out.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
    }
}
