//! Inner-join date alignment and weighted aggregation.
//!
//! The aligned date set is the intersection of the per-symbol date sets,
//! complete bars only. A date missing from even one series is dropped
//! entirely: no forward-fill, no interpolation, no zero-fill.
//!
//! Price fields use an explicit weighted-sum accumulation,
//! `sum(weight[s] * bar[s].field)`, with the same weight applied to all
//! four price fields of a symbol. With equal weights `1/N` this reduces to
//! the arithmetic mean. Volume is an unweighted sum across symbols.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

use crate::domain::{Bar, CompositeBar};

/// Precondition violations rejected by the aggregator.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("no input series")]
    NoSeries,

    #[error("no series provided for weighted symbol '{symbol}'")]
    MissingSeries { symbol: String },

    #[error("duplicate bar for '{symbol}' on {date}")]
    DuplicateDate { symbol: String, date: NaiveDate },
}

/// Combine per-symbol series into one composite series.
///
/// The symbol set is defined by `weights`; every weighted symbol must have
/// a series. An empty aligned date set yields an empty output, which is
/// not an error at this layer.
pub fn aggregate(
    series: &HashMap<String, Vec<Bar>>,
    weights: &HashMap<String, f64>,
) -> Result<Vec<CompositeBar>, AggregateError> {
    if weights.is_empty() {
        return Err(AggregateError::NoSeries);
    }

    let mut members: Vec<(&String, f64)> = weights.iter().map(|(s, w)| (s, *w)).collect();
    members.sort_by(|a, b| a.0.cmp(b.0));

    // Index each series by date. Duplicate dates violate the fetcher
    // contract and are rejected even when one of the bars is malformed;
    // incomplete bars are dropped so their dates fall out of the join.
    let mut indexed: Vec<(f64, BTreeMap<NaiveDate, &Bar>)> = Vec::with_capacity(members.len());
    for (symbol, weight) in &members {
        let bars = series
            .get(*symbol)
            .ok_or_else(|| AggregateError::MissingSeries {
                symbol: (*symbol).clone(),
            })?;

        let mut seen = BTreeSet::new();
        let mut by_date = BTreeMap::new();
        for bar in bars {
            if !seen.insert(bar.date) {
                return Err(AggregateError::DuplicateDate {
                    symbol: (*symbol).clone(),
                    date: bar.date,
                });
            }
            if bar.is_complete() {
                by_date.insert(bar.date, bar);
            }
        }
        indexed.push((*weight, by_date));
    }

    // Inner join: keep the first series' dates that every other series has.
    let (_, first) = &indexed[0];
    let aligned: Vec<NaiveDate> = first
        .keys()
        .copied()
        .filter(|date| indexed[1..].iter().all(|(_, by_date)| by_date.contains_key(date)))
        .collect();

    let mut out = Vec::with_capacity(aligned.len());
    for date in aligned {
        let mut open = 0.0;
        let mut high = 0.0;
        let mut low = 0.0;
        let mut close = 0.0;
        let mut volume = 0.0;

        for (weight, by_date) in &indexed {
            let bar = by_date[&date];
            open += weight * bar.open;
            high += weight * bar.high;
            low += weight * bar.low;
            close += weight * bar.close;
            volume += bar.volume;
        }

        out.push(CompositeBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    Ok(out)
}
