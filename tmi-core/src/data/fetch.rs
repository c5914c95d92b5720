//! Batch fetch — sequential multi-symbol download with fail-fast semantics.
//!
//! The composite has no partial-success mode: the first fetch failure (or
//! empty result) aborts the batch, and nothing downstream runs.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::provider::{DataError, DataProvider, FetchProgress};
use crate::domain::Bar;

/// Fetch daily bars for every symbol over an inclusive date range.
///
/// Returns the per-symbol series only if every symbol fetched successfully
/// and non-empty.
pub fn fetch_series(
    provider: &dyn DataProvider,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn FetchProgress,
) -> Result<HashMap<String, Vec<Bar>>, DataError> {
    let total = symbols.len();
    let mut series: HashMap<String, Vec<Bar>> = HashMap::with_capacity(total);

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        let fetched = provider.fetch(symbol, start, end).and_then(|bars| {
            if bars.is_empty() {
                Err(DataError::NoData {
                    symbol: symbol.clone(),
                })
            } else {
                Ok(bars)
            }
        });

        match fetched {
            Ok(bars) => {
                progress.on_complete(symbol, i, total, &Ok(bars.len()));
                series.insert(symbol.clone(), bars);
            }
            Err(e) => {
                let failed: Result<usize, DataError> = Err(e);
                progress.on_complete(symbol, i, total, &failed);
                return failed.map(|_| series);
            }
        }
    }

    progress.on_batch_complete(total, total);
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct ScriptedProvider {
        bars: HashMap<String, Vec<Bar>>,
    }

    impl DataProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn fetch(
            &self,
            symbol: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<Bar>, DataError> {
            match self.bars.get(symbol) {
                Some(bars) => Ok(bars.clone()),
                None => Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
            }
        }
    }

    struct SilentProgress;

    impl FetchProgress for SilentProgress {
        fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
        fn on_complete(
            &self,
            _symbol: &str,
            _index: usize,
            _total: usize,
            _result: &Result<usize, DataError>,
        ) {
        }
        fn on_batch_complete(&self, _succeeded: usize, _total: usize) {}
    }

    fn bar(date: &str, close: f64) -> Bar {
        Bar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000.0,
        }
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn fetches_every_symbol() {
        let provider = ScriptedProvider {
            bars: [
                ("ES=F".to_string(), vec![bar("2024-01-02", 100.0)]),
                ("NQ=F".to_string(), vec![bar("2024-01-02", 200.0)]),
            ]
            .into_iter()
            .collect(),
        };
        let (start, end) = range();

        let series = fetch_series(
            &provider,
            &["ES=F".to_string(), "NQ=F".to_string()],
            start,
            end,
            &SilentProgress,
        )
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series["ES=F"].len(), 1);
    }

    #[test]
    fn empty_result_is_fatal() {
        let provider = ScriptedProvider {
            bars: [
                ("ES=F".to_string(), vec![bar("2024-01-02", 100.0)]),
                ("NQ=F".to_string(), vec![]),
            ]
            .into_iter()
            .collect(),
        };
        let (start, end) = range();

        let err = fetch_series(
            &provider,
            &["ES=F".to_string(), "NQ=F".to_string()],
            start,
            end,
            &SilentProgress,
        )
        .unwrap_err();

        assert!(matches!(err, DataError::NoData { symbol } if symbol == "NQ=F"));
    }

    #[test]
    fn first_failure_aborts_batch() {
        let provider = ScriptedProvider {
            bars: [("YM=F".to_string(), vec![bar("2024-01-02", 300.0)])]
                .into_iter()
                .collect(),
        };
        let (start, end) = range();

        // "MISSING" fails before "YM=F" is ever fetched.
        let err = fetch_series(
            &provider,
            &["MISSING".to_string(), "YM=F".to_string()],
            start,
            end,
            &SilentProgress,
        )
        .unwrap_err();

        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }
}
