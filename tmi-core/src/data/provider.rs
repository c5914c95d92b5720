//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over the market-data source so the
//! pipeline can be driven by scripted providers in tests.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Bar;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    /// The symbol exists but the requested window has no bars. Fatal for
    /// the whole run: the composite never proceeds with partial coverage.
    #[error("no data for '{symbol}' in the requested window")]
    NoData { symbol: String },

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for daily-bar data providers.
///
/// Implementations must return bars sorted ascending by date, with at most
/// one bar per date.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<Bar>, DataError>;
}

/// Progress callback for multi-symbol fetches.
pub trait FetchProgress: Send {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes, with the bar count on success.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<usize, DataError>);

    /// Called once the entire batch has been fetched.
    fn on_batch_complete(&self, succeeded: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<usize, DataError>,
    ) {
        match result {
            Ok(count) => println!("  OK: {symbol} ({count} bars)"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, total: usize) {
        println!("\nFetch complete: {succeeded}/{total} symbols");
    }
}
