//! End-to-end build — window, fetch, aggregate, export.
//!
//! Entry point used by the CLI. Fetch failures abort before anything is
//! written; an empty aligned date set is not fatal and produces a
//! header-only artifact, flagged on the returned report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::clock::{lookback_window, Clock};
use crate::composite::{aggregate, AggregateError};
use crate::config::IndexConfig;
use crate::data::{fetch_series, DataError, DataProvider, FetchProgress};
use crate::export::{self, ExportError};

/// Errors from the build pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("aggregation error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

/// Run metadata for one composite build, persisted as the JSON manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub index: String,
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Bars fetched per symbol, before alignment.
    pub bar_counts: BTreeMap<String, usize>,
    /// Aligned sessions in the composite output.
    pub rows: usize,
    pub output: PathBuf,
}

impl BuildReport {
    /// True when the aligned date set came up empty (header-only artifact).
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Build the composite index: fetch every configured symbol over the
/// lookback window, aggregate, and write the CSV plus manifest.
pub fn build_index(
    config: &IndexConfig,
    provider: &dyn DataProvider,
    clock: &dyn Clock,
    progress: &dyn FetchProgress,
) -> Result<BuildReport, BuildError> {
    let (start, end) = lookback_window(clock, config.lookback_days);

    let series = fetch_series(provider, &config.symbols, start, end, progress)?;
    let weights = config.resolved_weights();
    let composite = aggregate(&series, &weights)?;

    export::write_composite_csv(&composite, &config.output)?;

    let report = BuildReport {
        index: config.name.clone(),
        symbols: config.symbols.clone(),
        start,
        end,
        bar_counts: series
            .iter()
            .map(|(symbol, bars)| (symbol.clone(), bars.len()))
            .collect(),
        rows: composite.len(),
        output: config.output.clone(),
    };
    export::write_manifest(&report, &export::manifest_path(&config.output))?;

    Ok(report)
}
