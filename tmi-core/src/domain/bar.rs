//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for one symbol on one calendar date.
///
/// All numeric fields are `f64`. A field the provider could not supply is
/// carried as NaN rather than a silent zero; alignment drops such bars
/// (`is_complete`), so they never reach the composite output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true when every numeric field is finite.
    pub fn is_complete(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite()
    }

    /// Basic OHLCV sanity check: high >= low, prices positive, volume >= 0.
    pub fn is_sane(&self) -> bool {
        if !self.is_complete() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }
}

/// The synthetic index's own bar for one aligned date.
///
/// Prices are weighted combinations of the constituent bars; volume is the
/// plain sum (aggregate traded size across the basket, never averaged).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
