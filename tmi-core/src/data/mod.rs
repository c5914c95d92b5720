//! Data fetching — provider trait, Yahoo Finance implementation, batch
//! orchestration.

pub mod fetch;
pub mod provider;
pub mod yahoo;

pub use fetch::fetch_series;
pub use provider::{DataError, DataProvider, FetchProgress, StdoutProgress};
pub use yahoo::YahooProvider;
