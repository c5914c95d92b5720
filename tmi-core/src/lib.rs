//! TMI Core — builds a synthetic, weighted composite index series from
//! per-symbol daily bars.
//!
//! This crate contains everything behind the `tmi` CLI:
//! - Domain types (per-symbol bars, composite bars)
//! - Data provider trait and the Yahoo Finance implementation
//! - Inner-join date alignment and weighted aggregation (the core)
//! - TOML configuration with validated defaults
//! - CSV/manifest export with atomic artifact replacement
//! - End-to-end build pipeline

pub mod clock;
pub mod composite;
pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod pipeline;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline types cross thread boundaries safely.
    ///
    /// Per-symbol fetches are independent and may run in parallel one day;
    /// this breaks the build immediately if a type would block that.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::CompositeBar>();
        require_sync::<domain::CompositeBar>();

        require_send::<config::IndexConfig>();
        require_sync::<config::IndexConfig>();

        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();

        require_send::<composite::AggregateError>();
        require_sync::<composite::AggregateError>();

        require_send::<pipeline::BuildReport>();
        require_sync::<pipeline::BuildReport>();

        require_send::<clock::SystemClock>();
        require_sync::<clock::SystemClock>();
    }
}
