//! Composite index construction — the alignment and aggregation core.

pub mod aggregate;
pub mod weights;

pub use aggregate::{aggregate, AggregateError};
pub use weights::equal_weights;
