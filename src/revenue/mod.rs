//! Classification, aggregation and trend bucketing of donation records.
//!
//! Everything in this module is pure: the same records and parameters always give
//! the same results, so callers can run it for the primary and comparison windows
//! independently.

mod aggregation;
mod classify;
mod record;
mod trend;

pub use aggregation::{AggregateResult, aggregate};
pub use classify::{FrequencyCategory, FrequencyFilter, RevenueKind, classify, matches_filter};
pub use record::{FrequencyFlag, TransactionRecord};
pub use trend::{
    Granularity, TrendMetric, TrendPoint, align_trend, period_key, trend, trend_series,
};
