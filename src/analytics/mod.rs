//! Stateless analytics queries: summaries, trends and period-over-period changes
//! for a date window and an optional comparison window.

mod engine;
mod handlers;
mod query;

pub use engine::{analyse_windows, run_analytics};
pub use handlers::{AnalyticsState, get_analytics};
pub use query::{AnalyticsQuery, AnalyticsResult, PeriodChanges, QueryWindows, SeriesParams};
