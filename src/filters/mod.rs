//! The dashboard's shared filters: the primary date range, the appeal, fund and
//! frequency selections, and the comparison settings of each chart.
//!
//! Changes go through [FilterStore::dispatch], which either commits an action in
//! full or rejects it with a [ValidationError](crate::date_range::ValidationError).
//! Saving the committed state is a separate step, see [FilterWriter].

mod fetch;
mod handlers;
mod persistence;
mod state;
mod store;

pub use fetch::{ChartFeed, ChartFeeds, ChartQuery, FetchOutcome, FetchTicket};
pub use handlers::{
    FiltersState, delete_comparison, get_filters, put_appeal, put_comparison, put_date_range,
    put_frequency, put_fund, resolve_comparison, toggle_comparison,
};
pub use persistence::{FilterPersistence, FilterWriter, create_dashboard_preference_table};
pub use state::{ChartComparison, FilterAction, FilterState, PersistedFilters, ReduceContext};
pub use store::FilterStore;
