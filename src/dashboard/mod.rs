//! Dashboard charts: the primary period's trend with an optional comparison period
//! drawn over it.

mod charts;
mod handlers;

pub use handlers::{
    ChangeLabels, ChartData, ChartFeedResponse, ChartSettings, ChartsState, build_chart_data,
    get_chart,
};
