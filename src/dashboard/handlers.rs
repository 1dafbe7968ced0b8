//! Dashboard chart feeds.
//!
//! A chart feed combines the shared dashboard filters with the chart's own comparison
//! settings, fetches both periods and returns the summaries, the percentage changes,
//! the aligned series and the ECharts options for the chart.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    analytics::{AnalyticsResult, PeriodChanges, QueryWindows, SeriesParams, analyse_windows},
    comparison::{FormatOptions, OverlayPoint, format_change, overlay_by_date},
    dashboard::charts::overlay_chart,
    filters::{ChartFeed, ChartFeeds, ChartQuery, FetchOutcome, FilterStore},
    revenue::{Granularity, RevenueKind, TrendMetric, align_trend, trend_series},
    source::RecordSource,
};

/// The state needed for serving chart feeds.
#[derive(Debug, Clone)]
pub struct ChartsState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// The dashboard filters.
    pub filters: Arc<Mutex<FilterStore>>,
    /// The last data fetched for each chart.
    pub feeds: Arc<Mutex<ChartFeeds<ChartData>>>,
}

impl FromRef<AppState> for ChartsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            filters: state.filters.clone(),
            feeds: state.chart_feeds.clone(),
        }
    }
}

/// How a chart presents its data. These are chosen per request rather than stored
/// with the dashboard filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ChartSettings {
    /// The bucket size of the trend.
    #[serde(default)]
    pub granularity: Granularity,
    /// The revenue figure to report.
    #[serde(default)]
    pub kind: RevenueKind,
    /// The value to plot.
    #[serde(default)]
    pub metric: TrendMetric,
}

/// Display strings for [PeriodChanges], e.g. "+12.5%".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLabels {
    /// The change in the total amount.
    pub total_amount: String,
    /// The change in the number of donations.
    pub donation_count: String,
    /// The change in the average donation.
    pub average_donation: String,
}

impl From<&PeriodChanges> for ChangeLabels {
    fn from(changes: &PeriodChanges) -> Self {
        let options = FormatOptions::default();

        Self {
            total_amount: format_change(&changes.total_amount, options),
            donation_count: format_change(&changes.donation_count, options),
            average_donation: format_change(&changes.average_donation, options),
        }
    }
}

/// Everything a client needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// The filters the data was computed for.
    pub query: ChartQuery,
    /// The plotted value.
    pub metric: TrendMetric,
    /// The summaries and trends of both periods.
    #[serde(flatten)]
    pub analytics: AnalyticsResult,
    /// The changes formatted for display, present when comparing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_labels: Option<ChangeLabels>,
    /// Both trends on the primary period's timeline.
    pub overlay: Vec<OverlayPoint>,
    /// The ECharts option object as JavaScript source.
    pub options: String,
}

/// The response of a chart feed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFeedResponse {
    /// The chart the feed belongs to.
    pub chart_id: String,
    /// Set when the filters changed while the data was being fetched, so the result
    /// was discarded. The feed then holds whatever was applied last, which may have
    /// been computed for earlier filters: compare `data.query` with the current filters.
    pub superseded: bool,
    /// The chart's data and the error of its last fetch.
    #[serde(flatten)]
    pub feed: ChartFeed<ChartData>,
}

/// Computes the data for a chart with the given filters.
///
/// # Errors
/// Returns an error if the record source cannot be read.
pub fn build_chart_data<S>(
    title: &str,
    source: &S,
    query: ChartQuery,
    settings: ChartSettings,
) -> Result<ChartData, Error>
where
    S: RecordSource + ?Sized,
{
    let windows = QueryWindows {
        current: query.date_range,
        comparison: query.comparison,
    };
    let params = SeriesParams {
        appeal_id: query.appeal_id,
        fund_id: query.fund_id,
        frequency: query.frequency,
        granularity: settings.granularity,
        kind: settings.kind,
    };

    let analytics = analyse_windows(source, &windows, &params)?;

    let current_series = trend_series(&analytics.trend_data, settings.metric);
    let comparison_series = match (analytics.comparison_trend.as_deref(), query.comparison) {
        (Some(points), Some(comparison)) => {
            let aligned = align_trend(
                points,
                comparison.start_date,
                query.date_range.start_date,
                settings.granularity,
            );
            trend_series(&aligned, settings.metric)
        }
        _ => Vec::new(),
    };
    let overlay = overlay_by_date(&current_series, &comparison_series);

    let options = overlay_chart(
        title,
        &overlay,
        settings.metric,
        analytics.comparison_trend.is_some(),
    )
    .to_string();

    Ok(ChartData {
        query,
        metric: settings.metric,
        change_labels: analytics.changes.as_ref().map(ChangeLabels::from),
        analytics,
        overlay,
        options,
    })
}

/// Route handler for a chart feed.
///
/// Only the most recent request for a chart may update its feed. A failed fetch
/// keeps the previous data and reports the error alongside it.
pub async fn get_chart(
    State(state): State<ChartsState>,
    Path(chart_id): Path<String>,
    Query(settings): Query<ChartSettings>,
) -> Result<Json<ChartFeedResponse>, Error> {
    let query = current_chart_query(&state.filters, &chart_id)?;
    let ticket = state
        .feeds
        .lock()
        .map_err(|_| Error::FilterStateLockError)?
        .begin_fetch(&chart_id, query);

    let connection = state.db_connection.clone();
    let title = chart_id.clone();
    let result = tokio::task::spawn_blocking(move || {
        let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
        build_chart_data(&title, &*connection, query, settings)
    })
    .await?
    .map_err(|error| error.client_message());

    let current_query = current_chart_query(&state.filters, &chart_id)?;
    let mut feeds = state
        .feeds
        .lock()
        .map_err(|_| Error::FilterStateLockError)?;
    let outcome = feeds.complete_fetch(&ticket, result, &current_query);

    Ok(Json(ChartFeedResponse {
        superseded: outcome == FetchOutcome::Superseded,
        feed: feeds.feed(&chart_id),
        chart_id,
    }))
}

fn current_chart_query(
    filters: &Mutex<FilterStore>,
    chart_id: &str,
) -> Result<ChartQuery, Error> {
    let store = filters.lock().map_err(|_| Error::FilterStateLockError)?;

    Ok(store.state().chart_query(chart_id))
}
