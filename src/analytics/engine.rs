//! Runs an analytics query against a record source.

use time::Date;

use crate::{
    Error,
    date_range::DateRange,
    revenue::{AggregateResult, TrendPoint, aggregate, trend},
    source::{RecordFilter, RecordSource},
};

use super::query::{AnalyticsQuery, AnalyticsResult, PeriodChanges, QueryWindows, SeriesParams};

/// Compute the summary and trend of the query's current period and, if requested,
/// its comparison period.
///
/// # Arguments
/// * `query` - The request parameters
/// * `source` - Where to read settled donations from
/// * `today` - The current date in the dashboard's timezone
///
/// # Errors
/// Returns [Error::Validation] if the query's windows are invalid, or the error of
/// the record source if it cannot be read.
pub fn run_analytics<S>(
    query: &AnalyticsQuery,
    source: &S,
    today: Date,
) -> Result<AnalyticsResult, Error>
where
    S: RecordSource + ?Sized,
{
    let windows = query.windows(today)?;

    analyse_windows(source, &windows, &query.series_params())
}

/// Compute the summaries and trends of already validated windows.
///
/// The two windows are fetched and computed independently with the same parameters.
///
/// # Errors
/// Returns the error of the record source if it cannot be read.
pub fn analyse_windows<S>(
    source: &S,
    windows: &QueryWindows,
    params: &SeriesParams,
) -> Result<AnalyticsResult, Error>
where
    S: RecordSource + ?Sized,
{
    let (current_period, trend_data) = summarise_window(source, windows.current, params)?;

    let Some(comparison_window) = windows.comparison else {
        return Ok(AnalyticsResult {
            current_period,
            comparison_period: None,
            trend_data,
            comparison_trend: None,
            changes: None,
        });
    };

    let (comparison_period, comparison_trend) =
        summarise_window(source, comparison_window, params)?;

    Ok(AnalyticsResult {
        changes: Some(PeriodChanges::between(&current_period, &comparison_period)),
        current_period,
        comparison_period: Some(comparison_period),
        trend_data,
        comparison_trend: Some(comparison_trend),
    })
}

fn summarise_window<S>(
    source: &S,
    window: DateRange,
    params: &SeriesParams,
) -> Result<(AggregateResult, Vec<TrendPoint>), Error>
where
    S: RecordSource + ?Sized,
{
    let records = source.fetch_records(&RecordFilter {
        window,
        appeal_id: params.appeal_id,
        fund_id: params.fund_id,
    })?;

    let filter = Some(params.frequency);
    let summary = aggregate(&records, &window, params.kind, filter);
    let trend_data = trend(&records, &window, params.kind, params.granularity, filter);

    Ok((summary, trend_data))
}
