//! Groups donations into daily or weekly buckets for trend charts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Weekday};

use crate::{
    comparison::SeriesPoint,
    date_range::{DateRange, parse_date},
};

use super::{
    aggregation::select,
    classify::{FrequencyFilter, RevenueKind},
    record::TransactionRecord,
};

/// The size of the buckets in a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar day.
    #[default]
    Daily,
    /// ISO 8601 weeks, starting on Monday.
    Weekly,
}

/// Which value of a [TrendPoint] to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
    /// The donated amount.
    #[default]
    Amount,
    /// The number of donations.
    Count,
}

/// The donations that fell into one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-Www` for weekly buckets.
    #[serde(rename = "date")]
    pub period_key: String,
    /// The donated amount.
    pub amount: f64,
    /// The number of donations.
    pub count: u64,
}

/// The bucket key for `date`.
///
/// Keys of the same granularity sort chronologically as plain strings.
pub fn period_key(date: Date, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month() as u8,
            date.day()
        ),
        Granularity::Weekly => {
            let (year, week, _) = date.to_iso_week_date();
            format!("{year:04}-W{week:02}")
        }
    }
}

/// Buckets the donations in `window` that count towards `kind`.
///
/// Buckets are sorted by key. Periods without donations are left out rather than
/// filled with zeros, so two windows of equal length can give series of different
/// lengths.
pub fn trend(
    records: &[TransactionRecord],
    window: &DateRange,
    kind: RevenueKind,
    granularity: Granularity,
    filter: Option<FrequencyFilter>,
) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<String, (f64, u64)> = BTreeMap::new();

    for record in select(records, window, kind, filter) {
        let bucket = buckets
            .entry(period_key(record.occurred_at, granularity))
            .or_insert((0.0, 0));
        bucket.0 += record.amount;
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(period_key, (amount, count))| TrendPoint {
            period_key,
            amount,
            count,
        })
        .collect()
}

/// Moves buckets computed for a window starting on `from` onto the timeline of a
/// window starting on `onto`.
///
/// Daily buckets move by the days between the two start dates. Weekly buckets move
/// by whole weeks, the distance between the ISO weeks the two windows start in.
/// Amounts and counts are unchanged.
pub fn align_trend(
    points: &[TrendPoint],
    from: Date,
    onto: Date,
    granularity: Granularity,
) -> Vec<TrendPoint> {
    let offset = match granularity {
        Granularity::Daily => onto - from,
        Granularity::Weekly => week_start(onto) - week_start(from),
    };

    points
        .iter()
        .filter_map(|point| {
            let start = period_start(&point.period_key, granularity)?.checked_add(offset)?;

            Some(TrendPoint {
                period_key: period_key(start, granularity),
                ..point.clone()
            })
        })
        .collect()
}

/// The first day of the bucket named by `key`.
fn period_start(key: &str, granularity: Granularity) -> Option<Date> {
    match granularity {
        Granularity::Daily => parse_date(key).ok(),
        Granularity::Weekly => {
            let (year, week) = key.split_once("-W")?;
            Date::from_iso_week_date(year.parse().ok()?, week.parse().ok()?, Weekday::Monday).ok()
        }
    }
}

fn week_start(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday().into())
}

/// Converts trend points into a chart series of `metric`.
pub fn trend_series(points: &[TrendPoint], metric: TrendMetric) -> Vec<SeriesPoint> {
    points
        .iter()
        .map(|point| {
            let value = match metric {
                TrendMetric::Amount => point.amount,
                TrendMetric::Count => point.count as f64,
            };
            SeriesPoint::new(point.period_key.clone(), value)
        })
        .collect()
}
