//! The inbound and outbound contracts of an analytics request.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    comparison::{PercentageChange, compute_change, validate_comparison_range},
    database_id::{AppealId, FundId},
    date_range::{DateRange, ValidationError, parse_date, validate_input},
    revenue::{AggregateResult, FrequencyFilter, Granularity, RevenueKind, TrendPoint},
};

/// The parameters of an analytics request, as sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// The first day of the primary period, `YYYY-MM-DD` or RFC 3339.
    pub start_date: String,
    /// The last day of the primary period.
    pub end_date: String,
    /// Only count donations to this appeal.
    #[serde(default)]
    pub appeal_id: Option<AppealId>,
    /// Only count donations to this fund.
    #[serde(default)]
    pub fund_id: Option<FundId>,
    /// Overrides the categories counted by `kind` unless it is `all`.
    #[serde(default)]
    pub frequency: FrequencyFilter,
    /// The first day of the comparison period.
    #[serde(default)]
    pub compare_start_date: Option<String>,
    /// The last day of the comparison period.
    #[serde(default)]
    pub compare_end_date: Option<String>,
    /// The bucket size of the trends.
    #[serde(default)]
    pub granularity: Granularity,
    /// The revenue figure to report.
    #[serde(default)]
    pub kind: RevenueKind,
}

/// The windows of an [AnalyticsQuery] after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindows {
    /// The primary period.
    pub current: DateRange,
    /// The comparison period, if one was requested.
    pub comparison: Option<DateRange>,
}

/// Everything that shapes a summary or trend apart from its date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesParams {
    /// Only count donations to this appeal.
    pub appeal_id: Option<AppealId>,
    /// Only count donations to this fund.
    pub fund_id: Option<FundId>,
    /// Overrides the categories counted by `kind` unless it is `all`.
    pub frequency: FrequencyFilter,
    /// The bucket size of the trends.
    pub granularity: Granularity,
    /// The revenue figure to report.
    pub kind: RevenueKind,
}

impl AnalyticsQuery {
    /// The query's parameters apart from its dates.
    pub fn series_params(&self) -> SeriesParams {
        SeriesParams {
            appeal_id: self.appeal_id,
            fund_id: self.fund_id,
            frequency: self.frequency,
            granularity: self.granularity,
            kind: self.kind,
        }
    }

    /// Parse and validate the date windows of the query.
    ///
    /// A comparison window is only used when both of its dates are given. Giving only
    /// one of them is treated as a malformed date.
    ///
    /// # Errors
    /// Returns a [ValidationError] if either window is invalid or the windows overlap.
    pub fn windows(&self, today: Date) -> Result<QueryWindows, ValidationError> {
        let current = validate_input(&self.start_date, &self.end_date, today)?;

        let comparison = match (&self.compare_start_date, &self.compare_end_date) {
            (None, None) => None,
            (Some(start), Some(end)) => {
                let comparison = DateRange::new(parse_date(start)?, parse_date(end)?);
                validate_comparison_range(&current, &comparison, today)?;
                Some(comparison)
            }
            _ => return Err(ValidationError::InvalidDateFormat),
        };

        Ok(QueryWindows {
            current,
            comparison,
        })
    }
}

/// The change of each summary figure between the comparison and current periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodChanges {
    /// The change in the total amount.
    pub total_amount: PercentageChange,
    /// The change in the number of donations.
    pub donation_count: PercentageChange,
    /// The change in the average donation.
    pub average_donation: PercentageChange,
}

impl PeriodChanges {
    /// The changes from `comparison` to `current`.
    pub fn between(current: &AggregateResult, comparison: &AggregateResult) -> Self {
        Self {
            total_amount: compute_change(Some(current.total_amount), Some(comparison.total_amount)),
            donation_count: compute_change(
                Some(current.donation_count as f64),
                Some(comparison.donation_count as f64),
            ),
            average_donation: compute_change(
                Some(current.average_donation),
                Some(comparison.average_donation),
            ),
        }
    }
}

/// The response to an [AnalyticsQuery].
///
/// The comparison fields are only present when the query asked for a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    /// The summary of the primary period.
    pub current_period: AggregateResult,
    /// The summary of the comparison period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_period: Option<AggregateResult>,
    /// The trend of the primary period.
    pub trend_data: Vec<TrendPoint>,
    /// The trend of the comparison period, on its own dates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_trend: Option<Vec<TrendPoint>>,
    /// The changes from the comparison period to the primary period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<PeriodChanges>,
}
