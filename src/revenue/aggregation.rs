//! Totals, counts and averages of donations over a date window.

use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;

use super::{
    classify::{FrequencyFilter, RevenueKind},
    record::TransactionRecord,
};

/// Summary figures for a set of donations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// The sum of the donated amounts.
    pub total_amount: f64,
    /// The number of donations.
    pub donation_count: u64,
    /// Zero when there are no donations.
    pub average_donation: f64,
}

impl AggregateResult {
    fn from_totals(total_amount: f64, donation_count: u64) -> Self {
        let average_donation = if donation_count == 0 {
            0.0
        } else {
            total_amount / donation_count as f64
        };

        Self {
            total_amount,
            donation_count,
            average_donation,
        }
    }
}

/// Yields the records inside `window` that count towards `kind` under `filter`.
pub(super) fn select<'a>(
    records: &'a [TransactionRecord],
    window: &'a DateRange,
    kind: RevenueKind,
    filter: Option<FrequencyFilter>,
) -> impl Iterator<Item = &'a TransactionRecord> {
    records
        .iter()
        .filter(move |record| window.contains(record.occurred_at))
        .filter(move |record| kind.admits(record, filter))
}

/// Sums the donations in `window` that count towards `kind`.
///
/// # Arguments
/// * `records` - The donations to summarise, in any order
/// * `window` - The inclusive date range to include
/// * `kind` - The revenue figure to report
/// * `filter` - An optional frequency filter which replaces the categories of `kind`
pub fn aggregate(
    records: &[TransactionRecord],
    window: &DateRange,
    kind: RevenueKind,
    filter: Option<FrequencyFilter>,
) -> AggregateResult {
    let (total, count) = select(records, window, kind, filter)
        .fold((0.0, 0), |(total, count), record| {
            (total + record.amount, count + 1)
        });

    AggregateResult::from_totals(total, count)
}
