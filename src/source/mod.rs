//! Where donation records come from.
//!
//! The analytics engine only reads settled donations. Deciding whether a donation is
//! settled is the record source's job, the engine never re-checks it.

mod catalog;
mod sqlite;

use crate::{
    Error,
    database_id::{AppealId, FundId},
    date_range::DateRange,
    revenue::TransactionRecord,
};

pub use catalog::FundDirectory;
pub use sqlite::{
    DonationStatus, create_appeal, create_appeal_table, create_donation_table, create_fund,
    create_fund_table, insert_donation,
};

/// The subset of donations a query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFilter {
    /// The days to read, inclusive.
    pub window: DateRange,
    /// Only read donations to this appeal.
    pub appeal_id: Option<AppealId>,
    /// Only read donations to this fund.
    pub fund_id: Option<FundId>,
}

impl RecordFilter {
    fn admits(&self, record: &TransactionRecord) -> bool {
        self.window.contains(record.occurred_at)
            && self
                .appeal_id
                .is_none_or(|appeal_id| record.appeal_id == Some(appeal_id))
            && self
                .fund_id
                .is_none_or(|fund_id| record.fund_id == Some(fund_id))
    }
}

/// Supplies settled donations.
pub trait RecordSource {
    /// Get the settled donations in `filter.window`, restricted to the appeal and fund
    /// if they are set.
    ///
    /// # Errors
    /// Returns an error if the underlying store cannot be read.
    fn fetch_records(&self, filter: &RecordFilter) -> Result<Vec<TransactionRecord>, Error>;
}

/// An in-memory source, every record is treated as settled.
impl RecordSource for [TransactionRecord] {
    fn fetch_records(&self, filter: &RecordFilter) -> Result<Vec<TransactionRecord>, Error> {
        Ok(self
            .iter()
            .filter(|record| filter.admits(record))
            .cloned()
            .collect())
    }
}
