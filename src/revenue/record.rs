//! The donation rows the analytics engine reads.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::database_id::{AppealId, DonationId, FundId};

/// How a donation was set up by the donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyFlag {
    /// A single gift.
    OneTime,
    /// One charge of a regular gift.
    Recurring,
}

impl FrequencyFlag {
    /// The flag as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Recurring => "recurring",
        }
    }
}

impl FromSql for FrequencyFlag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "one-time" => Ok(Self::OneTime),
            "recurring" => Ok(Self::Recurring),
            other => Err(FromSqlError::Other(
                format!("unknown donation frequency \"{other}\"").into(),
            )),
        }
    }
}

impl ToSql for FrequencyFlag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// A settled donation as supplied by the record source.
///
/// The analytics engine never modifies these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The ID of the donation.
    pub id: DonationId,
    /// The day the donation was made.
    pub occurred_at: Date,
    /// The donated amount.
    pub amount: f64,
    /// Whether the donation is a one-time gift or part of a recurring series.
    pub frequency_flag: FrequencyFlag,
    /// Set for the second and later charges of a recurring donation.
    pub installment_sequence_marker: Option<String>,
    /// The appeal the donation was made to.
    pub appeal_id: Option<AppealId>,
    /// The fund the donation was made to.
    pub fund_id: Option<FundId>,
}

impl TransactionRecord {
    /// Create a one-time donation with no appeal or fund.
    pub fn build(amount: f64, occurred_at: Date) -> Self {
        Self {
            id: 0,
            occurred_at,
            amount,
            frequency_flag: FrequencyFlag::OneTime,
            installment_sequence_marker: None,
            appeal_id: None,
            fund_id: None,
        }
    }

    /// Mark the donation as a charge of a recurring series.
    ///
    /// `marker` is `None` or empty for the first charge of the series.
    pub fn recurring(mut self, marker: Option<&str>) -> Self {
        self.frequency_flag = FrequencyFlag::Recurring;
        self.installment_sequence_marker = marker.map(str::to_owned);
        self
    }

    /// Set the ID of the donation.
    pub fn id(mut self, id: DonationId) -> Self {
        self.id = id;
        self
    }

    /// Set the appeal of the donation.
    pub fn appeal_id(mut self, appeal_id: Option<AppealId>) -> Self {
        self.appeal_id = appeal_id;
        self
    }

    /// Set the fund of the donation.
    pub fn fund_id(mut self, fund_id: Option<FundId>) -> Self {
        self.fund_id = fund_id;
        self
    }
}
