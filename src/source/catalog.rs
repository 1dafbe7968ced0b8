//! Which appeal each fund belongs to.

use std::collections::HashMap;

use rusqlite::Connection;

use crate::{
    Error,
    database_id::{AppealId, FundId},
};

/// A lookup from fund to the appeal it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundDirectory {
    funds: HashMap<FundId, Option<AppealId>>,
}

impl FundDirectory {
    /// Build a directory from `(fund, appeal)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (FundId, Option<AppealId>)>) -> Self {
        Self {
            funds: pairs.into_iter().collect(),
        }
    }

    /// Load every fund from the database.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query fails.
    pub fn load(connection: &Connection) -> Result<Self, Error> {
        let mut stmt = connection.prepare("SELECT id, appeal_id FROM fund")?;
        let funds = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<HashMap<FundId, Option<AppealId>>, rusqlite::Error>>()?;

        Ok(Self { funds })
    }

    /// Whether the fund exists.
    pub fn contains(&self, fund_id: FundId) -> bool {
        self.funds.contains_key(&fund_id)
    }

    /// The appeal `fund_id` belongs to, `None` if the fund is unknown or has no appeal.
    pub fn appeal_of(&self, fund_id: FundId) -> Option<AppealId> {
        self.funds.get(&fund_id).copied().flatten()
    }

    /// Whether `fund_id` can be selected while `appeal_id` is selected.
    ///
    /// Any known fund is compatible with no appeal. Funds without an appeal are only
    /// compatible with no appeal.
    pub fn is_compatible(&self, fund_id: FundId, appeal_id: Option<AppealId>) -> bool {
        match appeal_id {
            None => self.contains(fund_id),
            Some(appeal_id) => self.appeal_of(fund_id) == Some(appeal_id),
        }
    }
}
