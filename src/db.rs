//! Database schema set up.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error,
    filters::create_dashboard_preference_table,
    source::{create_appeal_table, create_donation_table, create_fund_table},
};

/// Create the tables the analytics engine reads from and writes to.
///
/// Existing tables are left untouched, so this is safe to run on every start-up.
///
/// # Errors
/// Returns an error if any table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_appeal_table(&transaction)?;
    create_fund_table(&transaction)?;
    create_donation_table(&transaction)?;
    create_dashboard_preference_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
