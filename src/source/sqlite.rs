//! Reads donations, appeals and funds from SQLite.

use rusqlite::{
    Connection, Row, params_from_iter,
    types::{ToSql, ToSqlOutput, Value},
};

use crate::{
    Error,
    database_id::{AppealId, DonationId, FundId},
    revenue::TransactionRecord,
};

use super::{RecordFilter, RecordSource};

/// The processing state of a donation. Only completed donations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStatus {
    /// The payment went through.
    Completed,
    /// The payment has not been processed yet.
    Pending,
    /// The payment was declined.
    Failed,
    /// The payment was returned to the donor.
    Refunded,
}

impl DonationStatus {
    /// The status as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl ToSql for DonationStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Create the appeal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_appeal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS appeal (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Create the fund table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_fund_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS fund (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            appeal_id INTEGER,
            FOREIGN KEY(appeal_id) REFERENCES appeal(id) ON UPDATE CASCADE ON DELETE SET NULL
        )",
        (),
    )?;

    Ok(())
}

/// Create the donation table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_donation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS donation (
            id INTEGER PRIMARY KEY,
            occurred_at TEXT NOT NULL,
            amount REAL NOT NULL,
            frequency TEXT NOT NULL CHECK (frequency IN ('one-time', 'recurring')),
            installment_marker TEXT,
            status TEXT NOT NULL DEFAULT 'completed',
            appeal_id INTEGER,
            fund_id INTEGER,
            FOREIGN KEY(appeal_id) REFERENCES appeal(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(fund_id) REFERENCES fund(id) ON UPDATE CASCADE ON DELETE SET NULL
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_donation_occurred_at ON donation(occurred_at)",
        (),
    )?;

    Ok(())
}

/// Create an appeal and return its ID.
pub fn create_appeal(name: &str, connection: &Connection) -> Result<AppealId, Error> {
    connection.execute("INSERT INTO appeal (name) VALUES (?1)", (name,))?;

    Ok(connection.last_insert_rowid())
}

/// Create a fund, optionally as part of an appeal, and return its ID.
pub fn create_fund(
    name: &str,
    appeal_id: Option<AppealId>,
    connection: &Connection,
) -> Result<FundId, Error> {
    connection.execute(
        "INSERT INTO fund (name, appeal_id) VALUES (?1, ?2)",
        (name, appeal_id),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Insert a donation and return its ID. The ID on `record` is ignored.
pub fn insert_donation(
    record: &TransactionRecord,
    status: DonationStatus,
    connection: &Connection,
) -> Result<DonationId, Error> {
    connection.execute(
        "INSERT INTO donation
            (occurred_at, amount, frequency, installment_marker, status, appeal_id, fund_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            record.occurred_at,
            record.amount,
            record.frequency_flag,
            &record.installment_sequence_marker,
            status,
            record.appeal_id,
            record.fund_id,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

fn map_record_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        occurred_at: row.get(1)?,
        amount: row.get(2)?,
        frequency_flag: row.get(3)?,
        installment_sequence_marker: row.get(4)?,
        appeal_id: row.get(5)?,
        fund_id: row.get(6)?,
    })
}

impl RecordSource for Connection {
    fn fetch_records(&self, filter: &RecordFilter) -> Result<Vec<TransactionRecord>, Error> {
        let mut query = String::from(
            "SELECT id, occurred_at, amount, frequency, installment_marker, appeal_id, fund_id
            FROM donation
            WHERE status = 'completed' AND occurred_at BETWEEN ?1 AND ?2",
        );
        let mut params: Vec<Value> = vec![
            Value::Text(filter.window.start_date.to_string()),
            Value::Text(filter.window.end_date.to_string()),
        ];

        if let Some(appeal_id) = filter.appeal_id {
            params.push(Value::Integer(appeal_id));
            query.push_str(&format!(" AND appeal_id = ?{}", params.len()));
        }

        if let Some(fund_id) = filter.fund_id {
            params.push(Value::Integer(fund_id));
            query.push_str(&format!(" AND fund_id = ?{}", params.len()));
        }

        query.push_str(" ORDER BY occurred_at, id");

        let mut stmt = self.prepare(&query)?;
        stmt.query_map(params_from_iter(params), map_record_row)?
            .collect::<Result<Vec<TransactionRecord>, rusqlite::Error>>()
            .map_err(|error| error.into())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use super::{DonationStatus, create_appeal, create_fund, insert_donation};
    use crate::{
        date_range::DateRange,
        db::initialize,
        revenue::{FrequencyFlag, TransactionRecord},
        source::{RecordFilter, RecordSource},
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn january() -> RecordFilter {
        RecordFilter {
            window: DateRange::new(date!(2024 - 01 - 01), date!(2024 - 01 - 31)),
            appeal_id: None,
            fund_id: None,
        }
    }

    #[test]
    fn returns_completed_donations_in_window() {
        let conn = get_test_connection();
        let completed = TransactionRecord::build(100.0, date!(2024 - 01 - 01));
        insert_donation(&completed, DonationStatus::Completed, &conn).unwrap();
        insert_donation(
            &TransactionRecord::build(75.0, date!(2024 - 01 - 31)),
            DonationStatus::Completed,
            &conn,
        )
        .unwrap();
        insert_donation(
            &TransactionRecord::build(200.0, date!(2023 - 12 - 31)),
            DonationStatus::Completed,
            &conn,
        )
        .unwrap();

        let records = conn.fetch_records(&january()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].amount, 100.0);
        assert_eq!(records[0].occurred_at, date!(2024 - 01 - 01));
        assert_eq!(records[1].amount, 75.0);
    }

    #[test]
    fn skips_donations_that_are_not_completed() {
        let conn = get_test_connection();
        for status in [
            DonationStatus::Pending,
            DonationStatus::Failed,
            DonationStatus::Refunded,
        ] {
            insert_donation(
                &TransactionRecord::build(10.0, date!(2024 - 01 - 10)),
                status,
                &conn,
            )
            .unwrap();
        }

        let records = conn.fetch_records(&january()).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn reads_frequency_and_installment_marker() {
        let conn = get_test_connection();
        let record = TransactionRecord::build(25.0, date!(2024 - 01 - 05)).recurring(Some("3"));
        let id = insert_donation(&record, DonationStatus::Completed, &conn).unwrap();

        let records = conn.fetch_records(&january()).unwrap();

        assert_eq!(records, vec![record.id(id)]);
        assert_eq!(records[0].frequency_flag, FrequencyFlag::Recurring);
    }

    #[test]
    fn filters_by_appeal_and_fund() {
        let conn = get_test_connection();
        let spring = create_appeal("Spring", &conn).unwrap();
        let winter = create_appeal("Winter", &conn).unwrap();
        let roof = create_fund("Roof", Some(spring), &conn).unwrap();
        let date = date!(2024 - 01 - 15);

        for (amount, appeal_id, fund_id) in [
            (1.0, Some(spring), Some(roof)),
            (2.0, Some(spring), None),
            (4.0, Some(winter), None),
            (8.0, None, None),
        ] {
            insert_donation(
                &TransactionRecord::build(amount, date)
                    .appeal_id(appeal_id)
                    .fund_id(fund_id),
                DonationStatus::Completed,
                &conn,
            )
            .unwrap();
        }

        let by_appeal = conn
            .fetch_records(&RecordFilter {
                appeal_id: Some(spring),
                ..january()
            })
            .unwrap();
        let by_fund = conn
            .fetch_records(&RecordFilter {
                fund_id: Some(roof),
                ..january()
            })
            .unwrap();

        let total = |records: &[TransactionRecord]| records.iter().map(|r| r.amount).sum::<f64>();
        assert_eq!(total(&by_appeal), 3.0);
        assert_eq!(total(&by_fund), 1.0);
    }
}
