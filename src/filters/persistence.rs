//! Saving and loading the dashboard filters.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use rusqlite::{Connection, OptionalExtension};
use tokio::task::JoinHandle;

use crate::Error;

use super::state::PersistedFilters;

/// The preference key the filters are stored under.
const FILTERS_KEY: &str = "filters";

/// Create the dashboard_preference table in the database.
///
/// The table is a plain key-value store with JSON values.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_dashboard_preference_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS dashboard_preference (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Durable storage for the dashboard filters.
pub trait FilterPersistence {
    /// Load the saved filters, `None` if nothing has been saved yet.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read or the saved value is corrupt.
    fn load_filters(&self) -> Result<Option<PersistedFilters>, Error>;

    /// Replace the saved filters with `filters`.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    fn save_filters(&self, filters: &PersistedFilters) -> Result<(), Error>;
}

impl FilterPersistence for Connection {
    fn load_filters(&self) -> Result<Option<PersistedFilters>, Error> {
        let value: Option<String> = self
            .query_row(
                "SELECT value FROM dashboard_preference WHERE key = ?1",
                [FILTERS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }

    fn save_filters(&self, filters: &PersistedFilters) -> Result<(), Error> {
        let json = serde_json::to_string(filters)?;

        self.execute(
            "INSERT INTO dashboard_preference (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (FILTERS_KEY, json),
        )?;

        Ok(())
    }
}

/// Saves committed filters on a blocking thread without making the caller wait.
///
/// Each save carries the [FilterStore](super::FilterStore) revision it was taken at.
/// Background saves may run in any order, so a save whose revision is not newer
/// than the last one written is skipped.
#[derive(Debug, Clone)]
pub struct FilterWriter {
    connection: Arc<Mutex<Connection>>,
    saved_revision: Arc<AtomicU64>,
}

impl FilterWriter {
    /// Create a writer that saves to `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            saved_revision: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Save `filters`, taken at store `revision`, in the background.
    ///
    /// Failures are logged and otherwise ignored, the filter change has already been
    /// committed in memory.
    pub fn save_in_background(&self, revision: u64, filters: PersistedFilters) -> JoinHandle<()> {
        let connection = self.connection.clone();
        let saved_revision = self.saved_revision.clone();

        tokio::task::spawn_blocking(move || {
            let connection = match connection.lock() {
                Ok(connection) => connection,
                Err(error) => {
                    tracing::error!("could not acquire database lock to save filters: {error}");
                    return;
                }
            };

            // The revision is only read and written while the connection is locked.
            let latest = saved_revision.load(Ordering::Acquire);
            if revision <= latest {
                tracing::debug!("skipping save of filter revision {revision}, {latest} is saved");
                return;
            }

            match connection.save_filters(&filters) {
                Ok(()) => saved_revision.store(revision, Ordering::Release),
                Err(error) => tracing::error!("could not save dashboard filters: {error}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::{Arc, Mutex},
    };

    use rusqlite::Connection;
    use time::macros::date;

    use super::{FilterPersistence, FilterWriter};
    use crate::{
        Error,
        date_range::{DateRange, RangePreset},
        db::initialize,
        filters::{ChartComparison, PersistedFilters},
        revenue::FrequencyFilter,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn get_filters() -> PersistedFilters {
        PersistedFilters {
            date_range: DateRange::new(date!(2024 - 06 - 01), date!(2024 - 06 - 30))
                .with_preset(Some(RangePreset::Last30Days)),
            selected_appeal: Some(1),
            selected_fund: None,
            frequency: FrequencyFilter::RecurringFirst,
            comparisons: BTreeMap::from([(
                "revenue".to_owned(),
                ChartComparison::enabled(DateRange::new(
                    date!(2024 - 05 - 01),
                    date!(2024 - 05 - 30),
                )),
            )]),
        }
    }

    #[test]
    fn load_without_saved_filters_returns_none() {
        let connection = get_test_connection();

        assert_eq!(connection.load_filters(), Ok(None));
    }

    #[test]
    fn save_replaces_previous_filters() {
        let connection = get_test_connection();
        let mut filters = get_filters();
        connection.save_filters(&filters).unwrap();

        filters.frequency = FrequencyFilter::OneTime;
        connection.save_filters(&filters).unwrap();

        assert_eq!(connection.load_filters(), Ok(Some(filters)));
    }

    #[test]
    fn corrupt_filters_are_an_error() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO dashboard_preference (key, value) VALUES ('filters', '{oops')",
                (),
            )
            .unwrap();

        assert!(matches!(
            connection.load_filters(),
            Err(Error::JSONSerializationError(_))
        ));
    }

    #[tokio::test]
    async fn background_save_writes_filters() {
        let connection = Arc::new(Mutex::new(get_test_connection()));
        let writer = FilterWriter::new(connection.clone());

        writer.save_in_background(1, get_filters()).await.unwrap();

        let saved = connection.lock().unwrap().load_filters().unwrap();
        assert_eq!(saved, Some(get_filters()));
    }

    #[tokio::test]
    async fn older_revision_does_not_overwrite_newer_save() {
        let connection = Arc::new(Mutex::new(get_test_connection()));
        let writer = FilterWriter::new(connection.clone());
        let older = get_filters();
        let newer = PersistedFilters {
            frequency: FrequencyFilter::OneTime,
            ..get_filters()
        };

        writer.save_in_background(2, newer.clone()).await.unwrap();
        writer.save_in_background(1, older.clone()).await.unwrap();
        writer.save_in_background(2, older).await.unwrap();

        let saved = connection.lock().unwrap().load_filters().unwrap();
        assert_eq!(saved, Some(newer));
    }
}
