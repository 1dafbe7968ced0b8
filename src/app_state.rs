//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    config::DashboardConfig,
    dashboard::ChartData,
    db::initialize,
    filters::{
        ChartFeeds, FilterPersistence, FilterState, FilterStore, FilterWriter, ReduceContext,
    },
    source::FundDirectory,
    timezone::local_today,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The dashboard settings.
    pub config: DashboardConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The dashboard filters shared by every chart.
    pub filters: Arc<Mutex<FilterStore>>,

    /// Saves the dashboard filters after each change.
    pub filter_writer: FilterWriter,

    /// The last data fetched for each chart.
    pub chart_feeds: Arc<Mutex<ChartFeeds<ChartData>>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models
    /// and restore the dashboard filters saved by a previous run. Saved filters that are no
    /// longer valid are repaired, and filters that cannot be read are replaced with the
    /// defaults from `config`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the configured timezone
    /// is invalid.
    pub fn new(db_connection: Connection, config: DashboardConfig) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let today = local_today(&config.local_timezone)?;
        let funds = FundDirectory::load(&db_connection)?;
        let context = ReduceContext {
            today,
            funds: &funds,
        };

        let saved_filters = db_connection.load_filters().unwrap_or_else(|error| {
            tracing::warn!("could not load saved dashboard filters, using defaults: {error}");
            None
        });

        let filters = match saved_filters {
            Some(saved_filters) => {
                FilterState::rehydrate(saved_filters, &context, config.default_preset)
            }
            None => FilterState::with_preset(config.default_preset, today),
        };

        let db_connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            config,
            filter_writer: FilterWriter::new(db_connection.clone()),
            db_connection,
            filters: Arc::new(Mutex::new(FilterStore::new(filters))),
            chart_feeds: Arc::new(Mutex::new(ChartFeeds::new())),
        })
    }
}
