//! The stateless analytics endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;

use crate::{AppState, Error, timezone::local_today};

use super::{
    engine::run_analytics,
    query::{AnalyticsQuery, AnalyticsResult},
};

/// The state needed to answer analytics queries.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.config.local_timezone.clone(),
        }
    }
}

/// Route handler for analytics queries.
///
/// Reads donations on a blocking thread and answers with the summaries and trends of
/// the requested periods.
pub async fn get_analytics(
    State(state): State<AnalyticsState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResult>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = state.db_connection.clone();

    let result = tokio::task::spawn_blocking(move || {
        let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
        run_analytics(&query, &*connection, today)
    })
    .await?
    .inspect_err(|error| tracing::warn!("could not answer analytics query: {error}"))?;

    Ok(Json(result))
}
