//! HTTP handlers for reading and changing the dashboard filters.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    comparison::{ResolvedRange, resolve_range_conflict},
    database_id::{AppealId, FundId},
    date_range::DateRangeInput,
    revenue::FrequencyFilter,
    source::FundDirectory,
    timezone::local_today,
};

use super::{
    persistence::FilterWriter,
    state::{FilterAction, FilterState, ReduceContext},
    store::FilterStore,
};

/// The state needed to read and change the dashboard filters.
#[derive(Debug, Clone)]
pub struct FiltersState {
    /// The database connection, used to look up funds.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The dashboard filters.
    pub filters: Arc<Mutex<FilterStore>>,
    /// Saves committed filters.
    pub writer: FilterWriter,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// How far [resolve_comparison] may shift a range before placing it directly
    /// before the primary range.
    pub max_shift_days: i64,
}

impl FromRef<AppState> for FiltersState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            filters: state.filters.clone(),
            writer: state.filter_writer.clone(),
            local_timezone: state.config.local_timezone.clone(),
            max_shift_days: state.config.max_shift_days,
        }
    }
}

/// The body of a request to select an appeal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealSelection {
    /// The appeal to filter by, `None` for all appeals.
    pub appeal_id: Option<AppealId>,
}

/// The body of a request to select a fund.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSelection {
    /// The fund to filter by, `None` for all funds.
    pub fund_id: Option<FundId>,
}

/// The body of a request to select a frequency filter.
#[derive(Debug, Deserialize)]
pub struct FrequencySelection {
    /// The new frequency filter.
    pub frequency: FrequencyFilter,
}

/// The body of a request to switch a chart's comparison on or off.
#[derive(Debug, Deserialize)]
pub struct ComparisonToggle {
    /// Whether the chart should compare against a second period.
    pub enabled: bool,
}

/// Route handler for the current filter state.
pub async fn get_filters(State(state): State<FiltersState>) -> Result<Json<FilterState>, Error> {
    let store = state
        .filters
        .lock()
        .map_err(|_| Error::FilterStateLockError)?;

    Ok(Json(store.state().clone()))
}

/// Route handler for changing the primary date range.
pub async fn put_date_range(
    State(state): State<FiltersState>,
    Json(range): Json<DateRangeInput>,
) -> Result<Json<FilterState>, Error> {
    dispatch(&state, FilterAction::SetDateRange(range))
}

/// Route handler for selecting an appeal.
pub async fn put_appeal(
    State(state): State<FiltersState>,
    Json(selection): Json<AppealSelection>,
) -> Result<Json<FilterState>, Error> {
    dispatch(&state, FilterAction::SetAppeal(selection.appeal_id))
}

/// Route handler for selecting a fund.
pub async fn put_fund(
    State(state): State<FiltersState>,
    Json(selection): Json<FundSelection>,
) -> Result<Json<FilterState>, Error> {
    dispatch(&state, FilterAction::SetFund(selection.fund_id))
}

/// Route handler for selecting a frequency filter.
pub async fn put_frequency(
    State(state): State<FiltersState>,
    Json(selection): Json<FrequencySelection>,
) -> Result<Json<FilterState>, Error> {
    dispatch(&state, FilterAction::SetFrequency(selection.frequency))
}

/// Route handler for switching a chart's comparison on or off.
pub async fn toggle_comparison(
    State(state): State<FiltersState>,
    Path(chart_id): Path<String>,
    Json(toggle): Json<ComparisonToggle>,
) -> Result<Json<FilterState>, Error> {
    dispatch(
        &state,
        FilterAction::ToggleComparison {
            chart_id,
            enabled: toggle.enabled,
        },
    )
}

/// Route handler for setting a chart's comparison range.
pub async fn put_comparison(
    State(state): State<FiltersState>,
    Path(chart_id): Path<String>,
    Json(range): Json<DateRangeInput>,
) -> Result<Json<FilterState>, Error> {
    dispatch(&state, FilterAction::SetChartComparison { chart_id, range })
}

/// Route handler for clearing a chart's comparison.
pub async fn delete_comparison(
    State(state): State<FiltersState>,
    Path(chart_id): Path<String>,
) -> Result<Json<FilterState>, Error> {
    dispatch(&state, FilterAction::ClearComparison { chart_id })
}

/// Route handler that suggests a comparison range that does not overlap the
/// primary range. The filters are not changed.
pub async fn resolve_comparison(
    State(state): State<FiltersState>,
    Path(chart_id): Path<String>,
    Json(range): Json<DateRangeInput>,
) -> Result<Json<ResolvedRange>, Error> {
    let today = local_today(&state.local_timezone)?;
    let desired = range.resolve(today)?;

    let main = state
        .filters
        .lock()
        .map_err(|_| Error::FilterStateLockError)?
        .state()
        .date_range;

    let resolved = resolve_range_conflict(&main, &desired, state.max_shift_days);
    if resolved.changed {
        tracing::debug!("suggested comparison range {:?} for chart {chart_id}", resolved.adjusted);
    }

    Ok(Json(resolved))
}

/// Apply `action` to the filters and save the result in the background.
fn dispatch(state: &FiltersState, action: FilterAction) -> Result<Json<FilterState>, Error> {
    let today = local_today(&state.local_timezone)?;
    let funds = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        FundDirectory::load(&connection)
            .inspect_err(|error| tracing::error!("could not load funds: {error}"))?
    };

    let (snapshot, revision, persisted) = {
        let mut store = state
            .filters
            .lock()
            .map_err(|_| Error::FilterStateLockError)?;
        let persisted = store.dispatch(action, &ReduceContext { today, funds: &funds })?;
        (store.state().clone(), store.revision(), persisted)
    };

    state.writer.save_in_background(revision, persisted);

    Ok(Json(snapshot))
}
