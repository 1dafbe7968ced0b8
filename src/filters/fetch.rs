//! Tracks in-flight chart fetches so that only the latest result is shown.
//!
//! Starting a fetch hands out a [FetchTicket]. A ticket is only honoured if it is the
//! newest ticket for its chart and the filters it was issued for are still the
//! current filters, otherwise the result is dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    database_id::{AppealId, FundId},
    date_range::DateRange,
    revenue::FrequencyFilter,
};

use super::state::FilterState;

/// The filter parameters a chart's data depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    /// The primary range.
    pub date_range: DateRange,
    /// The selected appeal.
    pub appeal_id: Option<AppealId>,
    /// The selected fund.
    pub fund_id: Option<FundId>,
    /// The selected frequency filter.
    pub frequency: FrequencyFilter,
    /// The chart's comparison range, if its comparison is enabled.
    pub comparison: Option<DateRange>,
}

impl FilterState {
    /// The parameters `chart_id` should currently be fetched with.
    pub fn chart_query(&self, chart_id: &str) -> ChartQuery {
        ChartQuery {
            date_range: self.date_range,
            appeal_id: self.selected_appeal,
            fund_id: self.selected_fund,
            frequency: self.frequency,
            comparison: self.comparison(chart_id).active_range(),
        }
    }
}

/// Permission to store the result of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// The chart being fetched.
    pub chart_id: String,
    /// Increases with every fetch started for the chart.
    pub generation: u64,
    /// The parameters the fetch was started with.
    pub query: ChartQuery,
}

/// The last known data of a chart.
///
/// A failed fetch keeps the previous data and records the error next to it.
/// Results of superseded fetches are never stored, but data stored earlier is kept
/// until a newer fetch is applied, even if the filters have changed since.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFeed<T> {
    /// The generation of the last applied fetch.
    pub generation: u64,
    /// The last successfully fetched data.
    pub data: Option<T>,
    /// Why the last applied fetch failed, if it did.
    pub error: Option<String>,
}

impl<T> Default for ChartFeed<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            data: None,
            error: None,
        }
    }
}

/// Whether a completed fetch was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was stored in the chart's feed.
    Applied,
    /// A newer fetch was started or the filters changed while this one was running.
    Superseded,
}

/// The data feeds of every chart, keyed by chart ID.
#[derive(Debug)]
pub struct ChartFeeds<T> {
    feeds: HashMap<String, ChartFeed<T>>,
    latest_generation: HashMap<String, u64>,
}

impl<T> Default for ChartFeeds<T> {
    fn default() -> Self {
        Self {
            feeds: HashMap::new(),
            latest_generation: HashMap::new(),
        }
    }
}

impl<T: Clone> ChartFeeds<T> {
    /// Create an empty set of feeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `chart_id`, superseding any fetch already running for it.
    pub fn begin_fetch(&mut self, chart_id: &str, query: ChartQuery) -> FetchTicket {
        let generation = self
            .latest_generation
            .entry(chart_id.to_owned())
            .and_modify(|generation| *generation += 1)
            .or_insert(1);

        FetchTicket {
            chart_id: chart_id.to_owned(),
            generation: *generation,
            query,
        }
    }

    /// Store the result of the fetch for `ticket`.
    ///
    /// # Arguments
    /// * `ticket` - The ticket returned by [ChartFeeds::begin_fetch]
    /// * `result` - The fetched data, or a message describing why the fetch failed
    /// * `current_query` - The parameters the chart should be showing right now
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<T, String>,
        current_query: &ChartQuery,
    ) -> FetchOutcome {
        let latest = self
            .latest_generation
            .get(&ticket.chart_id)
            .copied()
            .unwrap_or_default();

        if ticket.generation != latest || ticket.query != *current_query {
            tracing::debug!(
                "ignoring stale fetch {} for chart {}",
                ticket.generation,
                ticket.chart_id
            );
            return FetchOutcome::Superseded;
        }

        let feed = self.feeds.entry(ticket.chart_id.clone()).or_default();
        feed.generation = ticket.generation;

        match result {
            Ok(data) => {
                feed.data = Some(data);
                feed.error = None;
            }
            Err(error) => {
                tracing::error!("could not fetch data for chart {}: {error}", ticket.chart_id);
                feed.error = Some(error);
            }
        }

        FetchOutcome::Applied
    }

    /// The current feed of `chart_id`.
    pub fn feed(&self, chart_id: &str) -> ChartFeed<T> {
        self.feeds.get(chart_id).cloned().unwrap_or_default()
    }
}
