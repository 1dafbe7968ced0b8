//! The dashboard filter state and the pure reducer that changes it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    comparison::{coerce_comparison_away_from_main, validate_comparison_range},
    database_id::{AppealId, FundId},
    date_range::{
        DateRange, DateRangeInput, RangePreset, ValidationError, compute_preset_range, validate,
    },
    revenue::FrequencyFilter,
    source::FundDirectory,
};

/// The comparison settings of one chart.
///
/// While `enabled` is set the dates never overlap the primary range they were
/// written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartComparison {
    /// Whether the chart compares against a second period.
    pub enabled: bool,
    /// The first day of the comparison range.
    pub start_date: Option<Date>,
    /// The last day of the comparison range.
    pub end_date: Option<Date>,
    /// The preset the comparison range was created from.
    #[serde(default)]
    pub preset: Option<RangePreset>,
}

impl ChartComparison {
    /// A switched off comparison without a range.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_date: None,
            end_date: None,
            preset: None,
        }
    }

    /// A switched on comparison against `range`.
    pub fn enabled(range: DateRange) -> Self {
        Self {
            enabled: true,
            start_date: Some(range.start_date),
            end_date: Some(range.end_date),
            preset: range.preset,
        }
    }

    /// The stored range, if both dates are set.
    pub fn range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) => {
                Some(DateRange::new(start_date, end_date).with_preset(self.preset))
            }
            _ => None,
        }
    }

    /// The range to compare against, `None` while the comparison is switched off.
    pub fn active_range(&self) -> Option<DateRange> {
        if self.enabled { self.range() } else { None }
    }
}

/// A change a user makes to the dashboard filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Replace the primary range.
    SetDateRange(DateRangeInput),
    /// Select an appeal, or all appeals. Clears a fund from a different appeal.
    SetAppeal(Option<AppealId>),
    /// Select a fund, or all funds.
    SetFund(Option<FundId>),
    /// Select a frequency filter.
    SetFrequency(FrequencyFilter),
    /// Switch a chart's comparison on or off.
    ToggleComparison {
        /// The chart to change.
        chart_id: String,
        /// Whether the comparison should be on.
        enabled: bool,
    },
    /// Compare a chart against `range` and switch its comparison on.
    SetChartComparison {
        /// The chart to change.
        chart_id: String,
        /// The new comparison range.
        range: DateRangeInput,
    },
    /// Switch a chart's comparison off and forget its range.
    ClearComparison {
        /// The chart to change.
        chart_id: String,
    },
    /// Forget the reason the last change was rejected.
    ClearValidationError,
}

/// What the reducer needs to know about the world outside the filter state.
#[derive(Debug, Clone, Copy)]
pub struct ReduceContext<'a> {
    /// The current day in the dashboard's timezone.
    pub today: Date,
    /// The known funds and their appeals.
    pub funds: &'a FundDirectory,
}

/// The subset of [FilterState] that survives a restart.
///
/// The fields mean the same as their namesakes on [FilterState].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedFilters {
    /// The primary range.
    pub date_range: DateRange,
    /// The selected appeal.
    #[serde(default)]
    pub selected_appeal: Option<AppealId>,
    /// The selected fund.
    #[serde(default)]
    pub selected_fund: Option<FundId>,
    /// The selected frequency filter.
    #[serde(default)]
    pub frequency: FrequencyFilter,
    /// The comparison settings of each chart.
    #[serde(default)]
    pub comparisons: BTreeMap<String, ChartComparison>,
}

/// The filters applied to every chart on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// The primary range shared by every chart.
    pub date_range: DateRange,
    /// The appeal to filter by, `None` for all appeals.
    pub selected_appeal: Option<AppealId>,
    /// The fund to filter by, `None` for all funds.
    pub selected_fund: Option<FundId>,
    /// The selected frequency filter.
    pub frequency: FrequencyFilter,
    /// The comparison settings of each chart, keyed by chart ID.
    pub comparisons: BTreeMap<String, ChartComparison>,
    /// The reason the most recent change was rejected.
    pub last_validation_error: Option<ValidationError>,
}

impl FilterState {
    /// A state with no filters and the range of `preset` ending `today`.
    pub fn with_preset(preset: RangePreset, today: Date) -> Self {
        Self {
            date_range: compute_preset_range(preset, today),
            selected_appeal: None,
            selected_fund: None,
            frequency: FrequencyFilter::default(),
            comparisons: BTreeMap::new(),
            last_validation_error: None,
        }
    }

    /// Restore a saved state, repairing anything that is no longer valid.
    ///
    /// - A range saved from a preset is recomputed so that it ends `today`.
    /// - An invalid custom range is replaced with the range of `default_preset`.
    /// - A fund that no longer exists or no longer belongs to the selected appeal is
    ///   dropped.
    /// - An enabled comparison that now overlaps the primary range, or is otherwise
    ///   invalid, is reset to the period immediately before the primary range.
    pub fn rehydrate(
        persisted: PersistedFilters,
        context: &ReduceContext,
        default_preset: RangePreset,
    ) -> Self {
        let today = context.today;

        let date_range = match persisted.date_range.preset {
            Some(preset) => compute_preset_range(preset, today),
            None => match validate(&persisted.date_range, today) {
                Ok(()) => persisted.date_range,
                Err(error) => {
                    tracing::debug!("discarding saved date range: {error}");
                    compute_preset_range(default_preset, today)
                }
            },
        };

        let selected_fund = persisted.selected_fund.filter(|&fund_id| {
            let compatible = context
                .funds
                .is_compatible(fund_id, persisted.selected_appeal);
            if !compatible {
                tracing::debug!("discarding saved fund selection {fund_id}");
            }
            compatible
        });

        let comparisons = persisted
            .comparisons
            .into_iter()
            .map(|(chart_id, comparison)| {
                let repaired = repair_comparison(&chart_id, comparison, &date_range, today);
                (chart_id, repaired)
            })
            .collect();

        Self {
            date_range,
            selected_appeal: persisted.selected_appeal,
            selected_fund,
            frequency: persisted.frequency,
            comparisons,
            last_validation_error: None,
        }
    }

    /// The part of the state that is saved between sessions.
    pub fn to_persisted(&self) -> PersistedFilters {
        PersistedFilters {
            date_range: self.date_range,
            selected_appeal: self.selected_appeal,
            selected_fund: self.selected_fund,
            frequency: self.frequency,
            comparisons: self.comparisons.clone(),
        }
    }

    /// The comparison settings of `chart_id`, disabled if the chart has none.
    pub fn comparison(&self, chart_id: &str) -> ChartComparison {
        self.comparisons
            .get(chart_id)
            .copied()
            .unwrap_or_else(ChartComparison::disabled)
    }

    /// Compute the state after `action`.
    ///
    /// The current state is never modified. Either the whole action is applied or,
    /// if any part of it is invalid, the reason is returned and nothing changes.
    ///
    /// # Errors
    /// Returns the [ValidationError] that caused the action to be rejected.
    pub fn apply(
        &self,
        action: &FilterAction,
        context: &ReduceContext,
    ) -> Result<FilterState, ValidationError> {
        let mut next = self.clone();

        match action {
            FilterAction::SetDateRange(input) => {
                next.date_range = input.resolve(context.today)?;
            }
            FilterAction::SetAppeal(appeal_id) => {
                next.selected_appeal = *appeal_id;

                if let Some(fund_id) = next.selected_fund {
                    if !context.funds.is_compatible(fund_id, *appeal_id) {
                        tracing::debug!("clearing fund {fund_id}, not part of the new appeal");
                        next.selected_fund = None;
                    }
                }
            }
            FilterAction::SetFund(None) => next.selected_fund = None,
            FilterAction::SetFund(Some(fund_id)) => {
                if !context.funds.contains(*fund_id) {
                    return Err(ValidationError::UnknownFund);
                }

                if !context.funds.is_compatible(*fund_id, next.selected_appeal) {
                    return Err(ValidationError::FundNotInAppeal);
                }

                next.selected_fund = Some(*fund_id);
            }
            FilterAction::SetFrequency(frequency) => next.frequency = *frequency,
            FilterAction::ToggleComparison { chart_id, enabled } => {
                let comparison = if *enabled {
                    match self.comparison(chart_id).active_range() {
                        Some(range) => ChartComparison::enabled(range),
                        None => ChartComparison::enabled(coerce_comparison_away_from_main(
                            &self.date_range,
                            &self.date_range.previous_period(),
                        )),
                    }
                } else {
                    ChartComparison::disabled()
                };

                next.comparisons.insert(chart_id.clone(), comparison);
            }
            FilterAction::SetChartComparison { chart_id, range } => {
                let range = range.resolve(context.today)?;
                validate_comparison_range(&self.date_range, &range, context.today)?;

                next.comparisons
                    .insert(chart_id.clone(), ChartComparison::enabled(range));
            }
            FilterAction::ClearComparison { chart_id } => {
                next.comparisons
                    .insert(chart_id.clone(), ChartComparison::disabled());
            }
            FilterAction::ClearValidationError => {}
        }

        next.last_validation_error = None;

        Ok(next)
    }
}

fn repair_comparison(
    chart_id: &str,
    comparison: ChartComparison,
    main: &DateRange,
    today: Date,
) -> ChartComparison {
    if !comparison.enabled {
        return ChartComparison::disabled();
    }

    let is_valid = comparison
        .range()
        .is_some_and(|range| validate_comparison_range(main, &range, today).is_ok());

    if is_valid {
        comparison
    } else {
        tracing::debug!("resetting comparison of chart {chart_id} to the previous period");
        ChartComparison::enabled(main.previous_period())
    }
}
