//! Day-granular date ranges, presets and validation.
//!
//! A [DateRange] is an immutable value: edits replace the whole range rather than
//! mutating it in place. Ranges are checked against the policy in [validation]
//! before they are committed anywhere.

mod preset;
mod validation;

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

pub use preset::{RangePreset, compute_preset_range};
pub use validation::{
    MAX_RANGE_DAYS, ValidationError, parse_date, validate, validate_input,
};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// The first day in the range.
    pub start_date: Date,
    /// The last day in the range.
    pub end_date: Date,
    /// The preset the range was created from, `None` for a custom range.
    #[serde(default)]
    pub preset: Option<RangePreset>,
}

impl DateRange {
    /// Create a custom range. The dates are not checked, see [validate].
    pub fn new(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date,
            end_date,
            preset: None,
        }
    }

    /// Tag the range with the preset it was derived from.
    pub fn with_preset(self, preset: Option<RangePreset>) -> Self {
        Self { preset, ..self }
    }

    /// The distance between the first and last day.
    ///
    /// A single-day range has a length of zero.
    pub fn length(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// Whether `date` falls within the range, inclusive of both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Move both ends of the range back by `days`, keeping its length.
    pub fn shifted_back(&self, days: i64) -> Self {
        Self::new(
            self.start_date - Duration::days(days),
            self.end_date - Duration::days(days),
        )
    }

    /// The range of equal length that ends the day before this range starts.
    pub fn previous_period(&self) -> Self {
        self.preceding_with_length(self.length())
    }

    /// A range of `length` that ends the day before this range starts.
    pub fn preceding_with_length(&self, length: Duration) -> Self {
        let end_date = self.start_date - Duration::days(1);

        Self::new(end_date - length, end_date)
    }
}

/// A date range as submitted by a client, before parsing and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeInput {
    /// The first day, as `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub start_date: Option<String>,
    /// The last day, as `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[serde(default)]
    pub end_date: Option<String>,
    /// A preset to derive the range from when no explicit dates are given.
    #[serde(default)]
    pub preset: Option<RangePreset>,
}

impl From<DateRange> for DateRangeInput {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: Some(range.start_date.to_string()),
            end_date: Some(range.end_date.to_string()),
            preset: range.preset,
        }
    }
}

impl DateRangeInput {
    /// Resolve the input into a validated range.
    ///
    /// A preset without explicit dates is computed relative to `today`, explicit dates
    /// take priority and keep the preset as a label.
    pub fn resolve(&self, today: Date) -> Result<DateRange, ValidationError> {
        match (&self.start_date, &self.end_date, self.preset) {
            (None, None, Some(preset)) => {
                let range = compute_preset_range(preset, today);
                validate(&range, today)?;
                Ok(range)
            }
            (start, end, preset) => {
                let range = validate_input(
                    start.as_deref().unwrap_or_default(),
                    end.as_deref().unwrap_or_default(),
                    today,
                )?;
                Ok(range.with_preset(preset))
            }
        }
    }
}
