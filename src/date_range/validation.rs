//! Policy checks for date ranges.
//!
//! Checks run in a fixed order and stop at the first failure, so the error message a
//! client sees is always the most basic problem with its input.

use serde::{Serialize, Serializer};
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use super::DateRange;

/// The longest span allowed between the first and last day of a range (5 years).
pub const MAX_RANGE_DAYS: i64 = 1825;

/// Why a date range, comparison range or filter selection was rejected.
///
/// The display text is shown to users as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// One of the dates could not be parsed.
    #[error("Invalid date format")]
    InvalidDateFormat,

    /// The range ends before it starts.
    #[error("Start date cannot be after end date")]
    StartAfterEnd,

    /// The range ends after today.
    #[error("End date cannot be in the future")]
    FutureEndDate,

    /// The range is longer than [MAX_RANGE_DAYS].
    #[error("Date range cannot exceed 5 years")]
    RangeTooLong,

    /// A comparison range shares at least one day with the main range.
    #[error("Comparison period cannot overlap main period")]
    ComparisonOverlap,

    /// The selected fund is not part of the selected appeal.
    #[error("Selected fund does not belong to the selected appeal")]
    FundNotInAppeal,

    /// The selected fund does not exist.
    #[error("Selected fund does not exist")]
    UnknownFund,
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a date given either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Timestamps are reduced to their calendar date in their own offset.
pub fn parse_date(text: &str) -> Result<Date, ValidationError> {
    let text = text.trim();

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .or_else(|_| OffsetDateTime::parse(text, &Rfc3339).map(|datetime| datetime.date()))
        .map_err(|_| ValidationError::InvalidDateFormat)
}

/// Parse and validate a range given as text.
pub fn validate_input(start: &str, end: &str, today: Date) -> Result<DateRange, ValidationError> {
    let range = DateRange::new(parse_date(start)?, parse_date(end)?);
    validate(&range, today)?;

    Ok(range)
}

/// Check that `range` is ordered, does not end after `today` and spans at most
/// [MAX_RANGE_DAYS].
pub fn validate(range: &DateRange, today: Date) -> Result<(), ValidationError> {
    if range.start_date > range.end_date {
        return Err(ValidationError::StartAfterEnd);
    }

    if range.end_date > today {
        return Err(ValidationError::FutureEndDate);
    }

    if range.length().whole_days() > MAX_RANGE_DAYS {
        return Err(ValidationError::RangeTooLong);
    }

    Ok(())
}
