//! Overlap detection and conflict resolution between a main range and a comparison
//! range.
//!
//! Ranges are closed intervals of days: a comparison that ends on the day the main
//! range starts overlaps it.

use serde::Serialize;
use time::Date;

use crate::date_range::{DateRange, ValidationError, validate};

/// How many single-day shifts [resolve_range_conflict] tries before giving up and
/// placing the comparison directly before the main range.
pub const DEFAULT_MAX_SHIFT_DAYS: i64 = 60;

/// The outcome of [resolve_range_conflict].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRange {
    /// The range to use, never overlapping the main range.
    pub adjusted: DateRange,
    /// Whether `adjusted` differs from the requested range.
    pub changed: bool,
    /// A user-facing explanation of the adjustment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Whether `a` and `b` share at least one day.
pub fn ranges_overlap(a: &DateRange, b: &DateRange) -> bool {
    a.start_date <= b.end_date && b.start_date <= a.end_date
}

/// Check that `compare` is a valid range on its own and does not overlap `main`.
pub fn validate_comparison_range(
    main: &DateRange,
    compare: &DateRange,
    today: Date,
) -> Result<(), ValidationError> {
    validate(compare, today)?;

    if ranges_overlap(main, compare) {
        return Err(ValidationError::ComparisonOverlap);
    }

    Ok(())
}

/// Move `desired` earlier until it no longer overlaps `main`.
///
/// The length of `desired` is always kept. The range is shifted back one day at a
/// time; when that takes more than `max_shift_days` shifts, the range is instead
/// placed so that it ends the day before `main` starts.
pub fn resolve_range_conflict(
    main: &DateRange,
    desired: &DateRange,
    max_shift_days: i64,
) -> ResolvedRange {
    if !ranges_overlap(main, desired) {
        return ResolvedRange {
            adjusted: *desired,
            changed: false,
            reason: None,
        };
    }

    let shifted = (1..=max_shift_days)
        .map(|days| (days, desired.shifted_back(days)))
        .find(|(_, candidate)| !ranges_overlap(main, candidate));

    match shifted {
        Some((days, adjusted)) => {
            tracing::debug!("shifted comparison range back {days} days to avoid the main range");

            ResolvedRange {
                adjusted,
                changed: true,
                reason: Some(format!(
                    "Comparison period moved back {days} {} to avoid overlapping the main period",
                    if days == 1 { "day" } else { "days" }
                )),
            }
        }
        None => {
            let adjusted = main.preceding_with_length(desired.length());
            tracing::debug!(
                "comparison range needs more than {max_shift_days} days of shifting, placing it before the main range"
            );

            ResolvedRange {
                adjusted,
                changed: true,
                reason: Some(
                    "Comparison period moved to immediately before the main period".to_owned(),
                ),
            }
        }
    }
}

/// Keep `desired` if it lies wholly before or after `main`, otherwise replace it with
/// the period of the same length immediately before `main`.
pub fn coerce_comparison_away_from_main(main: &DateRange, desired: &DateRange) -> DateRange {
    if desired.end_date < main.start_date || desired.start_date > main.end_date {
        return *desired;
    }

    main.preceding_with_length(desired.length())
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::date};

    use super::{
        DEFAULT_MAX_SHIFT_DAYS, coerce_comparison_away_from_main, ranges_overlap,
        resolve_range_conflict, validate_comparison_range,
    };
    use crate::date_range::{DateRange, ValidationError};

    const TODAY: time::Date = date!(2024 - 06 - 30);

    fn range(start: time::Date, end: time::Date) -> DateRange {
        DateRange::new(start, end)
    }

    #[test]
    fn touching_endpoints_overlap() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let touching = range(date!(2024 - 02 - 01), date!(2024 - 03 - 01));
        let adjacent = range(date!(2024 - 02 - 01), date!(2024 - 02 - 29));

        assert!(ranges_overlap(&main, &touching));
        assert!(ranges_overlap(&touching, &main));
        assert!(!ranges_overlap(&main, &adjacent));
    }

    #[test]
    fn contained_ranges_overlap() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let inner = range(date!(2024 - 03 - 10), date!(2024 - 03 - 12));

        assert!(ranges_overlap(&main, &inner));
        assert!(ranges_overlap(&inner, &main));
    }

    #[test]
    fn overlapping_comparison_is_invalid() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let compare = range(date!(2024 - 02 - 15), date!(2024 - 03 - 05));

        assert_eq!(
            validate_comparison_range(&main, &compare, TODAY),
            Err(ValidationError::ComparisonOverlap)
        );
    }

    #[test]
    fn comparison_range_is_checked_on_its_own_first() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let backwards = range(date!(2024 - 03 - 20), date!(2024 - 03 - 05));
        let future = range(date!(2024 - 07 - 01), date!(2024 - 07 - 31));

        assert_eq!(
            validate_comparison_range(&main, &backwards, TODAY),
            Err(ValidationError::StartAfterEnd)
        );
        assert_eq!(
            validate_comparison_range(&main, &future, TODAY),
            Err(ValidationError::FutureEndDate)
        );
    }

    #[test]
    fn comparison_after_main_is_valid() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let compare = range(date!(2024 - 04 - 01), date!(2024 - 04 - 30));

        assert_eq!(validate_comparison_range(&main, &compare, TODAY), Ok(()));
    }

    #[test]
    fn overlap_always_invalidates_comparison() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));

        for offset in -40..40 {
            let start = main.start_date + Duration::days(offset);
            let compare = range(start, start + Duration::days(9));

            if ranges_overlap(&main, &compare) {
                assert!(validate_comparison_range(&main, &compare, TODAY).is_err());
            }
        }
    }

    #[test]
    fn resolve_keeps_non_overlapping_range() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let desired = range(date!(2024 - 01 - 01), date!(2024 - 01 - 31));

        let resolved = resolve_range_conflict(&main, &desired, DEFAULT_MAX_SHIFT_DAYS);

        assert_eq!(resolved.adjusted, desired);
        assert!(!resolved.changed);
        assert_eq!(resolved.reason, None);
    }

    #[test]
    fn resolve_shifts_back_by_smallest_amount() {
        let main = range(date!(2024 - 03 - 10), date!(2024 - 03 - 31));
        let desired = range(date!(2024 - 03 - 01), date!(2024 - 03 - 12));

        let resolved = resolve_range_conflict(&main, &desired, DEFAULT_MAX_SHIFT_DAYS);

        assert!(resolved.changed);
        assert_eq!(resolved.adjusted.end_date, date!(2024 - 03 - 09));
        assert_eq!(resolved.adjusted.start_date, date!(2024 - 02 - 27));
        assert!(resolved.reason.unwrap().contains("3 days"));
    }

    #[test]
    fn resolve_falls_back_to_preceding_period_when_shift_is_too_far() {
        let main = range(date!(2024 - 01 - 01), date!(2024 - 06 - 30));
        let desired = range(date!(2024 - 05 - 01), date!(2024 - 05 - 31));

        let resolved = resolve_range_conflict(&main, &desired, DEFAULT_MAX_SHIFT_DAYS);

        assert!(resolved.changed);
        assert_eq!(resolved.adjusted.end_date, date!(2023 - 12 - 31));
        assert_eq!(resolved.adjusted.start_date, date!(2023 - 12 - 01));
    }

    #[test]
    fn resolved_range_never_overlaps_and_keeps_length() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 04 - 15));

        for offset in -80..80 {
            for length in [0, 1, 6, 30, 120] {
                let start = main.start_date + Duration::days(offset);
                let desired = range(start, start + Duration::days(length));

                for max_shift in [0, 5, DEFAULT_MAX_SHIFT_DAYS] {
                    let resolved = resolve_range_conflict(&main, &desired, max_shift);

                    assert!(
                        !ranges_overlap(&main, &resolved.adjusted),
                        "{desired:?} resolved to {:?}",
                        resolved.adjusted
                    );
                    assert_eq!(resolved.adjusted.length(), desired.length());
                    assert_eq!(resolved.changed, resolved.adjusted != desired);
                }
            }
        }
    }

    #[test]
    fn coerce_keeps_ranges_before_or_after_main() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let before = range(date!(2024 - 01 - 01), date!(2024 - 01 - 31));
        let after = range(date!(2024 - 04 - 01), date!(2024 - 04 - 30));

        assert_eq!(coerce_comparison_away_from_main(&main, &before), before);
        assert_eq!(coerce_comparison_away_from_main(&main, &after), after);
    }

    #[test]
    fn coerce_replaces_overlapping_range_with_preceding_period() {
        let main = range(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let desired = range(date!(2024 - 03 - 20), date!(2024 - 04 - 05));

        let coerced = coerce_comparison_away_from_main(&main, &desired);

        assert_eq!(coerced.end_date, date!(2024 - 02 - 29));
        assert_eq!(coerced.length(), desired.length());
        assert!(!ranges_overlap(&main, &coerced));
    }
}
