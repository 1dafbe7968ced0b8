//! Named date-range presets, computed relative to the local "today".

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, util::days_in_year_month};

use super::DateRange;

/// A named date range that is recomputed from the current day.
///
/// Rolling presets ("last N days") include today. Calendar presets for the current
/// period ("this month") end today so they never reach into the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePreset {
    /// The last 7 days, including today.
    #[serde(rename = "last-7-days")]
    Last7Days,
    /// The last 30 days, including today.
    #[serde(rename = "last-30-days")]
    Last30Days,
    /// The last 90 days, including today.
    #[serde(rename = "last-90-days")]
    Last90Days,
    /// The last 365 days, including today.
    #[serde(rename = "last-365-days")]
    Last365Days,
    /// The current calendar month up to today.
    #[serde(rename = "this-month")]
    ThisMonth,
    /// The previous calendar month.
    #[serde(rename = "last-month")]
    LastMonth,
    /// The current calendar quarter up to today.
    #[serde(rename = "this-quarter")]
    ThisQuarter,
    /// The previous calendar quarter.
    #[serde(rename = "last-quarter")]
    LastQuarter,
    /// The current calendar year up to today.
    #[serde(rename = "this-year")]
    ThisYear,
    /// The previous calendar year.
    #[serde(rename = "last-year")]
    LastYear,
}

impl RangePreset {
    /// The preset used when nothing has been selected yet.
    pub fn default_preset() -> Self {
        Self::Last30Days
    }
}

/// Compute the range for `preset` as seen on `today`.
///
/// The returned range carries `preset` so clients can show which one is active.
pub fn compute_preset_range(preset: RangePreset, today: Date) -> DateRange {
    let range = match preset {
        RangePreset::Last7Days => trailing_days(today, 7),
        RangePreset::Last30Days => trailing_days(today, 30),
        RangePreset::Last90Days => trailing_days(today, 90),
        RangePreset::Last365Days => trailing_days(today, 365),
        RangePreset::ThisMonth => to_today(month_bounds(today.year(), today.month()), today),
        RangePreset::LastMonth => {
            let this_month = month_bounds(today.year(), today.month());
            let last_month = this_month.start_date - Duration::days(1);
            month_bounds(last_month.year(), last_month.month())
        }
        RangePreset::ThisQuarter => to_today(quarter_bounds(today.year(), today.month()), today),
        RangePreset::LastQuarter => {
            let this_quarter = quarter_bounds(today.year(), today.month());
            let last_quarter = this_quarter.start_date - Duration::days(1);
            quarter_bounds(last_quarter.year(), last_quarter.month())
        }
        RangePreset::ThisYear => to_today(year_bounds(today.year()), today),
        RangePreset::LastYear => year_bounds(today.year() - 1),
    };

    range.with_preset(Some(preset))
}

fn trailing_days(today: Date, days: i64) -> DateRange {
    DateRange::new(today - Duration::days(days - 1), today)
}

fn to_today(range: DateRange, today: Date) -> DateRange {
    DateRange::new(range.start_date, range.end_date.min(today))
}

fn month_bounds(year: i32, month: Month) -> DateRange {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, days_in_year_month(year, month))
        .expect("invalid month end date");

    DateRange::new(start, end)
}

fn quarter_bounds(year: i32, month: Month) -> DateRange {
    let quarter_start = ((month as u8 - 1) / 3) * 3 + 1;
    let start_month = Month::try_from(quarter_start).expect("invalid quarter start month");
    let end_month = start_month.next().next();

    DateRange::new(
        month_bounds(year, start_month).start_date,
        month_bounds(year, end_month).end_date,
    )
}

fn year_bounds(year: i32) -> DateRange {
    DateRange::new(
        Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date"),
        Date::from_calendar_date(year, Month::December, 31).expect("invalid year end date"),
    )
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{RangePreset, compute_preset_range};

    #[track_caller]
    fn assert_range(preset: RangePreset, today: time::Date, start: time::Date, end: time::Date) {
        let range = compute_preset_range(preset, today);

        assert_eq!(
            (range.start_date, range.end_date),
            (start, end),
            "unexpected range for {preset:?}"
        );
        assert_eq!(range.preset, Some(preset));
    }

    #[test]
    fn rolling_presets_include_today() {
        let today = date!(2024 - 03 - 10);

        assert_range(RangePreset::Last7Days, today, date!(2024 - 03 - 04), today);
        assert_range(RangePreset::Last30Days, today, date!(2024 - 02 - 10), today);
        assert_range(RangePreset::Last90Days, today, date!(2023 - 12 - 12), today);
        assert_range(RangePreset::Last365Days, today, date!(2023 - 03 - 12), today);
    }

    #[test]
    fn current_period_presets_end_today() {
        let today = date!(2024 - 05 - 20);

        assert_range(RangePreset::ThisMonth, today, date!(2024 - 05 - 01), today);
        assert_range(RangePreset::ThisQuarter, today, date!(2024 - 04 - 01), today);
        assert_range(RangePreset::ThisYear, today, date!(2024 - 01 - 01), today);
    }

    #[test]
    fn last_month_handles_leap_february() {
        assert_range(
            RangePreset::LastMonth,
            date!(2024 - 03 - 15),
            date!(2024 - 02 - 01),
            date!(2024 - 02 - 29),
        );
    }

    #[test]
    fn last_month_wraps_year() {
        assert_range(
            RangePreset::LastMonth,
            date!(2024 - 01 - 15),
            date!(2023 - 12 - 01),
            date!(2023 - 12 - 31),
        );
    }

    #[test]
    fn last_quarter_wraps_year() {
        assert_range(
            RangePreset::LastQuarter,
            date!(2024 - 02 - 01),
            date!(2023 - 10 - 01),
            date!(2023 - 12 - 31),
        );
    }

    #[test]
    fn last_year_is_full_calendar_year() {
        assert_range(
            RangePreset::LastYear,
            date!(2024 - 07 - 04),
            date!(2023 - 01 - 01),
            date!(2023 - 12 - 31),
        );
    }

    #[test]
    fn presets_deserialize_from_kebab_case() {
        let preset: RangePreset = serde_json::from_str("\"last-30-days\"").unwrap();
        assert_eq!(preset, RangePreset::Last30Days);

        let preset: RangePreset = serde_json::from_str("\"this-quarter\"").unwrap();
        assert_eq!(preset, RangePreset::ThisQuarter);
    }
}
