//! Percentage change between a current metric and its comparison baseline.

use serde::Serialize;

/// Which way a metric moved relative to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    /// The metric grew.
    Up,
    /// The metric shrank.
    Down,
    /// No change, or the change is unknown.
    Neutral,
}

/// The signed change of a metric in percent.
///
/// `value` is `None` when either side is missing, or when growing from a zero
/// baseline, in which case `is_infinite` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageChange {
    /// The change in percent, e.g. `12.5` for 12.5%.
    pub value: Option<f64>,
    /// Set when the baseline is zero and the current value is not.
    pub is_infinite: bool,
    /// The sign of the change.
    pub direction: ChangeDirection,
}

impl PercentageChange {
    const UNKNOWN: Self = Self {
        value: None,
        is_infinite: false,
        direction: ChangeDirection::Neutral,
    };
}

/// Compute the change from `comparison` to `current` in percent.
pub fn compute_change(current: Option<f64>, comparison: Option<f64>) -> PercentageChange {
    let (Some(current), Some(comparison)) = (current, comparison) else {
        return PercentageChange::UNKNOWN;
    };

    if !current.is_finite() || !comparison.is_finite() {
        return PercentageChange::UNKNOWN;
    }

    if comparison == 0.0 {
        return if current == 0.0 {
            PercentageChange {
                value: Some(0.0),
                is_infinite: false,
                direction: ChangeDirection::Neutral,
            }
        } else {
            PercentageChange {
                value: None,
                is_infinite: true,
                direction: if current > 0.0 {
                    ChangeDirection::Up
                } else {
                    ChangeDirection::Down
                },
            }
        };
    }

    let value = (current - comparison) / comparison * 100.0;
    let direction = if value > 0.0 {
        ChangeDirection::Up
    } else if value < 0.0 {
        ChangeDirection::Down
    } else {
        ChangeDirection::Neutral
    };

    PercentageChange {
        value: Some(value),
        is_infinite: false,
        direction,
    }
}

/// Options for [format_change].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// The maximum number of decimal places, trailing zeros are dropped.
    pub decimals: usize,
    /// Whether positive changes get a leading `+`.
    pub include_sign: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimals: 1,
            include_sign: true,
        }
    }
}

/// Render a change for display, e.g. "+20%", "-12.5%", "+∞%" or "—".
///
/// Values that round to zero are shown as "0%", never "-0%".
pub fn format_change(change: &PercentageChange, options: FormatOptions) -> String {
    if change.is_infinite {
        let sign = match change.direction {
            ChangeDirection::Down => "-",
            _ if options.include_sign => "+",
            _ => "",
        };
        return format!("{sign}∞%");
    }

    let Some(value) = change.value else {
        return "—".to_owned();
    };

    let digits = format!("{:.*}", options.decimals, value.abs());
    let digits = trim_trailing_zeros(&digits);

    if digits == "0" {
        return "0%".to_owned();
    }

    let sign = if value < 0.0 {
        "-"
    } else if options.include_sign {
        "+"
    } else {
        ""
    };

    format!("{sign}{digits}%")
}

fn trim_trailing_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeDirection, FormatOptions, PercentageChange, compute_change, format_change};

    #[track_caller]
    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn equal_values_are_neutral() {
        assert_eq!(
            compute_change(Some(100.0), Some(100.0)),
            PercentageChange {
                value: Some(0.0),
                is_infinite: false,
                direction: ChangeDirection::Neutral,
            }
        );
    }

    #[test]
    fn increase_is_up() {
        let change = compute_change(Some(120.0), Some(100.0));

        assert_close(change.value, 20.0);
        assert_eq!(change.direction, ChangeDirection::Up);
        assert!(!change.is_infinite);
    }

    #[test]
    fn decrease_is_down() {
        let change = compute_change(Some(80.0), Some(100.0));

        assert_close(change.value, -20.0);
        assert_eq!(change.direction, ChangeDirection::Down);
    }

    #[test]
    fn growth_from_zero_is_infinite() {
        assert_eq!(
            compute_change(Some(50.0), Some(0.0)),
            PercentageChange {
                value: None,
                is_infinite: true,
                direction: ChangeDirection::Up,
            }
        );
        assert_eq!(
            compute_change(Some(-5.0), Some(0.0)).direction,
            ChangeDirection::Down
        );
    }

    #[test]
    fn zero_to_zero_is_no_change() {
        assert_eq!(
            compute_change(Some(0.0), Some(0.0)),
            PercentageChange {
                value: Some(0.0),
                is_infinite: false,
                direction: ChangeDirection::Neutral,
            }
        );
    }

    #[test]
    fn missing_side_has_no_value() {
        let expected = PercentageChange {
            value: None,
            is_infinite: false,
            direction: ChangeDirection::Neutral,
        };

        assert_eq!(compute_change(None, Some(100.0)), expected);
        assert_eq!(compute_change(Some(100.0), None), expected);
        assert_eq!(compute_change(None, None), expected);
    }

    #[test]
    fn same_inputs_give_same_output() {
        assert_eq!(
            compute_change(Some(37.5), Some(12.25)),
            compute_change(Some(37.5), Some(12.25))
        );
    }

    #[test]
    fn formats_whole_percentages_without_decimals() {
        let options = FormatOptions::default();

        assert_eq!(
            format_change(&compute_change(Some(120.0), Some(100.0)), options),
            "+20%"
        );
        assert_eq!(
            format_change(&compute_change(Some(80.0), Some(100.0)), options),
            "-20%"
        );
        assert_eq!(
            format_change(&compute_change(Some(100.0), Some(100.0)), options),
            "0%"
        );
    }

    #[test]
    fn formats_fractional_percentages() {
        let change = compute_change(Some(112.6), Some(100.0));

        assert_eq!(format_change(&change, FormatOptions::default()), "+12.6%");
        assert_eq!(
            format_change(
                &change,
                FormatOptions {
                    decimals: 0,
                    include_sign: false,
                }
            ),
            "13%"
        );
    }

    #[test]
    fn tiny_negative_change_is_not_negative_zero() {
        let change = compute_change(Some(99.99), Some(100.0));

        assert_eq!(format_change(&change, FormatOptions::default()), "0%");
    }

    #[test]
    fn formats_sentinels() {
        let options = FormatOptions::default();

        assert_eq!(
            format_change(&compute_change(Some(50.0), Some(0.0)), options),
            "+∞%"
        );
        assert_eq!(
            format_change(&compute_change(Some(-50.0), Some(0.0)), options),
            "-∞%"
        );
        assert_eq!(
            format_change(&compute_change(None, Some(0.0)), options),
            "—"
        );
    }
}
