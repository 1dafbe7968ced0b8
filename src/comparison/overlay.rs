//! Aligns a primary series and a comparison series so they can be drawn on one
//! chart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single labelled value in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// The bucket key, a date or ISO week.
    pub date: String,
    /// The plotted value.
    pub value: f64,
}

impl SeriesPoint {
    /// Create a point for `date`.
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// A point on the combined timeline.
///
/// A missing side means "no data" for that date and must not be drawn as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    /// The position on the primary timeline.
    pub date: String,
    /// The primary period's value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    /// The comparison period's value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<f64>,
}

/// Pair the series position by position.
///
/// The result is as long as the shorter series and uses the current series' dates,
/// so the comparison is drawn against the primary timeline.
pub fn overlay_by_index(current: &[SeriesPoint], comparison: &[SeriesPoint]) -> Vec<OverlayPoint> {
    current
        .iter()
        .zip(comparison)
        .map(|(current, comparison)| OverlayPoint {
            date: current.date.clone(),
            current: Some(current.value),
            comparison: Some(comparison.value),
        })
        .collect()
}

/// Merge the series on their date keys.
///
/// The result holds every date present in either series in ascending order. The
/// comparison series should already be moved onto the primary timeline, see
/// [crate::revenue::align_trend].
pub fn overlay_by_date(current: &[SeriesPoint], comparison: &[SeriesPoint]) -> Vec<OverlayPoint> {
    let mut by_date: BTreeMap<&str, (Option<f64>, Option<f64>)> = BTreeMap::new();

    for point in current {
        by_date.entry(point.date.as_str()).or_default().0 = Some(point.value);
    }

    for point in comparison {
        by_date.entry(point.date.as_str()).or_default().1 = Some(point.value);
    }

    by_date
        .into_iter()
        .map(|(date, (current, comparison))| OverlayPoint {
            date: date.to_owned(),
            current,
            comparison,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{OverlayPoint, SeriesPoint, overlay_by_date, overlay_by_index};

    fn point(date: &str, value: f64) -> SeriesPoint {
        SeriesPoint::new(date, value)
    }

    #[test]
    fn index_overlay_uses_current_dates() {
        let current = [point("2024-01-01", 10.0), point("2024-01-02", 20.0)];
        let comparison = [point("2023-12-01", 8.0), point("2023-12-02", 18.0)];

        let result = overlay_by_index(&current, &comparison);

        assert_eq!(
            result,
            vec![
                OverlayPoint {
                    date: "2024-01-01".to_owned(),
                    current: Some(10.0),
                    comparison: Some(8.0),
                },
                OverlayPoint {
                    date: "2024-01-02".to_owned(),
                    current: Some(20.0),
                    comparison: Some(18.0),
                },
            ]
        );
    }

    #[test]
    fn index_overlay_truncates_to_shorter_series() {
        let current = [point("2024-01-01", 10.0)];
        let comparison = [point("2023-12-01", 8.0), point("2023-12-02", 18.0)];

        assert_eq!(overlay_by_index(&current, &comparison).len(), 1);
        assert_eq!(overlay_by_index(&comparison, &current).len(), 1);
        assert!(overlay_by_index(&[], &comparison).is_empty());
    }

    #[test]
    fn date_overlay_uses_union_of_dates() {
        let current = [point("2024-01-01", 1.0), point("2024-01-02", 2.0)];
        let comparison = [point("2024-01-02", 3.0), point("2024-01-03", 4.0)];

        let result = overlay_by_date(&current, &comparison);

        let dates: Vec<_> = result.iter().map(|point| point.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);

        assert_eq!((result[0].current, result[0].comparison), (Some(1.0), None));
        assert_eq!(
            (result[1].current, result[1].comparison),
            (Some(2.0), Some(3.0))
        );
        assert_eq!((result[2].current, result[2].comparison), (None, Some(4.0)));
    }

    #[test]
    fn date_overlay_sorts_unordered_input() {
        let current = [point("2024-01-03", 1.0), point("2024-01-01", 2.0)];

        let result = overlay_by_date(&current, &[]);

        assert_eq!(result[0].date, "2024-01-01");
        assert_eq!(result[1].date, "2024-01-03");
    }

    #[test]
    fn absent_values_are_omitted_from_json() {
        let result = overlay_by_date(&[point("2024-01-01", 1.0)], &[]);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!([{ "date": "2024-01-01", "current": 1.0 }])
        );
    }
}
