//! Chart generation for the dashboard.
//!
//! Each chart is a line chart of the primary period's trend with the comparison
//! period drawn over it. The options are built for the ECharts library.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPoint,
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};

use crate::{comparison::OverlayPoint, revenue::TrendMetric};

/// The series names shown in the legend.
pub(super) const CURRENT_SERIES: &str = "Current period";
pub(super) const COMPARISON_SERIES: &str = "Comparison period";

/// Builds a line chart of `points`.
///
/// # Arguments
/// * `title` - The chart title
/// * `points` - The aligned current and comparison values
/// * `metric` - What the values measure, controls the axis labels
/// * `show_comparison` - Whether to draw the comparison series
pub(super) fn overlay_chart(
    title: &str,
    points: &[OverlayPoint],
    metric: TrendMetric,
    show_comparison: bool,
) -> Chart {
    let labels: Vec<String> = points.iter().map(|point| point.date.clone()).collect();
    let current: Vec<DataPoint> = points.iter().map(|point| data_point(point.current)).collect();

    let (subtext, value_axis, tooltip) = match metric {
        TrendMetric::Amount => (
            "Donation amount",
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
            currency_tooltip(),
        ),
        TrendMetric::Count => (
            "Number of donations",
            Axis::new().type_(AxisType::Value),
            Tooltip::new().trigger(Trigger::Axis),
        ),
    };

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text(title)
                .subtext(subtext)
                .left(20)
                .top("1%"),
        )
        .tooltip(tooltip)
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(value_axis)
        .series(Line::new().name(CURRENT_SERIES).data(current));

    if show_comparison {
        let comparison: Vec<DataPoint> = points
            .iter()
            .map(|point| data_point(point.comparison))
            .collect();

        chart = chart.series(Line::new().name(COMPARISON_SERIES).data(comparison));
    }

    chart
}

/// ECharts skips "-" instead of drawing it as zero.
fn data_point(value: Option<f64>) -> DataPoint {
    match value {
        Some(value) => DataPoint::from(value),
        None => DataPoint::from("-"),
    }
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use super::{COMPARISON_SERIES, CURRENT_SERIES, overlay_chart};
    use crate::{comparison::OverlayPoint, revenue::TrendMetric};

    fn get_points() -> Vec<OverlayPoint> {
        vec![
            OverlayPoint {
                date: "2024-06-01".to_owned(),
                current: Some(10.0),
                comparison: None,
            },
            OverlayPoint {
                date: "2024-06-02".to_owned(),
                current: None,
                comparison: Some(5.0),
            },
        ]
    }

    #[test]
    fn chart_has_both_series_when_comparing() {
        let options =
            overlay_chart("Revenue", &get_points(), TrendMetric::Amount, true).to_string();

        assert!(options.contains(CURRENT_SERIES));
        assert!(options.contains(COMPARISON_SERIES));
        assert!(options.contains("2024-06-02"));
    }

    #[test]
    fn chart_without_comparison_has_one_series() {
        let options =
            overlay_chart("Revenue", &get_points(), TrendMetric::Count, false).to_string();

        assert!(options.contains(CURRENT_SERIES));
        assert!(!options.contains(COMPARISON_SERIES));
    }
}
