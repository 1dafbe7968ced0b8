//! The API endpoints URIs.
//!
//! Paths with a `{chart_id}` segment are templates. Use [format_endpoint] to fill
//! them in.

/// Stateless analytics queries.
pub const ANALYTICS: &str = "/api/analytics";
/// The current dashboard filters.
pub const FILTERS: &str = "/api/filters";
/// The primary date range of the dashboard.
pub const FILTERS_DATE_RANGE: &str = "/api/filters/date-range";
/// The selected appeal.
pub const FILTERS_APPEAL: &str = "/api/filters/appeal";
/// The selected fund.
pub const FILTERS_FUND: &str = "/api/filters/fund";
/// The selected frequency filter.
pub const FILTERS_FREQUENCY: &str = "/api/filters/frequency";
/// A chart's comparison range.
pub const COMPARISON: &str = "/api/comparisons/{chart_id}";
/// Switches a chart's comparison on or off.
pub const COMPARISON_TOGGLE: &str = "/api/comparisons/{chart_id}/toggle";
/// Suggests a comparison range that does not overlap the primary range.
pub const COMPARISON_RESOLVE: &str = "/api/comparisons/{chart_id}/resolve";
/// The data feed of a chart.
pub const CHART: &str = "/api/charts/{chart_id}";

/// Replace the parameter in `endpoint_path` with `chart_id`.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, chart_id: &str) -> String {
    endpoint_path.replace("{chart_id}", chart_id)
}
