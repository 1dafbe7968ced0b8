//! Comparing a primary period against a comparison period.
//!
//! - [resolver]: keeps comparison ranges from overlapping the primary range.
//! - [change]: percentage change between two metrics.
//! - [overlay]: aligns two trend series for charting.

mod change;
mod overlay;
mod resolver;

pub use change::{ChangeDirection, FormatOptions, PercentageChange, compute_change, format_change};
pub use overlay::{OverlayPoint, SeriesPoint, overlay_by_date, overlay_by_index};
pub use resolver::{
    DEFAULT_MAX_SHIFT_DAYS, ResolvedRange, coerce_comparison_away_from_main, ranges_overlap,
    resolve_range_conflict, validate_comparison_range,
};
