//! Settings that control how the dashboard behaves.

use crate::{comparison::DEFAULT_MAX_SHIFT_DAYS, date_range::RangePreset};

/// The timezone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Dashboard-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The primary range used when no saved range can be restored.
    pub default_preset: RangePreset,
    /// How far the comparison resolver shifts a range one day at a time before
    /// placing it directly before the primary range.
    pub max_shift_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            local_timezone: DEFAULT_TIMEZONE.to_owned(),
            default_preset: RangePreset::default_preset(),
            max_shift_days: DEFAULT_MAX_SHIFT_DAYS,
        }
    }
}
