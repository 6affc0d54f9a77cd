//! # Fixed Primitives
//!
//! Compiled-in constants for the Urgency CORE.
//!
//! Defaults here are the documented detector values; every call still takes
//! an explicit configuration, these only seed `Default` impls.
//!
//! ## Primitives
//!
//! 1. **Detection defaults**: percentile, window, growth threshold, baseline.
//! 2. **Statistical constants**: significance level, calendar bucket counts,
//!    decomposition period.
//! 3. **Input limits**: bounded series length for the service surface.

/// Default percentile of the trailing window that defines "high" sales.
pub const DEFAULT_PERCENTILE: f64 = 85.0;

/// Default trailing window size, in weeks (~3 months).
pub const DEFAULT_WINDOW: usize = 12;

/// Default week-over-week growth that flags a week (12%).
pub const DEFAULT_GROWTH_THRESHOLD: f64 = 0.12;

/// Default sales floor below which the growth criterion never fires.
pub const DEFAULT_MIN_BASELINE_SALES: f64 = 1000.0;

/// Significance level for every hypothesis test in the reports.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Calendar months per year; bucket count for the seasonality test.
pub const MONTHS_PER_YEAR: usize = 12;

/// Highest possible week-of-month value (days 29-31).
pub const MAX_WEEK_OF_MONTH: usize = 5;

/// Days between consecutive `week_start` values in a gap-free series.
pub const DAYS_PER_WEEK: i64 = 7;

/// Seasonal period of the trend/seasonal decomposition, in weeks (one year).
pub const DECOMPOSITION_PERIOD: usize = 52;

/// Weeks averaged at each end of the trend to measure its growth.
pub const TREND_EDGE_WEEKS: usize = 10;

/// Largest size of the smaller group for which the exact Mann-Whitney U
/// distribution is used instead of the normal approximation.
pub const EXACT_MANN_WHITNEY_MAX: usize = 8;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum number of weeks in a single series.
///
/// Longer series are rejected before detection to keep every call bounded.
pub const MAX_SERIES_LENGTH: usize = 100_000;
