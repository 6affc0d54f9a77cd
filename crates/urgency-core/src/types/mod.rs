//! # Core Type Definitions
//!
//! This module contains all core types for the Urgency analytics engine:
//! - Input rows (`WeeklyRecord`) and their derived calendar fields
//! - Per-week detector output (`UrgencyFlags`, `Criteria`)
//! - Report markers (`TestOutcome`, `Significance`, `UndefinedReason`)
//! - Error types (`UrgencyError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module are plain values:
//! - No interior mutability, no hidden state
//! - Derived calendar fields are pure functions of `week_start`
//! - Undefined statistics are explicit variants, never NaN or zero sentinels

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// WEEKLY RECORD
// =============================================================================

/// One row per calendar week of aggregated sales.
///
/// `week_start` is the first day of the aggregation week. Across a series the
/// dates are unique and strictly increasing; gaps of more than one week are
/// tolerated but reported by [`crate::quality::assess_quality`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    /// First day of the aggregation week (timezone-naive).
    pub week_start: NaiveDate,
    /// Total units sold that week. Finite and non-negative.
    pub total_sales: f64,
    /// Total revenue that week, when the source carries prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_revenue: Option<f64>,
    /// Mean selling price that week, when the source carries prices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<f64>,
}

impl WeeklyRecord {
    /// Create a record with sales only.
    #[must_use]
    pub fn new(week_start: NaiveDate, total_sales: f64) -> Self {
        Self {
            week_start,
            total_sales,
            total_revenue: None,
            avg_price: None,
        }
    }

    /// Attach revenue and average price.
    #[must_use]
    pub fn with_revenue(mut self, total_revenue: f64, avg_price: f64) -> Self {
        self.total_revenue = Some(total_revenue);
        self.avg_price = Some(avg_price);
        self
    }

    /// Calendar year of `week_start`.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.week_start.year()
    }

    /// Calendar month of `week_start` (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.week_start.month()
    }

    /// Calendar quarter of `week_start` (1-4).
    #[must_use]
    pub fn quarter(&self) -> u32 {
        (self.week_start.month() - 1) / 3 + 1
    }

    /// ISO-8601 week number of `week_start` (1-53).
    #[must_use]
    pub fn week_of_year(&self) -> u32 {
        self.week_start.iso_week().week()
    }

    /// Week of the month that `week_start` falls in (1-5).
    ///
    /// Days 1-7 are week 1, days 8-14 week 2, and so on.
    #[must_use]
    pub fn week_of_month(&self) -> u32 {
        (self.week_start.day() - 1) / 7 + 1
    }
}

// =============================================================================
// URGENCY FLAGS
// =============================================================================

/// Detector output for a single week, aligned by index with the input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgencyFlags {
    /// Percentile of `total_sales` over the trailing window, current week included.
    pub percentile_threshold: f64,
    /// `total_sales > percentile_threshold`.
    pub is_urgent_percentile: bool,
    /// Week-over-week growth. `None` for the first week and after a zero-sales week.
    pub growth_rate: Option<f64>,
    /// Growth above threshold on a week whose sales clear the baseline.
    pub is_urgent_growth: bool,
    /// Combined verdict (OR of both criteria in hybrid mode).
    pub is_urgent: bool,
}

impl UrgencyFlags {
    /// Which criteria fired for this week.
    #[must_use]
    pub fn criteria(&self) -> Criteria {
        match (self.is_urgent_percentile, self.is_urgent_growth) {
            (false, false) => Criteria::None,
            (true, false) => Criteria::PercentileOnly,
            (false, true) => Criteria::GrowthOnly,
            (true, true) => Criteria::Both,
        }
    }
}

/// Breakdown of which detection criteria fired for a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criteria {
    None,
    PercentileOnly,
    GrowthOnly,
    Both,
}

// =============================================================================
// REPORT MARKERS
// =============================================================================

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// No week was flagged urgent, so there is no distribution to test.
    NoUrgentWeeks,
    /// One side of a two-sample comparison has no observations.
    EmptyGroup,
    /// Every pooled observation is identical; the rank variance is zero.
    AllValuesTied,
    /// The series covers fewer than two seasonal periods.
    TooFewCycles,
}

impl std::fmt::Display for UndefinedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            UndefinedReason::NoUrgentWeeks => "no urgent weeks",
            UndefinedReason::EmptyGroup => "one group is empty",
            UndefinedReason::AllValuesTied => "all values are tied",
            UndefinedReason::TooFewCycles => "fewer than two full seasonal cycles",
        };
        f.write_str(text)
    }
}

/// Result of a test or decomposition that may be undefined for the given data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome<T> {
    /// The test ran.
    Computed(T),
    /// The test is undefined for this data.
    NotComputable { reason: UndefinedReason },
}

impl<T> TestOutcome<T> {
    /// The computed value, if any.
    #[must_use]
    pub fn computed(&self) -> Option<&T> {
        match self {
            TestOutcome::Computed(value) => Some(value),
            TestOutcome::NotComputable { .. } => None,
        }
    }

    /// Check whether the test ran.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, TestOutcome::Computed(_))
    }

    /// Turn a statistic result into an outcome.
    ///
    /// `UndefinedStatistic` errors become `NotComputable`; every other error
    /// is passed through.
    pub fn from_result(result: Result<T, UrgencyError>) -> Result<Self, UrgencyError> {
        match result {
            Ok(value) => Ok(TestOutcome::Computed(value)),
            Err(UrgencyError::UndefinedStatistic(reason)) => {
                Ok(TestOutcome::NotComputable { reason })
            }
            Err(e) => Err(e),
        }
    }
}

/// Verdict of a significance test, with an explicit undefined state.
///
/// `NotComputable` is distinct from `NotSignificant`: the former means the
/// test never ran, the latter means it ran and failed to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Significant,
    NotSignificant,
    NotComputable,
}

impl Significance {
    /// Classify a p-value against a significance level.
    #[must_use]
    pub fn from_p_value(p_value: f64, alpha: f64) -> Self {
        if p_value < alpha {
            Significance::Significant
        } else {
            Significance::NotSignificant
        }
    }

    /// `Some(true|false)` when the test ran, `None` otherwise.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Significance::Significant => Some(true),
            Significance::NotSignificant => Some(false),
            Significance::NotComputable => None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Urgency system.
///
/// - Configuration and input problems are rejected before any computation
/// - Undefined statistics are data conditions, not crashes; reports convert
///   them into [`TestOutcome::NotComputable`]
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum UrgencyError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input series has no rows.
    #[error("Empty series")]
    EmptySeries,

    /// A row of the input series violates the series invariants.
    #[error("Invalid series at row {index}: {reason}")]
    InvalidSeries { index: usize, reason: String },

    /// Flags and series passed to a report are not aligned.
    #[error("Length mismatch: {flags} flags for {series} weeks")]
    LengthMismatch { flags: usize, series: usize },

    /// A statistic is undefined for the given data.
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(UndefinedReason),

    /// The series exceeds the accepted length.
    #[error("Series length {len} exceeds maximum {max}")]
    SeriesTooLong { len: usize, max: usize },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
