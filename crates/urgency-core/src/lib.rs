//! # urgency-core
//!
//! The deterministic urgency detector for weekly retail sales - THE LOGIC.
//!
//! Flags weeks whose sales look like urgent demand spikes using two
//! rule-based criteria (trailing percentile, week-over-week growth), then
//! tests whether those weeks are seasonal and whether they differ from the
//! rest of the series. A trend/seasonal decomposition describes the series
//! itself.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure: every operation maps an immutable input to a new output
//! - Takes its configuration as an explicit value on every call
//! - Rejects bad configuration or input before computing anything
//! - Reports undefined statistics as explicit markers, never NaN
//! - Has NO async, NO I/O, NO logging

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod analysis;
pub mod comparison;
pub mod config;
pub mod decompose;
pub mod detector;
pub mod export;
pub mod primitives;
pub mod quality;
pub mod seasonality;
pub mod stats;
pub mod synthetic;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Criteria, Significance, TestOutcome, UndefinedReason, UrgencyError, UrgencyFlags,
    WeeklyRecord,
};

// =============================================================================
// RE-EXPORTS: Detection and Reports
// =============================================================================

pub use analysis::{AnalysisReport, DetectionSummary, analyze, analyze_flags};
pub use comparison::{GroupComparisonReport, compare_groups};
pub use config::DetectorConfig;
pub use decompose::{Decomposition, DecompositionSummary, decompose};
pub use detector::{UrgencyDetector, detect, validate_series};
pub use seasonality::{BucketCount, SeasonalityReport, validate_seasonality};
pub use stats::{ChiSquareTest, Descriptive, MannWhitneyMethod, MannWhitneyTest};

// =============================================================================
// RE-EXPORTS: Data Preparation
// =============================================================================

pub use aggregate::{AggregationConfig, DailySale, aggregate_weekly};
pub use export::{WeekRow, rows};
pub use quality::{SeriesQuality, assess_quality};
pub use synthetic::{SalesComponents, SyntheticConfig, SyntheticWeek, generate};
