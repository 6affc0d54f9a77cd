//! # Detector Module
//!
//! Rolling-window urgency detection over a weekly sales series.
//!
//! Two independent criteria per week:
//! - **Percentile**: sales above the P-th percentile of the trailing window
//!   (current week included, never any later week)
//! - **Growth**: week-over-week growth above a threshold on a week whose
//!   sales clear a minimum baseline
//!
//! Config and series are validated before anything is computed, so a call
//! either fails up front or returns one `UrgencyFlags` per input week.

use crate::config::DetectorConfig;
use crate::primitives::MAX_SERIES_LENGTH;
use crate::stats::percentile_sorted;
use crate::{UrgencyError, UrgencyFlags, WeeklyRecord};

/// Computes urgency flags with a validated configuration.
#[derive(Debug, Clone, Copy)]
pub struct UrgencyDetector {
    config: DetectorConfig,
}

impl UrgencyDetector {
    /// Create a detector, rejecting an invalid configuration.
    pub fn new(config: DetectorConfig) -> Result<Self, UrgencyError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this detector runs with.
    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Flag every week of `series`.
    ///
    /// Output has the same length and order as the input.
    pub fn detect(&self, series: &[WeeklyRecord]) -> Result<Vec<UrgencyFlags>, UrgencyError> {
        validate_series(series)?;

        let sales: Vec<f64> = series.iter().map(|w| w.total_sales).collect();
        let thresholds = rolling_percentile(&sales, self.config.window, self.config.percentile);
        let growth = growth_rates(&sales);

        let flags = sales
            .iter()
            .zip(thresholds)
            .zip(growth)
            .map(|((&s, threshold), growth_rate)| {
                let is_urgent_percentile = s > threshold;
                let is_urgent_growth = growth_rate.is_some_and(|g| {
                    g > self.config.growth_threshold && s > self.config.min_baseline_sales
                });
                let is_urgent = if self.config.hybrid {
                    is_urgent_percentile || is_urgent_growth
                } else {
                    is_urgent_percentile
                };
                UrgencyFlags {
                    percentile_threshold: threshold,
                    is_urgent_percentile,
                    growth_rate,
                    is_urgent_growth,
                    is_urgent,
                }
            })
            .collect();

        Ok(flags)
    }
}

/// Flag every week of `series` under `config`.
///
/// # Errors
/// - `InvalidConfig` for out-of-range options
/// - `EmptySeries` for a zero-length series
/// - `InvalidSeries` for unordered weeks or negative / non-finite sales
/// - `SeriesTooLong` beyond `MAX_SERIES_LENGTH`
pub fn detect(
    series: &[WeeklyRecord],
    config: &DetectorConfig,
) -> Result<Vec<UrgencyFlags>, UrgencyError> {
    UrgencyDetector::new(*config)?.detect(series)
}

/// Check the series invariants the detector relies on.
///
/// A series is valid if:
/// - It has at least one week and at most `MAX_SERIES_LENGTH`
/// - Every `week_start` is strictly after the previous one
/// - Every `total_sales` is finite and non-negative
pub fn validate_series(series: &[WeeklyRecord]) -> Result<(), UrgencyError> {
    if series.is_empty() {
        return Err(UrgencyError::EmptySeries);
    }
    if series.len() > MAX_SERIES_LENGTH {
        return Err(UrgencyError::SeriesTooLong {
            len: series.len(),
            max: MAX_SERIES_LENGTH,
        });
    }

    for (index, week) in series.iter().enumerate() {
        if !week.total_sales.is_finite() || week.total_sales < 0.0 {
            return Err(UrgencyError::InvalidSeries {
                index,
                reason: format!(
                    "total_sales must be finite and non-negative, got {}",
                    week.total_sales
                ),
            });
        }
    }

    for (offset, pair) in series.windows(2).enumerate() {
        if pair[1].week_start <= pair[0].week_start {
            return Err(UrgencyError::InvalidSeries {
                index: offset + 1,
                reason: format!(
                    "week_start {} is not after {}",
                    pair[1].week_start, pair[0].week_start
                ),
            });
        }
    }

    Ok(())
}

/// Trailing-window percentile for every index.
///
/// Window for index `i` is `[max(0, i + 1 - window), i]`.
fn rolling_percentile(sales: &[f64], window: usize, p: f64) -> Vec<f64> {
    let mut scratch = Vec::with_capacity(window);
    (0..sales.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            scratch.clear();
            scratch.extend_from_slice(&sales[start..=i]);
            scratch.sort_by(f64::total_cmp);
            // The window always holds index i, so it is never empty.
            percentile_sorted(&scratch, p).unwrap_or(sales[i])
        })
        .collect()
}

/// Week-over-week growth; `None` for the first week and after a zero-sales week.
fn growth_rates(sales: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(sales.windows(2).map(|pair| {
            let (previous, current) = (pair[0], pair[1]);
            if previous > 0.0 {
                Some((current - previous) / previous)
            } else {
                None
            }
        }))
        .take(sales.len())
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
