//! # Detector Configuration
//!
//! `DetectorConfig` is the value object passed into every detection call.
//! There is no process-wide configuration: two calls with different configs
//! never observe each other.

use crate::UrgencyError;
use crate::primitives::{
    DEFAULT_GROWTH_THRESHOLD, DEFAULT_MIN_BASELINE_SALES, DEFAULT_PERCENTILE, DEFAULT_WINDOW,
};
use serde::{Deserialize, Serialize};

/// Options recognized by the urgency detector.
///
/// Every field has a documented default; partial configs deserialize with
/// the remaining fields filled from [`DetectorConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Which percentile of the trailing window defines "high" sales. Open range (0, 100).
    pub percentile: f64,
    /// Trailing window size in weeks, current week included. At least 1.
    pub window: usize,
    /// Minimum week-over-week growth (as a fraction) to flag. Greater than -1.
    pub growth_threshold: f64,
    /// Sales floor below which growth-based flags are suppressed. Non-negative.
    pub min_baseline_sales: f64,
    /// Combine both criteria with OR; when false only the percentile criterion counts.
    pub hybrid: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            percentile: DEFAULT_PERCENTILE,
            window: DEFAULT_WINDOW,
            growth_threshold: DEFAULT_GROWTH_THRESHOLD,
            min_baseline_sales: DEFAULT_MIN_BASELINE_SALES,
            hybrid: true,
        }
    }
}

impl DetectorConfig {
    /// Set the percentile.
    #[must_use]
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    /// Set the trailing window size.
    #[must_use]
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the growth threshold.
    #[must_use]
    pub fn with_growth_threshold(mut self, growth_threshold: f64) -> Self {
        self.growth_threshold = growth_threshold;
        self
    }

    /// Set the minimum baseline sales.
    #[must_use]
    pub fn with_min_baseline_sales(mut self, min_baseline_sales: f64) -> Self {
        self.min_baseline_sales = min_baseline_sales;
        self
    }

    /// Enable or disable hybrid mode.
    #[must_use]
    pub fn with_hybrid(mut self, hybrid: bool) -> Self {
        self.hybrid = hybrid;
        self
    }

    /// Validate every option.
    ///
    /// Returns `UrgencyError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), UrgencyError> {
        if !self.percentile.is_finite() || self.percentile <= 0.0 || self.percentile >= 100.0 {
            return Err(UrgencyError::InvalidConfig(format!(
                "percentile must be in (0, 100), got {}",
                self.percentile
            )));
        }
        if self.window < 1 {
            return Err(UrgencyError::InvalidConfig(
                "window must be at least 1".to_string(),
            ));
        }
        if !self.growth_threshold.is_finite() || self.growth_threshold <= -1.0 {
            return Err(UrgencyError::InvalidConfig(format!(
                "growth_threshold must be greater than -1, got {}",
                self.growth_threshold
            )));
        }
        if !self.min_baseline_sales.is_finite() || self.min_baseline_sales < 0.0 {
            return Err(UrgencyError::InvalidConfig(format!(
                "min_baseline_sales must be non-negative, got {}",
                self.min_baseline_sales
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.percentile, 85.0);
        assert_eq!(config.window, 12);
        assert_eq!(config.growth_threshold, 0.12);
        assert_eq!(config.min_baseline_sales, 1000.0);
        assert!(config.hybrid);
    }

    #[test]
    fn percentile_bounds_are_exclusive() {
        for p in [0.0, 100.0, -5.0, 150.0, f64::NAN] {
            let config = DetectorConfig::default().with_percentile(p);
            assert!(
                matches!(config.validate(), Err(UrgencyError::InvalidConfig(_))),
                "percentile {} should be rejected",
                p
            );
        }
        assert!(DetectorConfig::default().with_percentile(0.5).validate().is_ok());
        assert!(DetectorConfig::default().with_percentile(99.9).validate().is_ok());
    }

    #[test]
    fn zero_window_rejected() {
        let config = DetectorConfig::default().with_window(0);
        assert!(matches!(config.validate(), Err(UrgencyError::InvalidConfig(_))));
    }

    #[test]
    fn growth_threshold_must_exceed_minus_one() {
        let config = DetectorConfig::default().with_growth_threshold(-1.0);
        assert!(config.validate().is_err());
        let config = DetectorConfig::default().with_growth_threshold(-0.99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_baseline_rejected() {
        let config = DetectorConfig::default().with_min_baseline_sales(-1.0);
        assert!(config.validate().is_err());
        let config = DetectorConfig::default().with_min_baseline_sales(0.0);
        assert!(config.validate().is_ok());
    }
}
