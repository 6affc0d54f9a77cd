//! # Seasonality Module
//!
//! Tests whether urgent weeks are spread uniformly over calendar months.
//!
//! The test is Pearson's chi-square goodness-of-fit against a uniform
//! expectation of `total_urgent / 12` per month, 11 degrees of freedom,
//! one-sided rejection region at `SIGNIFICANCE_LEVEL`.
//!
//! Also provides the per-bucket breakdowns (month, week of month) used by
//! the analysis report.

use crate::primitives::{MAX_WEEK_OF_MONTH, MONTHS_PER_YEAR, SIGNIFICANCE_LEVEL};
use crate::stats::{ChiSquareTest, chi_square_uniform};
use crate::{TestOutcome, UndefinedReason, UrgencyError, UrgencyFlags, WeeklyRecord};
use serde::{Deserialize, Serialize};

/// Result of the month-uniformity test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityReport {
    /// Urgent-week counts per calendar month, January first.
    pub urgent_by_month: [u64; MONTHS_PER_YEAR],
    /// Sum of `urgent_by_month`.
    pub total_urgent: u64,
    /// Uniform expectation per month. `None` when there are no urgent weeks.
    pub expected_per_month: Option<f64>,
    /// The chi-square test, or why it was not run.
    pub test: TestOutcome<ChiSquareTest>,
    /// `p_value < 0.05`. Always false when the test is not computable.
    pub seasonal_pattern_detected: bool,
}

/// Urgent counts for one calendar bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCount {
    /// Bucket label (month 1-12 or week of month 1-5).
    pub bucket: u32,
    /// Weeks in the series that fall in this bucket.
    pub weeks: u64,
    /// Urgent weeks among them.
    pub urgent: u64,
}

impl BucketCount {
    /// Share of weeks in this bucket that were urgent. `None` for an empty bucket.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        if self.weeks == 0 {
            None
        } else {
            Some(self.urgent as f64 / self.weeks as f64)
        }
    }
}

/// Run the month-uniformity test on detector output.
///
/// # Errors
/// `LengthMismatch` when `flags` and `series` are not aligned.
/// Zero urgent weeks is not an error: the test is reported as not computable.
pub fn validate_seasonality(
    flags: &[UrgencyFlags],
    series: &[WeeklyRecord],
) -> Result<SeasonalityReport, UrgencyError> {
    check_aligned(flags, series)?;

    let mut urgent_by_month = [0u64; MONTHS_PER_YEAR];
    for (flag, week) in flags.iter().zip(series) {
        if flag.is_urgent {
            // month() is 1-12
            urgent_by_month[(week.month() - 1) as usize] += 1;
        }
    }
    let total_urgent: u64 = urgent_by_month.iter().sum();

    if total_urgent == 0 {
        return Ok(SeasonalityReport {
            urgent_by_month,
            total_urgent,
            expected_per_month: None,
            test: TestOutcome::NotComputable {
                reason: UndefinedReason::NoUrgentWeeks,
            },
            seasonal_pattern_detected: false,
        });
    }

    let test = TestOutcome::from_result(chi_square_uniform(&urgent_by_month))?;
    let seasonal_pattern_detected = test
        .computed()
        .is_some_and(|t| t.p_value < SIGNIFICANCE_LEVEL);

    Ok(SeasonalityReport {
        urgent_by_month,
        total_urgent,
        expected_per_month: Some(total_urgent as f64 / MONTHS_PER_YEAR as f64),
        test,
        seasonal_pattern_detected,
    })
}

/// Weeks and urgent weeks per calendar month, always 12 buckets.
pub fn breakdown_by_month(
    flags: &[UrgencyFlags],
    series: &[WeeklyRecord],
) -> Result<Vec<BucketCount>, UrgencyError> {
    breakdown(flags, series, MONTHS_PER_YEAR, WeeklyRecord::month)
}

/// Weeks and urgent weeks per week of month, always 5 buckets.
pub fn breakdown_by_week_of_month(
    flags: &[UrgencyFlags],
    series: &[WeeklyRecord],
) -> Result<Vec<BucketCount>, UrgencyError> {
    breakdown(flags, series, MAX_WEEK_OF_MONTH, WeeklyRecord::week_of_month)
}

fn breakdown(
    flags: &[UrgencyFlags],
    series: &[WeeklyRecord],
    buckets: usize,
    key: fn(&WeeklyRecord) -> u32,
) -> Result<Vec<BucketCount>, UrgencyError> {
    check_aligned(flags, series)?;

    let mut counts: Vec<BucketCount> = (1..=buckets as u32)
        .map(|bucket| BucketCount {
            bucket,
            weeks: 0,
            urgent: 0,
        })
        .collect();

    for (flag, week) in flags.iter().zip(series) {
        let index = (key(week) as usize).saturating_sub(1);
        if let Some(count) = counts.get_mut(index) {
            count.weeks += 1;
            if flag.is_urgent {
                count.urgent += 1;
            }
        }
    }

    Ok(counts)
}

pub(crate) fn check_aligned(
    flags: &[UrgencyFlags],
    series: &[WeeklyRecord],
) -> Result<(), UrgencyError> {
    if flags.len() != series.len() {
        return Err(UrgencyError::LengthMismatch {
            flags: flags.len(),
            series: series.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn flag(is_urgent: bool) -> UrgencyFlags {
        UrgencyFlags {
            percentile_threshold: 0.0,
            is_urgent_percentile: is_urgent,
            growth_rate: None,
            is_urgent_growth: false,
            is_urgent,
        }
    }

    fn week(month: u32, day: u32) -> WeeklyRecord {
        WeeklyRecord::new(
            NaiveDate::from_ymd_opt(2012, month, day).expect("valid date"),
            1.0,
        )
    }

    #[test]
    fn no_urgent_weeks_is_not_computable() {
        let series = vec![week(1, 1), week(2, 1)];
        let flags = vec![flag(false), flag(false)];
        let report = validate_seasonality(&flags, &series).expect("report");
        assert_eq!(report.total_urgent, 0);
        assert_eq!(report.expected_per_month, None);
        assert!(!report.seasonal_pattern_detected);
        assert_eq!(
            report.test,
            TestOutcome::NotComputable {
                reason: UndefinedReason::NoUrgentWeeks
            }
        );
    }

    #[test]
    fn single_month_concentration_is_seasonal() {
        let series: Vec<WeeklyRecord> = (2012..2018)
            .flat_map(|year| {
                [1, 8, 15, 22].map(|day| {
                    WeeklyRecord::new(
                        NaiveDate::from_ymd_opt(year, 11, day).expect("valid date"),
                        1.0,
                    )
                })
            })
            .collect();
        let flags = vec![flag(true); series.len()];
        let report = validate_seasonality(&flags, &series).expect("report");
        assert_eq!(report.urgent_by_month[10], 24);
        let test = report.test.computed().expect("computed");
        assert!(test.p_value < 1e-10);
        assert!(report.seasonal_pattern_detected);
    }

    #[test]
    fn uniform_spread_is_not_seasonal() {
        let series: Vec<WeeklyRecord> = (1..=12).map(|m| week(m, 1)).collect();
        let flags = vec![flag(true); 12];
        let report = validate_seasonality(&flags, &series).expect("report");
        assert_eq!(report.expected_per_month, Some(1.0));
        let test = report.test.computed().expect("computed");
        assert_eq!(test.statistic, 0.0);
        assert!(!report.seasonal_pattern_detected);
    }

    #[test]
    fn misaligned_inputs_rejected() {
        let series = vec![week(1, 1)];
        assert!(matches!(
            validate_seasonality(&[], &series),
            Err(UrgencyError::LengthMismatch { flags: 0, series: 1 })
        ));
    }

    #[test]
    fn week_of_month_buckets() {
        let series = vec![week(3, 1), week(3, 8), week(3, 15), week(3, 29), week(4, 2)];
        let flags = vec![flag(false), flag(true), flag(true), flag(true), flag(false)];
        let counts = breakdown_by_week_of_month(&flags, &series).expect("breakdown");
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[0].weeks, 2);
        assert_eq!(counts[0].rate(), Some(0.0));
        assert_eq!(counts[1].urgent, 1);
        assert_eq!(counts[4].rate(), Some(1.0));
    }

    #[test]
    fn empty_month_has_no_rate() {
        let counts = breakdown_by_month(&[flag(true)], &[week(6, 1)]).expect("breakdown");
        assert_eq!(counts.len(), 12);
        assert_eq!(counts[5].urgent, 1);
        assert_eq!(counts[0].rate(), None);
    }
}
