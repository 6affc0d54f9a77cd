//! # Analysis Report
//!
//! One-call executive summary: detect, then describe where the urgent weeks
//! fall and whether they differ from the rest.

use crate::comparison::{GroupComparisonReport, compare_groups};
use crate::config::DetectorConfig;
use crate::decompose::{DecompositionSummary, decompose};
use crate::detector::UrgencyDetector;
use crate::seasonality::{
    BucketCount, SeasonalityReport, breakdown_by_month, breakdown_by_week_of_month,
    validate_seasonality,
};
use crate::primitives::DECOMPOSITION_PERIOD;
use crate::{Criteria, TestOutcome, UrgencyError, UrgencyFlags, WeeklyRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Months listed in [`AnalysisReport::top_months`].
pub const TOP_MONTHS: usize = 3;

/// Weeks of month listed in [`AnalysisReport::top_weeks_of_month`].
pub const TOP_WEEKS_OF_MONTH: usize = 2;

/// How many weeks fired and by which criteria.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub urgent_weeks: usize,
    /// `urgent_weeks / total weeks`.
    pub proportion: f64,
    pub percentile_only: usize,
    pub growth_only: usize,
    pub both: usize,
}

impl DetectionSummary {
    /// Tally detector output. Proportion is 0 for no flags.
    #[must_use]
    pub fn from_flags(flags: &[UrgencyFlags]) -> Self {
        let mut summary = Self {
            urgent_weeks: 0,
            proportion: 0.0,
            percentile_only: 0,
            growth_only: 0,
            both: 0,
        };
        for flag in flags {
            if flag.is_urgent {
                summary.urgent_weeks += 1;
            }
            match flag.criteria() {
                Criteria::PercentileOnly => summary.percentile_only += 1,
                Criteria::GrowthOnly => summary.growth_only += 1,
                Criteria::Both => summary.both += 1,
                Criteria::None => {}
            }
        }
        if !flags.is_empty() {
            summary.proportion = summary.urgent_weeks as f64 / flags.len() as f64;
        }
        summary
    }
}

/// Full report over one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub config: DetectorConfig,
    pub weeks: usize,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub mean_weekly_sales: f64,
    pub detection: DetectionSummary,
    pub by_month: Vec<BucketCount>,
    pub by_week_of_month: Vec<BucketCount>,
    /// Months with the most urgent weeks, ties in calendar order.
    pub top_months: Vec<u32>,
    /// Weeks of month with the most urgent weeks, ties in calendar order.
    pub top_weeks_of_month: Vec<u32>,
    pub seasonality: SeasonalityReport,
    pub comparison: GroupComparisonReport,
    /// Yearly trend growth and seasonal amplitude of the sales themselves.
    pub decomposition: TestOutcome<DecompositionSummary>,
}

/// Run detection and every report over `series`.
///
/// Fails only where [`crate::detect`] fails; undefined statistics are
/// reported inside the result.
pub fn analyze(
    series: &[WeeklyRecord],
    config: &DetectorConfig,
) -> Result<AnalysisReport, UrgencyError> {
    let detector = UrgencyDetector::new(*config)?;
    let flags = detector.detect(series)?;
    analyze_flags(series, &flags, config)
}

/// Build the report from detector output already computed for `series`.
pub fn analyze_flags(
    series: &[WeeklyRecord],
    flags: &[UrgencyFlags],
    config: &DetectorConfig,
) -> Result<AnalysisReport, UrgencyError> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(UrgencyError::EmptySeries);
    };

    let by_month = breakdown_by_month(flags, series)?;
    let by_week_of_month = breakdown_by_week_of_month(flags, series)?;
    let seasonality = validate_seasonality(flags, series)?;
    let comparison = compare_groups(flags, series)?;
    let decomposition = TestOutcome::from_result(
        decompose(series, DECOMPOSITION_PERIOD).map(|parts| parts.summary()),
    )?;

    let total: f64 = series.iter().map(|w| w.total_sales).sum();

    Ok(AnalysisReport {
        config: *config,
        weeks: series.len(),
        period_start: first.week_start,
        period_end: last.week_start,
        mean_weekly_sales: total / series.len() as f64,
        detection: DetectionSummary::from_flags(flags),
        top_months: top_buckets(&by_month, TOP_MONTHS),
        top_weeks_of_month: top_buckets(&by_week_of_month, TOP_WEEKS_OF_MONTH),
        by_month,
        by_week_of_month,
        seasonality,
        comparison,
        decomposition,
    })
}

/// Up to `k` bucket labels with at least one urgent week, most urgent first.
fn top_buckets(counts: &[BucketCount], k: usize) -> Vec<u32> {
    let mut ranked: Vec<&BucketCount> = counts.iter().filter(|c| c.urgent > 0).collect();
    // Stable sort keeps calendar order among ties.
    ranked.sort_by(|a, b| b.urgent.cmp(&a.urgent));
    ranked.into_iter().take(k).map(|c| c.bucket).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Significance;
    use crate::synthetic::{SyntheticConfig, generate};

    #[test]
    fn top_buckets_break_ties_in_calendar_order() {
        let counts: Vec<BucketCount> = [(1, 2), (2, 5), (3, 2), (4, 0), (5, 5)]
            .iter()
            .map(|&(bucket, urgent)| BucketCount {
                bucket,
                weeks: 10,
                urgent,
            })
            .collect();
        assert_eq!(top_buckets(&counts, 3), vec![2, 5, 1]);
        assert_eq!(top_buckets(&counts[3..4], 2), Vec::<u32>::new());
    }

    #[test]
    fn summary_counts_criteria() {
        let flag = |p: bool, g: bool| UrgencyFlags {
            percentile_threshold: 0.0,
            is_urgent_percentile: p,
            growth_rate: None,
            is_urgent_growth: g,
            is_urgent: p || g,
        };
        let flags = [flag(true, false), flag(false, true), flag(true, true), flag(false, false)];
        let summary = DetectionSummary::from_flags(&flags);
        assert_eq!(summary.urgent_weeks, 3);
        assert_eq!(summary.proportion, 0.75);
        assert_eq!(summary.percentile_only, 1);
        assert_eq!(summary.growth_only, 1);
        assert_eq!(summary.both, 1);
    }

    #[test]
    fn synthetic_series_report() {
        let series: Vec<WeeklyRecord> = generate(&SyntheticConfig::default())
            .expect("generate")
            .into_iter()
            .map(|w| w.record)
            .collect();
        let report = analyze(&series, &DetectorConfig::default()).expect("analyze");

        assert_eq!(report.weeks, 278);
        assert_eq!(report.period_start, series[0].week_start);
        assert_eq!(report.by_month.len(), 12);
        assert_eq!(report.by_week_of_month.len(), 5);
        assert!(report.detection.urgent_weeks > 0);
        assert_eq!(
            report.detection.urgent_weeks as u64,
            report.seasonality.total_urgent
        );
        assert!(report.top_months.len() <= TOP_MONTHS);
        assert!(report.top_weeks_of_month.len() <= TOP_WEEKS_OF_MONTH);
        assert!(report.comparison.test.is_computed());
        assert_ne!(
            report.comparison.significantly_different,
            Significance::NotComputable
        );

        let decomposition = report.decomposition.computed().expect("decomposition");
        assert_eq!(decomposition.period, 52);
        assert!(decomposition.seasonal_amplitude > 0.0);
        assert!(decomposition.trend_growth.is_some());
    }

    #[test]
    fn short_series_has_no_decomposition() {
        let start = NaiveDate::from_ymd_opt(2012, 1, 7).expect("date");
        let series: Vec<WeeklyRecord> = (0..60u64)
            .map(|i| WeeklyRecord::new(start + chrono::Days::new(7 * i), 1000.0 + i as f64))
            .collect();
        let report = analyze(&series, &DetectorConfig::default()).expect("analyze");
        assert_eq!(
            report.decomposition,
            TestOutcome::NotComputable {
                reason: crate::UndefinedReason::TooFewCycles
            }
        );
    }

    #[test]
    fn empty_series_rejected() {
        assert!(matches!(
            analyze(&[], &DetectorConfig::default()),
            Err(UrgencyError::EmptySeries)
        ));
    }
}
