//! Data quality summary of a weekly series.
//!
//! Unlike [`crate::detector::validate_series`], this never fails: it counts
//! problems so callers can log or display them before running detection.

use crate::WeeklyRecord;
use crate::primitives::DAYS_PER_WEEK;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesQuality {
    pub weeks: usize,
    pub first_week: Option<NaiveDate>,
    pub last_week: Option<NaiveDate>,
    /// Consecutive rows more than one week apart.
    pub gaps: usize,
    pub negative_sales: usize,
    /// NaN or infinite sales.
    pub non_finite_sales: usize,
    /// Consecutive rows that are duplicated or out of order.
    pub non_increasing: usize,
    /// Mean over finite sales. `None` when there are none.
    pub mean_sales: Option<f64>,
    pub total_sales: f64,
}

impl SeriesQuality {
    /// No problem that would make detection reject the series.
    ///
    /// Gaps are tolerated and do not count against a clean series.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.weeks > 0
            && self.negative_sales == 0
            && self.non_finite_sales == 0
            && self.non_increasing == 0
    }
}

/// Summarize the shape and problems of `series`.
#[must_use]
pub fn assess_quality(series: &[WeeklyRecord]) -> SeriesQuality {
    let mut gaps = 0;
    let mut non_increasing = 0;
    for pair in series.windows(2) {
        let days = (pair[1].week_start - pair[0].week_start).num_days();
        if days <= 0 {
            non_increasing += 1;
        } else if days > DAYS_PER_WEEK {
            gaps += 1;
        }
    }

    let finite: Vec<f64> = series
        .iter()
        .map(|w| w.total_sales)
        .filter(|s| s.is_finite())
        .collect();
    let total_sales: f64 = finite.iter().sum();

    SeriesQuality {
        weeks: series.len(),
        first_week: series.first().map(|w| w.week_start),
        last_week: series.last().map(|w| w.week_start),
        gaps,
        negative_sales: finite.iter().filter(|&&s| s < 0.0).count(),
        non_finite_sales: series.len() - finite.len(),
        non_increasing,
        mean_sales: (!finite.is_empty()).then(|| total_sales / finite.len() as f64),
        total_sales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(m: u32, d: u32, sales: f64) -> WeeklyRecord {
        WeeklyRecord::new(NaiveDate::from_ymd_opt(2011, m, d).expect("valid date"), sales)
    }

    #[test]
    fn clean_series() {
        let series = vec![week(1, 1, 10.0), week(1, 8, 20.0), week(1, 15, 30.0)];
        let quality = assess_quality(&series);
        assert!(quality.is_clean());
        assert_eq!(quality.weeks, 3);
        assert_eq!(quality.gaps, 0);
        assert_eq!(quality.mean_sales, Some(20.0));
        assert_eq!(quality.total_sales, 60.0);
        assert_eq!(quality.first_week, Some(series[0].week_start));
        assert_eq!(quality.last_week, Some(series[2].week_start));
    }

    #[test]
    fn gaps_do_not_make_series_dirty() {
        let quality = assess_quality(&[week(1, 1, 1.0), week(1, 22, 1.0)]);
        assert_eq!(quality.gaps, 1);
        assert!(quality.is_clean());
    }

    #[test]
    fn counts_problems() {
        let series = vec![
            week(1, 8, 1.0),
            week(1, 8, -2.0),
            week(1, 1, f64::NAN),
        ];
        let quality = assess_quality(&series);
        assert_eq!(quality.non_increasing, 2);
        assert_eq!(quality.negative_sales, 1);
        assert_eq!(quality.non_finite_sales, 1);
        assert!(!quality.is_clean());
    }

    #[test]
    fn empty_series_is_not_clean() {
        let quality = assess_quality(&[]);
        assert_eq!(quality.weeks, 0);
        assert_eq!(quality.mean_sales, None);
        assert!(!quality.is_clean());
    }
}
