//! # Group Comparison
//!
//! Splits weekly sales into urgent and normal groups and tests whether the
//! two distributions differ (two-sided Mann-Whitney U, urgent group first).

use crate::primitives::SIGNIFICANCE_LEVEL;
use crate::seasonality::check_aligned;
use crate::stats::{Descriptive, MannWhitneyTest, describe, mann_whitney_u};
use crate::{Significance, TestOutcome, UrgencyError, UrgencyFlags, WeeklyRecord};
use serde::{Deserialize, Serialize};

/// Urgent vs normal weeks, side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupComparisonReport {
    /// Summary of urgent weeks. `None` when no week is urgent.
    pub urgent: Option<Descriptive>,
    /// Summary of normal weeks. `None` when every week is urgent.
    pub normal: Option<Descriptive>,
    /// Urgent mean over normal mean. Absent unless both groups exist and the
    /// normal mean is non-zero.
    pub mean_ratio: Option<f64>,
    /// Urgent mean minus normal mean. Absent unless both groups exist.
    pub mean_difference: Option<f64>,
    /// The rank-sum test, or why it was not run.
    pub test: TestOutcome<MannWhitneyTest>,
    /// Verdict at the 0.05 level, `NotComputable` when the test did not run.
    pub significantly_different: Significance,
}

/// Compare sales of urgent weeks against the remaining weeks.
///
/// # Errors
/// `LengthMismatch` when `flags` and `series` are not aligned. An empty
/// group or fully tied data is reported inside the result.
pub fn compare_groups(
    flags: &[UrgencyFlags],
    series: &[WeeklyRecord],
) -> Result<GroupComparisonReport, UrgencyError> {
    check_aligned(flags, series)?;

    let (urgent_sales, normal_sales): (Vec<f64>, Vec<f64>) = {
        let mut urgent = Vec::new();
        let mut normal = Vec::new();
        for (flag, week) in flags.iter().zip(series) {
            if flag.is_urgent {
                urgent.push(week.total_sales);
            } else {
                normal.push(week.total_sales);
            }
        }
        (urgent, normal)
    };

    let urgent = describe(&urgent_sales);
    let normal = describe(&normal_sales);

    let (mean_ratio, mean_difference) = match (&urgent, &normal) {
        (Some(u), Some(n)) => {
            let ratio = if n.mean != 0.0 { Some(u.mean / n.mean) } else { None };
            (ratio, Some(u.mean - n.mean))
        }
        _ => (None, None),
    };

    let test = TestOutcome::from_result(mann_whitney_u(&urgent_sales, &normal_sales))?;
    let significantly_different = match test.computed() {
        Some(t) => Significance::from_p_value(t.p_value, SIGNIFICANCE_LEVEL),
        None => Significance::NotComputable,
    };

    Ok(GroupComparisonReport {
        urgent,
        normal,
        mean_ratio,
        mean_difference,
        test,
        significantly_different,
    })
}
