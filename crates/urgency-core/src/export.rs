//! # Tabular Export
//!
//! Flattens a series and its flags into one record per week, with the
//! derived calendar fields, for CSV or JSON output.

use crate::seasonality::check_aligned;
use crate::{UrgencyError, UrgencyFlags, WeeklyRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One exported week. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRow {
    pub week_start: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    pub week_of_year: u32,
    pub week_of_month: u32,
    pub total_sales: f64,
    pub total_revenue: Option<f64>,
    pub avg_price: Option<f64>,
    pub percentile_threshold: f64,
    pub growth_rate: Option<f64>,
    pub is_urgent_percentile: bool,
    pub is_urgent_growth: bool,
    pub is_urgent: bool,
}

impl WeekRow {
    #[must_use]
    pub fn new(week: &WeeklyRecord, flags: &UrgencyFlags) -> Self {
        Self {
            week_start: week.week_start,
            year: week.year(),
            month: week.month(),
            quarter: week.quarter(),
            week_of_year: week.week_of_year(),
            week_of_month: week.week_of_month(),
            total_sales: week.total_sales,
            total_revenue: week.total_revenue,
            avg_price: week.avg_price,
            percentile_threshold: flags.percentile_threshold,
            growth_rate: flags.growth_rate,
            is_urgent_percentile: flags.is_urgent_percentile,
            is_urgent_growth: flags.is_urgent_growth,
            is_urgent: flags.is_urgent,
        }
    }
}

/// Zip `series` with its `flags` into export rows.
///
/// # Errors
/// `LengthMismatch` when the two are not aligned.
pub fn rows(series: &[WeeklyRecord], flags: &[UrgencyFlags]) -> Result<Vec<WeekRow>, UrgencyError> {
    check_aligned(flags, series)?;
    Ok(series
        .iter()
        .zip(flags)
        .map(|(week, flag)| WeekRow::new(week, flag))
        .collect())
}
