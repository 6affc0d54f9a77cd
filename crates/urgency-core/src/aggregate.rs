//! # Weekly Aggregation
//!
//! Buckets daily observations into calendar weeks.
//!
//! Weeks begin on a configurable weekday (Saturday by default, the retail
//! calendar). Every day maps to the most recent `week_start` on or before it,
//! so aggregation does not depend on where the input happens to start.

use crate::{UrgencyError, WeeklyRecord};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySale {
    pub date: NaiveDate,
    /// Units sold. Finite and non-negative.
    pub units: f64,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl DailySale {
    #[must_use]
    pub fn new(date: NaiveDate, units: f64) -> Self {
        Self {
            date,
            units,
            revenue: None,
            price: None,
        }
    }
}

/// How days are grouped into weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// First weekday of every aggregation week.
    pub week_start: Weekday,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sat,
        }
    }
}

/// The first day of the week containing `date`.
///
/// Returns `None` only when the result would fall before `NaiveDate::MIN`.
#[must_use]
pub fn week_start_for(date: NaiveDate, week_start: Weekday) -> Option<NaiveDate> {
    let offset = (7 + date.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
}

#[derive(Default)]
struct WeekAccumulator {
    sales: f64,
    revenue: Option<f64>,
    price_sum: f64,
    price_days: u32,
}

/// Aggregate daily rows into a weekly series sorted by `week_start`.
///
/// Per week: units and revenue are summed, price is averaged over the days
/// that carry one. Revenue and price stay absent for weeks without any.
///
/// # Errors
/// - `EmptySeries` for no input rows
/// - `InvalidSeries` for negative or non-finite units, or non-finite
///   revenue / price
pub fn aggregate_weekly(
    daily: &[DailySale],
    config: &AggregationConfig,
) -> Result<Vec<WeeklyRecord>, UrgencyError> {
    if daily.is_empty() {
        return Err(UrgencyError::EmptySeries);
    }

    let mut weeks: BTreeMap<NaiveDate, WeekAccumulator> = BTreeMap::new();

    for (index, day) in daily.iter().enumerate() {
        if !day.units.is_finite() || day.units < 0.0 {
            return Err(UrgencyError::InvalidSeries {
                index,
                reason: format!("units must be finite and non-negative, got {}", day.units),
            });
        }
        if day.revenue.is_some_and(|r| !r.is_finite()) || day.price.is_some_and(|p| !p.is_finite())
        {
            return Err(UrgencyError::InvalidSeries {
                index,
                reason: "revenue and price must be finite".to_string(),
            });
        }

        let start = week_start_for(day.date, config.week_start).ok_or_else(|| {
            UrgencyError::InvalidSeries {
                index,
                reason: format!("no week start before {}", day.date),
            }
        })?;

        let acc = weeks.entry(start).or_default();
        acc.sales += day.units;
        if let Some(revenue) = day.revenue {
            *acc.revenue.get_or_insert(0.0) += revenue;
        }
        if let Some(price) = day.price {
            acc.price_sum += price;
            acc.price_days += 1;
        }
    }

    Ok(weeks
        .into_iter()
        .map(|(week_start, acc)| WeeklyRecord {
            week_start,
            total_sales: acc.sales,
            total_revenue: acc.revenue,
            avg_price: (acc.price_days > 0).then(|| acc.price_sum / f64::from(acc.price_days)),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn week_start_defaults_to_saturday() {
        // 2011-01-29 is a Saturday.
        assert_eq!(week_start_for(date(2011, 1, 29), Weekday::Sat), Some(date(2011, 1, 29)));
        assert_eq!(week_start_for(date(2011, 2, 4), Weekday::Sat), Some(date(2011, 1, 29)));
        assert_eq!(week_start_for(date(2011, 2, 5), Weekday::Sat), Some(date(2011, 2, 5)));
        assert_eq!(week_start_for(date(2011, 2, 2), Weekday::Mon), Some(date(2011, 1, 31)));
        assert_eq!(AggregationConfig::default().week_start, Weekday::Sat);
    }

    #[test]
    fn sums_units_and_revenue_averages_price() {
        let daily = vec![
            DailySale {
                date: date(2011, 1, 29),
                units: 10.0,
                revenue: Some(40.0),
                price: Some(4.0),
            },
            DailySale {
                date: date(2011, 1, 30),
                units: 5.0,
                revenue: Some(30.0),
                price: Some(6.0),
            },
            DailySale::new(date(2011, 2, 5), 7.0),
        ];
        let weeks = aggregate_weekly(&daily, &AggregationConfig::default()).expect("aggregate");
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_start, date(2011, 1, 29));
        assert_eq!(weeks[0].total_sales, 15.0);
        assert_eq!(weeks[0].total_revenue, Some(70.0));
        assert_eq!(weeks[0].avg_price, Some(5.0));
        assert_eq!(weeks[1].total_sales, 7.0);
        assert_eq!(weeks[1].total_revenue, None);
        assert_eq!(weeks[1].avg_price, None);
    }

    #[test]
    fn unordered_days_produce_sorted_weeks() {
        let daily = vec![
            DailySale::new(date(2011, 3, 10), 1.0),
            DailySale::new(date(2011, 1, 3), 2.0),
            DailySale::new(date(2011, 2, 14), 3.0),
        ];
        let weeks = aggregate_weekly(&daily, &AggregationConfig::default()).expect("aggregate");
        let starts: Vec<NaiveDate> = weeks.iter().map(|w| w.week_start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(weeks.len(), 3);
    }

    #[test]
    fn empty_input_rejected() {
        assert!(matches!(
            aggregate_weekly(&[], &AggregationConfig::default()),
            Err(UrgencyError::EmptySeries)
        ));
    }

    #[test]
    fn negative_units_rejected() {
        let daily = vec![
            DailySale::new(date(2011, 1, 1), 1.0),
            DailySale::new(date(2011, 1, 2), -3.0),
        ];
        assert!(matches!(
            aggregate_weekly(&daily, &AggregationConfig::default()),
            Err(UrgencyError::InvalidSeries { index: 1, .. })
        ));
    }
}
