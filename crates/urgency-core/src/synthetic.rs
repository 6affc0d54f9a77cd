//! # Synthetic Series Generator
//!
//! Seeded weekly sales with known structure, for exercising the detector
//! without real data.
//!
//! Weekly units are the rounded sum of five components:
//! 1. **Trend**: `base * (1 + growth)^week`
//! 2. **Annual seasonality**: `A * sin(2π * iso_week / 52 - π/2)`
//! 3. **Monthly seasonality**: amplitude times a week-of-month pattern
//! 4. **Predictable peaks**: fixed uplift in chosen months and weeks of month
//! 5. **Noise**: Gaussian
//!
//! Noise for every week is drawn before any price, so the unit series for a
//! seed does not depend on the price settings.

use crate::primitives::{DAYS_PER_WEEK, MAX_SERIES_LENGTH, MAX_WEEK_OF_MONTH, MONTHS_PER_YEAR};
use crate::{UrgencyError, WeeklyRecord};
use chrono::{Days, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Generator parameters. Defaults reproduce the reference retail series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub start_date: NaiveDate,
    pub weeks: usize,
    pub seed: u64,
    pub base_sales: f64,
    /// Compound growth per week.
    pub trend_growth: f64,
    pub annual_amplitude: f64,
    pub monthly_amplitude: f64,
    /// Relative weight for weeks 1-4 of the month; week 5 reuses the last.
    pub monthly_pattern: [f64; 4],
    pub peak_months: Vec<u32>,
    pub peak_weeks_of_month: Vec<u32>,
    pub peak_amplitude: f64,
    pub noise_std: f64,
    /// Weekly units never go below this.
    pub sales_floor: f64,
    pub base_price: f64,
    pub price_std: f64,
    pub price_min: f64,
    pub price_max: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap_or_default(),
            weeks: 278,
            seed: 42,
            base_sales: 180_000.0,
            trend_growth: 0.003,
            annual_amplitude: 30_000.0,
            monthly_amplitude: 8_000.0,
            monthly_pattern: [0.8, 0.9, 1.2, 1.1],
            peak_months: vec![5, 6, 11, 12],
            peak_weeks_of_month: vec![3, 4],
            peak_amplitude: 25_000.0,
            noise_std: 8_000.0,
            sales_floor: 50_000.0,
            base_price: 4.0,
            price_std: 0.3,
            price_min: 2.5,
            price_max: 6.0,
        }
    }
}

impl SyntheticConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_weeks(mut self, weeks: usize) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn validate(&self) -> Result<(), UrgencyError> {
        if self.weeks == 0 || self.weeks > MAX_SERIES_LENGTH {
            return Err(UrgencyError::InvalidConfig(format!(
                "weeks must be in 1..={}, got {}",
                MAX_SERIES_LENGTH, self.weeks
            )));
        }
        if !self.trend_growth.is_finite() || self.trend_growth <= -1.0 {
            return Err(UrgencyError::InvalidConfig(format!(
                "trend_growth must be greater than -1, got {}",
                self.trend_growth
            )));
        }

        let non_negative = [
            ("base_sales", self.base_sales),
            ("annual_amplitude", self.annual_amplitude),
            ("monthly_amplitude", self.monthly_amplitude),
            ("peak_amplitude", self.peak_amplitude),
            ("noise_std", self.noise_std),
            ("sales_floor", self.sales_floor),
            ("price_std", self.price_std),
            ("price_min", self.price_min),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(UrgencyError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.monthly_pattern.iter().any(|w| !w.is_finite()) {
            return Err(UrgencyError::InvalidConfig(
                "monthly_pattern must be finite".to_string(),
            ));
        }

        if let Some(m) = self
            .peak_months
            .iter()
            .find(|&&m| m == 0 || m as usize > MONTHS_PER_YEAR)
        {
            return Err(UrgencyError::InvalidConfig(format!(
                "peak month {} is not in 1..=12",
                m
            )));
        }
        if let Some(w) = self
            .peak_weeks_of_month
            .iter()
            .find(|&&w| w == 0 || w as usize > MAX_WEEK_OF_MONTH)
        {
            return Err(UrgencyError::InvalidConfig(format!(
                "peak week of month {} is not in 1..=5",
                w
            )));
        }

        if !self.base_price.is_finite() || !self.price_max.is_finite() || self.price_min > self.price_max
        {
            return Err(UrgencyError::InvalidConfig(format!(
                "price bounds [{}, {}] are invalid",
                self.price_min, self.price_max
            )));
        }
        Ok(())
    }
}

/// The additive parts of one week's units, before rounding and flooring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesComponents {
    pub trend: f64,
    pub seasonal_annual: f64,
    pub seasonal_monthly: f64,
    pub predictable_peak: f64,
    pub noise: f64,
}

impl SalesComponents {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.trend + self.seasonal_annual + self.seasonal_monthly + self.predictable_peak + self.noise
    }
}

/// One generated week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticWeek {
    /// Zero-based position in the series.
    pub week_num: usize,
    pub record: WeeklyRecord,
    pub components: SalesComponents,
}

/// Generate a deterministic weekly series from `config`.
///
/// The same config always yields the same series.
pub fn generate(config: &SyntheticConfig) -> Result<Vec<SyntheticWeek>, UrgencyError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise_dist = Normal::new(0.0, config.noise_std)
        .map_err(|e| UrgencyError::InvalidConfig(format!("noise distribution: {}", e)))?;
    let price_dist = Normal::new(0.0, config.price_std)
        .map_err(|e| UrgencyError::InvalidConfig(format!("price distribution: {}", e)))?;

    let noise: Vec<f64> = (0..config.weeks)
        .map(|_| noise_dist.sample(&mut rng))
        .collect();
    let price_noise: Vec<f64> = (0..config.weeks)
        .map(|_| price_dist.sample(&mut rng))
        .collect();

    let mut weeks = Vec::with_capacity(config.weeks);
    for (week_num, (noise, price_noise)) in noise.into_iter().zip(price_noise).enumerate() {
        let offset = (week_num as u64) * DAYS_PER_WEEK as u64;
        let week_start = config
            .start_date
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| {
                UrgencyError::InvalidConfig(format!("week {} is past the calendar range", week_num))
            })?;
        let skeleton = WeeklyRecord::new(week_start, 0.0);

        let components = SalesComponents {
            trend: config.base_sales * (1.0 + config.trend_growth).powi(week_num as i32),
            seasonal_annual: config.annual_amplitude
                * (2.0 * PI * f64::from(skeleton.week_of_year()) / 52.0 - PI / 2.0).sin(),
            seasonal_monthly: config.monthly_amplitude
                * monthly_weight(&config.monthly_pattern, skeleton.week_of_month()),
            predictable_peak: if config.peak_months.contains(&skeleton.month())
                && config.peak_weeks_of_month.contains(&skeleton.week_of_month())
            {
                config.peak_amplitude
            } else {
                0.0
            },
            noise,
        };

        let total_sales = components.sum().round().max(config.sales_floor);
        let avg_price = (config.base_price + price_noise).clamp(config.price_min, config.price_max);
        let total_revenue = (total_sales * avg_price * 100.0).round() / 100.0;

        weeks.push(SyntheticWeek {
            week_num,
            record: WeeklyRecord::new(week_start, total_sales).with_revenue(total_revenue, avg_price),
            components,
        });
    }

    Ok(weeks)
}

/// Pattern weight for a week of month (1-5); week 5 reuses week 4.
fn monthly_weight(pattern: &[f64; 4], week_of_month: u32) -> f64 {
    let index = (week_of_month.clamp(1, 4) - 1) as usize;
    pattern[index]
}
