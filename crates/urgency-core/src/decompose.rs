//! # Seasonal Decomposition
//!
//! Additive split of weekly sales into trend, seasonal and residual parts.
//!
//! - Trend: centered moving average over one period (`2 x period` for even
//!   periods), with the undefined edges filled by a least-squares line fitted
//!   to the nearest `period - 1` defined values.
//! - Seasonal: mean detrended value at each position in the cycle, centered
//!   to zero and tiled over the series.
//! - Residual: whatever is left.

use crate::detector::validate_series;
use crate::primitives::TREND_EDGE_WEEKS;
use crate::{UndefinedReason, UrgencyError, WeeklyRecord};
use serde::{Deserialize, Serialize};

/// Components of an additive decomposition, aligned with the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub period: usize,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

/// Headline numbers of a decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecompositionSummary {
    pub period: usize,
    /// Mean trend over the first `TREND_EDGE_WEEKS` weeks.
    pub trend_start: f64,
    /// Mean trend over the last `TREND_EDGE_WEEKS` weeks.
    pub trend_end: f64,
    /// `trend_end / trend_start - 1`. `None` when the trend starts at zero.
    pub trend_growth: Option<f64>,
    /// `seasonal_peak - seasonal_trough`.
    pub seasonal_amplitude: f64,
    pub seasonal_peak: f64,
    pub seasonal_trough: f64,
}

impl Decomposition {
    #[must_use]
    pub fn summary(&self) -> DecompositionSummary {
        let edge = TREND_EDGE_WEEKS.min(self.trend.len()).max(1);
        let trend_start = mean(&self.trend[..edge]);
        let trend_end = mean(&self.trend[self.trend.len() - edge..]);

        let cycle = &self.seasonal[..self.period.min(self.seasonal.len())];
        let seasonal_peak = cycle.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let seasonal_trough = cycle.iter().copied().fold(f64::INFINITY, f64::min);

        DecompositionSummary {
            period: self.period,
            trend_start,
            trend_end,
            trend_growth: (trend_start != 0.0).then(|| trend_end / trend_start - 1.0),
            seasonal_amplitude: seasonal_peak - seasonal_trough,
            seasonal_peak,
            seasonal_trough,
        }
    }
}

/// Decompose `series` with the given seasonal `period` in weeks.
///
/// # Errors
/// - Any series validation error
/// - `InvalidConfig` when `period < 2`
/// - `UndefinedStatistic(TooFewCycles)` when the series is shorter than two periods
pub fn decompose(series: &[WeeklyRecord], period: usize) -> Result<Decomposition, UrgencyError> {
    validate_series(series)?;
    if period < 2 {
        return Err(UrgencyError::InvalidConfig(format!(
            "decomposition period must be at least 2, got {}",
            period
        )));
    }
    if series.len() < 2 * period {
        return Err(UrgencyError::UndefinedStatistic(
            UndefinedReason::TooFewCycles,
        ));
    }

    let values: Vec<f64> = series.iter().map(|w| w.total_sales).collect();
    let trend = centered_trend(&values, period);

    let mut position_sums = vec![0.0; period];
    let mut position_counts = vec![0usize; period];
    for (i, (x, t)) in values.iter().zip(&trend).enumerate() {
        position_sums[i % period] += x - t;
        position_counts[i % period] += 1;
    }
    let mut cycle: Vec<f64> = position_sums
        .iter()
        .zip(&position_counts)
        .map(|(sum, &count)| sum / count as f64)
        .collect();
    let level = mean(&cycle);
    for value in &mut cycle {
        *value -= level;
    }

    let seasonal: Vec<f64> = (0..values.len()).map(|i| cycle[i % period]).collect();
    let residual = values
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((x, t), s)| x - t - s)
        .collect();

    Ok(Decomposition {
        period,
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving average with linearly extrapolated edges.
///
/// Requires `values.len() >= 2 * period` and `period >= 2`.
fn centered_trend(values: &[f64], period: usize) -> Vec<f64> {
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 0 {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] = 0.5 / period as f64;
        w[period] = 0.5 / period as f64;
        w
    } else {
        vec![1.0 / period as f64; period]
    };

    let first = half;
    let last = values.len() - 1 - (weights.len() - 1 - half);
    let mut trend = vec![0.0; values.len()];
    for (i, slot) in trend.iter_mut().enumerate().take(last + 1).skip(first) {
        *slot = weights
            .iter()
            .zip(&values[i - half..])
            .map(|(w, x)| w * x)
            .sum();
    }

    let points = period - 1;

    let front_end = (first + points).min(last);
    let (slope, intercept) = fit_line(&trend, first, front_end);
    for (i, slot) in trend.iter_mut().enumerate().take(first) {
        *slot = slope * i as f64 + intercept;
    }

    let back_start = first.max(last.saturating_sub(points));
    let (slope, intercept) = fit_line(&trend, back_start, last);
    for (i, slot) in trend.iter_mut().enumerate().skip(last + 1) {
        *slot = slope * i as f64 + intercept;
    }

    trend
}

/// Least-squares line through `(i, values[i])` for `i` in `start..end`.
///
/// A single point gives a flat line through it.
fn fit_line(values: &[f64], start: usize, end: usize) -> (f64, f64) {
    let end = end.max(start + 1);
    let xs: Vec<f64> = (start..end).map(|i| i as f64).collect();
    let ys = &values[start..end];
    let x_mean = mean(&xs);
    let y_mean = mean(ys);

    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (slope, y_mean - slope * x_mean)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
