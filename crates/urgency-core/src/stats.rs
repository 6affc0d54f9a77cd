//! # Statistics Module
//!
//! Numeric building blocks for detection and reporting:
//! - `percentile` with linear interpolation between order statistics
//! - `describe` for mean / median / sample standard deviation
//! - `chi_square_uniform`: Pearson goodness-of-fit against equal buckets
//! - `mann_whitney_u`: two-sided rank-sum test
//!
//! Undefined results are reported as `UrgencyError::UndefinedStatistic`,
//! never as NaN.

use crate::primitives::EXACT_MANN_WHITNEY_MAX;
use crate::{UndefinedReason, UrgencyError};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};
use statrs::statistics::Statistics;

// =============================================================================
// PERCENTILE
// =============================================================================

/// Percentile of `values` using linear interpolation between order statistics.
///
/// With the values sorted ascending as `x[0..n]`, the rank is
/// `h = (n - 1) * p / 100` and the result is
/// `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_sorted(&sorted, p)
}

/// Same as [`percentile`] for input that is already sorted ascending.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (last as f64) * p.clamp(0.0, 100.0) / 100.0;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(last);
    let fraction = rank - lower as f64;
    let low = sorted[lower];
    Some(low + fraction * (sorted[upper] - low))
}

// =============================================================================
// DESCRIPTIVE STATISTICS
// =============================================================================

/// Summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Descriptive {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator). `None` below two values.
    pub std_dev: Option<f64>,
}

/// Describe a sample. `None` when empty.
#[must_use]
pub fn describe(values: &[f64]) -> Option<Descriptive> {
    let median = percentile(values, 50.0)?;
    let std_dev = if values.len() >= 2 {
        Some(values.iter().std_dev())
    } else {
        None
    };
    Some(Descriptive {
        count: values.len(),
        mean: values.iter().mean(),
        median,
        std_dev,
    })
}

// =============================================================================
// CHI-SQUARE GOODNESS OF FIT
// =============================================================================

/// Pearson chi-square goodness-of-fit result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    /// Upper-tail probability of `statistic` under the null.
    pub p_value: f64,
}

/// Test observed bucket counts against a uniform expectation.
///
/// Expected count per bucket is `total / k`; the statistic is
/// `sum((observed - expected)^2 / expected)` with `k - 1` degrees of freedom.
///
/// # Errors
/// - `UndefinedStatistic(NoUrgentWeeks)` when every bucket is zero
/// - `InvalidConfig` with fewer than two buckets
pub fn chi_square_uniform(observed: &[u64]) -> Result<ChiSquareTest, UrgencyError> {
    if observed.len() < 2 {
        return Err(UrgencyError::InvalidConfig(
            "chi-square test needs at least two buckets".to_string(),
        ));
    }
    let total: u64 = observed.iter().sum();
    if total == 0 {
        return Err(UrgencyError::UndefinedStatistic(
            UndefinedReason::NoUrgentWeeks,
        ));
    }

    let expected = total as f64 / observed.len() as f64;
    let statistic: f64 = observed
        .iter()
        .map(|&o| {
            let diff = o as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let degrees_of_freedom = observed.len() - 1;
    let distribution = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| UrgencyError::InvalidConfig(format!("chi-square distribution: {}", e)))?;

    Ok(ChiSquareTest {
        statistic,
        degrees_of_freedom,
        p_value: distribution.sf(statistic).clamp(0.0, 1.0),
    })
}

// =============================================================================
// MANN-WHITNEY U
// =============================================================================

/// How the Mann-Whitney p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MannWhitneyMethod {
    /// Exact null distribution (small samples without ties).
    Exact,
    /// Normal approximation with tie and continuity corrections.
    Asymptotic,
}

/// Two-sided Mann-Whitney U result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyTest {
    /// U statistic of the first sample.
    pub u_statistic: f64,
    pub p_value: f64,
    pub method: MannWhitneyMethod,
}

/// Two-sided Mann-Whitney U test of `first` against `second`.
///
/// Ranks are averaged across ties. When the smaller sample has at most
/// `EXACT_MANN_WHITNEY_MAX` values and there are no ties, the exact null
/// distribution is used; otherwise the normal approximation with tie
/// correction and a 0.5 continuity correction.
///
/// # Errors
/// - `UndefinedStatistic(EmptyGroup)` when either sample is empty
/// - `UndefinedStatistic(AllValuesTied)` when every pooled value is identical
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<MannWhitneyTest, UrgencyError> {
    if first.is_empty() || second.is_empty() {
        return Err(UrgencyError::UndefinedStatistic(UndefinedReason::EmptyGroup));
    }

    let n1 = first.len();
    let n2 = second.len();
    let pooled: Vec<f64> = first.iter().chain(second.iter()).copied().collect();
    let (ranks, tie_sizes) = average_ranks(&pooled);

    let rank_sum: f64 = ranks[..n1].iter().sum();
    let u1 = rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u_max = u1.max(u2);

    if tie_sizes.len() == 1 {
        return Err(UrgencyError::UndefinedStatistic(
            UndefinedReason::AllValuesTied,
        ));
    }

    let has_ties = tie_sizes.iter().any(|&t| t > 1);
    let (p_value, method) =
        if !has_ties && n1.min(n2) <= EXACT_MANN_WHITNEY_MAX {
            // P(U >= u_max) equals P(U <= n1 * n2 - u_max) by symmetry.
            let tail = exact_lower_tail(n1 * n2 - u_max.round() as usize, n1, n2);
            (2.0 * tail, MannWhitneyMethod::Exact)
        } else {
            let n = (n1 + n2) as f64;
            let tie_term: f64 = tie_sizes
                .iter()
                .map(|&t| {
                    let t = t as f64;
                    t * t * t - t
                })
                .sum();
            let variance = (n1 * n2) as f64 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
            let mean = (n1 * n2) as f64 / 2.0;
            let z = (u_max - mean - 0.5) / variance.sqrt();
            let normal = Normal::new(0.0, 1.0)
                .map_err(|e| UrgencyError::InvalidConfig(format!("normal distribution: {}", e)))?;
            (2.0 * normal.sf(z), MannWhitneyMethod::Asymptotic)
        };

    Ok(MannWhitneyTest {
        u_statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
        method,
    })
}

/// Average ranks (1-based) of `values` and the size of every tie group.
fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_sizes = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end share the mean of ranks start+1..=end.
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        tie_sizes.push(end - start);
        start = end;
    }
    (ranks, tie_sizes)
}

/// `P(U <= u)` under the null for sample sizes `m` and `n`, without ties.
///
/// The counts of arrangements by U are the coefficients of the Gaussian
/// binomial `prod_{k=1..m} (1 - q^(n+k)) / (1 - q^k)`. Only degrees up to `u`
/// are needed, and every step is lower-triangular, so the series is
/// truncated there. Cost is `O(min(m, n) * u)`.
fn exact_lower_tail(u: usize, m: usize, n: usize) -> f64 {
    let (m, n) = (m.min(n), m.max(n));
    let mut counts = vec![0.0f64; u + 1];
    counts[0] = 1.0;
    for k in 1..=m {
        // Multiply before dividing so coefficients stay within the final range.
        let shift = n + k;
        for d in (shift..=u).rev() {
            counts[d] -= counts[d - shift];
        }
        for d in k..=u {
            counts[d] += counts[d - k];
        }
    }

    let total = (1..=m).fold(1.0f64, |acc, k| acc * (n + k) as f64 / k as f64);
    (counts.iter().sum::<f64>() / total).clamp(0.0, 1.0)
}

// =============================================================================
// TESTS
// =============================================================================
