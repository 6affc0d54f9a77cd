//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use serde::{Deserialize, Serialize};
use urgency_core::{
    AnalysisReport, DetectorConfig, SyntheticConfig, UrgencyError, WeekRow, WeeklyRecord,
    primitives::MAX_SERIES_LENGTH,
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// SERIES REQUEST
// =============================================================================

/// Per-request detector settings. Absent fields keep the server's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorOverrides {
    pub percentile: Option<f64>,
    pub window: Option<usize>,
    pub growth_threshold: Option<f64>,
    pub min_baseline_sales: Option<f64>,
    pub hybrid: Option<bool>,
}

impl DetectorOverrides {
    /// Apply the given fields on top of `base`.
    #[must_use]
    pub fn apply(self, mut base: DetectorConfig) -> DetectorConfig {
        if let Some(p) = self.percentile {
            base.percentile = p;
        }
        if let Some(w) = self.window {
            base.window = w;
        }
        if let Some(g) = self.growth_threshold {
            base.growth_threshold = g;
        }
        if let Some(b) = self.min_baseline_sales {
            base.min_baseline_sales = b;
        }
        if let Some(h) = self.hybrid {
            base.hybrid = h;
        }
        base
    }
}

/// A weekly series with optional per-request detector overrides.
///
/// Used by both `/detect` and `/analyze`. Fields missing from `config`
/// take the server's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub weeks: Vec<WeeklyRecord>,
    #[serde(default)]
    pub config: Option<DetectorOverrides>,
}

impl SeriesRequest {
    /// Resolve the effective config and check the series size.
    ///
    /// Oversized series are rejected here, before any statistics run.
    pub fn resolve(&self, server_default: DetectorConfig) -> Result<DetectorConfig, UrgencyError> {
        if self.weeks.len() > MAX_SERIES_LENGTH {
            return Err(UrgencyError::SeriesTooLong {
                len: self.weeks.len(),
                max: MAX_SERIES_LENGTH,
            });
        }
        let config = self
            .config
            .map_or(server_default, |overrides| overrides.apply(server_default));
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// DETECT RESPONSE
// =============================================================================

/// Per-week detection rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    pub urgent_weeks: usize,
    pub rows: Vec<WeekRow>,
    pub error: Option<String>,
}

impl DetectResponse {
    pub fn success(rows: Vec<WeekRow>) -> Self {
        Self {
            success: true,
            urgent_weeks: rows.iter().filter(|r| r.is_urgent).count(),
            rows,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            urgent_weeks: 0,
            rows: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// ANALYZE RESPONSE
// =============================================================================

/// Full analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub report: Option<AnalysisReport>,
    pub error: Option<String>,
}

impl AnalyzeResponse {
    pub fn success(report: AnalysisReport) -> Self {
        Self {
            success: true,
            report: Some(report),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            report: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// GENERATE REQUEST/RESPONSE
// =============================================================================

/// Synthetic series request. Absent fields keep the server's synthetic config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub weeks: Option<usize>,
}

impl GenerateRequest {
    /// Apply the overrides on top of `base`.
    #[must_use]
    pub fn to_config(&self, base: &SyntheticConfig) -> SyntheticConfig {
        let mut config = base.clone();
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(weeks) = self.weeks {
            config.weeks = weeks;
        }
        config
    }
}

/// Synthetic weekly series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub seed: u64,
    pub weeks: Vec<WeeklyRecord>,
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn success(seed: u64, weeks: Vec<WeeklyRecord>) -> Self {
        Self {
            success: true,
            seed,
            weeks,
            error: None,
        }
    }

    pub fn error(seed: u64, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            seed,
            weeks: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
