//! # Application Configuration
//!
//! Optional TOML file with one section per core config value:
//!
//! ```toml
//! [detector]
//! percentile = 90.0
//! window = 8
//!
//! [synthetic]
//! seed = 7
//!
//! [aggregation]
//! week_start = "Mon"
//! ```
//!
//! Lookup order: explicit `--config` path, `URGENCY_CONFIG`, `./urgency.toml`,
//! then built-in defaults. Missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use urgency_core::{AggregationConfig, DetectorConfig, SyntheticConfig, UrgencyError};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "urgency.toml";

/// Everything the CLI and server read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    pub synthetic: SyntheticConfig,
    pub aggregation: AggregationConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, UrgencyError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| UrgencyError::InvalidConfig(format!("TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on any invalid section.
    pub fn validate(&self) -> Result<(), UrgencyError> {
        self.detector.validate()?;
        self.synthetic.validate()
    }
}

/// Load the configuration, falling back to defaults when no file is found.
///
/// An explicit path must exist; the env and working-directory fallbacks are
/// only used when present.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, UrgencyError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config_path().filter(|p| p.exists()),
    };

    let Some(path) = path else {
        tracing::debug!("No config file found, using defaults");
        return Ok(AppConfig::default());
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        UrgencyError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    let config = AppConfig::from_toml(&content).map_err(|e| match e {
        UrgencyError::InvalidConfig(msg) => {
            UrgencyError::InvalidConfig(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;

    tracing::info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("URGENCY_CONFIG")
        && !p.is_empty()
    {
        return Some(PathBuf::from(p));
    }
    Some(PathBuf::from(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn empty_document_is_default() {
        let config = AppConfig::from_toml("").expect("parse");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [detector]
            percentile = 90.0
            hybrid = false

            [synthetic]
            seed = 7

            [aggregation]
            week_start = "Mon"
            "#,
        )
        .expect("parse");
        assert_eq!(config.detector.percentile, 90.0);
        assert!(!config.detector.hybrid);
        assert_eq!(config.detector.window, 12);
        assert_eq!(config.synthetic.seed, 7);
        assert_eq!(config.synthetic.weeks, 278);
        assert_eq!(config.aggregation.week_start, Weekday::Mon);
    }

    #[test]
    fn invalid_values_fail_fast() {
        let result = AppConfig::from_toml("[detector]\nwindow = 0\n");
        assert!(matches!(result, Err(UrgencyError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        let result = AppConfig::from_toml("[detector\npercentile = ");
        assert!(matches!(result, Err(UrgencyError::InvalidConfig(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here/urgency.toml")));
        assert!(matches!(result, Err(UrgencyError::IoError(_))));
    }
}
