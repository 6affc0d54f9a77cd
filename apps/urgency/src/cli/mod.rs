//! # Urgency CLI Module
//!
//! This module implements the CLI interface for Urgency.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `aggregate` - Aggregate daily sales CSV into weekly CSV
//! - `generate` - Write a seeded synthetic weekly series
//! - `detect` - Flag urgent weeks and export per-week rows
//! - `report` - Print the full analysis report

mod commands;

use crate::config::load_config;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use urgency_core::{DetectorConfig, UrgencyError};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Urgency - weekly demand spike detection
///
/// Flags weeks whose sales look like urgent spikes and tests whether
/// those weeks follow a seasonal, predictable pattern.
#[derive(Parser, Debug)]
#[command(name = "urgency")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: $URGENCY_CONFIG or ./urgency.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Detector options that override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct DetectorArgs {
    /// Percentile of the trailing window that counts as high sales (0-100, exclusive)
    #[arg(long)]
    pub percentile: Option<f64>,

    /// Trailing window size in weeks
    #[arg(long)]
    pub window: Option<usize>,

    /// Week-over-week growth that flags a week (0.12 = 12%)
    #[arg(long)]
    pub growth_threshold: Option<f64>,

    /// Minimum weekly sales for the growth criterion
    #[arg(long)]
    pub min_baseline: Option<f64>,

    /// Use only the percentile criterion
    #[arg(long)]
    pub no_hybrid: bool,
}

impl DetectorArgs {
    /// Apply the given overrides on top of `base`.
    #[must_use]
    pub fn apply(&self, mut base: DetectorConfig) -> DetectorConfig {
        if let Some(p) = self.percentile {
            base.percentile = p;
        }
        if let Some(w) = self.window {
            base.window = w;
        }
        if let Some(g) = self.growth_threshold {
            base.growth_threshold = g;
        }
        if let Some(b) = self.min_baseline {
            base.min_baseline_sales = b;
        }
        if self.no_hybrid {
            base.hybrid = false;
        }
        base
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Aggregate daily sales into weekly totals
    Aggregate {
        /// Daily CSV (date, sales[, revenue, sell_price])
        #[arg(short, long)]
        input: PathBuf,

        /// Weekly CSV to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate a synthetic weekly series
    Generate {
        /// Weekly CSV to write
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the additive components to this CSV
        #[arg(long)]
        components: Option<PathBuf>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of weeks
        #[arg(long)]
        weeks: Option<usize>,
    },

    /// Flag urgent weeks
    Detect {
        /// Weekly CSV (week_start, total_sales[, total_revenue, avg_price])
        #[arg(short, long)]
        input: PathBuf,

        /// Per-week rows CSV to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        detector: DetectorArgs,
    },

    /// Print the full analysis report
    Report {
        /// Weekly CSV (week_start, total_sales[, total_revenue, avg_price])
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        detector: DetectorArgs,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), UrgencyError> {
    let config = load_config(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(config.detector, config.synthetic, &host, port).await
        }
        Some(Commands::Aggregate { input, output }) => {
            cmd_aggregate(&config.aggregation, json_mode, &input, &output).map(|_| ())
        }
        Some(Commands::Generate {
            output,
            components,
            seed,
            weeks,
        }) => {
            let mut synthetic = config.synthetic;
            if let Some(seed) = seed {
                synthetic.seed = seed;
            }
            if let Some(weeks) = weeks {
                synthetic.weeks = weeks;
            }
            cmd_generate(&synthetic, json_mode, &output, components.as_deref())
        }
        Some(Commands::Detect {
            input,
            output,
            detector,
        }) => cmd_detect(
            &detector.apply(config.detector),
            json_mode,
            cli.verbose,
            &input,
            output.as_deref(),
        ),
        Some(Commands::Report { input, detector }) => {
            cmd_report(&detector.apply(config.detector), json_mode, &input)
        }
        None => {
            // No subcommand - show the effective configuration
            cmd_show_config(&config, json_mode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_fields() {
        let args = DetectorArgs {
            window: Some(8),
            no_hybrid: true,
            ..DetectorArgs::default()
        };
        let config = args.apply(DetectorConfig::default());
        assert_eq!(config.window, 8);
        assert!(!config.hybrid);
        assert_eq!(config.percentile, 85.0);
    }

    #[test]
    fn parses_detect_flags() {
        let cli = Cli::try_parse_from([
            "urgency",
            "--json-mode",
            "detect",
            "-i",
            "weekly.csv",
            "--percentile",
            "90",
            "--growth-threshold",
            "0.2",
        ])
        .expect("parse");
        assert!(cli.json_mode);
        assert!(matches!(
            cli.command,
            Some(Commands::Detect { ref detector, .. })
                if detector.percentile == Some(90.0)
                    && detector.growth_threshold == Some(0.2)
                    && detector.window.is_none()
        ));
    }
}
