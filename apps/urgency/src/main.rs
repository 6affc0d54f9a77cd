//! # Urgency - Weekly Demand Spike Detection
//!
//! The main binary for the urgency detector.
//!
//! This application provides:
//! - CLI commands over CSV files (aggregate, generate, detect, report)
//! - HTTP REST API server (axum-based)
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/urgency (THE BINARY)          │
//! │                                               │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────┐  │
//! │  │   CLI       │  │   HTTP API  │  │  CSV  │  │
//! │  │  (clap)     │  │   (axum)    │  │  I/O  │  │
//! │  └──────┬──────┘  └──────┬──────┘  └───┬───┘  │
//! │         └────────────────┼─────────────┘      │
//! │                          ▼                    │
//! │                  ┌───────────────┐            │
//! │                  │ urgency-core  │            │
//! │                  │ (THE LOGIC)   │            │
//! │                  └───────────────┘            │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! urgency generate -o weekly.csv --seed 42
//! urgency detect -i weekly.csv -o flags.csv
//! urgency report -i weekly.csv
//! urgency server --port 8080
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use urgency::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // URGENCY_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("URGENCY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "urgency=info,tower_http=debug".into());

    // Logs go to stderr so CSV and JSON output on stdout stay clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Urgency v{}

  Weekly demand spike detection
"#,
        env!("CARGO_PKG_VERSION")
    );
}
