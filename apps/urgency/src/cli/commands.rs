//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::AppConfig;
use crate::io;
use std::path::{Path, PathBuf};
use urgency_core::{
    AggregationConfig, AnalysisReport, DetectorConfig, SeriesQuality, Significance,
    SyntheticConfig, TestOutcome, UrgencyDetector, UrgencyError, WeeklyRecord, aggregate_weekly,
    analyze_flags, assess_quality, generate, primitives::MAX_SERIES_LENGTH, rows,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum input CSV size (100 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_INPUT_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), UrgencyError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| UrgencyError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(UrgencyError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is an
/// existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, UrgencyError> {
    let canonical = path.canonicalize().map_err(|e| {
        UrgencyError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(UrgencyError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, UrgencyError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        UrgencyError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(UrgencyError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| UrgencyError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Validate and read a weekly CSV.
fn load_weekly(input: &Path) -> Result<Vec<WeeklyRecord>, UrgencyError> {
    let path = validate_file_path(input)?;
    validate_file_size(&path, MAX_INPUT_FILE_SIZE)?;
    let series = io::read_weekly_file(&path)?;
    if series.len() > MAX_SERIES_LENGTH {
        return Err(UrgencyError::SeriesTooLong {
            len: series.len(),
            max: MAX_SERIES_LENGTH,
        });
    }

    let quality = assess_quality(&series);
    tracing::info!(
        weeks = quality.weeks,
        gaps = quality.gaps,
        "Loaded weekly series from {}",
        path.display()
    );
    log_quality(&quality);
    Ok(series)
}

/// Warn about gaps and about anything detection would reject.
fn log_quality(quality: &SeriesQuality) {
    if quality.gaps > 0 {
        tracing::warn!(gaps = quality.gaps, "Series has missing weeks");
    }
    if !quality.is_clean() {
        tracing::warn!(
            negative = quality.negative_sales,
            non_finite = quality.non_finite_sales,
            non_increasing = quality.non_increasing,
            "Series fails validation"
        );
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), UrgencyError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| UrgencyError::SerializationError(format!("JSON output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
///
/// `detector` and `synthetic` are the defaults requests fall back to.
pub async fn cmd_server(
    detector: DetectorConfig,
    synthetic: SyntheticConfig,
    host: &str,
    port: u16,
) -> Result<(), UrgencyError> {
    detector.validate()?;
    synthetic.validate()?;

    println!("Urgency Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", host);
    println!("  Port:       {}", port);
    println!("  Percentile: {}", detector.percentile);
    println!("  Window:     {} weeks", detector.window);
    println!("  Synthetic:  {} weeks, seed {}", synthetic.weeks, synthetic.seed);
    println!();
    println!("Endpoints:");
    println!("  GET  /health   - Health check");
    println!("  GET  /config   - Default detector config");
    println!("  POST /detect   - Flag urgent weeks");
    println!("  POST /analyze  - Full analysis report");
    println!("  POST /generate - Synthetic weekly series");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, api::AppState::new(detector).with_synthetic(synthetic)).await
}

// =============================================================================
// AGGREGATE COMMAND
// =============================================================================

/// Aggregate a daily CSV into a weekly CSV.
///
/// Returns the quality summary of the weekly series that was written.
pub fn cmd_aggregate(
    config: &AggregationConfig,
    json_mode: bool,
    input: &Path,
    output: &Path,
) -> Result<SeriesQuality, UrgencyError> {
    let input_path = validate_file_path(input)?;
    validate_file_size(&input_path, MAX_INPUT_FILE_SIZE)?;
    let output_path = validate_output_path(output)?;

    let daily = io::read_daily_file(&input_path)?;
    let weekly = aggregate_weekly(&daily, config)?;
    io::write_file(&output_path, |w| io::write_weekly(w, &weekly))?;

    let quality = assess_quality(&weekly);
    tracing::info!(
        days = daily.len(),
        weeks = weekly.len(),
        gaps = quality.gaps,
        "Aggregated daily sales"
    );
    log_quality(&quality);

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "days": daily.len(),
            "weeks": weekly.len(),
            "week_start": config.week_start.to_string(),
            "output": output_path.to_string_lossy(),
            "quality": &quality,
        }))?;
    } else {
        println!(
            "Aggregated {} days into {} weeks (weeks start {}).",
            daily.len(),
            weekly.len(),
            config.week_start
        );
        println!("Quality:");
        if let (Some(first), Some(last)) = (quality.first_week, quality.last_week) {
            println!("  Period:         {} to {}", first, last);
        }
        println!("  Missing weeks:  {}", quality.gaps);
        println!("  Negative sales: {}", quality.negative_sales);
        println!("  Out of order:   {}", quality.non_increasing);
        if let Some(mean) = quality.mean_sales {
            println!("  Mean sales:     {:.0} units/week", mean);
        }
        println!("Written to {:?}", output_path);
    }
    Ok(quality)
}

// =============================================================================
// GENERATE COMMAND
// =============================================================================

/// Write a synthetic weekly series, and optionally its components.
pub fn cmd_generate(
    config: &SyntheticConfig,
    json_mode: bool,
    output: &Path,
    components: Option<&Path>,
) -> Result<(), UrgencyError> {
    let output_path = validate_output_path(output)?;
    let components_path = components.map(validate_output_path).transpose()?;

    let weeks = generate(config)?;
    let series: Vec<WeeklyRecord> = weeks.iter().map(|w| w.record.clone()).collect();
    io::write_file(&output_path, |w| io::write_weekly(w, &series))?;
    if let Some(path) = &components_path {
        io::write_file(path, |w| io::write_components(w, &weeks))?;
    }

    let peak_weeks = weeks
        .iter()
        .filter(|w| w.components.predictable_peak > 0.0)
        .count();
    tracing::info!(seed = config.seed, weeks = weeks.len(), "Generated synthetic series");

    if json_mode {
        print_json(&serde_json::json!({
            "success": true,
            "seed": config.seed,
            "weeks": weeks.len(),
            "peak_weeks": peak_weeks,
            "output": output_path.to_string_lossy(),
            "components": components_path.map(|p| p.to_string_lossy().to_string()),
        }))?;
    } else {
        println!("Generated {} weeks (seed {}).", weeks.len(), config.seed);
        println!("  Predictable peak weeks: {}", peak_weeks);
        println!("Written to {:?}", output_path);
        if let Some(path) = components_path {
            println!("Components written to {:?}", path);
        }
    }
    Ok(())
}

// =============================================================================
// DETECT COMMAND
// =============================================================================

/// Flag urgent weeks in a weekly CSV.
pub fn cmd_detect(
    config: &DetectorConfig,
    json_mode: bool,
    verbose: bool,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), UrgencyError> {
    let detector = UrgencyDetector::new(*config)?;
    let output_path = output.map(validate_output_path).transpose()?;
    let series = load_weekly(input)?;

    let flags = detector.detect(&series)?;
    let table = rows(&series, &flags)?;
    if let Some(path) = &output_path {
        io::write_file(path, |w| io::write_week_rows(w, &table))?;
    }

    let urgent: Vec<_> = table.iter().filter(|r| r.is_urgent).collect();
    tracing::info!(weeks = table.len(), urgent = urgent.len(), "Detection complete");

    if json_mode {
        if output_path.is_some() {
            print_json(&serde_json::json!({
                "success": true,
                "weeks": table.len(),
                "urgent_weeks": urgent.len(),
            }))?;
        } else {
            print_json(&table)?;
        }
        return Ok(());
    }

    println!("Urgency Detection");
    println!("=================");
    println!("Weeks:        {}", table.len());
    println!(
        "Urgent weeks: {} ({:.1}%)",
        urgent.len(),
        urgent.len() as f64 / table.len() as f64 * 100.0
    );
    if verbose {
        println!();
        for row in &urgent {
            let growth = row
                .growth_rate
                .map(|g| format!("{:+.1}%", g * 100.0))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "  {}  sales {:>12.0}  threshold {:>12.0}  growth {:>8}",
                row.week_start, row.total_sales, row.percentile_threshold, growth
            );
        }
    }
    if let Some(path) = output_path {
        println!();
        println!("Written to {:?}", path);
    }
    Ok(())
}

// =============================================================================
// REPORT COMMAND
// =============================================================================

/// Print the full analysis report.
pub fn cmd_report(config: &DetectorConfig, json_mode: bool, input: &Path) -> Result<(), UrgencyError> {
    let detector = UrgencyDetector::new(*config)?;
    let series = load_weekly(input)?;
    let flags = detector.detect(&series)?;
    let report = analyze_flags(&series, &flags, config)?;

    if json_mode {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?")
}

fn print_report(report: &AnalysisReport) {
    println!("Urgency Analysis Report");
    println!("=======================");
    println!();
    println!("Data:");
    println!("  Weeks:        {}", report.weeks);
    println!("  Period:       {} to {}", report.period_start, report.period_end);
    println!("  Mean sales:   {:.0} units/week", report.mean_weekly_sales);
    println!();

    let d = &report.detection;
    println!("Urgent weeks:");
    println!("  Total:           {} ({:.1}%)", d.urgent_weeks, d.proportion * 100.0);
    println!("  Percentile only: {}", d.percentile_only);
    println!("  Growth only:     {}", d.growth_only);
    println!("  Both criteria:   {}", d.both);
    println!();

    println!("By month:");
    for bucket in &report.by_month {
        let rate = bucket
            .rate()
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {}  {:>3} / {:>3}  {:>6}",
            month_name(bucket.bucket),
            bucket.urgent,
            bucket.weeks,
            rate
        );
    }
    println!();

    let top_months: Vec<&str> = report.top_months.iter().map(|&m| month_name(m)).collect();
    println!("Patterns:");
    println!("  Top months:         {}", top_months.join(", "));
    println!("  Top weeks of month: {:?}", report.top_weeks_of_month);
    match &report.seasonality.test {
        TestOutcome::Computed(test) => println!(
            "  Seasonality:        chi2 = {:.2}, p = {:.4} ({})",
            test.statistic,
            test.p_value,
            if report.seasonality.seasonal_pattern_detected {
                "seasonal"
            } else {
                "not significant"
            }
        ),
        TestOutcome::NotComputable { reason } => {
            println!("  Seasonality:        not computable ({})", reason);
        }
    }
    println!();

    let c = &report.comparison;
    println!("Urgent vs normal weeks:");
    if let Some(u) = &c.urgent {
        println!("  Urgent: mean {:.0}, median {:.0}, n = {}", u.mean, u.median, u.count);
    }
    if let Some(n) = &c.normal {
        println!("  Normal: mean {:.0}, median {:.0}, n = {}", n.mean, n.median, n.count);
    }
    if let Some(ratio) = c.mean_ratio {
        println!("  Ratio:  {:.2}x", ratio);
    }
    match (&c.test, c.significantly_different) {
        (TestOutcome::Computed(test), verdict) => println!(
            "  Mann-Whitney U = {:.1}, p = {:.6} ({})",
            test.u_statistic,
            test.p_value,
            if verdict == Significance::Significant {
                "significantly different"
            } else {
                "no significant difference"
            }
        ),
        (TestOutcome::NotComputable { reason }, _) => {
            println!("  Mann-Whitney: not computable ({})", reason);
        }
    }
    println!();

    println!("Trend and seasonality:");
    match &report.decomposition {
        TestOutcome::Computed(parts) => {
            let growth = parts
                .trend_growth
                .map(|g| format!("{:+.1}%", g * 100.0))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  Trend:    {:.0} -> {:.0} units/week ({})",
                parts.trend_start, parts.trend_end, growth
            );
            println!(
                "  Seasonal: amplitude {:.0} (peak {:+.0}, trough {:+.0}, period {} weeks)",
                parts.seasonal_amplitude, parts.seasonal_peak, parts.seasonal_trough, parts.period
            );
        }
        TestOutcome::NotComputable { reason } => {
            println!("  Decomposition: not computable ({})", reason);
        }
    }
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the effective configuration.
pub fn cmd_show_config(config: &AppConfig, json_mode: bool) -> Result<(), UrgencyError> {
    if json_mode {
        return print_json(config);
    }

    let d = &config.detector;
    println!("Urgency Configuration");
    println!("=====================");
    println!("Detector:");
    println!("  percentile:         {}", d.percentile);
    println!("  window:             {} weeks", d.window);
    println!("  growth_threshold:   {}", d.growth_threshold);
    println!("  min_baseline_sales: {}", d.min_baseline_sales);
    println!("  hybrid:             {}", d.hybrid);
    println!("Synthetic:");
    println!("  seed:  {}", config.synthetic.seed);
    println!("  weeks: {}", config.synthetic.weeks);
    println!("Aggregation:");
    println!("  week_start: {}", config.aggregation.week_start);
    println!();
    println!("Run `urgency --help` for commands.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_in_current_dir() {
        let path = validate_output_path(Path::new("out.csv")).expect("valid");
        assert!(path.ends_with("out.csv"));
    }

    #[test]
    fn missing_input_rejected() {
        assert!(matches!(
            validate_file_path(Path::new("/no/such/weekly.csv")),
            Err(UrgencyError::IoError(_))
        ));
    }

    /// A value serde_json refuses to encode.
    struct Unencodable;

    impl serde::Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("value cannot be encoded"))
        }
    }

    #[test]
    fn json_output_failure_is_reported() {
        assert!(matches!(
            print_json(&Unencodable),
            Err(UrgencyError::SerializationError(msg)) if msg.contains("value cannot be encoded")
        ));
    }

    #[test]
    fn json_output_succeeds_for_reports() {
        assert!(print_json(&serde_json::json!({ "success": true })).is_ok());
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "?");
    }
}
