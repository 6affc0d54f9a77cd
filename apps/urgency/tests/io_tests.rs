//! File-level tests for CSV I/O and the CLI commands.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::fs;
use tempfile::TempDir;
use urgency::cli::{cmd_aggregate, cmd_detect, cmd_generate, cmd_report};
use urgency::io::{read_weekly_file, write_file, write_weekly};
use urgency_core::{AggregationConfig, DetectorConfig, SyntheticConfig, UrgencyError, generate};

fn small_synthetic() -> SyntheticConfig {
    SyntheticConfig::default().with_seed(11).with_weeks(60)
}

#[test]
fn test_generated_file_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("weekly.csv");

    let config = small_synthetic();
    cmd_generate(&config, true, &path, None).unwrap();

    let series = read_weekly_file(&path).unwrap();
    let expected: Vec<_> = generate(&config)
        .unwrap()
        .into_iter()
        .map(|w| w.record)
        .collect();
    assert_eq!(series, expected);
}

#[test]
fn test_components_file_has_one_row_per_week() {
    let dir = TempDir::new().unwrap();
    let weekly = dir.path().join("weekly.csv");
    let components = dir.path().join("components.csv");

    cmd_generate(&small_synthetic(), true, &weekly, Some(&components)).unwrap();

    let text = fs::read_to_string(&components).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "week_start,total_sales,trend,seasonal_annual,seasonal_monthly,predictable_peak,noise"
    );
    assert_eq!(lines.count(), 60);
}

#[test]
fn test_detect_writes_week_rows() {
    let dir = TempDir::new().unwrap();
    let weekly = dir.path().join("weekly.csv");
    let flags = dir.path().join("flags.csv");

    cmd_generate(&small_synthetic(), true, &weekly, None).unwrap();
    cmd_detect(&DetectorConfig::default(), true, false, &weekly, Some(&flags)).unwrap();

    let text = fs::read_to_string(&flags).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("week_start,year,month,quarter,week_of_year,week_of_month"));
    assert!(header.ends_with("is_urgent_percentile,is_urgent_growth,is_urgent"));
    assert_eq!(lines.count(), 60);
}

#[test]
fn test_report_runs_on_generated_series() {
    let dir = TempDir::new().unwrap();
    let weekly = dir.path().join("weekly.csv");

    cmd_generate(&small_synthetic(), true, &weekly, None).unwrap();
    cmd_report(&DetectorConfig::default(), true, &weekly).unwrap();
}

#[test]
fn test_aggregate_daily_file() {
    let dir = TempDir::new().unwrap();
    let daily = dir.path().join("daily.csv");
    let weekly = dir.path().join("weekly.csv");

    // 2011-01-29 is a Saturday: two full Saturday-aligned weeks.
    let mut csv = String::from("date,sales,sell_price\n");
    for day in 0..14u64 {
        let date = chrono::NaiveDate::from_ymd_opt(2011, 1, 29).unwrap() + chrono::Days::new(day);
        csv.push_str(&format!("{},{},2.0\n", date, if day < 7 { 10 } else { 20 }));
    }
    fs::write(&daily, csv).unwrap();

    let quality = cmd_aggregate(&AggregationConfig::default(), true, &daily, &weekly).unwrap();

    let series = read_weekly_file(&weekly).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].total_sales, 70.0);
    assert_eq!(series[1].total_sales, 140.0);
    assert_eq!(series[0].avg_price, Some(2.0));

    assert_eq!(quality.weeks, 2);
    assert_eq!(quality.gaps, 0);
    assert_eq!(quality.first_week, Some(series[0].week_start));
    assert_eq!(quality.total_sales, 210.0);
    assert!(quality.is_clean());
}

#[test]
fn test_aggregate_reports_missing_week() {
    let dir = TempDir::new().unwrap();
    let daily = dir.path().join("daily.csv");
    let weekly = dir.path().join("weekly.csv");

    // Three Saturday-aligned weeks with no sales recorded in the middle one.
    let start = chrono::NaiveDate::from_ymd_opt(2011, 1, 29).unwrap();
    let mut csv = String::from("date,sales,sell_price\n");
    for day in (0..7u64).chain(14..21) {
        csv.push_str(&format!("{},5,1.5\n", start + chrono::Days::new(day)));
    }
    fs::write(&daily, csv).unwrap();

    let quality = cmd_aggregate(&AggregationConfig::default(), false, &daily, &weekly).unwrap();

    assert_eq!(quality.weeks, 2);
    assert_eq!(quality.gaps, 1);
    assert!(quality.is_clean());
    assert_eq!(read_weekly_file(&weekly).unwrap().len(), 2);
}

#[test]
fn test_detect_rejects_unsorted_file() {
    let dir = TempDir::new().unwrap();
    let weekly = dir.path().join("weekly.csv");
    fs::write(
        &weekly,
        "week_start,total_sales\n2012-01-14,10\n2012-01-07,12\n",
    )
    .unwrap();

    let result = cmd_detect(&DetectorConfig::default(), true, false, &weekly, None);
    assert!(matches!(
        result,
        Err(UrgencyError::InvalidSeries { index: 1, .. })
    ));
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let result = cmd_report(
        &DetectorConfig::default(),
        true,
        &dir.path().join("absent.csv"),
    );
    assert!(matches!(result, Err(UrgencyError::IoError(_))));
}

#[test]
fn test_write_file_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("weekly.csv");
    let result = write_file(&path, |w| write_weekly(w, &[]));
    assert!(matches!(result, Err(UrgencyError::IoError(_))));
}
