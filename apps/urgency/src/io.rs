//! CSV readers and writers for the CLI.
//!
//! Weekly input columns: `week_start, total_sales[, total_revenue, avg_price]`.
//! Daily input columns: `date, sales[, revenue, sell_price]`.
//! Extra columns are ignored; dates may carry a time suffix
//! (`2011-01-29 00:00:00`), only the leading `YYYY-MM-DD` is read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use urgency_core::{DailySale, SyntheticWeek, UrgencyError, WeekRow, WeeklyRecord};

// =============================================================================
// READERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct WeeklyCsvRow {
    #[serde(deserialize_with = "deserialize_date")]
    week_start: NaiveDate,
    total_sales: f64,
    #[serde(default)]
    total_revenue: Option<f64>,
    #[serde(default)]
    avg_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DailyCsvRow {
    #[serde(deserialize_with = "deserialize_date")]
    date: NaiveDate,
    #[serde(alias = "units")]
    sales: f64,
    #[serde(default)]
    revenue: Option<f64>,
    #[serde(default, alias = "price")]
    sell_price: Option<f64>,
}

/// Parse a weekly series from CSV. Rows keep file order.
pub fn read_weekly<R: Read>(reader: R) -> Result<Vec<WeeklyRecord>, UrgencyError> {
    let rows: Vec<WeeklyCsvRow> = read_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|r| WeeklyRecord {
            week_start: r.week_start,
            total_sales: r.total_sales,
            total_revenue: r.total_revenue,
            avg_price: r.avg_price,
        })
        .collect())
}

/// Parse daily sales from CSV.
pub fn read_daily<R: Read>(reader: R) -> Result<Vec<DailySale>, UrgencyError> {
    let rows: Vec<DailyCsvRow> = read_rows(reader)?;
    Ok(rows
        .into_iter()
        .map(|r| DailySale {
            date: r.date,
            units: r.sales,
            revenue: r.revenue,
            price: r.sell_price,
        })
        .collect())
}

pub fn read_weekly_file(path: &Path) -> Result<Vec<WeeklyRecord>, UrgencyError> {
    read_weekly(open(path)?)
}

pub fn read_daily_file(path: &Path) -> Result<Vec<DailySale>, UrgencyError> {
    read_daily(open(path)?)
}

fn read_rows<R: Read, T: for<'de> Deserialize<'de>>(reader: R) -> Result<Vec<T>, UrgencyError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let row: T = result.map_err(|e| {
            UrgencyError::SerializationError(format!(
                "CSV parse error at line {}: {}",
                line_num + 2,
                e
            ))
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<std::fs::File, UrgencyError> {
    std::fs::File::open(path)
        .map_err(|e| UrgencyError::IoError(format!("Failed to open '{}': {}", path.display(), e)))
}

/// Accepts `YYYY-MM-DD` with an optional time suffix.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let day = s.get(..10).unwrap_or(&s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
        serde::de::Error::custom(format!("expected YYYY-MM-DD date, got '{}': {}", s, e))
    })
}

// =============================================================================
// WRITERS
// =============================================================================

/// Flat row for the synthetic components file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRow {
    pub week_start: NaiveDate,
    pub total_sales: f64,
    pub trend: f64,
    pub seasonal_annual: f64,
    pub seasonal_monthly: f64,
    pub predictable_peak: f64,
    pub noise: f64,
}

impl From<&SyntheticWeek> for ComponentRow {
    fn from(week: &SyntheticWeek) -> Self {
        Self {
            week_start: week.record.week_start,
            total_sales: week.record.total_sales,
            trend: week.components.trend,
            seasonal_annual: week.components.seasonal_annual,
            seasonal_monthly: week.components.seasonal_monthly,
            predictable_peak: week.components.predictable_peak,
            noise: week.components.noise,
        }
    }
}

/// Weekly series as CSV, readable back with [`read_weekly`].
///
/// Empty cells stand for absent revenue or price, so every row has the same columns.
#[derive(Debug, Serialize)]
struct WeeklyCsvOut {
    week_start: NaiveDate,
    total_sales: f64,
    total_revenue: Option<f64>,
    avg_price: Option<f64>,
}

pub fn write_weekly<W: Write>(writer: W, series: &[WeeklyRecord]) -> Result<(), UrgencyError> {
    write_rows(
        writer,
        series.iter().map(|w| WeeklyCsvOut {
            week_start: w.week_start,
            total_sales: w.total_sales,
            total_revenue: w.total_revenue,
            avg_price: w.avg_price,
        }),
    )
}

pub fn write_week_rows<W: Write>(writer: W, rows: &[WeekRow]) -> Result<(), UrgencyError> {
    write_rows(writer, rows.iter())
}

pub fn write_components<W: Write>(
    writer: W,
    weeks: &[SyntheticWeek],
) -> Result<(), UrgencyError> {
    write_rows(writer, weeks.iter().map(ComponentRow::from))
}

/// Create `path` and hand a buffered writer to `write`.
pub fn write_file<F>(path: &Path, write: F) -> Result<(), UrgencyError>
where
    F: FnOnce(std::io::BufWriter<std::fs::File>) -> Result<(), UrgencyError>,
{
    let file = std::fs::File::create(path).map_err(|e| {
        UrgencyError::IoError(format!("Failed to create '{}': {}", path.display(), e))
    })?;
    write(std::io::BufWriter::new(file))
}

fn write_rows<W: Write, T: Serialize>(
    writer: W,
    rows: impl IntoIterator<Item = T>,
) -> Result<(), UrgencyError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| UrgencyError::SerializationError(format!("CSV write error: {}", e)))?;
    }
    csv_writer
        .flush()
        .map_err(|e| UrgencyError::IoError(format!("CSV flush error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKLY_CSV: &str = "\
week_id,week_start,total_sales,total_revenue,avg_price,week_num
1101,2011-01-01,156400,625600.0,4.0,0
1102,2011-01-08 00:00:00,160000,,,1
";

    #[test]
    fn weekly_csv_tolerates_extra_columns_and_timestamps() {
        let series = read_weekly(WEEKLY_CSV.as_bytes()).expect("parse");
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[1].week_start,
            NaiveDate::from_ymd_opt(2011, 1, 8).expect("valid date")
        );
        assert_eq!(series[0].total_revenue, Some(625_600.0));
        assert_eq!(series[1].avg_price, None);
    }

    #[test]
    fn daily_csv_accepts_m5_price_column() {
        let csv = "date,sales,sell_price\n2011-01-29,3,2.5\n2011-01-30,4,\n";
        let daily = read_daily(csv.as_bytes()).expect("parse");
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].price, Some(2.5));
        assert_eq!(daily[1].price, None);
        assert_eq!(daily[1].units, 4.0);
    }

    #[test]
    fn bad_row_reports_line_number() {
        let csv = "week_start,total_sales\n2011-01-01,10\nnot-a-date,5\n";
        let err = read_weekly(csv.as_bytes()).expect_err("bad date");
        assert!(err.to_string().contains("line 3"), "{}", err);
    }

    #[test]
    fn weekly_write_reads_back() {
        let series = read_weekly(WEEKLY_CSV.as_bytes()).expect("parse");
        let mut buffer = Vec::new();
        write_weekly(&mut buffer, &series).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.starts_with("week_start,total_sales,total_revenue,avg_price\n"));
        assert_eq!(read_weekly(text.as_bytes()).expect("parse"), series);
    }
}
