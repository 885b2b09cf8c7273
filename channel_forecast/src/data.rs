//! Daily channel metrics and their loader
//!
//! The loader turns a per-day table into [`DailyMetrics`]: one row per
//! calendar day, sorted ascending, with missing values already replaced by
//! zero. Forecasters only ever see the positional values of a
//! [`MetricSeries`].

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// How forecast values of a metric are rounded for output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Nearest whole number
    Integer,
    /// Two decimal places
    Cents,
}

/// The tracked channel metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ViewCount,
    SubscriberCount,
    Revenue,
}

impl Metric {
    /// Every metric, in output order
    pub const ALL: [Metric; 3] = [Metric::ViewCount, Metric::SubscriberCount, Metric::Revenue];

    /// Wire name used in tables and output documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::ViewCount => "view_count",
            Metric::SubscriberCount => "subscriber_count",
            Metric::Revenue => "revenue",
        }
    }

    pub fn rounding(&self) -> Rounding {
        match self {
            Metric::ViewCount | Metric::SubscriberCount => Rounding::Integer,
            Metric::Revenue => Rounding::Cents,
        }
    }

    /// Lowercased column names accepted for this metric, canonical name first
    fn column_aliases(&self) -> &'static [&'static str] {
        match self {
            Metric::ViewCount => &["view_count", "views"],
            Metric::SubscriberCount => &[
                "subscriber_count",
                "subscribers_gained",
                "subscribersgained",
                "subscribers",
            ],
            Metric::Revenue => &["revenue", "estimated_revenue", "estimatedrevenue"],
        }
    }

    fn index(&self) -> usize {
        match self {
            Metric::ViewCount => 0,
            Metric::SubscriberCount => 1,
            Metric::Revenue => 2,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of channel metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub view_count: f64,
    pub subscriber_count: f64,
    pub revenue: f64,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, view_count: f64, subscriber_count: f64, revenue: f64) -> Self {
        Self {
            date,
            view_count,
            subscriber_count,
            revenue,
        }
    }

    fn values(&self) -> [f64; 3] {
        [self.view_count, self.subscriber_count, self.revenue]
    }
}

/// Ordered values of a single metric with their dates
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    metric: Metric,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MetricSeries {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Values by position, oldest first
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The full daily table: strictly increasing dates, no missing values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyMetrics {
    dates: Vec<NaiveDate>,
    columns: [Vec<f64>; 3],
}

impl DailyMetrics {
    /// Build from unordered records.
    ///
    /// Records are sorted by date; for a repeated date the last record wins.
    /// Non-finite values count as missing and become zero.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DailyRecord>,
    {
        let mut by_date: BTreeMap<NaiveDate, [f64; 3]> = BTreeMap::new();
        for record in records {
            if by_date.insert(record.date, record.values()).is_some() {
                warn!(date = %record.date, "duplicate date in daily metrics, keeping the later row");
            }
        }

        let mut metrics = DailyMetrics::default();
        for (date, values) in by_date {
            metrics.dates.push(date);
            for (column, value) in metrics.columns.iter_mut().zip(values) {
                column.push(if value.is_finite() { value } else { 0.0 });
            }
        }

        metrics
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Most recent observed date
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Positional values of one metric, oldest first
    pub fn values(&self, metric: Metric) -> &[f64] {
        &self.columns[metric.index()]
    }

    pub fn series(&self, metric: Metric) -> MetricSeries {
        MetricSeries {
            metric,
            dates: self.dates.clone(),
            values: self.values(metric).to_vec(),
        }
    }
}

/// Cell contents read as missing values
const NULL_MARKERS: [&str; 3] = ["NULL", "null", "NA"];

/// Loader for daily metric tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load daily metrics from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DailyMetrics> {
        let path = path.as_ref();
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            debug!(path = %path.display(), "daily metrics csv is empty");
            return Ok(DailyMetrics::from_records(Vec::new()));
        }

        let null_values = NULL_MARKERS.iter().map(|m| m.to_string()).collect();
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()?;

        debug!(path = %path.display(), rows = df.height(), "read daily metrics csv");
        Self::from_dataframe(df)
    }

    /// Create daily metrics from an existing DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<DailyMetrics> {
        let date_column = Self::detect_date_column(&df)?;
        let dates = Self::column_as_dates(&df, &date_column)?;

        let mut columns: [Vec<f64>; 3] = Default::default();
        for metric in Metric::ALL {
            columns[metric.index()] = match Self::detect_metric_column(&df, metric) {
                Some(name) => Self::column_as_f64(&df, &name)?,
                None => {
                    warn!(metric = %metric, "no column found for metric, treating it as zero");
                    vec![0.0; dates.len()]
                }
            };
        }

        let records = dates.into_iter().enumerate().map(|(row, date)| {
            DailyRecord::new(date, columns[0][row], columns[1][row], columns[2][row])
        });

        Ok(DailyMetrics::from_records(records))
    }

    /// Detect the date column in a DataFrame
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        let column_names = df.get_column_names();

        for exact in ["date", "day"] {
            if let Some(name) = column_names.iter().find(|n| n.to_lowercase() == exact) {
                return Ok(name.to_string());
            }
        }

        if let Some(name) = column_names
            .iter()
            .find(|n| n.to_lowercase().contains("date"))
        {
            return Ok(name.to_string());
        }

        // If not found, use the first column if it looks like a date
        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(ForecastError::DataError(
            "No date column found in data".to_string(),
        ))
    }

    /// Detect the column holding a metric, by canonical name or alias
    fn detect_metric_column(df: &DataFrame, metric: Metric) -> Option<String> {
        let column_names = df.get_column_names();

        metric.column_aliases().iter().find_map(|alias| {
            column_names
                .iter()
                .find(|name| name.to_lowercase() == *alias)
                .map(|name| name.to_string())
        })
    }

    /// Numeric column as f64 with nulls replaced by zero
    fn column_as_f64(df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
        let col = df.column(column_name)?;
        // An all-empty column is inferred as text
        if col.null_count() == col.len() {
            return Ok(vec![0.0; col.len()]);
        }
        if !col.dtype().is_numeric() {
            return Err(ForecastError::DataError(format!(
                "Column '{}' is not numeric ({})",
                column_name,
                col.dtype()
            )));
        }

        let casted = col.cast(&DataType::Float64)?;
        Ok(casted
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(0.0))
            .collect())
    }

    /// Date column parsed as calendar days; a trailing time part is ignored
    fn column_as_dates(df: &DataFrame, column_name: &str) -> Result<Vec<NaiveDate>> {
        let col = df.column(column_name)?;
        let casted = col.cast(&DataType::Utf8)?;

        casted
            .utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let raw = value.ok_or_else(|| {
                    ForecastError::DataError(format!(
                        "Missing date in column '{}' at row {}",
                        column_name, row
                    ))
                })?;
                parse_day(raw).ok_or_else(|| {
                    ForecastError::DataError(format!(
                        "Invalid date '{}' in column '{}' at row {}",
                        raw, column_name, row
                    ))
                })
            })
            .collect()
    }
}

/// Parse `YYYY-MM-DD`, ignoring anything after the day.
pub(crate) fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
