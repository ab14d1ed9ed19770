//! Monthly metrics table handling

use crate::columns;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// One row per calendar month, in strictly increasing month order
#[derive(Debug, Clone)]
pub struct MetricTable {
    /// Data frame containing the raw and derived metrics
    df: DataFrame,
    /// Parsed values of the month column
    months: Vec<NaiveDate>,
}

/// Data loader for metric tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a metric table from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<MetricTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ForecastError::MissingInputFile {
            path: path.to_path_buf(),
            source,
        })?;

        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        tracing::debug!(rows = df.height(), columns = df.width(), "loaded {}", path.display());

        MetricTable::from_dataframe(df)
    }
}

/// Parse a month cell. Accepts full dates, timestamps and bare `YYYY-MM`.
pub fn parse_month(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(timestamp.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y/%m/%d") {
        return Some(date);
    }

    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok()
}

impl MetricTable {
    /// Wrap a DataFrame, parsing and validating its month column
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let series = df
            .column(columns::MONTH)
            .map_err(|_| ForecastError::MissingField(columns::MONTH.to_string()))?;

        let text = match series.dtype() {
            DataType::Utf8 => series.clone(),
            dtype if dtype.is_temporal() => series.cast(&DataType::Utf8)?,
            other => {
                return Err(ForecastError::TypeMismatch {
                    column: columns::MONTH.to_string(),
                    found: other.to_string(),
                })
            }
        };

        let mut months = Vec::with_capacity(text.len());
        for (row, cell) in text.utf8()?.into_iter().enumerate() {
            let cell = cell.ok_or_else(|| {
                ForecastError::InvalidData(format!("Row {} has no month value", row))
            })?;
            let month = parse_month(cell).ok_or_else(|| {
                ForecastError::InvalidData(format!(
                    "Row {}: '{}' is not a calendar month",
                    row, cell
                ))
            })?;
            months.push(month);
        }

        for (row, pair) in months.windows(2).enumerate() {
            let previous = (pair[0].year(), pair[0].month());
            let current = (pair[1].year(), pair[1].month());
            if current == previous {
                return Err(ForecastError::InvalidData(format!(
                    "Month {}-{:02} appears more than once (row {})",
                    current.0,
                    current.1,
                    row + 1
                )));
            }
            if current < previous {
                return Err(ForecastError::InvalidData(format!(
                    "Months are not in chronological order at row {}",
                    row + 1
                )));
            }
        }

        Ok(Self { df, months })
    }

    /// Build a table from months and numeric columns (mainly for tests)
    pub fn from_columns(months: Vec<NaiveDate>, values: &[(&str, Vec<f64>)]) -> Result<Self> {
        let mut series = Vec::with_capacity(values.len() + 1);
        let labels: Vec<String> = months.iter().map(|m| m.format("%Y-%m-%d").to_string()).collect();
        series.push(Series::new(columns::MONTH, labels));

        for (name, column) in values {
            if column.len() != months.len() {
                return Err(ForecastError::InvalidData(format!(
                    "Column '{}' has {} values for {} months",
                    name,
                    column.len(),
                    months.len()
                )));
            }
            series.push(Series::new(name, column.clone()));
        }

        Self::from_dataframe(DataFrame::new(series)?)
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Months of the observations, one per row
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Last observed month
    pub fn last_month(&self) -> Result<NaiveDate> {
        self.months
            .last()
            .copied()
            .ok_or_else(|| ForecastError::InvalidData("Metric table is empty".to_string()))
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of monthly observations
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Get a numeric column as f64 values. Null cells become NaN.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>> {
        let series = self
            .df
            .column(name)
            .map_err(|_| ForecastError::MissingField(name.to_string()))?;

        let dtype = series.dtype();
        if !(dtype.is_numeric() || matches!(dtype, DataType::Boolean)) {
            return Err(ForecastError::TypeMismatch {
                column: name.to_string(),
                found: dtype.to_string(),
            });
        }

        let values = series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();

        Ok(values)
    }

    /// Last value of a numeric column
    pub fn last_value(&self, name: &str) -> Result<f64> {
        self.column_f64(name)?
            .last()
            .copied()
            .ok_or_else(|| ForecastError::InvalidData(format!("Column '{}' is empty", name)))
    }

    /// Number of missing cells per column, in column order
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.df
            .get_columns()
            .iter()
            .map(|s| (s.name().to_string(), s.null_count()))
            .collect()
    }

    /// Return a new table with the given columns appended, replacing any
    /// existing columns of the same name
    pub fn with_columns(&self, values: Vec<(&str, Vec<f64>)>) -> Result<Self> {
        let mut df = self.df.clone();

        for (name, column) in values {
            if column.len() != df.height() {
                return Err(ForecastError::InvalidData(format!(
                    "Column '{}' has {} values for {} rows",
                    name,
                    column.len(),
                    df.height()
                )));
            }
            df.with_column(Series::new(name, column))?;
        }

        Ok(Self {
            df,
            months: self.months.clone(),
        })
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            df: self.df.head(Some(n)),
            months: self.months[..n].to_vec(),
        }
    }
}
