//! Dataset Module
//! Immutable time-indexed table of numeric columns backed by a Polars DataFrame.

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Index column '{0}' not found")]
    MissingIndex(String),
    #[error("Index column '{0}' contains null values")]
    NullIndex(String),
    #[error("Index column '{0}' must be strictly increasing")]
    NonMonotonicIndex(String),
    #[error("Dataset has no value columns")]
    NoColumns,
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Column '{0}' is not numeric")]
    NonNumericColumn(String),
    #[error("Invalid calendar date")]
    InvalidDate,
}

/// A single column pulled out of the dataset, aligned with the time index.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    /// Index positions as plot coordinates (days since 1970-01-01 for date indexes).
    pub index: Vec<f64>,
    /// Null cells become NaN.
    pub values: Vec<f64>,
}

/// Table indexed by a monotonic time key with one or more named value columns.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    index_column: String,
    columns: Vec<String>,
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Days between the Unix epoch and `date`.
pub fn days_since_epoch(date: NaiveDate) -> Result<i32, DatasetError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).ok_or(DatasetError::InvalidDate)?;
    i32::try_from((date - epoch).num_days()).map_err(|_| DatasetError::InvalidDate)
}

impl Dataset {
    /// Wrap `frame`, treating `index_column` as the time key and every other
    /// column as a selectable value column.
    pub fn new(frame: DataFrame, index_column: &str) -> Result<Self, DatasetError> {
        let columns: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name != index_column)
            .collect();

        if columns.len() == frame.width() {
            return Err(DatasetError::MissingIndex(index_column.to_string()));
        }
        if columns.is_empty() {
            return Err(DatasetError::NoColumns);
        }

        let dataset = Self {
            frame,
            index_column: index_column.to_string(),
            columns,
        };

        let index = dataset.index_values()?;
        if index.windows(2).any(|w| w[1] <= w[0]) {
            return Err(DatasetError::NonMonotonicIndex(index_column.to_string()));
        }

        log::info!(
            "Dataset ready: {} rows, columns {:?}",
            dataset.len(),
            dataset.columns
        );
        Ok(dataset)
    }

    /// Build a dataset from a daily calendar index and named value columns.
    pub fn from_dates(
        index_column: &str,
        dates: &[NaiveDate],
        values: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, DatasetError> {
        let days = dates
            .iter()
            .map(|d| days_since_epoch(*d))
            .collect::<Result<Vec<i32>, _>>()?;

        let mut columns = vec![Column::new(index_column.into(), days).cast(&DataType::Date)?];
        for (name, data) in values {
            columns.push(Column::new(name.as_str().into(), data));
        }

        Self::new(DataFrame::new(columns)?, index_column)
    }

    /// Value column names in table order; the index column is excluded.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn has_date_index(&self) -> bool {
        self.frame
            .column(&self.index_column)
            .map(|col| matches!(col.dtype(), DataType::Date))
            .unwrap_or(false)
    }

    /// Index as plot coordinates.
    pub fn index_values(&self) -> Result<Vec<f64>, DatasetError> {
        let index = self
            .frame
            .column(&self.index_column)
            .map_err(|_| DatasetError::MissingIndex(self.index_column.clone()))?;

        let physical = match index.dtype() {
            DataType::Date => index.cast(&DataType::Int32)?,
            dtype if is_numeric(dtype) => index.clone(),
            _ => return Err(DatasetError::NonNumericColumn(self.index_column.clone())),
        };
        let index_f64 = physical.cast(&DataType::Float64)?;
        let index_ca = index_f64.f64()?;

        (0..index_ca.len())
            .map(|i| {
                index_ca
                    .get(i)
                    .ok_or_else(|| DatasetError::NullIndex(self.index_column.clone()))
            })
            .collect()
    }

    /// Extract `column` together with the index.
    pub fn series(&self, column: &str) -> Result<TimeSeries, DatasetError> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(DatasetError::UnknownColumn(column.to_string()));
        }

        let value_series = self.frame.column(column)?;
        if !is_numeric(value_series.dtype()) {
            return Err(DatasetError::NonNumericColumn(column.to_string()));
        }
        let value_f64 = value_series.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        let values = (0..value_ca.len())
            .map(|i| value_ca.get(i).unwrap_or(f64::NAN))
            .collect();

        Ok(TimeSeries {
            name: column.to_string(),
            index: self.index_values()?,
            values,
        })
    }
}
