//! Statistics Calculator Module
//! Descriptive statistics (mean, median, standard deviation, mode) per column.

use crate::data::is_numeric_dtype;
use polars::prelude::{DataFrame, DataType, PolarsError};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Decimal places kept in every reported statistic.
pub const ROUND_DECIMALS: i32 = 2;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Column {column} is not numeric ({dtype})")]
    NotNumeric { column: String, dtype: String },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Summary of a single numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    #[serde(rename = "Mean")]
    pub mean: f64,
    #[serde(rename = "Median")]
    pub median: f64,
    #[serde(rename = "Standard Deviation")]
    pub std: f64,
    #[serde(rename = "Mode")]
    pub mode: f64,
    /// Mode drawn from an integer column, shown without a fraction.
    #[serde(skip)]
    pub integer_mode: bool,
}

impl ColumnSummary {
    pub fn mode_text(&self) -> String {
        if self.integer_mode && self.mode.is_finite() {
            format!("{}", self.mode as i64)
        } else {
            format!("{:?}", self.mode)
        }
    }
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            mode: f64::NAN,
            integer_mode: false,
        }
    }
}

/// Column summaries in the order the columns were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub columns: Vec<(String, ColumnSummary)>,
}

impl StatsSummary {
    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }

    /// JSON object keyed by column, preserving request order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for StatsSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, summary) in &self.columns {
            map.serialize_entry(name, summary)?;
        }
        map.end()
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, s)) in self.columns.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", name)?;
            writeln!(f, "Mean: {:?}", s.mean)?;
            writeln!(f, "Median: {:?}", s.median)?;
            writeln!(f, "Standard Deviation: {:?}", s.std)?;
            writeln!(f, "Mode: {}", s.mode_text())?;
        }
        Ok(())
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute summaries for every requested column present in `df`.
    /// Columns missing from the schema are skipped.
    pub fn describe(df: &DataFrame, columns: &[&str]) -> Result<StatsSummary, StatsError> {
        let mut summary = StatsSummary::default();

        for &name in columns {
            let Ok(column) = df.column(name) else {
                debug!(column = name, "not in schema, skipping statistics");
                continue;
            };

            if !is_numeric_dtype(column.dtype()) {
                return Err(StatsError::NotNumeric {
                    column: name.to_string(),
                    dtype: column.dtype().to_string(),
                });
            }

            let values = Self::column_values(df, name)?;
            debug!(column = %column.name(), count = values.len(), "computing statistics");

            let mut stats = Self::compute_descriptive_stats(&values);
            stats.integer_mode = is_integer_dtype(column.dtype());
            summary.columns.push((name.to_string(), stats));
        }

        Ok(summary)
    }

    /// Non-null values of a column as f64.
    pub fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, PolarsError> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        let ca = column.f64()?;
        Ok(ca.into_iter().flatten().collect())
    }

    /// Compute rounded descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnSummary {
        if values.is_empty() {
            return ColumnSummary::default();
        }

        let mean = values.mean();
        let std = values.std_dev();
        let median = Data::new(values.to_vec()).median();
        let mode = Self::first_mode(values).unwrap_or(f64::NAN);

        ColumnSummary {
            mean: round_to(mean, ROUND_DECIMALS),
            median: round_to(median, ROUND_DECIMALS),
            std: round_to(std, ROUND_DECIMALS),
            mode: round_to(mode, ROUND_DECIMALS),
            integer_mode: false,
        }
    }

    /// Most frequent value; among ties the smallest wins.
    pub fn first_mode(values: &[f64]) -> Option<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut best: Option<(f64, usize)> = None;
        let mut i = 0;
        while i < sorted.len() {
            let value = sorted[i];
            let run = sorted[i..].iter().take_while(|&&v| v == value).count();
            if best.map_or(true, |(_, count)| run > count) {
                best = Some((value, run));
            }
            i += run.max(1);
        }

        best.map(|(value, _)| value)
    }
}

fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Round to `decimals` places, exact halves to even.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
