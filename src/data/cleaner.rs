//! Data Cleaner Module
//! Median imputation for numeric gaps, then removal of incomplete rows.

use crate::data::loader::{DataLoader, SAMPLE_ROWS};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Cleaned table plus what was changed to get there.
#[derive(Debug, Clone)]
pub struct CleanReport {
    pub df: DataFrame,
    /// (column, number of values replaced by the median)
    pub filled: Vec<(String, usize)>,
    pub rows_dropped: usize,
}

/// Handles missing value treatment.
pub struct DataCleaner;

impl DataCleaner {
    /// Fill numeric nulls with the column median, then drop rows that still
    /// contain a null anywhere.
    ///
    /// Medians come from the original non-null values of each column.
    pub fn clean(df: &DataFrame) -> Result<CleanReport, CleanError> {
        let mut out = df.clone();
        let mut filled = Vec::new();

        for name in DataLoader::numeric_columns(df) {
            let column = df.column(&name)?;
            let as_f64 = column.cast(&DataType::Float64)?;
            // NaN counts as missing alongside null
            let ca: Float64Chunked = as_f64
                .f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect();
            let replaced = ca.null_count();
            if replaced == 0 {
                continue;
            }

            let Some(median) = ca.median() else {
                debug!(column = %column.name(), "no values to take a median from");
                out.with_column(ca.with_name(column.name().clone()).into_series())?;
                continue;
            };

            let filled_ca: Float64Chunked = ca
                .into_iter()
                .map(|v| Some(v.unwrap_or(median)))
                .collect();
            out.with_column(filled_ca.with_name(column.name().clone()).into_series())?;

            debug!(column = %column.name(), median, replaced, "filled numeric gaps");
            filled.push((column.name().to_string(), replaced));
        }

        let before = out.height();
        let out = Self::drop_incomplete_rows(&out)?;
        let rows_dropped = before - out.height();
        if rows_dropped > 0 {
            info!("Dropped {} rows with missing values", rows_dropped);
        }

        Ok(CleanReport {
            df: out,
            filled,
            rows_dropped,
        })
    }

    /// Keep only rows with no nulls in any column.
    fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame, CleanError> {
        if df.get_columns().iter().all(|c| c.null_count() == 0) {
            return Ok(df.clone());
        }

        let mut mask = BooleanChunked::full("complete".into(), true, df.height());
        for column in df.get_columns() {
            mask = &mask & &column.as_materialized_series().is_not_null();
        }
        Ok(df.filter(&mask)?)
    }

    /// Print the cleaned sample.
    pub fn print_report(report: &CleanReport) {
        println!("\nData after cleaning:");
        println!("{}", report.df.head(Some(SAMPLE_ROWS)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "SALES" => [Some(100.0), None, Some(300.0), Some(50.0)],
            "QUANTITYORDERED" => [Some(1i64), Some(3), None, Some(9)],
            "PRODUCTCODE" => [Some("A"), Some("B"), Some("C"), None],
        )
        .unwrap()
    }

    fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_fills_with_original_median_then_drops() {
        let report = DataCleaner::clean(&sample()).unwrap();

        // SALES median over {100, 300, 50} is 100; the last row is dropped
        // for its missing product code.
        assert_eq!(
            f64_values(&report.df, "SALES"),
            vec![Some(100.0), Some(100.0), Some(300.0)]
        );
        // QUANTITYORDERED median over {1, 3, 9} is 3
        assert_eq!(
            f64_values(&report.df, "QUANTITYORDERED"),
            vec![Some(1.0), Some(3.0), Some(3.0)]
        );
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(
            report.filled,
            vec![
                ("SALES".to_string(), 1),
                ("QUANTITYORDERED".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_no_nulls_remain() {
        let report = DataCleaner::clean(&sample()).unwrap();
        for column in report.df.get_columns() {
            assert_eq!(column.null_count(), 0, "nulls left in {}", column.name());
        }
    }

    #[test]
    fn test_idempotent() {
        let once = DataCleaner::clean(&sample()).unwrap();
        let twice = DataCleaner::clean(&once.df).unwrap();

        assert!(twice.df.equals(&once.df));
        assert_eq!(twice.rows_dropped, 0);
        assert!(twice.filled.is_empty());
    }

    #[test]
    fn test_nan_is_filled_like_null() {
        let df = df!(
            "SALES" => [Some(f64::NAN), Some(10.0), None, Some(30.0)],
            "PRODUCTCODE" => ["A", "B", "C", "D"],
        )
        .unwrap();

        let report = DataCleaner::clean(&df).unwrap();
        // Median over {10, 30} ignores the NaN
        assert_eq!(
            f64_values(&report.df, "SALES"),
            vec![Some(20.0), Some(10.0), Some(20.0), Some(30.0)]
        );
        assert_eq!(report.filled, vec![("SALES".to_string(), 2)]);
        assert_eq!(report.rows_dropped, 0);
    }

    #[test]
    fn test_na_markers_from_csv_are_cleaned() {
        let raw = DataLoader::parse_latin1(b"SALES,TERRITORY\nNaN,NA\n10,EMEA\n").unwrap();
        let report = DataCleaner::clean(&raw).unwrap();

        assert_eq!(report.df.height(), 1);
        assert_eq!(f64_values(&report.df, "SALES"), vec![Some(10.0)]);
        assert_eq!(report.rows_dropped, 1);
    }

    #[test]
    fn test_all_null_numeric_column_drops_every_row() {
        let df = df!(
            "SALES" => [Some(1.0), Some(2.0)],
            "QUANTITYORDERED" => [None::<f64>, None],
        )
        .unwrap();

        let report = DataCleaner::clean(&df).unwrap();
        assert_eq!(report.df.height(), 0);
        assert_eq!(report.rows_dropped, 2);
        assert!(report.filled.is_empty());

        let nan_only = df!("SALES" => [f64::NAN, f64::NAN], "CODE" => ["A", "B"]).unwrap();
        assert_eq!(DataCleaner::clean(&nan_only).unwrap().df.height(), 0);
    }

    #[test]
    fn test_clean_table_is_untouched() {
        let df = df!(
            "SALES" => [1i64, 2, 3],
            "PRODUCTCODE" => ["A", "B", "C"],
        )
        .unwrap();
        let report = DataCleaner::clean(&df).unwrap();
        assert!(report.df.equals(&df));
        assert_eq!(report.df.column("SALES").unwrap().dtype(), &DataType::Int64);
    }
}
