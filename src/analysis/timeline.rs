//! Timeline Aggregation Module
//! Parses order dates into an augmented table and sums sales per
//! year-month bucket and per calendar month.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

pub const YEAR_COL: &str = "Year";
pub const MONTH_COL: &str = "Month";
pub const YEAR_MONTH_COL: &str = "YearMonth";

/// Accepted date-time layouts, tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Accepted date-only layouts, tried in order.
const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d-%b-%Y"];

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Calendar year-month bucket, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse an order date, returning `None` for anything unrecognised.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

/// Rows whose order date parsed, with derived `Year`, `Month` and
/// `YearMonth` columns appended.
#[derive(Debug, Clone)]
pub struct DatedSales {
    pub df: DataFrame,
    pub unparsed_rows: usize,
}

impl DatedSales {
    /// Build the dated view of `df`. The input table is left untouched.
    pub fn derive(df: &DataFrame, date_col: &str) -> Result<Self, TimelineError> {
        let dates = df.column(date_col)?.cast(&DataType::String)?;
        let parsed: Vec<Option<NaiveDate>> = dates
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|raw| raw.and_then(parse_order_date))
            .collect();

        let mask: BooleanChunked = parsed.iter().map(|d| d.is_some()).collect();
        let unparsed_rows = parsed.iter().filter(|d| d.is_none()).count();
        if unparsed_rows > 0 {
            info!(
                "Dropped {} rows with unparseable {} values",
                unparsed_rows, date_col
            );
        }

        let kept: Vec<NaiveDate> = parsed.into_iter().flatten().collect();
        let mut out = df.filter(&mask)?;
        out.with_column(Column::new(
            YEAR_COL.into(),
            kept.iter().map(|d| d.year()).collect::<Vec<i32>>(),
        ))?;
        out.with_column(Column::new(
            MONTH_COL.into(),
            kept.iter().map(|d| d.month() as i32).collect::<Vec<i32>>(),
        ))?;
        out.with_column(Column::new(
            YEAR_MONTH_COL.into(),
            kept.iter()
                .map(|d| YearMonth::from_date(*d).to_string())
                .collect::<Vec<String>>(),
        ))?;

        debug!(rows = out.height(), "derived dated sales");
        Ok(Self {
            df: out,
            unparsed_rows,
        })
    }

    /// Sum `value_col` per distinct `keys`, sorted ascending by those keys.
    fn totals(&self, keys: &[&str], value_col: &str) -> Result<DataFrame, TimelineError> {
        let by: Vec<Expr> = keys.iter().map(|&k| col(k)).collect();
        let totals = self
            .df
            .clone()
            .lazy()
            .group_by(by)
            .agg([col(value_col).cast(DataType::Float64).sum()])
            .sort(keys.to_vec(), SortMultipleOptions::default())
            .collect()?;
        Ok(totals)
    }

    /// Total value per year-month bucket, chronologically ordered.
    pub fn monthly_trend(&self, value_col: &str) -> Result<Vec<(YearMonth, f64)>, TimelineError> {
        let totals = self.totals(&[YEAR_COL, MONTH_COL], value_col)?;
        let years = totals.column(YEAR_COL)?.i32()?;
        let months = totals.column(MONTH_COL)?.i32()?;
        let values = totals.column(value_col)?.f64()?;

        Ok(years
            .into_iter()
            .zip(months)
            .zip(values)
            .filter_map(|((y, m), v)| Some((YearMonth::new(y?, m? as u32), v?)))
            .collect())
    }

    /// Total value per calendar month number (1-12), ascending.
    pub fn month_pattern(&self, value_col: &str) -> Result<Vec<(u32, f64)>, TimelineError> {
        let totals = self.totals(&[MONTH_COL], value_col)?;
        let months = totals.column(MONTH_COL)?.i32()?;
        let values = totals.column(value_col)?.f64()?;

        Ok(months
            .into_iter()
            .zip(values)
            .filter_map(|(m, v)| Some((m? as u32, v?)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> DataFrame {
        df!(
            "ORDERDATE" => ["2/24/2003 0:00", "not a date", "2020-01-15", "2020-01-20", "2020-02-01", "12/1/2003 0:00"],
            "SALES" => [10.0, 999.0, 100.0, 200.0, 50.0, 5.0],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_order_date_formats() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day);
        assert_eq!(parse_order_date("2/24/2003 0:00"), d(2003, 2, 24));
        assert_eq!(parse_order_date("5/7/2004 13:05:59"), d(2004, 5, 7));
        assert_eq!(parse_order_date("2020-01-15"), d(2020, 1, 15));
        assert_eq!(parse_order_date(" 2020/03/09 "), d(2020, 3, 9));
        assert_eq!(parse_order_date("2020-01-15T08:30:00"), d(2020, 1, 15));
        assert_eq!(parse_order_date("07-Mar-2005"), d(2005, 3, 7));
        assert_eq!(parse_order_date("13/45/2003"), None);
        assert_eq!(parse_order_date(""), None);
    }

    #[test]
    fn test_derive_drops_unparsed_and_keeps_input() {
        let df = sales();
        let dated = DatedSales::derive(&df, "ORDERDATE").unwrap();

        assert_eq!(dated.unparsed_rows, 1);
        assert_eq!(dated.df.height(), 5);
        assert_eq!(df.width(), 2);
        assert!(dated.df.column(YEAR_MONTH_COL).is_ok());
    }

    #[test]
    fn test_monthly_trend_is_chronological_and_sums_match() {
        let dated = DatedSales::derive(&sales(), "ORDERDATE").unwrap();
        let trend = dated.monthly_trend("SALES").unwrap();

        assert_eq!(
            trend,
            vec![
                (YearMonth::new(2003, 2), 10.0),
                (YearMonth::new(2003, 12), 5.0),
                (YearMonth::new(2020, 1), 300.0),
                (YearMonth::new(2020, 2), 50.0),
            ]
        );
        assert!(trend.windows(2).all(|w| w[0].0 < w[1].0));

        let total: f64 = trend.iter().map(|(_, v)| v).sum();
        assert_eq!(total, 365.0);
    }

    #[test]
    fn test_month_pattern_ascending() {
        let dated = DatedSales::derive(&sales(), "ORDERDATE").unwrap();
        let pattern = dated.month_pattern("SALES").unwrap();

        assert_eq!(pattern, vec![(1, 300.0), (2, 60.0), (12, 5.0)]);
    }

    #[test]
    fn test_year_month_display() {
        assert_eq!(YearMonth::new(2020, 1).to_string(), "2020-01");
    }
}
