//! Analysis Pipeline
//! Load, clean, summarise and aggregate a sales file, then describe the
//! charts for whichever views had the columns they need.

use crate::analysis::{top_by_total, DatedSales, Section, YearMonth, TOP_N};
use crate::charts::{ChartData, ChartKind, MONTH_COLOR, PRODUCT_COLOR, TREND_COLOR};
use crate::data::{DataCleaner, DataLoader};
use crate::stats::{StatsCalculator, StatsSummary};
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{info, warn};

pub const ORDER_DATE_COL: &str = "ORDERDATE";
pub const SALES_COL: &str = "SALES";
pub const QUANTITY_COL: &str = "QUANTITYORDERED";
pub const PRODUCT_COL: &str = "PRODUCTCODE";

/// Columns summarised by the statistics step.
pub const STAT_COLUMNS: [&str; 2] = [SALES_COL, QUANTITY_COL];

/// Everything derived from one input file.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub raw_shape: (usize, usize),
    pub cleaned_rows: usize,
    /// (column, values filled with the median)
    pub filled: Vec<(String, usize)>,
    pub rows_dropped: usize,
    /// Rows left out of the timeline views for an unreadable order date
    pub unparsed_dates: usize,
    pub stats: StatsSummary,
    pub monthly_trend: Section<Vec<(YearMonth, f64)>>,
    pub month_pattern: Section<Vec<(u32, f64)>>,
    pub top_products: Section<Vec<(String, f64)>>,
}

impl AnalysisReport {
    /// (view name, missing column) for each skipped view.
    pub fn skipped_sections(&self) -> Vec<(&'static str, String)> {
        let mut skipped = Vec::new();
        if let Section::Skipped { column } = &self.monthly_trend {
            skipped.push(("Monthly sales trend", column.clone()));
        }
        if let Section::Skipped { column } = &self.month_pattern {
            skipped.push(("Sales per month", column.clone()));
        }
        if let Section::Skipped { column } = &self.top_products {
            skipped.push(("Top products", column.clone()));
        }
        skipped
    }

    /// Chart descriptions for the present views, in display order.
    pub fn charts(&self) -> Vec<ChartData> {
        let mut charts = Vec::new();

        if let Some(trend) = self.monthly_trend.present() {
            charts.push(ChartData {
                file_stem: "monthly_sales",
                title: "Monthly Sales Over Time",
                x_label: "Year-Month",
                y_label: "Total Sales",
                kind: ChartKind::Line,
                color: TREND_COLOR,
                size: (1000, 500),
                points: trend.iter().map(|(ym, v)| (ym.to_string(), *v)).collect(),
            });
        }

        if let Some(pattern) = self.month_pattern.present() {
            charts.push(ChartData {
                file_stem: "sales_per_month",
                title: "Sales Per Month",
                x_label: "Month",
                y_label: "Total Sales",
                kind: ChartKind::Bar,
                color: MONTH_COLOR,
                size: (1000, 500),
                points: pattern.iter().map(|(m, v)| (m.to_string(), *v)).collect(),
            });
        }

        if let Some(top) = self.top_products.present() {
            charts.push(ChartData {
                file_stem: "top_products",
                title: "Top 10 Products by Sales",
                x_label: "Sales Amount",
                y_label: "Product Code",
                kind: ChartKind::HorizontalBar,
                color: PRODUCT_COLOR,
                size: (1000, 600),
                points: top.clone(),
            });
        }

        charts
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Load `path`, print the console reports, and analyse it.
    pub fn run(path: &Path) -> Result<AnalysisReport> {
        let raw = DataLoader::load_csv(path)
            .with_context(|| format!("Could not load {}", path.display()))?;
        DataLoader::print_report(&raw);
        Self::analyze(&raw, true)
    }

    /// Clean `raw` and derive every view from the cleaned table.
    pub fn analyze(raw: &DataFrame, print: bool) -> Result<AnalysisReport> {
        let cleaned = DataCleaner::clean(raw).context("Cleaning failed")?;
        if print {
            DataCleaner::print_report(&cleaned);
        }
        let df = &cleaned.df;
        info!("{} rows after cleaning", df.height());

        let stats = StatsCalculator::describe(df, &STAT_COLUMNS)
            .context("Computing statistics failed")?;

        let mut unparsed_dates = 0;
        let (monthly_trend, month_pattern) = match missing_column(df, &[ORDER_DATE_COL, SALES_COL])
        {
            Some(column) => {
                warn!("No {} column, skipping the timeline charts", column);
                (
                    Section::Skipped {
                        column: column.clone(),
                    },
                    Section::Skipped { column },
                )
            }
            None => {
                let dated = DatedSales::derive(df, ORDER_DATE_COL)
                    .context("Parsing order dates failed")?;
                unparsed_dates = dated.unparsed_rows;
                (
                    Section::Present(dated.monthly_trend(SALES_COL)?),
                    Section::Present(dated.month_pattern(SALES_COL)?),
                )
            }
        };

        let top_products = match missing_column(df, &[PRODUCT_COL, SALES_COL]) {
            Some(column) => {
                warn!("No {} column, skipping the product ranking", column);
                Section::Skipped { column }
            }
            None => Section::Present(
                top_by_total(df, PRODUCT_COL, SALES_COL, TOP_N)
                    .context("Ranking products failed")?,
            ),
        };

        Ok(AnalysisReport {
            raw_shape: raw.shape(),
            cleaned_rows: df.height(),
            filled: cleaned.filled.clone(),
            rows_dropped: cleaned.rows_dropped,
            unparsed_dates,
            stats,
            monthly_trend,
            month_pattern,
            top_products,
        })
    }
}

/// First of `columns` absent from `df`.
fn missing_column(df: &DataFrame, columns: &[&str]) -> Option<String> {
    columns
        .iter()
        .find(|name| df.column(name).is_err())
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use std::io::Write;

    #[test]
    fn test_worked_example() {
        let df = df!(
            "SALES" => [100.0, 200.0, 50.0],
            "ORDERDATE" => ["2020-01-15", "2020-01-20", "2020-02-01"],
            "PRODUCTCODE" => ["A", "A", "B"],
        )
        .unwrap();

        let report = Pipeline::analyze(&df, false).unwrap();

        assert_eq!(
            report.monthly_trend,
            Section::Present(vec![
                (YearMonth::new(2020, 1), 300.0),
                (YearMonth::new(2020, 2), 50.0),
            ])
        );
        assert_eq!(
            report.month_pattern,
            Section::Present(vec![(1, 300.0), (2, 50.0)])
        );
        assert_eq!(
            report.top_products,
            Section::Present(vec![("A".to_string(), 300.0), ("B".to_string(), 50.0)])
        );

        // QUANTITYORDERED is absent, so only SALES is summarised
        assert_eq!(report.stats.columns.len(), 1);
        assert_eq!(report.stats.get("SALES").unwrap().mean, 116.67);

        let charts = report.charts();
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[0].points[0], ("2020-01".to_string(), 300.0));
    }

    #[test]
    fn test_missing_columns_skip_views() {
        let df = df!(
            "SALES" => [1.0, 2.0],
            "QUANTITYORDERED" => [3i64, 4],
        )
        .unwrap();

        let report = Pipeline::analyze(&df, false).unwrap();
        assert!(matches!(report.monthly_trend, Section::Skipped { .. }));
        assert!(matches!(report.month_pattern, Section::Skipped { .. }));
        assert_eq!(
            report.top_products,
            Section::Skipped {
                column: PRODUCT_COL.to_string()
            }
        );
        assert!(report.charts().is_empty());
        assert_eq!(report.skipped_sections().len(), 3);
        assert_eq!(report.stats.columns.len(), 2);
    }

    #[test]
    fn test_run_cleans_before_aggregating() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"ORDERNUMBER,QUANTITYORDERED,SALES,ORDERDATE,PRODUCTCODE,CITY\n\
              10100,30,100,2/24/2003 0:00,S10_1678,NYC\n\
              10101,,300,2/25/2003 0:00,S10_1678,Paris\n\
              10102,50,,3/1/2003 0:00,S18_2248,\n\
              10103,20,200,bad date,S18_2248,M\xfcnchen\n",
        )
        .unwrap();

        let report = Pipeline::run(file.path()).unwrap();
        assert_eq!(report.raw_shape, (4, 6));
        // Row 3 has no CITY and is dropped after the numeric fill
        assert_eq!(report.cleaned_rows, 3);
        assert_eq!(report.rows_dropped, 1);
        assert_eq!(
            report.filled,
            vec![
                ("QUANTITYORDERED".to_string(), 1),
                ("SALES".to_string(), 1)
            ]
        );
        assert_eq!(report.unparsed_dates, 1);

        let quantity = report.stats.get("QUANTITYORDERED").unwrap();
        // Missing quantity filled with median(30, 50, 20) = 30
        assert_eq!(quantity.mean, 26.67);
        assert_eq!(quantity.mode, 30.0);

        // The unparseable date only leaves the timeline views
        assert_eq!(
            report.monthly_trend,
            Section::Present(vec![(YearMonth::new(2003, 2), 400.0)])
        );
        assert_eq!(
            report.top_products,
            Section::Present(vec![
                ("S10_1678".to_string(), 400.0),
                ("S18_2248".to_string(), 200.0),
            ])
        );
    }
}
