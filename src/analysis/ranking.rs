//! Product Ranking Module

use polars::prelude::*;
use thiserror::Error;

/// Number of entries kept by the product ranking.
pub const TOP_N: usize = 10;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Group by `key_col`, sum `value_col`, and keep the `n` largest totals.
///
/// Groups are formed in ascending key order and the descending sort is
/// stable, so equal totals keep key order.
pub fn top_by_total(
    df: &DataFrame,
    key_col: &str,
    value_col: &str,
    n: usize,
) -> Result<Vec<(String, f64)>, RankError> {
    let totals = df
        .clone()
        .lazy()
        .select([
            col(key_col).cast(DataType::String),
            col(value_col).cast(DataType::Float64),
        ])
        .filter(col(key_col).is_not_null())
        .group_by([col(key_col)])
        .agg([col(value_col).sum()])
        .sort([key_col], SortMultipleOptions::default())
        .sort(
            [value_col],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(n as IdxSize)
        .collect()?;

    let keys = totals.column(key_col)?.as_materialized_series().str()?;
    let values = totals.column(value_col)?.f64()?;
    let ranked: Vec<(String, f64)> = keys
        .into_iter()
        .zip(values)
        .filter_map(|(key, total)| Some((key?.to_string(), total?)))
        .collect();

    Ok(ranked)
}
