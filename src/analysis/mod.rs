//! Analysis module - Column-guarded derived views

mod ranking;
mod timeline;

pub use ranking::{top_by_total, TOP_N};
pub use timeline::{DatedSales, YearMonth};

/// Outcome of a step that depends on optional columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Present(T),
    Skipped { column: String },
}

impl<T> Section<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Section::Present(value) => Some(value),
            Section::Skipped { .. } => None,
        }
    }
}
