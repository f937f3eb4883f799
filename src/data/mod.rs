//! Data module - CSV loading and cleaning

mod cleaner;
mod loader;

pub use cleaner::DataCleaner;
pub use loader::{is_numeric_dtype, DataLoader};
