//! CSV Data Loader Module
//! Reads the Latin-1 encoded sales file into a Polars DataFrame.

use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Rows scanned for schema inference.
pub const INFER_SCHEMA_ROWS: usize = 10_000;

/// Rows shown in console samples.
pub const SAMPLE_ROWS: usize = 5;

/// Field values read as missing, in addition to empty fields.
pub const NA_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Loads delimited sales files.
pub struct DataLoader;

impl DataLoader {
    /// Load an ISO-8859-1 encoded CSV file.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        info!("Reading the data file {}", path.display());
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(bytes = bytes.len(), "file read");

        let df = Self::parse_latin1(&bytes)?;
        info!("Loaded {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Parse raw Latin-1 bytes as CSV with a header row.
    pub fn parse_latin1(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let text = decode_latin1(bytes);
        let null_values = NA_MARKERS.iter().map(|&m| PlSmallStr::from(m)).collect();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_null_values(Some(NullValues::AllColumns(null_values))),
            )
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;
        Ok(df)
    }

    /// Get list of numeric column names.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Null count per column, in schema order.
    pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Print the raw sample and missing value counts.
    pub fn print_report(df: &DataFrame) {
        println!("\nSample of raw data:");
        println!("{}", df.head(Some(SAMPLE_ROWS)));

        println!("\nMissing values in each column:");
        let counts = Self::null_counts(df);
        let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, count) in counts {
            println!("{:<width$} {}", name, count, width = width);
        }
    }
}

pub fn is_numeric_dtype(dtype: &DataType) -> bool {
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

/// ISO-8859-1 maps every byte to the code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_decode_latin1_maps_high_bytes() {
        // "Café" in ISO-8859-1
        let bytes = [0x43, 0x61, 0x66, 0xE9];
        assert_eq!(decode_latin1(&bytes), "Café");
    }

    #[test]
    fn test_parse_latin1_reads_header_and_nulls() {
        let csv = b"SALES,QUANTITYORDERED,CITY\n100.5,3,Z\xfcrich\n,4,Paris\n200,,\n";
        let df = DataLoader::parse_latin1(csv).unwrap();

        assert_eq!(df.shape(), (3, 3));
        let city = df.column("CITY").unwrap();
        assert_eq!(
            city.as_materialized_series().str().unwrap().get(0),
            Some("Zürich")
        );

        let counts = DataLoader::null_counts(&df);
        assert_eq!(
            counts,
            vec![
                ("SALES".to_string(), 1),
                ("QUANTITYORDERED".to_string(), 1),
                ("CITY".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_na_markers_read_as_null() {
        let csv = b"SALES,TERRITORY,CITY\nNaN,NA,N/A\n10,EMEA,NULL\n20,<NA>,Lyon\n";
        let df = DataLoader::parse_latin1(csv).unwrap();

        assert!(is_numeric_dtype(df.column("SALES").unwrap().dtype()));
        assert_eq!(
            DataLoader::null_counts(&df),
            vec![
                ("SALES".to_string(), 1),
                ("TERRITORY".to_string(), 2),
                ("CITY".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_numeric_columns() {
        let csv = b"SALES,QUANTITYORDERED,PRODUCTCODE\n1.5,2,S10\n2.5,3,S12\n";
        let df = DataLoader::parse_latin1(csv).unwrap();
        assert_eq!(
            DataLoader::numeric_columns(&df),
            vec!["SALES".to_string(), "QUANTITYORDERED".to_string()]
        );
    }

    #[test]
    fn test_load_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"SALES,PRODUCTCODE\n10,A\n20,B\n").unwrap();

        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_csv(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
