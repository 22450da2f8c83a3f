//! Tabular loading for the KPI board
//!
//! Turns an uploaded file (delimited text or a spreadsheet binary) into the
//! ordered rows held by the tabular store.

pub mod config;
pub mod sources;

use std::path::Path;

use kb_core::Dataset;
use thiserror::Error;
use tracing::info;

// Re-exports
pub use config::{FileKind, LoaderConfig};
pub use sources::{CsvLoader, SpreadsheetLoader, TabularLoader};

/// Errors that can occur while loading a file
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<calamine::Error> for DataError {
    fn from(error: calamine::Error) -> Self {
        DataError::Spreadsheet(error.to_string())
    }
}

/// Parse file contents, choosing the parser from the file name
pub fn load_file(file_name: &str, bytes: &[u8], config: &LoaderConfig) -> Result<Dataset, DataError> {
    let kind = FileKind::from_file_name(file_name);
    let rows = match kind {
        FileKind::DelimitedText => CsvLoader::new(config.clone()).load(bytes)?,
        FileKind::Spreadsheet => SpreadsheetLoader::new(config.clone()).load(bytes)?,
    };

    info!("Parsed {} as {:?}: {} rows", file_name, kind, rows.len());
    Ok(Dataset::new(file_name, rows))
}

/// Read a file from disk and parse it
pub fn read_file(path: &Path, config: &LoaderConfig) -> Result<Dataset, DataError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    load_file(file_name, &bytes, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::CellValue;

    #[test]
    fn test_load_file_dispatches_csv() {
        let dataset = load_file("sales.CSV", b"Sales\n10\n20\n30\n", &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.source_name(), "sales.CSV");
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.rows()[2]["Sales"], CellValue::Text("30".to_string()));
    }

    #[test]
    fn test_non_csv_goes_to_spreadsheet_parser() {
        let err = load_file("sales.xlsx", b"Sales\n10\n", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Spreadsheet(_)));
    }

    #[test]
    fn test_read_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.csv");
        std::fs::write(&path, "Units,Price\n3,1.5\n4,2.5\n").unwrap();

        let dataset = read_file(&path, &LoaderConfig::default()).unwrap();
        assert_eq!(dataset.source_name(), "units.csv");
        assert_eq!(dataset.columns(), vec!["Units", "Price"]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file(Path::new("/definitely/not/here.csv"), &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
