use csv::{ByteRecord, ReaderBuilder};
use kb_core::{CellValue, Row};
use tracing::debug;

use super::{normalize_headers, TabularLoader};
use crate::config::LoaderConfig;
use crate::DataError;

/// Loader for delimited text
///
/// Cells are kept as raw text; numbers are recognised later by the
/// aggregation engine.
pub struct CsvLoader {
    config: LoaderConfig,
}

impl CsvLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    fn cell(&self, raw: Option<&[u8]>) -> CellValue {
        match raw {
            Some(bytes) if !bytes.is_empty() => {
                CellValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            _ => self.config.missing_cell.clone(),
        }
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl TabularLoader for CsvLoader {
    fn load(&self, bytes: &[u8]) -> Result<Vec<Row>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.config.delimiter_byte())
            .from_reader(bytes);

        let headers = normalize_headers(
            reader
                .byte_headers()?
                .iter()
                .enumerate()
                .map(|(idx, h)| {
                    let text = String::from_utf8_lossy(h).into_owned();
                    if idx == 0 {
                        text.trim_start_matches('\u{feff}').to_string()
                    } else {
                        text
                    }
                })
                .collect(),
        );

        let mut rows = Vec::new();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            if self.config.skip_blank_rows && record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(idx, header)| (header.clone(), self.cell(record.get(idx))))
                .collect();
            rows.push(row);
        }

        debug!("Read {} CSV rows with {} columns", rows.len(), headers.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Vec<Row> {
        CsvLoader::default().load(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_cells_are_raw_text() {
        let rows = load("Region,Sales\nNorth,10\nSouth,20.5\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Region"], CellValue::Text("North".to_string()));
        assert_eq!(rows[1]["Sales"], CellValue::Text("20.5".to_string()));
    }

    #[test]
    fn test_empty_and_missing_cells_default_to_zero() {
        let rows = load("A,B,C\n1,,3\n4\n");
        assert_eq!(rows[0]["B"], CellValue::Number(0.0));
        assert_eq!(rows[1]["B"], CellValue::Number(0.0));
        assert_eq!(rows[1]["C"], CellValue::Number(0.0));
    }

    #[test]
    fn test_custom_missing_cell() {
        let loader = CsvLoader::new(LoaderConfig {
            missing_cell: CellValue::Text(String::new()),
            ..LoaderConfig::default()
        });
        let rows = loader.load(b"A,B\n1,\n").unwrap();
        assert_eq!(rows[0]["B"], CellValue::Text(String::new()));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let rows = load("A,B\n1,2\n,\n3,4\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        assert!(load("A,B\n").is_empty());
    }

    #[test]
    fn test_column_order_and_duplicates() {
        let rows = load("\u{feff}Sales,,Sales\n1,2,3\n");
        let keys: Vec<_> = rows[0].keys().cloned().collect();
        assert_eq!(keys, vec!["Sales", "__EMPTY", "Sales_1"]);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let loader = CsvLoader::new(LoaderConfig {
            csv_delimiter: ';',
            ..LoaderConfig::default()
        });
        let rows = loader.load(b"A;B\n1;2\n").unwrap();
        assert_eq!(rows[0]["B"], CellValue::Text("2".to_string()));
    }
}
