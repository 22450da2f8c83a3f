//! Loader configuration

use serde::{Deserialize, Serialize};

use kb_core::CellValue;

/// How an uploaded file is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    /// Comma (or other delimiter) separated text
    DelimitedText,
    /// xlsx, xls, xlsb or ods
    Spreadsheet,
}

impl FileKind {
    /// `.csv` names are delimited text; everything else is a spreadsheet
    pub fn from_file_name(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".csv") {
            FileKind::DelimitedText
        } else {
            FileKind::Spreadsheet
        }
    }
}

/// Options shared by all loaders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Value used for empty or missing cells
    pub missing_cell: CellValue,

    /// Field delimiter for delimited text
    pub csv_delimiter: char,

    /// Drop data rows whose cells are all empty
    pub skip_blank_rows: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            missing_cell: CellValue::Number(0.0),
            csv_delimiter: ',',
            skip_blank_rows: true,
        }
    }
}

impl LoaderConfig {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> u8 {
        if self.csv_delimiter.is_ascii() {
            self.csv_delimiter as u8
        } else {
            b','
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_name() {
        assert_eq!(FileKind::from_file_name("data.csv"), FileKind::DelimitedText);
        assert_eq!(FileKind::from_file_name("DATA.Csv"), FileKind::DelimitedText);
        assert_eq!(FileKind::from_file_name("data.xlsx"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_file_name("data.csv.ods"), FileKind::Spreadsheet);
        assert_eq!(FileKind::from_file_name("csv"), FileKind::Spreadsheet);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LoaderConfig = serde_json::from_str(r#"{"csv_delimiter":";"}"#).unwrap();
        assert_eq!(config.csv_delimiter, ';');
        assert_eq!(config.missing_cell, CellValue::Number(0.0));
        assert!(config.skip_blank_rows);
        assert_eq!(config.delimiter_byte(), b';');
    }
}
