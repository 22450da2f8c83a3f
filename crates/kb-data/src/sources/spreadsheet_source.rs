use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use kb_core::{CellValue, Row};
use tracing::debug;

use super::{normalize_headers, TabularLoader};
use crate::config::LoaderConfig;
use crate::DataError;

/// Loader for spreadsheet binaries (xlsx, xls, xlsb, ods)
///
/// Only the first worksheet is read; its first row holds the headers.
pub struct SpreadsheetLoader {
    config: LoaderConfig,
}

impl SpreadsheetLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Convert one worksheet cell
    fn cell(&self, data: &Data) -> CellValue {
        match data {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) if s.is_empty() => self.config.missing_cell.clone(),
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            // Excel serial day number
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(e.to_string()),
            Data::Empty => self.config.missing_cell.clone(),
            #[allow(unreachable_patterns)]
            other => CellValue::Text(other.to_string()),
        }
    }

    fn header(data: &Data) -> String {
        match data {
            Data::String(s) => s.clone(),
            Data::Empty => String::new(),
            other => other.to_string(),
        }
    }

    fn is_blank(cells: &[Data]) -> bool {
        cells.iter().all(|c| match c {
            Data::Empty => true,
            Data::String(s) => s.is_empty(),
            _ => false,
        })
    }

    /// Build rows from a header row and data rows
    fn rows_from_grid<'a>(&self, mut grid: impl Iterator<Item = &'a [Data]>) -> Vec<Row> {
        let Some(header_cells) = grid.next() else {
            return Vec::new();
        };
        let headers = normalize_headers(header_cells.iter().map(Self::header).collect());

        grid.filter(|cells| !(self.config.skip_blank_rows && Self::is_blank(cells)))
            .map(|cells| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        let value = cells
                            .get(idx)
                            .map(|c| self.cell(c))
                            .unwrap_or_else(|| self.config.missing_cell.clone());
                        (header.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

impl Default for SpreadsheetLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl TabularLoader for SpreadsheetLoader {
    fn load(&self, bytes: &[u8]) -> Result<Vec<Row>, DataError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DataError::EmptyWorkbook)??;

        let rows = self.rows_from_grid(range.rows());
        debug!("Read {} worksheet rows", rows.len());
        Ok(rows)
    }
}
