pub mod csv_source;
pub mod spreadsheet_source;

pub use csv_source::CsvLoader;
pub use spreadsheet_source::SpreadsheetLoader;

use std::collections::HashSet;

use kb_core::Row;

use crate::DataError;

/// Header used for a blank header cell
pub const EMPTY_HEADER: &str = "__EMPTY";

/// Parses raw file contents into rows
pub trait TabularLoader {
    /// Rows of the first sheet/table, keyed by header name
    fn load(&self, bytes: &[u8]) -> Result<Vec<Row>, DataError>;
}

/// Blank headers become `__EMPTY`; repeats get `_1`, `_2`, ... suffixes
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|header| {
            let base = if header.trim().is_empty() {
                EMPTY_HEADER.to_string()
            } else {
                header
            };

            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_headers() {
        let headers = normalize_headers(
            ["A", "", "A", " ", "A", "B"].iter().map(|s| s.to_string()).collect(),
        );
        assert_eq!(headers, vec!["A", "__EMPTY", "A_1", "__EMPTY_1", "A_2", "B"]);
    }
}
