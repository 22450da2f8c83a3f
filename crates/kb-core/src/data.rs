//! In-memory dataset and the tabular store that holds it

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Number(0.0)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

/// One row: column name to value, in file column order
pub type Row = IndexMap<String, CellValue>;

/// A loaded table
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    source_name: String,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(source_name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            source_name: source_name.into(),
            rows,
        }
    }

    /// Name of the file the rows came from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names taken from the first row
    pub fn columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Holder of the currently loaded dataset
///
/// The dataset is replaced wholesale; readers always see either the old or
/// the new one.
#[derive(Clone)]
pub struct TabularStore {
    current: Arc<RwLock<Arc<Dataset>>>,
    generation: Arc<AtomicU64>,
}

impl TabularStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(Dataset::default()))),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Swap in a new dataset
    pub fn replace(&self, dataset: Dataset) {
        *self.current.write() = Arc::new(dataset);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// The current dataset (empty before the first load)
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.current.read().clone()
    }

    pub fn columns(&self) -> Vec<String> {
        self.current.read().columns()
    }

    /// Bumped on every replace
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Default for TabularStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_columns_follow_first_row_order() {
        let dataset = Dataset::new(
            "sales.csv",
            vec![row(&[
                ("Region", "North".into()),
                ("Sales", 10.0.into()),
                ("Units", 3.0.into()),
            ])],
        );
        assert_eq!(dataset.columns(), vec!["Region", "Sales", "Units"]);
    }

    #[test]
    fn test_empty_dataset_has_no_columns() {
        assert!(Dataset::default().columns().is_empty());
        assert!(TabularStore::new().columns().is_empty());
    }

    #[test]
    fn test_replace_swaps_whole_dataset() {
        let store = TabularStore::new();
        let before = store.snapshot();

        store.replace(Dataset::new("a.csv", vec![row(&[("A", 1.0.into())])]));
        store.replace(Dataset::new("b.csv", vec![row(&[("B", 2.0.into())]), row(&[("B", 3.0.into())])]));

        assert_eq!(store.generation(), 2);
        assert_eq!(store.snapshot().source_name(), "b.csv");
        assert_eq!(store.snapshot().row_count(), 2);
        assert_eq!(store.columns(), vec!["B"]);
        // Earlier snapshots stay intact
        assert!(before.is_empty());
    }
}
