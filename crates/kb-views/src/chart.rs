//! Chart data for a tile

use egui::Color32;
use kb_core::{numeric_points, ChartKind, Dataset, Kpi};

use crate::plots::utils::{generate_hues, SERIES_FILL};

/// Everything needed to draw a tile's chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Series label (the KPI name)
    pub series_name: String,
    /// `R<n>` for the source row of each value
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// One color per value for pies, a single fill otherwise
    pub colors: Vec<Color32>,
    pub show_legend: bool,
    pub begin_at_zero: bool,
}

impl ChartSpec {
    /// Chart for a KPI, or `None` when it has no chart kind, no column or
    /// the dataset is empty
    pub fn build(kpi: &Kpi, dataset: &Dataset) -> Option<ChartSpec> {
        let kind = kpi.chart.clone()?;
        let column = kpi.column.as_deref()?;
        if dataset.is_empty() {
            return None;
        }

        let (labels, values): (Vec<String>, Vec<f64>) = numeric_points(dataset, column)
            .into_iter()
            .map(|(row, value)| (format!("R{}", row + 1), value))
            .unzip();

        let is_pie = kind == ChartKind::Pie;
        let colors = if is_pie {
            generate_hues(values.len())
        } else {
            vec![SERIES_FILL]
        };

        Some(ChartSpec {
            begin_at_zero: kind == ChartKind::Bar,
            show_legend: is_pie,
            kind,
            series_name: kpi.name.clone(),
            labels,
            values,
            colors,
        })
    }

    /// Color of the value at `idx`
    pub fn color(&self, idx: usize) -> Color32 {
        self.colors
            .get(idx)
            .or_else(|| self.colors.first())
            .copied()
            .unwrap_or(SERIES_FILL)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
