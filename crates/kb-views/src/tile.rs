//! Pure projection of KPIs into tile descriptions

use kb_core::{compute_kpi, Dataset, Geometry, Kpi, KpiId};

use crate::chart::ChartSpec;

/// Placeholder for an unset type or column in the summary line
const UNSET: &str = "-";

/// What a tile shows; built without touching persistence
#[derive(Debug, Clone, PartialEq)]
pub struct TileDescription {
    pub id: KpiId,
    pub name: String,
    /// `"<type> • <column>"`
    pub summary: String,
    /// Formatted aggregate, or the no-data marker
    pub value: String,
    pub geometry: Geometry,
    pub selected: bool,
    pub chart: Option<ChartSpec>,
}

/// Describe a single tile
pub fn project_tile(kpi: &Kpi, dataset: &Dataset, selection: Option<&KpiId>) -> TileDescription {
    let kind = kpi.kind.as_ref().map(|k| k.as_str()).unwrap_or(UNSET);
    let column = kpi.column.as_deref().unwrap_or(UNSET);

    TileDescription {
        id: kpi.id.clone(),
        name: kpi.name.clone(),
        summary: format!("{} • {}", kind, column),
        value: compute_kpi(dataset, kpi).to_string(),
        geometry: kpi.geometry,
        selected: selection == Some(&kpi.id),
        chart: ChartSpec::build(kpi, dataset),
    }
}

/// Describe every tile, in registry order
pub fn project_dashboard<'a>(
    kpis: impl IntoIterator<Item = &'a Kpi>,
    dataset: &Dataset,
    selection: Option<&KpiId>,
) -> Vec<TileDescription> {
    let tiles: Vec<TileDescription> = kpis
        .into_iter()
        .map(|kpi| project_tile(kpi, dataset, selection))
        .collect();
    tracing::debug!("Projected {} tiles over {} rows", tiles.len(), dataset.row_count());
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::{AggregationKind, CellValue, ChartKind, KpiDraft, Row, NO_DATA};

    fn sales() -> Dataset {
        let rows = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("Sales".to_string(), CellValue::from(v));
                row
            })
            .collect();
        Dataset::new("sales.csv", rows)
    }

    fn kpi(id: &str, kind: Option<AggregationKind>, column: Option<&str>) -> Kpi {
        Kpi::new(
            KpiId::new(id),
            KpiDraft {
                name: format!("KPI {}", id),
                kind,
                column: column.map(str::to_string),
                chart: None,
            },
        )
    }

    #[test]
    fn test_project_tile() {
        let kpi = kpi("1", Some(AggregationKind::Sum), Some("Sales"));
        let tile = project_tile(&kpi, &sales(), None);
        assert_eq!(tile.name, "KPI 1");
        assert_eq!(tile.summary, "sum • Sales");
        assert_eq!(tile.value, "60");
        assert_eq!(tile.geometry, kpi.geometry);
        assert!(!tile.selected);
        assert!(tile.chart.is_none());
    }

    #[test]
    fn test_avg_has_two_decimals() {
        let tile = project_tile(&kpi("1", Some(AggregationKind::Avg), Some("Sales")), &sales(), None);
        assert_eq!(tile.value, "20.00");
    }

    #[test]
    fn test_unset_fields() {
        let tile = project_tile(&kpi("1", None, None), &sales(), None);
        assert_eq!(tile.summary, "- • -");
        assert_eq!(tile.value, NO_DATA);
    }

    #[test]
    fn test_no_dataset_shows_no_data() {
        let empty = Dataset::new("", Vec::new());
        let tile = project_tile(&kpi("1", Some(AggregationKind::Max), Some("Sales")), &empty, None);
        assert_eq!(tile.value, NO_DATA);
    }

    #[test]
    fn test_project_dashboard_marks_selection() {
        let mut charted = kpi("2", Some(AggregationKind::Min), Some("Sales"));
        charted.chart = Some(ChartKind::Line);
        let kpis = vec![kpi("1", Some(AggregationKind::Sum), Some("Sales")), charted];

        let selected = KpiId::new("2");
        let tiles = project_dashboard(&kpis, &sales(), Some(&selected));
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].id, KpiId::new("1"));
        assert!(!tiles[0].selected);
        assert!(tiles[1].selected);
        assert_eq!(tiles[1].value, "10");
        assert_eq!(tiles[1].chart.as_ref().map(|c| c.values.len()), Some(3));
    }
}
