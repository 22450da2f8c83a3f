//! Sidebar form for creating and editing KPIs

use egui::{ComboBox, RichText, TextEdit, Ui};
use kb_core::{AggregationKind, ChartKind, FormState};

/// Placeholder shown when no value is picked
pub const NONE_LABEL: &str = "-";

/// Placeholder shown when no column is picked
pub const COLUMN_PLACEHOLDER: &str = "Select a column";

/// Button pressed in the sidebar this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Save,
    Delete,
}

/// Column choices: dataset columns plus the form's current column when the
/// dataset does not have it, so a stored value stays visible
pub fn column_choices(columns: &[String], current: Option<&str>) -> Vec<String> {
    let mut choices = columns.to_vec();
    if let Some(current) = current {
        if !choices.iter().any(|c| c == current) {
            choices.push(current.to_string());
        }
    }
    choices
}

fn kind_label(kind: Option<&AggregationKind>) -> &str {
    kind.map(|k| k.as_str()).unwrap_or(NONE_LABEL)
}

fn chart_label(chart: Option<&ChartKind>) -> &str {
    chart.map(|c| c.as_str()).unwrap_or(NONE_LABEL)
}

/// Draw the KPI form
pub fn sidebar_form(
    ui: &mut Ui,
    title: &str,
    form: &mut FormState,
    columns: &[String],
    delete_visible: bool,
) -> Option<SidebarAction> {
    let mut action = None;

    ui.heading(title);
    ui.add_space(8.0);

    ui.label("Name");
    ui.add(TextEdit::singleline(&mut form.name).hint_text("KPI name"));
    ui.add_space(4.0);

    ui.label("Type");
    ComboBox::from_id_source("kpi_type")
        .selected_text(kind_label(form.kind.as_ref()).to_string())
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut form.kind, None, NONE_LABEL);
            for kind in AggregationKind::ALL {
                let label = kind.as_str().to_string();
                ui.selectable_value(&mut form.kind, Some(kind), label);
            }
        });
    ui.add_space(4.0);

    ui.label("Column");
    let choices = column_choices(columns, form.column.as_deref());
    ComboBox::from_id_source("kpi_column")
        .selected_text(form.column.clone().unwrap_or_else(|| COLUMN_PLACEHOLDER.to_string()))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut form.column, None, COLUMN_PLACEHOLDER);
            for column in choices {
                let label = column.clone();
                ui.selectable_value(&mut form.column, Some(column), label);
            }
        });
    if columns.is_empty() {
        ui.label(RichText::new("Load a file to list columns").small().weak());
    }
    ui.add_space(4.0);

    ui.label("Chart");
    ComboBox::from_id_source("kpi_chart")
        .selected_text(chart_label(form.chart.as_ref()).to_string())
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut form.chart, None, NONE_LABEL);
            for chart in ChartKind::ALL {
                let label = chart.as_str().to_string();
                ui.selectable_value(&mut form.chart, Some(chart), label);
            }
        });
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            action = Some(SidebarAction::Save);
        }
        if delete_visible && ui.button("Delete").clicked() {
            action = Some(SidebarAction::Delete);
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_choices_keep_stored_column() {
        let columns = vec!["Sales".to_string(), "Cost".to_string()];
        assert_eq!(column_choices(&columns, Some("Cost")), columns);
        assert_eq!(
            column_choices(&columns, Some("Margin")),
            vec!["Sales".to_string(), "Cost".to_string(), "Margin".to_string()]
        );
        assert_eq!(column_choices(&[], None), Vec::<String>::new());
    }

    #[test]
    fn test_labels() {
        assert_eq!(kind_label(None), NONE_LABEL);
        assert_eq!(kind_label(Some(&AggregationKind::Avg)), "avg");
        assert_eq!(chart_label(Some(&ChartKind::Other("radar".into()))), "radar");
    }
}
