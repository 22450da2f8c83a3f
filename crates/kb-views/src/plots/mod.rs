//! Chart drawing for tiles

pub mod bar;
pub mod line;
pub mod pie;
pub mod utils;

use egui::{Id, Ui};
use kb_core::ChartKind;

use crate::chart::ChartSpec;

/// Draw a tile chart into the remaining space of `ui`
pub fn draw_chart(ui: &mut Ui, id: Id, spec: &ChartSpec) {
    match spec.kind {
        ChartKind::Bar => bar::show(ui, id, spec),
        ChartKind::Pie => pie::show(ui, spec),
        ChartKind::Line | ChartKind::Other(_) => line::show(ui, id, spec),
    }
}

/// Plot with navigation turned off so pointer input reaches the tile.
/// X-axis ticks at value positions show the row labels.
pub(crate) fn static_plot(id: Id, labels: &[String]) -> egui_plot::Plot {
    let labels = labels.to_vec();
    egui_plot::Plot::new(id)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid(false)
        .x_axis_formatter(move |value, _max_chars, _range| axis_label(&labels, value))
}

/// Label for an x-axis tick; ticks between values stay blank
pub(crate) fn axis_label(labels: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}
