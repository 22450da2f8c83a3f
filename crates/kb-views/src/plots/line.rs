//! Line chart

use egui::{Id, Ui};
use egui_plot::{Line, PlotPoints, Points};

use crate::chart::ChartSpec;

pub fn show(ui: &mut Ui, id: Id, spec: &ChartSpec) {
    let points: Vec<[f64; 2]> = spec
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| [i as f64, *v])
        .collect();
    let color = spec.color(0);

    super::static_plot(id, &spec.labels).show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::new(points.clone()))
                .color(color)
                .width(2.0)
                .name(&spec.series_name),
        );
        plot_ui.points(Points::new(points).color(color).radius(2.5));
    });
}
