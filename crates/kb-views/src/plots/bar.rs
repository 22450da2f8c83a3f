//! Bar chart

use egui::{Id, Ui};
use egui_plot::{Bar, BarChart};

use crate::chart::ChartSpec;

pub fn show(ui: &mut Ui, id: Id, spec: &ChartSpec) {
    let mut plot = super::static_plot(id, &spec.labels);
    if spec.begin_at_zero {
        plot = plot.include_y(0.0);
    }

    plot.show(ui, |plot_ui| {
        let bars: Vec<Bar> = spec
            .values
            .iter()
            .zip(&spec.labels)
            .enumerate()
            .map(|(i, (value, label))| {
                Bar::new(i as f64, *value)
                    .width(0.7)
                    .name(label)
                    .fill(spec.color(i))
            })
            .collect();

        plot_ui.bar_chart(BarChart::new(bars).color(spec.color(0)).name(&spec.series_name));
    });
}
