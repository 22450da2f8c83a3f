//! Pie chart drawn with the painter

use std::f32::consts::TAU;

use egui::{pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui};

use crate::chart::ChartSpec;

/// Arc segments per full turn
const SEGMENTS: usize = 64;

const LEGEND_ROW_HEIGHT: f32 = 12.0;

pub fn show(ui: &mut Ui, spec: &ChartSpec) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    if rect.width() < 4.0 || rect.height() < 4.0 {
        return;
    }

    let (pie_rect, legend_rect) = if spec.show_legend && rect.width() > rect.height() * 1.6 {
        let split = rect.left() + rect.height().min(rect.width() * 0.5);
        (
            Rect::from_min_max(rect.min, pos2(split, rect.bottom())),
            Some(Rect::from_min_max(pos2(split + 4.0, rect.top()), rect.max)),
        )
    } else {
        (rect, None)
    };

    let painter = ui.painter_at(rect);
    let center = pie_rect.center();
    let radius = pie_rect.width().min(pie_rect.height()) * 0.5 - 1.0;

    let angles = slice_angles(&spec.values);
    if angles.is_empty() {
        painter.circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(120)));
    }

    for (idx, (start, sweep)) in angles.iter().enumerate() {
        let steps = ((sweep / TAU) * SEGMENTS as f32).ceil().max(1.0) as usize;
        let color = spec.color(idx);
        // Fan of thin triangles keeps every piece convex
        for step in 0..steps {
            let a0 = start + sweep * step as f32 / steps as f32;
            let a1 = start + sweep * (step + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, arc_point(center, radius, a0), arc_point(center, radius, a1)],
                color,
                Stroke::NONE,
            ));
        }
    }

    if let Some(legend) = legend_rect {
        let font = FontId::proportional(9.0);
        for (idx, label) in spec.labels.iter().enumerate() {
            let y = legend.top() + idx as f32 * LEGEND_ROW_HEIGHT;
            if y + LEGEND_ROW_HEIGHT > legend.bottom() {
                break;
            }
            let swatch = Rect::from_min_size(pos2(legend.left(), y + 2.0), vec2(8.0, 8.0));
            painter.rect_filled(swatch, 1.0, spec.color(idx));
            painter.text(
                pos2(swatch.right() + 4.0, swatch.center().y),
                Align2::LEFT_CENTER,
                label,
                font.clone(),
                ui.visuals().text_color(),
            );
        }
    }
}

fn arc_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    // Start at twelve o'clock and run clockwise
    center + radius * vec2(angle.sin(), -angle.cos())
}

/// `(start, sweep)` of each slice in radians; non-positive values get no area
pub(crate) fn slice_angles(values: &[f64]) -> Vec<(f32, f32)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0_f32;
    values
        .iter()
        .map(|v| {
            let sweep = (v.max(0.0) / total) as f32 * TAU;
            let slice = (start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_cover_full_turn() {
        let angles = slice_angles(&[1.0, 1.0, 2.0]);
        assert_eq!(angles.len(), 3);
        assert!((angles[2].1 - TAU / 2.0).abs() < 1e-5);
        let (start, sweep) = angles[2];
        assert!((start + sweep - TAU).abs() < 1e-5);
    }

    #[test]
    fn test_negative_values_have_no_area() {
        let angles = slice_angles(&[-5.0, 5.0]);
        assert_eq!(angles[0].1, 0.0);
        assert!((angles[1].1 - TAU).abs() < 1e-5);
    }

    #[test]
    fn test_nothing_to_draw() {
        assert!(slice_angles(&[]).is_empty());
        assert!(slice_angles(&[0.0, -1.0]).is_empty());
    }
}
