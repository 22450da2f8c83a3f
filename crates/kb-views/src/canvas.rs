//! Free-form canvas holding the KPI tiles

use egui::{
    vec2, Align, Color32, CursorIcon, Id, Layout, Rect, RichText, Rounding, Sense, Stroke, Ui,
};
use kb_core::{CanvasBounds, KpiId, Manipulation};

use crate::plots::draw_chart;
use crate::tile::TileDescription;

/// Width of the grab strip along each tile edge
const EDGE_GRIP: f32 = 6.0;

const TILE_PADDING: f32 = 6.0;

/// Pointer input on the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A tile was clicked
    Clicked(KpiId),
    /// A tile was dragged or resized this frame
    Manipulated(KpiId, Manipulation),
    /// Empty canvas space was clicked
    BackgroundClicked,
}

/// Tile edge being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    fn strip(self, rect: Rect) -> Rect {
        match self {
            Edge::Left => Rect::from_min_max(rect.min, egui::pos2(rect.left() + EDGE_GRIP, rect.bottom())),
            Edge::Right => Rect::from_min_max(egui::pos2(rect.right() - EDGE_GRIP, rect.top()), rect.max),
            Edge::Top => Rect::from_min_max(rect.min, egui::pos2(rect.right(), rect.top() + EDGE_GRIP)),
            Edge::Bottom => Rect::from_min_max(egui::pos2(rect.left(), rect.bottom() - EDGE_GRIP), rect.max),
        }
    }

    fn cursor(self) -> CursorIcon {
        match self {
            Edge::Left | Edge::Right => CursorIcon::ResizeHorizontal,
            Edge::Top | Edge::Bottom => CursorIcon::ResizeVertical,
        }
    }

    /// Resize produced by dragging this edge by `delta`
    fn resize(self, width: f32, height: f32, delta: egui::Vec2) -> Manipulation {
        match self {
            Edge::Left => Manipulation::Resize {
                left: delta.x,
                top: 0.0,
                width: width - delta.x,
                height,
            },
            Edge::Right => Manipulation::Resize {
                left: 0.0,
                top: 0.0,
                width: width + delta.x,
                height,
            },
            Edge::Top => Manipulation::Resize {
                left: 0.0,
                top: delta.y,
                width,
                height: height - delta.y,
            },
            Edge::Bottom => Manipulation::Resize {
                left: 0.0,
                top: 0.0,
                width,
                height: height + delta.y,
            },
        }
    }

    fn axis_delta(self, delta: egui::Vec2) -> f32 {
        match self {
            Edge::Left | Edge::Right => delta.x,
            Edge::Top | Edge::Bottom => delta.y,
        }
    }
}

/// Draws tiles and translates pointer input into canvas events
pub struct KpiCanvas {
    id: Id,
    background: Color32,
    tile_fill: Color32,
    accent: Color32,
}

impl KpiCanvas {
    pub fn new(id_source: impl std::hash::Hash) -> Self {
        Self {
            id: Id::new(id_source),
            background: Color32::from_gray(24),
            tile_fill: Color32::from_gray(40),
            accent: Color32::from_rgb(62, 205, 209),
        }
    }

    pub fn with_colors(mut self, background: Color32, tile_fill: Color32, accent: Color32) -> Self {
        self.background = background;
        self.tile_fill = tile_fill;
        self.accent = accent;
        self
    }

    /// Draw the canvas filling the available space
    ///
    /// Returns the canvas size (tile positions are relative to its origin)
    /// and the pointer events of this frame.
    pub fn show(&self, ui: &mut Ui, tiles: &[TileDescription]) -> (CanvasBounds, Vec<CanvasEvent>) {
        let (canvas_rect, canvas_response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        ui.painter().rect_filled(canvas_rect, Rounding::ZERO, self.background);

        let mut events = Vec::new();
        let mut tile_rects = Vec::with_capacity(tiles.len());

        for tile in tiles {
            let g = tile.geometry;
            let rect = Rect::from_min_size(canvas_rect.min + vec2(g.x, g.y), vec2(g.width, g.height));
            tile_rects.push(rect);
            self.tile_ui(ui, rect, tile, &mut events);
        }

        let over_tile = ui
            .input(|i| i.pointer.interact_pos())
            .map_or(false, |pos| tile_rects.iter().any(|r| r.contains(pos)));
        if canvas_response.hovered() && !over_tile && ui.input(|i| i.pointer.primary_clicked()) {
            events.push(CanvasEvent::BackgroundClicked);
        }

        (CanvasBounds::new(canvas_rect.width(), canvas_rect.height()), events)
    }

    fn tile_ui(&self, ui: &mut Ui, rect: Rect, tile: &TileDescription, events: &mut Vec<CanvasEvent>) {
        let tile_id = self.id.with(tile.id.as_str());

        // Edges claim the pointer before the body so they win on overlap
        for edge in Edge::ALL {
            let response = ui
                .interact(edge.strip(rect), tile_id.with(("edge", edge as u8)), Sense::drag())
                .on_hover_cursor(edge.cursor());
            if response.dragged() {
                let delta = response.drag_delta();
                if edge.axis_delta(delta) != 0.0 {
                    events.push(CanvasEvent::Manipulated(
                        tile.id.clone(),
                        edge.resize(rect.width(), rect.height(), delta),
                    ));
                }
            }
        }

        let body = ui.interact(rect.shrink(EDGE_GRIP), tile_id.with("body"), Sense::click_and_drag());
        if body.clicked() {
            events.push(CanvasEvent::Clicked(tile.id.clone()));
        }
        if body.dragged() {
            let delta = body.drag_delta();
            if delta != egui::Vec2::ZERO {
                events.push(CanvasEvent::Manipulated(
                    tile.id.clone(),
                    Manipulation::Drag {
                        dx: delta.x,
                        dy: delta.y,
                    },
                ));
            }
        }
        if body.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }

        let stroke = if tile.selected {
            Stroke::new(2.0, self.accent)
        } else {
            Stroke::new(1.0, Color32::from_gray(70))
        };
        let painter = ui.painter();
        painter.rect_filled(rect, Rounding::same(4.0), self.tile_fill);
        painter.rect_stroke(rect, Rounding::same(4.0), stroke);

        let mut content = ui.child_ui(rect.shrink(TILE_PADDING), Layout::top_down(Align::Min));
        content.set_clip_rect(rect.intersect(ui.clip_rect()));
        content.label(RichText::new(&tile.name).strong());
        content.label(RichText::new(&tile.summary).small().weak());
        content.label(RichText::new(&tile.value).size(18.0).color(self.accent));

        if let Some(chart) = &tile.chart {
            if content.available_height() > 16.0 {
                draw_chart(&mut content, tile_id.with("chart"), chart);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_edge_resize_moves_left_edge() {
        let m = Edge::Left.resize(150.0, 100.0, vec2(-20.0, 5.0));
        assert_eq!(
            m,
            Manipulation::Resize {
                left: -20.0,
                top: 0.0,
                width: 170.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn test_bottom_edge_resize_keeps_origin() {
        let m = Edge::Bottom.resize(150.0, 100.0, vec2(3.0, 25.0));
        assert_eq!(
            m,
            Manipulation::Resize {
                left: 0.0,
                top: 0.0,
                width: 150.0,
                height: 125.0
            }
        );
    }

    #[test]
    fn test_edge_strips_sit_inside_tile() {
        let rect = Rect::from_min_size(egui::pos2(10.0, 10.0), vec2(150.0, 100.0));
        for edge in Edge::ALL {
            let strip = edge.strip(rect);
            assert!(rect.contains_rect(strip));
        }
        assert_eq!(Edge::Top.strip(rect).height(), EDGE_GRIP);
        assert_eq!(Edge::Right.strip(rect).left(), 160.0 - EDGE_GRIP);
    }
}
