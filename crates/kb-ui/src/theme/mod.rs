//! Board theme: a small palette shared by the canvas, tiles and form

use egui::{Color32, Context, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub dark_mode: bool,
    /// Tile highlight and chart accent as `#rrggbb`; invalid values fall
    /// back to the default accent
    pub accent: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark_mode: true,
            accent: "#3ecdd1".to_string(),
        }
    }
}

impl Theme {
    pub fn palette(&self) -> Palette {
        let base = if self.dark_mode {
            Palette::dark()
        } else {
            Palette::light()
        };
        match parse_hex_color(&self.accent) {
            Some(accent) => Palette { accent, ..base },
            None => {
                tracing::warn!("Ignoring invalid accent color {:?}", self.accent);
                base
            }
        }
    }
}

/// Colors used across the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub canvas: Color32,
    pub panel: Color32,
    pub tile: Color32,
    pub accent: Color32,
    pub error: Color32,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            canvas: Color32::from_rgb(23, 23, 23),
            panel: Color32::from_rgb(31, 31, 31),
            tile: Color32::from_rgb(40, 40, 40),
            accent: Color32::from_rgb(0x3e, 0xcd, 0xd1),
            error: Color32::from_rgb(230, 80, 80),
        }
    }

    pub fn light() -> Self {
        Self {
            canvas: Color32::from_rgb(244, 245, 247),
            panel: Color32::from_rgb(232, 234, 237),
            tile: Color32::WHITE,
            accent: Color32::from_rgb(0x3e, 0xcd, 0xd1),
            error: Color32::from_rgb(200, 40, 40),
        }
    }
}

/// `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Apply the board theme to the egui context
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let palette = theme.palette();
    let mut visuals = if theme.dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    visuals.panel_fill = palette.panel;
    visuals.window_fill = palette.panel;
    visuals.extreme_bg_color = palette.canvas;
    visuals.error_fg_color = palette.error;
    visuals.hyperlink_color = palette.accent;
    visuals.selection.bg_fill = palette.accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, palette.accent);
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, palette.accent);
    ctx.set_visuals(visuals);

    // Roomier form rows
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.combo_width = 200.0;
    ctx.set_style(style);
}
