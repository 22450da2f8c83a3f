//! Color utilities for tile charts

use egui::Color32;

/// Fill used for single-series charts (#3ecdd1)
pub const SERIES_FILL: Color32 = Color32::from_rgb(0x3e, 0xcd, 0xd1);

/// One hue per value, evenly spaced around the color wheel
/// (`hsl(i * 360 / n, 70%, 50%)`)
pub fn generate_hues(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_color(i as f32 * 360.0 / n as f32, 0.7, 0.5))
        .collect()
}

/// Convert HSL (hue in degrees, saturation and lightness in 0..=1)
pub fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsl_color(0.0, 1.0, 0.5), Color32::from_rgb(255, 0, 0));
        assert_eq!(hsl_color(120.0, 1.0, 0.5), Color32::from_rgb(0, 255, 0));
        assert_eq!(hsl_color(240.0, 1.0, 0.5), Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn test_generated_hues_are_distinct() {
        let hues = generate_hues(3);
        assert_eq!(hues.len(), 3);
        // 70% saturation, 50% lightness red
        assert_eq!(hues[0], Color32::from_rgb(217, 38, 38));
        assert_ne!(hues[0], hues[1]);
        assert_ne!(hues[1], hues[2]);
    }

    #[test]
    fn test_no_values_no_hues() {
        assert!(generate_hues(0).is_empty());
    }
}
