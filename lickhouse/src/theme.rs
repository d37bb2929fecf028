//! LickHouse theme — light gray surfaces, matte blue accents

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Application palette.
pub struct LickColors;

impl LickColors {
    pub const WINDOW: Color32 = Color32::from_rgb(0xEC, 0xEC, 0xEC);
    pub const SURFACE: Color32 = Color32::from_rgb(0xF5, 0xF5, 0xF5);
    pub const WHITE: Color32 = Color32::from_rgb(0xFF, 0xFF, 0xFF);
    pub const TEXT: Color32 = Color32::from_rgb(0x2C, 0x3E, 0x50);
    pub const FAINT_TEXT: Color32 = Color32::from_rgb(0x7F, 0x8C, 0x8D);
    pub const BORDER: Color32 = Color32::from_rgb(0xBD, 0xC3, 0xC7);
    pub const STRING: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
    pub const FRET: Color32 = Color32::from_rgb(0x77, 0x77, 0x77);
    pub const NUT: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
    pub const NOTE: Color32 = Color32::from_rgb(0x34, 0x98, 0xDB);
    pub const TECHNIQUE: Color32 = Color32::from_rgb(0xE7, 0x4C, 0x3C);
    pub const ACCENT_GREEN: Color32 = Color32::from_rgb(0x27, 0xAE, 0x60);
}

/// Theme configuration for the LickHouse window.
pub struct LickTheme {
    pub font_size_body: f32,
    pub font_size_heading: f32,
    pub font_size_small: f32,
    pub item_spacing: f32,
}

impl Default for LickTheme {
    fn default() -> Self {
        Self {
            font_size_body: 14.0,
            font_size_heading: 20.0,
            font_size_small: 11.0,
            item_spacing: 6.0,
        }
    }
}

impl LickTheme {
    /// Apply the LickHouse theme to an egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = Style::default();

        style.text_styles = [
            (TextStyle::Small, FontId::new(self.font_size_small, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(self.font_size_heading, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(self.font_size_body, FontFamily::Monospace)),
        ]
        .into();

        let mut visuals = Visuals::light();

        visuals.window_fill = LickColors::WINDOW;
        visuals.panel_fill = LickColors::WINDOW;
        visuals.faint_bg_color = LickColors::SURFACE;
        visuals.extreme_bg_color = LickColors::WHITE;

        visuals.window_rounding = Rounding::same(4.0);
        visuals.menu_rounding = Rounding::same(4.0);
        visuals.window_stroke = Stroke::new(1.0, LickColors::BORDER);

        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, LickColors::TEXT);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, LickColors::TEXT);
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, LickColors::BORDER);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, LickColors::TEXT);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, LickColors::TEXT);

        visuals.selection.bg_fill = LickColors::NOTE;
        visuals.selection.stroke = Stroke::new(1.0, LickColors::WHITE);

        visuals.hyperlink_color = LickColors::NOTE;

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(self.item_spacing, self.item_spacing);
        style.spacing.button_padding = egui::vec2(10.0, 5.0);

        ctx.set_style(style);
    }
}
