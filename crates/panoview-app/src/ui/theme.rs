//! Dark/light theme: egui visuals plus the color and layout tokens the
//! panels share.

use egui::{Color32, CornerRadius, Stroke, Visuals};
use serde::{Deserialize, Serialize};

// Layout
pub const PANEL_ROUNDING: u8 = 6;
pub const WIDGET_ROUNDING: u8 = 4;
pub const CARD_ROUNDING: u8 = 8;
pub const SPACING: f32 = 8.0;
pub const SEEK_SLIDER_WIDTH: f32 = 200.0;
pub const THUMBNAIL_SIZE: egui::Vec2 = egui::Vec2::new(240.0, 135.0);

// Typography
pub const BODY_SIZE: f32 = 14.0;
pub const HEADING_SIZE: f32 = 20.0;
pub const SMALL_SIZE: f32 = 12.0;

/// Runtime color set used by both panels.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub canvas: Color32,
    pub panel: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub widget_bg: Color32,
    pub card_bg: Color32,
    pub card_border: Color32,
    pub separator: Color32,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            canvas: Color32::from_rgb(0x12, 0x12, 0x12),
            panel: Color32::from_rgba_premultiplied(0x22, 0x22, 0x22, 0xE6),
            text_primary: Color32::from_rgb(0xE8, 0xE8, 0xE8),
            text_secondary: Color32::from_rgb(0xA0, 0xA0, 0xA0),
            accent: Color32::from_rgb(0x4D, 0xA8, 0xDA),
            error: Color32::from_rgb(0xE0, 0x60, 0x60),
            widget_bg: Color32::from_rgb(0x2A, 0x2A, 0x2A),
            card_bg: Color32::from_rgb(0x24, 0x24, 0x24),
            card_border: Color32::from_rgb(0x33, 0x33, 0x33),
            separator: Color32::from_rgb(0x3A, 0x3A, 0x3A),
        }
    }

    pub fn light() -> Self {
        Self {
            canvas: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            panel: Color32::from_rgb(0xFF, 0xFF, 0xFF),
            text_primary: Color32::from_rgb(0x1A, 0x1A, 0x1A),
            text_secondary: Color32::from_rgb(0x5A, 0x5A, 0x5A),
            accent: Color32::from_rgb(0x09, 0x69, 0xA8),
            error: Color32::from_rgb(0xC0, 0x30, 0x30),
            widget_bg: Color32::from_rgb(0xE8, 0xE8, 0xE8),
            card_bg: Color32::from_rgb(0xF0, 0xF0, 0xF0),
            card_border: Color32::from_rgb(0xD5, 0xD5, 0xD5),
            separator: Color32::from_rgb(0xD5, 0xD5, 0xD5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn display_name(self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            ThemeMode::Dark => ThemeColors::dark(),
            ThemeMode::Light => ThemeColors::light(),
        }
    }

    pub fn visuals(self) -> Visuals {
        let tc = self.colors();
        let mut v = match self {
            ThemeMode::Dark => Visuals::dark(),
            ThemeMode::Light => Visuals::light(),
        };

        v.panel_fill = tc.panel;
        v.window_fill = tc.panel;
        v.extreme_bg_color = tc.canvas;

        v.override_text_color = Some(tc.text_primary);
        v.selection.bg_fill = tc.accent.gamma_multiply(0.4);
        v.selection.stroke = Stroke::new(1.0, tc.accent);

        v.widgets.noninteractive.bg_fill = tc.panel;
        v.widgets.noninteractive.fg_stroke = Stroke::new(1.0, tc.text_secondary);
        v.widgets.noninteractive.corner_radius = CornerRadius::same(WIDGET_ROUNDING);
        v.widgets.noninteractive.bg_stroke = Stroke::new(0.5, tc.separator);

        v.widgets.inactive.bg_fill = tc.widget_bg;
        v.widgets.inactive.fg_stroke = Stroke::new(1.0, tc.text_primary);
        v.widgets.inactive.corner_radius = CornerRadius::same(WIDGET_ROUNDING);
        v.widgets.inactive.bg_stroke = Stroke::new(0.5, tc.separator);

        v.widgets.hovered.bg_fill = tc.widget_bg;
        v.widgets.hovered.fg_stroke = Stroke::new(1.0, tc.text_primary);
        v.widgets.hovered.corner_radius = CornerRadius::same(WIDGET_ROUNDING);
        v.widgets.hovered.bg_stroke = Stroke::new(1.0, tc.accent);

        v.widgets.active.bg_fill = tc.widget_bg;
        v.widgets.active.fg_stroke = Stroke::new(1.0, tc.text_primary);
        v.widgets.active.corner_radius = CornerRadius::same(WIDGET_ROUNDING);
        v.widgets.active.bg_stroke = Stroke::new(1.0, tc.accent);

        v.window_corner_radius = CornerRadius::same(PANEL_ROUNDING);
        v.window_stroke = Stroke::new(1.0, tc.separator);

        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_the_two_modes() {
        assert_eq!(ThemeMode::Dark.toggle(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&ThemeMode::Light).unwrap();
        let back: ThemeMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ThemeMode::Light);
    }
}
