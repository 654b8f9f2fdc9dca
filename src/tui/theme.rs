use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Level, UiConfig, is_done_status};
use crate::ops::sort::priority_rank;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-label colors
    pub label_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut label_colors = HashMap::new();
        label_colors.insert("bug".into(), Color::Rgb(0xFF, 0x44, 0x44));
        label_colors.insert("feature".into(), Color::Rgb(0x44, 0xFF, 0x88));
        label_colors.insert("enhancement".into(), Color::Rgb(0x44, 0xDD, 0xFF));
        label_colors.insert("docs".into(), Color::Rgb(0x44, 0x88, 0xFF));
        label_colors.insert("documentation".into(), Color::Rgb(0x44, 0x88, 0xFF));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            purple: Color::Rgb(0xCC, 0x66, 0xFF),
            blue: Color::Rgb(0x44, 0x88, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            label_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config table, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "highlight" => &mut theme.highlight,
                "dim" => &mut theme.dim,
                "red" => &mut theme.red,
                "yellow" => &mut theme.yellow,
                "green" => &mut theme.green,
                "cyan" => &mut theme.cyan,
                "purple" => &mut theme.purple,
                "blue" => &mut theme.blue,
                "selection_bg" => &mut theme.selection_bg,
                "selection_border" => &mut theme.selection_border,
                "search_match_bg" => &mut theme.search_match_bg,
                "search_match_fg" => &mut theme.search_match_fg,
                _ => continue,
            };
            *slot = color;
        }

        for (label, value) in &ui.label_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.label_colors.insert(label.to_lowercase(), color);
            }
        }

        theme
    }

    /// Color for a label, falling back to the cyan accent
    pub fn label_color(&self, label: &str) -> Color {
        self.label_colors
            .get(&label.to_lowercase())
            .copied()
            .unwrap_or(self.cyan)
    }

    pub fn status_color(&self, status: &str) -> Color {
        if is_done_status(status) {
            return self.green;
        }
        match status.trim().to_lowercase().as_str() {
            "in progress" | "doing" => self.highlight,
            "review" | "in review" => self.purple,
            "blocked" => self.red,
            _ => self.text,
        }
    }

    pub fn priority_color(&self, priority: &str) -> Color {
        match priority_rank(priority) {
            3 => self.red,
            2 => self.yellow,
            1 => self.blue,
            _ => self.dim,
        }
    }

    pub fn level_color(&self, level: Level) -> Color {
        match level {
            Level::Info => self.cyan,
            Level::Warning => self.yellow,
            Level::Error => self.red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("nonsense".into(), "#123456".into());
        ui.label_colors.insert("Urgent".into(), "#112233".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.label_color("urgent"), Color::Rgb(0x11, 0x22, 0x33));
        // Unchanged defaults still present
        assert_eq!(theme.text, Color::Rgb(0xB0, 0xAA, 0xFF));
    }

    #[test]
    fn test_label_color_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.label_color("BUG"), Color::Rgb(0xFF, 0x44, 0x44));
        assert_eq!(theme.label_color("unknown"), theme.cyan);
    }

    #[test]
    fn test_status_and_priority_colors() {
        let theme = Theme::default();
        assert_eq!(theme.status_color(" DONE "), theme.green);
        assert_eq!(theme.status_color("In Progress"), theme.highlight);
        assert_eq!(theme.priority_color("High"), theme.red);
        assert_eq!(theme.priority_color(""), theme.dim);
    }
}
