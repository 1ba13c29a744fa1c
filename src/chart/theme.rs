use serde::{Deserialize, Serialize};

use crate::chart::Palette;
use crate::render::{Color, FontWeight};

/// Visual defaults handed to every chart call.
///
/// There is no process-wide style: each figure, axes and chart routine reads
/// the theme it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub figure_background: Color,
    pub axes_background: Color,
    pub grid_color: Color,
    pub grid_width: f64,
    pub text_color: Color,
    pub tick_font_size: f64,
    pub label_font_size: f64,
    pub title_font_size: f64,
    pub legend_font_size: f64,
    pub line_width: f64,
    pub patch_edge_color: Color,
    pub palette: Palette,
}

impl Theme {
    /// Dark grid on a pale lavender background, notebook font scale.
    #[must_use]
    pub fn darkgrid() -> Self {
        Self {
            figure_background: Color::rgb(1.0, 1.0, 1.0),
            axes_background: Color::rgb8(0xEA, 0xEA, 0xF2),
            grid_color: Color::rgb(1.0, 1.0, 1.0),
            grid_width: 1.0,
            text_color: Color::rgb(0.15, 0.15, 0.15),
            tick_font_size: 11.0,
            label_font_size: 12.0,
            title_font_size: 12.0,
            legend_font_size: 11.0,
            line_width: 1.5,
            patch_edge_color: Color::rgb(1.0, 1.0, 1.0),
            palette: Palette::Deep,
        }
    }

    #[must_use]
    pub fn text_style(&self, font_size: f64) -> TextStyle {
        TextStyle {
            font_size,
            color: self.text_color,
            weight: FontWeight::Normal,
        }
    }

    #[must_use]
    pub fn title_style(&self) -> TextStyle {
        self.text_style(self.title_font_size)
    }

    #[must_use]
    pub fn label_style(&self) -> TextStyle {
        self.text_style(self.label_font_size)
    }

    /// Dark neutral used for box outlines, whiskers and medians.
    #[must_use]
    pub fn line_color(&self) -> Color {
        Color::rgb(0.26, 0.26, 0.26)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::darkgrid()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub color: Color,
    pub weight: FontWeight,
}

impl TextStyle {
    #[must_use]
    pub fn with_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }
}

/// Rough advance width of `text` in a sans font, used for layout only.
#[must_use]
pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.56
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn theme_round_trips_through_json() {
        let theme = Theme::darkgrid();
        let json = serde_json::to_string(&theme).expect("serialize");
        let restored: Theme = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.palette, theme.palette);
        assert!((restored.axes_background.blue - theme.axes_background.blue).abs() <= 1e-12);
        assert!((restored.tick_font_size - theme.tick_font_size).abs() <= 1e-12);
    }
}
