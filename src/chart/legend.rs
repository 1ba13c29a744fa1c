use crate::chart::theme::{Theme, estimate_text_width};
use crate::render::{
    CanvasLayerKind, Color, FontWeight, MarkerPrimitive, MarkerShape, RectPrimitive,
    RenderFrame, Stroke, TextHAlign, TextPrimitive, TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Swatch {
    Marker {
        shape: MarkerShape,
        size: f64,
        color: Color,
    },
    Patch(Color),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: Swatch,
}

impl LegendEntry {
    #[must_use]
    pub fn new(label: impl Into<String>, swatch: Swatch) -> Self {
        Self {
            label: label.into(),
            swatch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSection {
    pub title: Option<String>,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPlacement {
    UpperLeft,
    UpperRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub sections: Vec<LegendSection>,
    pub placement: LegendPlacement,
    pub framed: bool,
}

impl Legend {
    #[must_use]
    pub fn new(placement: LegendPlacement) -> Self {
        Self {
            sections: Vec::new(),
            placement,
            framed: true,
        }
    }

    #[must_use]
    pub fn with_section(mut self, title: Option<String>, entries: Vec<LegendEntry>) -> Self {
        if !entries.is_empty() {
            self.sections.push(LegendSection { title, entries });
        }
        self
    }

    #[must_use]
    pub fn unframed(mut self) -> Self {
        self.framed = false;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn row_height(theme: &Theme) -> f64 {
        theme.legend_font_size * 1.55
    }

    fn row_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.entries.len() + usize::from(section.title.is_some()))
            .sum()
    }

    /// Outer size of the legend box.
    #[must_use]
    pub fn size(&self, theme: &Theme) -> (f64, f64) {
        let font = theme.legend_font_size;
        let label_width = self
            .sections
            .iter()
            .flat_map(|section| {
                let title = section
                    .title
                    .iter()
                    .map(move |title| estimate_text_width(title, font) - SWATCH_WIDTH);
                let labels = section
                    .entries
                    .iter()
                    .map(move |entry| estimate_text_width(&entry.label, font));
                title.chain(labels)
            })
            .fold(0.0_f64, f64::max);
        let width = PADDING * 2.0 + SWATCH_WIDTH + label_width;
        let height = PADDING * 2.0 + Self::row_height(theme) * self.row_count() as f64;
        (width, height)
    }

    /// Draws the legend with its top-left corner at `(left, top)`.
    pub fn draw(&self, frame: &mut RenderFrame, left: f64, top: f64, theme: &Theme) {
        if self.is_empty() {
            return;
        }
        let (width, height) = self.size(theme);
        if self.framed {
            frame.push_rect(
                CanvasLayerKind::Overlay,
                RectPrimitive::new(left, top, width, height, theme.axes_background.with_alpha(0.8))
                    .with_border(0.8, Color::rgb(0.8, 0.8, 0.8))
                    .with_corner_radius(3.0),
            );
        }

        let row_height = Self::row_height(theme);
        let font = theme.legend_font_size;
        let mut row_center = top + PADDING + row_height * 0.5;
        for section in &self.sections {
            if let Some(title) = &section.title {
                frame.push_text(
                    CanvasLayerKind::Overlay,
                    TextPrimitive::new(
                        title.clone(),
                        left + PADDING,
                        row_center,
                        font,
                        theme.text_color,
                        TextHAlign::Left,
                    )
                    .with_v_align(TextVAlign::Middle)
                    .with_weight(FontWeight::Normal),
                );
                row_center += row_height;
            }
            for entry in &section.entries {
                let swatch_x = left + PADDING + SWATCH_WIDTH * 0.4;
                draw_swatch(frame, entry.swatch, swatch_x, row_center, theme);
                frame.push_text(
                    CanvasLayerKind::Overlay,
                    TextPrimitive::new(
                        entry.label.clone(),
                        left + PADDING + SWATCH_WIDTH,
                        row_center,
                        font,
                        theme.text_color,
                        TextHAlign::Left,
                    )
                    .with_v_align(TextVAlign::Middle),
                );
                row_center += row_height;
            }
        }
    }
}

const PADDING: f64 = 6.0;
const SWATCH_WIDTH: f64 = 24.0;

fn draw_swatch(frame: &mut RenderFrame, swatch: Swatch, x: f64, y: f64, theme: &Theme) {
    match swatch {
        Swatch::Marker { shape, size, color } => frame.push_marker(
            CanvasLayerKind::Overlay,
            MarkerPrimitive {
                x,
                y,
                size,
                shape,
                fill: color,
                edge: Some(Stroke::solid(0.5, theme.patch_edge_color)),
            },
        ),
        Swatch::Patch(color) => frame.push_rect(
            CanvasLayerKind::Overlay,
            RectPrimitive::new(x - 7.0, y - 5.0, 14.0, 10.0, color)
                .with_border(0.8, theme.line_color()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{Legend, LegendEntry, LegendPlacement, Swatch};
    use crate::chart::Theme;
    use crate::core::Viewport;
    use crate::render::{CanvasLayerKind, Color, RenderFrame};

    #[test]
    fn empty_sections_are_dropped() {
        let legend = Legend::new(LegendPlacement::UpperLeft).with_section(Some("x".into()), vec![]);
        assert!(legend.is_empty());
    }

    #[test]
    fn legend_draws_title_and_entries() {
        let theme = Theme::darkgrid();
        let legend = Legend::new(LegendPlacement::UpperRight).with_section(
            Some("sex".into()),
            vec![
                LegendEntry::new("Male", Swatch::Patch(Color::rgb(0.0, 0.0, 1.0))),
                LegendEntry::new("Female", Swatch::Patch(Color::rgb(1.0, 0.0, 0.0))),
            ],
        );
        let mut frame = RenderFrame::new(Viewport::new(200, 200));
        legend.draw(&mut frame, 10.0, 10.0, &theme);

        let overlay = frame.layer(CanvasLayerKind::Overlay);
        assert_eq!(overlay.texts.len(), 3);
        assert_eq!(overlay.rects.len(), 3);
        let (_, height) = legend.size(&theme);
        assert!(height > 3.0 * theme.legend_font_size);
    }
}
