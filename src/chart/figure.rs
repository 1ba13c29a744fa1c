use crate::chart::axes::Axes;
use crate::chart::legend::Legend;
use crate::chart::theme::{TextStyle, Theme};
use crate::core::{PlotRect, Viewport};
use crate::error::{ReportError, ReportResult};
use crate::render::{CanvasLayerKind, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

/// Margins and gaps of a subplot grid, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubplotLayout {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub wspace: f64,
    pub hspace: f64,
}

impl SubplotLayout {
    /// Margins that leave room for tick labels, axis labels and a title.
    #[must_use]
    pub fn tight() -> Self {
        Self {
            left: 64.0,
            right: 20.0,
            top: 36.0,
            bottom: 52.0,
            wspace: 72.0,
            hspace: 64.0,
        }
    }

    #[must_use]
    pub fn with_top(mut self, top: f64) -> Self {
        self.top = top;
        self
    }

    #[must_use]
    pub fn with_right(mut self, right: f64) -> Self {
        self.right = right;
        self
    }
}

impl Default for SubplotLayout {
    fn default() -> Self {
        Self::tight()
    }
}

/// One report page: a sized canvas onto which axes are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    theme: Theme,
    frame: RenderFrame,
}

impl Figure {
    pub fn new(width_in: f64, height_in: f64, theme: &Theme) -> ReportResult<Self> {
        let viewport = Viewport::from_inches(width_in, height_in)?;
        let frame = RenderFrame::new(viewport).with_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                0.0,
                0.0,
                f64::from(viewport.width),
                f64::from(viewport.height),
                theme.figure_background,
            ),
        );
        Ok(Self {
            theme: theme.clone(),
            frame,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.frame.viewport
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Row-major axes rectangles of a `rows x cols` grid.
    pub fn subplots(
        &self,
        rows: usize,
        cols: usize,
        layout: &SubplotLayout,
    ) -> ReportResult<Vec<PlotRect>> {
        if rows == 0 || cols == 0 {
            return Err(ReportError::InvalidData(
                "subplot grid needs at least one row and one column".to_owned(),
            ));
        }
        let viewport = self.viewport();
        let inner_width = f64::from(viewport.width)
            - layout.left
            - layout.right
            - layout.wspace * (cols - 1) as f64;
        let inner_height = f64::from(viewport.height)
            - layout.top
            - layout.bottom
            - layout.hspace * (rows - 1) as f64;
        let cell_width = inner_width / cols as f64;
        let cell_height = inner_height / rows as f64;
        if cell_width <= 1.0 || cell_height <= 1.0 {
            return Err(ReportError::InvalidData(format!(
                "figure {}x{} pt is too small for a {rows}x{cols} grid",
                viewport.width, viewport.height
            )));
        }

        Ok((0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| {
                    PlotRect::new(
                        layout.left + col as f64 * (cell_width + layout.wspace),
                        layout.top + row as f64 * (cell_height + layout.hspace),
                        cell_width,
                        cell_height,
                    )
                })
            })
            .collect())
    }

    pub fn add_axes(&mut self, axes: &Axes) -> ReportResult<()> {
        axes.draw(&mut self.frame)
    }

    /// Centered figure title with its top edge at `y`.
    pub fn suptitle(&mut self, text: impl Into<String>, y: f64, style: TextStyle) {
        let center = f64::from(self.viewport().width) * 0.5;
        self.frame.push_text(
            CanvasLayerKind::Axis,
            TextPrimitive::new(text, center, y, style.font_size, style.color, TextHAlign::Center)
                .with_weight(style.weight),
        );
    }

    /// Figure-level legend with its top-left corner at `(left, top)`.
    pub fn add_legend(&mut self, legend: &Legend, left: f64, top: f64) {
        legend.draw(&mut self.frame, left, top, &self.theme);
    }

    #[must_use]
    pub fn into_frame(self) -> RenderFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::{Figure, SubplotLayout};
    use crate::chart::Theme;
    use crate::core::Viewport;

    #[test]
    fn figure_size_is_in_points() {
        let figure = Figure::new(12.0, 5.0, &Theme::darkgrid()).expect("figure");
        assert_eq!(figure.viewport(), Viewport::new(864, 360));
    }

    #[test]
    fn subplots_tile_without_overlap() {
        let figure = Figure::new(15.0, 6.0, &Theme::darkgrid()).expect("figure");
        let rects = figure
            .subplots(1, 3, &SubplotLayout::tight())
            .expect("grid");
        assert_eq!(rects.len(), 3);
        for pair in rects.windows(2) {
            assert!(pair[0].right() < pair[1].left);
            assert!((pair[0].width - pair[1].width).abs() <= 1e-9);
        }
        assert!(rects[2].right() <= 15.0 * 72.0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let figure = Figure::new(4.0, 4.0, &Theme::darkgrid()).expect("figure");
        assert!(figure.subplots(0, 1, &SubplotLayout::tight()).is_err());
    }
}
