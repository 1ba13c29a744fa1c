use tracing::warn;

use crate::chart::axes::{Artist, AxisId, Axes};
use crate::chart::palette::{Colormap, named};
use crate::core::{CorrelationMatrix, DataPoint, PlotRect};
use crate::error::ReportResult;
use crate::render::{Stroke, TextHAlign, TextVAlign};

const COLORBAR_STEPS: usize = 64;
const COLORBAR_FRACTION: f64 = 0.05;
const COLORBAR_GAP: f64 = 0.04;
/// Cells brighter than this get dark annotation text.
const LIGHT_CELL_LUMINANCE: f64 = 0.408;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapOptions {
    pub cmap: Colormap,
    /// Decimals of the per-cell annotation, `None` to leave cells blank.
    pub annot_decimals: Option<usize>,
    pub linewidth: f64,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
}

impl HeatmapOptions {
    #[must_use]
    pub fn new(cmap: Colormap) -> Self {
        Self {
            cmap,
            annot_decimals: None,
            linewidth: 0.0,
            vmin: None,
            vmax: None,
        }
    }

    #[must_use]
    pub fn annotated(mut self, decimals: usize) -> Self {
        self.annot_decimals = Some(decimals);
        self
    }

    #[must_use]
    pub fn with_linewidth(mut self, linewidth: f64) -> Self {
        self.linewidth = linewidth;
        self
    }
}

/// Color-coded matrix with the first row on top. Shrinks `ax` to make room
/// for the colorbar, which is returned as its own axes.
///
/// Undefined cells stay blank. A matrix without any defined cell draws an
/// empty grid over the `[-1, 1]` color range.
pub fn heatmap(
    ax: &mut Axes,
    matrix: &CorrelationMatrix,
    options: &HeatmapOptions,
) -> ReportResult<Axes> {
    let (data_min, data_max) = matrix.value_range().unwrap_or_else(|| {
        warn!(size = matrix.size(), "heatmap has no defined cell");
        (-1.0, 1.0)
    });
    let vmin = options.vmin.unwrap_or(data_min);
    let mut vmax = options.vmax.unwrap_or(data_max);
    if vmax <= vmin {
        vmax = vmin + 1.0;
    }
    let normalize = |value: f64| (value - vmin) / (vmax - vmin);

    let edge = (options.linewidth > 0.0).then(|| Stroke::solid(options.linewidth, named::WHITE));
    let theme = ax.theme().clone();
    for (row, values) in matrix.values.iter().enumerate() {
        for (col, value) in values.iter().copied().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let fill = options.cmap.sample(normalize(value));
            ax.add(Artist::Rect {
                x0: col as f64 - 0.5,
                x1: col as f64 + 0.5,
                y0: row as f64 - 0.5,
                y1: row as f64 + 0.5,
                fill,
                edge,
            });
            if let Some(decimals) = options.annot_decimals {
                let text_color = if fill.relative_luminance() > LIGHT_CELL_LUMINANCE {
                    theme.text_color
                } else {
                    named::WHITE
                };
                ax.add(Artist::Text {
                    at: DataPoint::new(col as f64, row as f64),
                    offset: (0.0, 0.0),
                    text: format!("{value:.decimals$}"),
                    style: theme.text_style(theme.tick_font_size).with_color(text_color),
                    h_align: TextHAlign::Center,
                    v_align: TextVAlign::Middle,
                });
            }
        }
    }

    let labels: Vec<&str> = matrix.labels.iter().map(String::as_str).collect();
    ax.set_categories(AxisId::X, &labels);
    ax.set_categories(AxisId::Y, &labels);
    ax.y.inverted = true;
    ax.grid.x = None;
    ax.grid.y = None;
    ax.facecolor = theme.figure_background;

    let full = ax.rect();
    let bar_width = full.width * COLORBAR_FRACTION;
    let gap = full.width * COLORBAR_GAP;
    let tick_room = 36.0;
    ax.set_rect(PlotRect::new(
        full.left,
        full.top,
        (full.width - bar_width - gap - tick_room).max(1.0),
        full.height,
    ));
    let colorbar_rect = PlotRect::new(
        full.right() - bar_width - tick_room,
        full.top,
        bar_width,
        full.height,
    );
    Ok(colorbar(colorbar_rect, options.cmap, vmin, vmax, &theme))
}

fn colorbar(
    rect: PlotRect,
    cmap: Colormap,
    vmin: f64,
    vmax: f64,
    theme: &crate::chart::Theme,
) -> Axes {
    let mut bar = Axes::new(rect, theme);
    let step = (vmax - vmin) / COLORBAR_STEPS as f64;
    for index in 0..COLORBAR_STEPS {
        let low = vmin + step * index as f64;
        bar.add(Artist::Rect {
            x0: 0.0,
            x1: 1.0,
            y0: low,
            y1: low + step,
            fill: cmap.sample((index as f64 + 0.5) / COLORBAR_STEPS as f64),
            edge: None,
        });
    }
    bar.set_xlim(0.0, 1.0);
    bar.set_ylim(vmin, vmax);
    bar.x.tick_labels_visible = false;
    bar.y.opposite = true;
    bar.grid.x = None;
    bar.grid.y = None;
    bar
}

#[cfg(test)]
mod tests {
    use super::{HeatmapOptions, heatmap};
    use crate::chart::{Artist, AxisId, Axes, Colormap, Theme};
    use crate::core::{CorrelationMatrix, PlotRect};

    fn matrix() -> CorrelationMatrix {
        CorrelationMatrix::from_columns(&[
            ("total_bill", vec![1.0, 2.0, 3.0, 4.0]),
            ("tip", vec![1.0, 2.5, 2.0, 4.5]),
            ("size", vec![4.0, 3.0, 2.0, 1.0]),
        ])
        .expect("matrix")
    }

    #[test]
    fn heatmap_annotates_every_cell() {
        let theme = Theme::darkgrid();
        let mut ax = Axes::new(PlotRect::new(60.0, 40.0, 400.0, 300.0), &theme);
        let options = HeatmapOptions::new(Colormap::Coolwarm)
            .annotated(2)
            .with_linewidth(0.5);
        let colorbar = heatmap(&mut ax, &matrix(), &options).expect("heatmap");

        let texts: Vec<_> = ax
            .artists()
            .iter()
            .filter_map(|artist| match artist {
                Artist::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 9);
        assert_eq!(texts[0], "1.00");
        assert_eq!(texts[2], "-1.00");
        assert!(ax.axis(AxisId::Y).inverted);
        assert!(colorbar.rect().left > ax.rect().right());
        assert_eq!(colorbar.view_limits(AxisId::Y), (-1.0, 1.0));
    }

    #[test]
    fn undefined_cells_are_left_blank() {
        let matrix = CorrelationMatrix::from_columns(&[
            ("a", vec![1.0, 2.0, 3.0]),
            ("flat", vec![5.0, 5.0, 5.0]),
        ])
        .expect("matrix");
        let mut ax = Axes::new(PlotRect::new(60.0, 40.0, 400.0, 300.0), &Theme::darkgrid());
        heatmap(&mut ax, &matrix, &HeatmapOptions::new(Colormap::Coolwarm)).expect("heatmap");
        let cells = ax
            .artists()
            .iter()
            .filter(|artist| matches!(artist, Artist::Rect { .. }))
            .count();
        assert_eq!(cells, 1);
    }

    #[test]
    fn matrix_without_defined_cells_draws_empty_grid() {
        let matrix = CorrelationMatrix::from_columns(&[
            ("total_bill", vec![12.5, 12.5]),
            ("tip", vec![2.0, 2.0]),
            ("size", vec![2.0, 2.0]),
        ])
        .expect("matrix");
        assert!(matrix.value_range().is_none());

        let mut ax = Axes::new(PlotRect::new(60.0, 40.0, 400.0, 300.0), &Theme::darkgrid());
        let colorbar = heatmap(
            &mut ax,
            &matrix,
            &HeatmapOptions::new(Colormap::Coolwarm).annotated(2),
        )
        .expect("heatmap");

        assert!(ax.artists().is_empty());
        assert_eq!(ax.ticks(AxisId::X).len(), 3);
        assert_eq!(colorbar.view_limits(AxisId::Y), (-1.0, 1.0));
        assert!(!colorbar.artists().is_empty());
    }
}
