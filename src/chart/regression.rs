use tracing::warn;

use crate::chart::axes::{Artist, Axes};
use crate::chart::facet::FacetGrid;
use crate::chart::theme::Theme;
use crate::core::stats::min_max;
use crate::core::{DataPoint, LinearFit};
use crate::dataset::{CategoricalColumn, NumericColumn, TipsDataset};
use crate::error::ReportResult;
use crate::render::{Color, MarkerShape, Stroke};

const LINE_SAMPLES: usize = 100;

/// Options for [`regplot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionOptions {
    pub color: Color,
    pub scatter_alpha: f64,
    /// Confidence level of the shaded band, `None` to omit it.
    pub ci: Option<f64>,
}

impl RegressionOptions {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            scatter_alpha: 0.8,
            ci: Some(0.95),
        }
    }

    #[must_use]
    pub fn with_scatter_alpha(mut self, alpha: f64) -> Self {
        self.scatter_alpha = alpha;
        self
    }
}

/// Scatter of `points` with the least-squares line over their x range and
/// an analytic confidence band. Returns `None` when no line can be fitted.
pub fn regplot(
    ax: &mut Axes,
    points: &[DataPoint],
    options: &RegressionOptions,
) -> Option<LinearFit> {
    let edge = Stroke::solid(0.5, ax.theme().patch_edge_color);
    for point in points {
        ax.add(Artist::Marker {
            at: *point,
            size: 6.0,
            shape: MarkerShape::Circle,
            fill: options.color.with_alpha(options.scatter_alpha),
            edge: Some(edge),
        });
    }

    let Some(fit) = LinearFit::fit(points) else {
        warn!(points = points.len(), "regression line skipped: x has no spread");
        return None;
    };
    let xs: Vec<f64> = points.iter().map(|point| point.x).collect();
    let (low, high) = min_max(&xs)?;
    let step = (high - low) / (LINE_SAMPLES - 1) as f64;
    let grid: Vec<f64> = (0..LINE_SAMPLES).map(|i| low + step * i as f64).collect();

    if let Some(level) = options.ci {
        if let Some(band) = fit.confidence_band(&grid, level) {
            let mut outline: Vec<DataPoint> =
                band.iter().map(|p| DataPoint::new(p.x, p.upper)).collect();
            outline.extend(band.iter().rev().map(|p| DataPoint::new(p.x, p.lower)));
            ax.add(Artist::Path {
                points: outline,
                closed: true,
                fill: Some(options.color.with_alpha(0.15)),
                stroke: None,
            });
        }
    }
    ax.add(Artist::Path {
        points: grid.iter().map(|x| DataPoint::new(*x, fit.predict(*x))).collect(),
        closed: false,
        fill: None,
        stroke: Some(Stroke::solid(ax.theme().line_width, options.color)),
    });
    Some(fit)
}

/// Regression plots faceted by `row` and `col` levels.
#[allow(clippy::too_many_arguments)]
pub fn lmplot(
    dataset: &TipsDataset,
    x: NumericColumn,
    y: NumericColumn,
    row: CategoricalColumn,
    col: CategoricalColumn,
    height: f64,
    aspect: f64,
    scatter_alpha: f64,
    theme: &Theme,
) -> ReportResult<FacetGrid> {
    let mut grid = FacetGrid::new(Some(row), Some(col), height, aspect, theme)?;
    let facets: Vec<_> = grid
        .cells()
        .iter()
        .map(|cell| grid.facet_data(dataset, *cell))
        .collect();
    let color = theme.palette.colors(1)[0];
    let options = RegressionOptions::new(color).with_scatter_alpha(scatter_alpha);
    for ((cell, ax), data) in grid.facets_mut().zip(facets) {
        let Some(data) = data else {
            warn!(
                row = cell.row_level.unwrap_or_default(),
                col = cell.col_level.unwrap_or_default(),
                "empty facet"
            );
            continue;
        };
        let points: Vec<DataPoint> = data
            .records()
            .iter()
            .map(|record| DataPoint::new(x.value(record), y.value(record)))
            .collect();
        regplot(ax, &points, &options);
    }
    grid.set_axis_labels(x.name(), y.name());
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{RegressionOptions, lmplot, regplot};
    use crate::chart::{Artist, Axes, Theme, named};
    use crate::core::{DataPoint, PlotRect};
    use crate::dataset::{CategoricalColumn, NumericColumn, TipsDataset};

    #[test]
    fn regplot_draws_points_band_and_line() {
        let mut ax = Axes::new(PlotRect::new(40.0, 20.0, 300.0, 200.0), &Theme::darkgrid());
        let points = [
            DataPoint::new(1.0, 2.1),
            DataPoint::new(2.0, 3.9),
            DataPoint::new(3.0, 6.2),
            DataPoint::new(4.0, 7.8),
        ];
        let fit = regplot(&mut ax, &points, &RegressionOptions::new(named::DARKBLUE))
            .expect("fit");
        assert_relative_eq!(fit.slope, 1.94, epsilon = 1e-9);
        let markers = ax
            .artists()
            .iter()
            .filter(|artist| matches!(artist, Artist::Marker { .. }))
            .count();
        let paths = ax
            .artists()
            .iter()
            .filter(|artist| matches!(artist, Artist::Path { .. }))
            .count();
        assert_eq!((markers, paths), (4, 2));
    }

    #[test]
    fn vertical_data_has_no_line() {
        let mut ax = Axes::new(PlotRect::new(40.0, 20.0, 300.0, 200.0), &Theme::darkgrid());
        let points = [DataPoint::new(1.0, 1.0), DataPoint::new(1.0, 2.0)];
        assert!(regplot(&mut ax, &points, &RegressionOptions::new(named::DARKBLUE)).is_none());
        assert_eq!(ax.artists().len(), 2);
    }

    #[test]
    fn lmplot_builds_row_by_column_grid() {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
            10.00,1.00,Male,No,Thur,Lunch,2\n\
            20.00,3.00,Male,No,Sun,Dinner,2\n\
            15.00,2.00,Female,Yes,Sat,Dinner,4\n";
        let data = TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset");
        let grid = lmplot(
            &data,
            NumericColumn::TotalBill,
            NumericColumn::Tip,
            CategoricalColumn::Smoker,
            CategoricalColumn::Sex,
            4.0,
            1.2,
            0.6,
            &Theme::darkgrid(),
        )
        .expect("lmplot");
        assert_eq!(grid.shape(), (2, 2));
        let counts: Vec<usize> = grid.axes().iter().map(|ax| ax.artists().len()).collect();
        // Yes/Male and No/Female are empty; Yes/Female has one point and no
        // line; No/Male has two points and a line but too few for a band.
        assert_eq!(counts, vec![0, 1, 3, 0]);
    }
}
