use crate::chart::axes::{AxisId, Axes, TickSpec};
use crate::chart::figure::Figure;
use crate::chart::legend::Legend;
use crate::chart::theme::{TextStyle, Theme};
use crate::core::{POINTS_PER_INCH, PlotRect};
use crate::dataset::{CategoricalColumn, TipRecord, TipsDataset};
use crate::error::{ReportError, ReportResult};
use crate::render::RenderFrame;

const CELL_LEFT: f64 = 56.0;
const CELL_RIGHT: f64 = 14.0;
const CELL_TOP: f64 = 30.0;
const CELL_BOTTOM: f64 = 46.0;
const LEGEND_GAP: f64 = 16.0;

/// Position of one facet inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetCell {
    pub row: usize,
    pub col: usize,
    pub row_level: Option<&'static str>,
    pub col_level: Option<&'static str>,
}

impl FacetCell {
    /// Whether `record`-level labels match this facet.
    fn matches(
        self,
        row_var: Option<CategoricalColumn>,
        col_var: Option<CategoricalColumn>,
        record: &TipRecord,
    ) -> bool {
        let row_ok = match (row_var, self.row_level) {
            (Some(column), Some(level)) => column.label_of(record) == level,
            _ => true,
        };
        let col_ok = match (col_var, self.col_level) {
            (Some(column), Some(level)) => column.label_of(record) == level,
            _ => true,
        };
        row_ok && col_ok
    }
}

/// Grid of axes, one per combination of row and column levels, with shared
/// axis limits.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetGrid {
    theme: Theme,
    height_in: f64,
    aspect: f64,
    row_var: Option<CategoricalColumn>,
    col_var: Option<CategoricalColumn>,
    cells: Vec<FacetCell>,
    axes: Vec<Axes>,
    legend: Option<Legend>,
    top: Option<f64>,
    suptitle: Option<(String, TextStyle)>,
}

impl FacetGrid {
    pub fn new(
        row_var: Option<CategoricalColumn>,
        col_var: Option<CategoricalColumn>,
        height_in: f64,
        aspect: f64,
        theme: &Theme,
    ) -> ReportResult<Self> {
        if !height_in.is_finite() || height_in <= 0.0 || !aspect.is_finite() || aspect <= 0.0 {
            return Err(ReportError::InvalidData(
                "facet height and aspect must be finite and > 0".to_owned(),
            ));
        }
        let levels = |var: Option<CategoricalColumn>| -> Vec<Option<&'static str>> {
            match var {
                Some(column) => column.levels().into_iter().map(Some).collect(),
                None => vec![None],
            }
        };
        let row_levels = levels(row_var);
        let col_levels = levels(col_var);
        let cells: Vec<FacetCell> = row_levels
            .iter()
            .enumerate()
            .flat_map(|(row, row_level)| {
                col_levels
                    .iter()
                    .enumerate()
                    .map(move |(col, col_level)| FacetCell {
                        row,
                        col,
                        row_level: *row_level,
                        col_level: *col_level,
                    })
            })
            .collect();
        let placeholder = PlotRect::new(0.0, 0.0, 1.0, 1.0);
        let axes = cells.iter().map(|_| Axes::new(placeholder, theme)).collect();

        let mut grid = Self {
            theme: theme.clone(),
            height_in,
            aspect,
            row_var,
            col_var,
            cells,
            axes,
            legend: None,
            top: None,
            suptitle: None,
        };
        let default_template = match (row_var, col_var) {
            (Some(_), Some(_)) => "{row_var} = {row_name} | {col_var} = {col_name}",
            (Some(_), None) => "{row_var} = {row_name}",
            (None, Some(_)) => "{col_var} = {col_name}",
            (None, None) => "",
        };
        if !default_template.is_empty() {
            let style = grid.theme.title_style();
            grid.set_titles(default_template, style);
        }
        Ok(grid)
    }

    /// `(rows, cols)` of the grid.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        let rows = self.row_var.map_or(1, CategoricalColumn::level_count);
        let cols = self.col_var.map_or(1, CategoricalColumn::level_count);
        (rows, cols)
    }

    #[must_use]
    pub fn cells(&self) -> &[FacetCell] {
        &self.cells
    }

    #[must_use]
    pub fn axes(&self) -> &[Axes] {
        &self.axes
    }

    /// Mutable access to every facet together with its cell.
    pub fn facets_mut(&mut self) -> impl Iterator<Item = (FacetCell, &mut Axes)> {
        self.cells.iter().copied().zip(self.axes.iter_mut())
    }

    /// Rows belonging to `cell`, `None` for an empty facet.
    #[must_use]
    pub fn facet_data(&self, dataset: &TipsDataset, cell: FacetCell) -> Option<TipsDataset> {
        let (row_var, col_var) = (self.row_var, self.col_var);
        dataset.subset(|record| cell.matches(row_var, col_var, record))
    }

    /// Axis labels on the outer facets only.
    pub fn set_axis_labels(&mut self, x_label: &str, y_label: &str) {
        let (rows, _) = self.shape();
        for (cell, axes) in self.cells.iter().zip(self.axes.iter_mut()) {
            axes.x.label = None;
            axes.y.label = None;
            if cell.row + 1 == rows {
                axes.set_xlabel(x_label);
            }
            if cell.col == 0 {
                axes.set_ylabel(y_label);
            }
        }
    }

    /// Facet titles from a template with `{row_var}`, `{row_name}`,
    /// `{col_var}` and `{col_name}` placeholders.
    pub fn set_titles(&mut self, template: &str, style: TextStyle) {
        let row_var = self.row_var.map(CategoricalColumn::name).unwrap_or_default();
        let col_var = self.col_var.map(CategoricalColumn::name).unwrap_or_default();
        for (cell, axes) in self.cells.iter().zip(self.axes.iter_mut()) {
            let title = template
                .replace("{row_var}", row_var)
                .replace("{col_var}", col_var)
                .replace("{row_name}", cell.row_level.unwrap_or_default())
                .replace("{col_name}", cell.col_level.unwrap_or_default());
            axes.set_title_styled(title, style);
        }
    }

    pub fn add_legend(&mut self, legend: Legend) {
        self.legend = (!legend.is_empty()).then_some(legend.unframed());
    }

    /// Places the top edge of the facet area at fraction `top` of the
    /// figure height, measured from the bottom.
    pub fn subplots_adjust_top(&mut self, top: f64) -> ReportResult<()> {
        if !top.is_finite() || top <= 0.0 || top > 1.0 {
            return Err(ReportError::InvalidData(format!(
                "subplot top must be in (0, 1], got {top}"
            )));
        }
        self.top = Some(top);
        Ok(())
    }

    pub fn suptitle(&mut self, text: impl Into<String>, style: TextStyle) {
        self.suptitle = Some((text.into(), style));
    }

    fn legend_width(&self) -> f64 {
        self.legend
            .as_ref()
            .map_or(0.0, |legend| legend.size(&self.theme).0 + 2.0 * LEGEND_GAP)
    }

    fn share_limits(&mut self) {
        for axis in [AxisId::X, AxisId::Y] {
            let shared = self
                .axes
                .iter()
                .filter(|axes| {
                    let spec = axes.axis(axis);
                    spec.limits.is_none() && spec.ticks == TickSpec::Auto
                })
                .filter_map(|axes| axes.data_range(axis).map(|range| (range, axes.axis(axis).margin)))
                .reduce(|((low, high), margin), ((l, h), m)| ((low.min(l), high.max(h)), margin.max(m)));
            let Some(((low, high), margin)) = shared else {
                continue;
            };
            let pad = if high > low { (high - low) * margin } else { 0.5 };
            for axes in &mut self.axes {
                let spec = match axis {
                    AxisId::X => &mut axes.x,
                    AxisId::Y => &mut axes.y,
                };
                if spec.limits.is_none() && spec.ticks == TickSpec::Auto {
                    spec.limits = Some((low - pad, high + pad));
                }
            }
        }
    }

    /// Lays out the facets and renders the whole grid into one page.
    pub fn into_frame(mut self) -> ReportResult<RenderFrame> {
        let (rows, cols) = self.shape();
        let cell_width = self.height_in * self.aspect * POINTS_PER_INCH;
        let cell_height = self.height_in * POINTS_PER_INCH;
        let legend_width = self.legend_width();
        let figure_width_in = (cell_width * cols as f64 + legend_width) / POINTS_PER_INCH;
        let figure_height_in = self.height_in * rows as f64;
        let mut figure = Figure::new(figure_width_in, figure_height_in, &self.theme)?;

        let page_height = f64::from(figure.viewport().height);
        let grid_top = self.top.map_or(0.0, |top| page_height * (1.0 - top));
        let row_height = (page_height - grid_top) / rows as f64;
        let row_height = row_height.min(cell_height);

        self.share_limits();
        for (cell, axes) in self.cells.iter().zip(self.axes.iter_mut()) {
            let rect = PlotRect::new(
                cell.col as f64 * cell_width,
                grid_top + cell.row as f64 * row_height,
                cell_width,
                row_height,
            )
            .inset(CELL_LEFT, CELL_TOP, CELL_RIGHT, CELL_BOTTOM);
            axes.set_rect(rect);
            axes.x.tick_labels_visible = cell.row + 1 == rows;
            axes.y.tick_labels_visible = cell.col == 0;
            figure.add_axes(axes)?;
        }

        if let Some(legend) = &self.legend {
            let (_, height) = legend.size(&self.theme);
            let left = cell_width * cols as f64 + LEGEND_GAP;
            let top = grid_top + ((page_height - grid_top) - height).max(0.0) * 0.5;
            figure.add_legend(legend, left, top);
        }
        if let Some((text, style)) = self.suptitle {
            figure.suptitle(text, 8.0, style);
        }
        Ok(figure.into_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::FacetGrid;
    use crate::chart::{Artist, AxisId, Theme};
    use crate::core::{DataPoint, Viewport};
    use crate::dataset::{CategoricalColumn, TipsDataset};
    use crate::render::{Color, MarkerShape};

    fn dataset() -> TipsDataset {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
            10.00,1.00,Male,No,Thur,Lunch,2\n\
            20.00,3.00,Female,Yes,Sun,Dinner,2\n\
            30.00,5.00,Male,Yes,Sat,Dinner,4\n";
        TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset")
    }

    #[test]
    fn grid_follows_level_order() {
        let grid = FacetGrid::new(
            Some(CategoricalColumn::Smoker),
            Some(CategoricalColumn::Sex),
            4.0,
            1.2,
            &Theme::darkgrid(),
        )
        .expect("grid");
        assert_eq!(grid.shape(), (2, 2));
        let first = grid.cells()[0];
        assert_eq!((first.row_level, first.col_level), (Some("Yes"), Some("Male")));
        assert_eq!(grid.axes()[1].title(), Some("smoker = Yes | sex = Female"));
    }

    #[test]
    fn facet_data_filters_rows() {
        let grid = FacetGrid::new(None, Some(CategoricalColumn::Time), 4.0, 1.2, &Theme::darkgrid())
            .expect("grid");
        let lunch = grid.facet_data(&dataset(), grid.cells()[0]).expect("lunch rows");
        assert_eq!(lunch.len(), 1);
        let dinner = grid.facet_data(&dataset(), grid.cells()[1]).expect("dinner rows");
        assert_eq!(dinner.len(), 2);
    }

    #[test]
    fn titles_and_labels_are_placed_on_outer_facets() {
        let mut grid = FacetGrid::new(
            Some(CategoricalColumn::Smoker),
            Some(CategoricalColumn::Sex),
            4.0,
            1.2,
            &Theme::darkgrid(),
        )
        .expect("grid");
        let style = Theme::darkgrid().title_style();
        grid.set_titles("Smoker: {row_name} | Sex: {col_name}", style);
        grid.set_axis_labels("total_bill", "tip");

        assert_eq!(grid.axes()[3].title(), Some("Smoker: No | Sex: Female"));
        assert_eq!(grid.axes()[0].label(AxisId::X), None);
        assert_eq!(grid.axes()[0].label(AxisId::Y), Some("tip"));
        assert_eq!(grid.axes()[3].label(AxisId::X), Some("total_bill"));
        assert_eq!(grid.axes()[3].label(AxisId::Y), None);
    }

    #[test]
    fn frame_size_follows_height_and_aspect() {
        let mut grid = FacetGrid::new(None, Some(CategoricalColumn::Time), 4.0, 1.2, &Theme::darkgrid())
            .expect("grid");
        for (cell, axes) in grid.facets_mut() {
            axes.add(Artist::Marker {
                at: DataPoint::new(cell.col as f64, 10.0 * (cell.col + 1) as f64),
                size: 5.0,
                shape: MarkerShape::Circle,
                fill: Color::rgb(0.0, 0.0, 0.0),
                edge: None,
            });
        }
        grid.subplots_adjust_top(0.85).expect("top");
        let frame = grid.into_frame().expect("frame");
        assert_eq!(frame.viewport, Viewport::new(691, 288));
        frame.validate().expect("valid frame");
    }

    #[test]
    fn shared_limits_cover_every_facet() {
        let mut grid = FacetGrid::new(None, Some(CategoricalColumn::Time), 4.0, 1.2, &Theme::darkgrid())
            .expect("grid");
        for (cell, axes) in grid.facets_mut() {
            axes.add(Artist::Marker {
                at: DataPoint::new(0.0, if cell.col == 0 { 1.0 } else { 9.0 }),
                size: 5.0,
                shape: MarkerShape::Circle,
                fill: Color::rgb(0.0, 0.0, 0.0),
                edge: None,
            });
        }
        grid.share_limits();
        let first = grid.axes()[0].view_limits(AxisId::Y);
        let second = grid.axes()[1].view_limits(AxisId::Y);
        assert_eq!(first, second);
        assert!(first.0 < 1.0 && first.1 > 9.0);
    }
}
