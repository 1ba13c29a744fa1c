use crate::chart::axes::{Artist, Axes};
use crate::chart::facet::FacetGrid;
use crate::chart::legend::{Legend, LegendEntry, LegendPlacement, Swatch};
use crate::chart::theme::Theme;
use crate::core::DataPoint;
use crate::core::stats::min_max;
use crate::dataset::{CategoricalColumn, NumericColumn, TipRecord, TipsDataset};
use crate::error::{ReportError, ReportResult};
use crate::render::{Color, MarkerShape, Stroke};

const STYLE_SHAPES: [MarkerShape; 3] =
    [MarkerShape::Circle, MarkerShape::Cross, MarkerShape::Square];
const DEFAULT_MARKER_AREA: f64 = 36.0;

/// Column-to-visual assignments of a scatter plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterMapping {
    pub x: NumericColumn,
    pub y: NumericColumn,
    pub hue: Option<CategoricalColumn>,
    pub size: Option<NumericColumn>,
    pub style: Option<CategoricalColumn>,
    /// Marker areas in square points for the smallest and largest size.
    pub sizes: (f64, f64),
    pub alpha: f64,
}

impl ScatterMapping {
    #[must_use]
    pub fn new(x: NumericColumn, y: NumericColumn) -> Self {
        Self {
            x,
            y,
            hue: None,
            size: None,
            style: None,
            sizes: (20.0, 200.0),
            alpha: 1.0,
        }
    }

    #[must_use]
    pub fn with_hue(mut self, hue: CategoricalColumn) -> Self {
        self.hue = Some(hue);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: NumericColumn, sizes: (f64, f64)) -> Self {
        self.size = Some(size);
        self.sizes = sizes;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: CategoricalColumn) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SizeMap {
    column: NumericColumn,
    domain: (f64, f64),
    areas: (f64, f64),
    levels: Vec<f64>,
}

impl SizeMap {
    fn area(&self, value: f64) -> f64 {
        let (low, high) = self.domain;
        let t = if high > low { (value - low) / (high - low) } else { 0.5 };
        self.areas.0 + t.clamp(0.0, 1.0) * (self.areas.1 - self.areas.0)
    }
}

/// Lookup tables from data values to marker color, area and shape.
///
/// Built once from the full dataset so every facet agrees on the mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMaps {
    hue: Option<(CategoricalColumn, Vec<Color>)>,
    size: Option<SizeMap>,
    style: Option<CategoricalColumn>,
    default_color: Color,
}

impl SemanticMaps {
    pub fn build(
        dataset: &TipsDataset,
        mapping: &ScatterMapping,
        theme: &Theme,
    ) -> ReportResult<Self> {
        let hue = mapping
            .hue
            .map(|column| (column, theme.palette.colors(column.level_count())));
        let size = match mapping.size {
            Some(column) => {
                let values = dataset.column(column);
                let domain = min_max(&values).ok_or_else(|| {
                    ReportError::InvalidData(format!(
                        "column `{}` has no finite values",
                        column.name()
                    ))
                })?;
                let mut levels: Vec<f64> = values.clone();
                levels.sort_by(f64::total_cmp);
                levels.dedup();
                Some(SizeMap {
                    column,
                    domain,
                    areas: mapping.sizes,
                    levels,
                })
            }
            None => None,
        };
        if let Some(style) = mapping.style {
            if style.level_count() > STYLE_SHAPES.len() {
                return Err(ReportError::InvalidData(format!(
                    "style column `{}` has more levels than marker shapes",
                    style.name()
                )));
            }
        }
        Ok(Self {
            hue,
            size,
            style: mapping.style,
            default_color: theme.palette.colors(1)[0],
        })
    }

    #[must_use]
    pub fn color(&self, record: &TipRecord) -> Color {
        match &self.hue {
            Some((column, colors)) => colors[column.level_index(record)],
            None => self.default_color,
        }
    }

    /// Marker diameter in points.
    #[must_use]
    pub fn diameter(&self, record: &TipRecord) -> f64 {
        let area = self
            .size
            .as_ref()
            .map_or(DEFAULT_MARKER_AREA, |size| size.area(size.column.value(record)));
        area.sqrt()
    }

    #[must_use]
    pub fn shape(&self, record: &TipRecord) -> MarkerShape {
        self.style
            .map_or(MarkerShape::Circle, |column| STYLE_SHAPES[column.level_index(record)])
    }

    /// Legend with one section per mapped semantic.
    #[must_use]
    pub fn legend(&self, placement: LegendPlacement) -> Legend {
        let neutral = Color::rgb(0.3, 0.3, 0.3);
        let mut legend = Legend::new(placement);
        if let Some((column, colors)) = &self.hue {
            let entries = column
                .levels()
                .into_iter()
                .zip(colors)
                .map(|(level, color)| {
                    LegendEntry::new(
                        level,
                        Swatch::Marker {
                            shape: MarkerShape::Circle,
                            size: DEFAULT_MARKER_AREA.sqrt(),
                            color: *color,
                        },
                    )
                })
                .collect();
            legend = legend.with_section(Some(column.name().to_owned()), entries);
        }
        if let Some(size) = &self.size {
            let entries = size
                .levels
                .iter()
                .map(|level| {
                    LegendEntry::new(
                        format!("{level}"),
                        Swatch::Marker {
                            shape: MarkerShape::Circle,
                            size: size.area(*level).sqrt(),
                            color: neutral,
                        },
                    )
                })
                .collect();
            legend = legend.with_section(Some(size.column.name().to_owned()), entries);
        }
        if let Some(column) = self.style {
            let entries = column
                .levels()
                .into_iter()
                .zip(STYLE_SHAPES)
                .map(|(level, shape)| {
                    LegendEntry::new(
                        level,
                        Swatch::Marker {
                            shape,
                            size: DEFAULT_MARKER_AREA.sqrt(),
                            color: neutral,
                        },
                    )
                })
                .collect();
            legend = legend.with_section(Some(column.name().to_owned()), entries);
        }
        legend
    }
}

/// One marker per row of `dataset`, styled through `maps`.
pub fn scatterplot(
    ax: &mut Axes,
    dataset: &TipsDataset,
    mapping: &ScatterMapping,
    maps: &SemanticMaps,
) {
    let edge = Stroke::solid(0.5, ax.theme().patch_edge_color);
    for record in dataset.records() {
        let at = DataPoint::new(mapping.x.value(record), mapping.y.value(record));
        if !at.x.is_finite() || !at.y.is_finite() {
            continue;
        }
        let shape = maps.shape(record);
        ax.add(Artist::Marker {
            at,
            size: maps.diameter(record),
            shape,
            fill: maps.color(record).with_alpha(mapping.alpha),
            edge: (shape != MarkerShape::Cross).then_some(edge),
        });
    }
    ax.set_xlabel(mapping.x.name());
    ax.set_ylabel(mapping.y.name());
}

/// Faceted scatter plot with one column per level of `col`.
pub fn relplot(
    dataset: &TipsDataset,
    mapping: &ScatterMapping,
    col: CategoricalColumn,
    height: f64,
    aspect: f64,
    theme: &Theme,
) -> ReportResult<FacetGrid> {
    let maps = SemanticMaps::build(dataset, mapping, theme)?;
    let mut grid = FacetGrid::new(None, Some(col), height, aspect, theme)?;
    let facets: Vec<_> = grid
        .cells()
        .iter()
        .map(|cell| grid.facet_data(dataset, *cell))
        .collect();
    for ((_, ax), data) in grid.facets_mut().zip(facets) {
        if let Some(data) = data {
            scatterplot(ax, &data, mapping, &maps);
        }
    }
    grid.set_axis_labels(mapping.x.name(), mapping.y.name());
    grid.add_legend(maps.legend(LegendPlacement::UpperLeft));
    Ok(grid)
}
