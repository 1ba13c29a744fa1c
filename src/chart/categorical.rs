use rust_decimal::Decimal;
use tracing::warn;

use crate::chart::Palette;
use crate::chart::axes::{Artist, AxisId, Axes};
use crate::chart::legend::{Legend, LegendEntry, LegendPlacement, Swatch};
use crate::chart::theme::TextStyle;
use crate::core::primitives::decimal_to_f64;
use crate::core::stats::{quantile_sorted, sorted_finite};
use crate::core::{BoxStats, DataPoint, GaussianKde};
use crate::dataset::{CategoricalColumn, CategoryCounts, CategorySums, NumericColumn, TipsDataset};
use crate::error::ReportResult;
use crate::render::{Color, LineStrokeStyle, MarkerShape, Stroke, TextHAlign, TextVAlign};

const GROUP_WIDTH: f64 = 0.8;
const VIOLIN_CUT: f64 = 2.0;

/// Center offset and width of hue slot `index` out of `slots` inside one
/// category.
fn dodge(index: usize, slots: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / slots.max(1) as f64;
    (-GROUP_WIDTH * 0.5 + width * (index as f64 + 0.5), width)
}

fn values_for(
    dataset: &TipsDataset,
    x: CategoricalColumn,
    x_index: usize,
    hue: Option<(CategoricalColumn, usize)>,
    y: NumericColumn,
) -> Vec<f64> {
    dataset
        .filter(|record| {
            x.level_index(record) == x_index
                && hue.is_none_or(|(column, index)| column.level_index(record) == index)
        })
        .map(|record| y.value(record))
        .collect()
}

fn patch_legend(
    column: CategoricalColumn,
    colors: &[Color],
    placement: LegendPlacement,
) -> Legend {
    let entries = column
        .levels()
        .into_iter()
        .zip(colors)
        .map(|(level, color)| LegendEntry::new(level, Swatch::Patch(*color)))
        .collect();
    Legend::new(placement).with_section(Some(column.name().to_owned()), entries)
}

fn setup_category_axis(ax: &mut Axes, x: CategoricalColumn) {
    let levels = x.levels();
    ax.set_categories(AxisId::X, &levels);
    ax.grid.x = None;
    ax.set_xlabel(x.name());
}

/// Tukey box plots of `y` per level of `x`, dodged by `hue`.
pub fn boxplot(
    ax: &mut Axes,
    dataset: &TipsDataset,
    x: CategoricalColumn,
    y: NumericColumn,
    hue: Option<CategoricalColumn>,
    palette: Palette,
) {
    let slots = hue.map_or(1, CategoricalColumn::level_count);
    let colors = palette.colors(if hue.is_some() { slots } else { x.level_count() });
    let line_color = ax.theme().line_color();
    let line = Stroke::solid(ax.theme().line_width, line_color);

    for x_index in 0..x.level_count() {
        for slot in 0..slots {
            let values = values_for(dataset, x, x_index, hue.map(|column| (column, slot)), y);
            let Some(stats) = BoxStats::from_values(&values) else {
                continue;
            };
            let (offset, width) = dodge(slot, slots);
            let center = x_index as f64 + offset;
            let half = width * 0.45;
            let fill = if hue.is_some() { colors[slot] } else { colors[x_index] };

            ax.add(Artist::Rect {
                x0: center - half,
                x1: center + half,
                y0: stats.q1,
                y1: stats.q3,
                fill,
                edge: Some(line),
            });
            ax.add(Artist::Line {
                from: DataPoint::new(center - half, stats.median),
                to: DataPoint::new(center + half, stats.median),
                stroke: line,
            });
            for (from, to) in [(stats.q1, stats.whisker_low), (stats.q3, stats.whisker_high)] {
                ax.add(Artist::Line {
                    from: DataPoint::new(center, from),
                    to: DataPoint::new(center, to),
                    stroke: line,
                });
                ax.add(Artist::Line {
                    from: DataPoint::new(center - half * 0.5, to),
                    to: DataPoint::new(center + half * 0.5, to),
                    stroke: line,
                });
            }
            for outlier in &stats.outliers {
                ax.add(Artist::Marker {
                    at: DataPoint::new(center, *outlier),
                    size: 5.0,
                    shape: MarkerShape::Square,
                    fill: line_color,
                    edge: None,
                });
            }
        }
    }

    setup_category_axis(ax, x);
    ax.set_ylabel(y.name());
    if let Some(column) = hue {
        ax.set_legend(patch_legend(column, &colors, LegendPlacement::UpperLeft));
    }
}

/// Violins of `y` per level of `x`; with `split` the two `hue` levels share
/// one violin, one half each.
///
/// Densities are normalized across all violins so that each encloses the
/// same area. The median is a dashed line across the body, the outer
/// quartiles dotted ones.
pub fn violinplot(
    ax: &mut Axes,
    dataset: &TipsDataset,
    x: CategoricalColumn,
    y: NumericColumn,
    hue: CategoricalColumn,
    split: bool,
    palette: Palette,
) {
    let slots = hue.level_count();
    let colors = palette.colors(slots);
    let line_color = ax.theme().line_color();

    let mut bodies = Vec::new();
    for x_index in 0..x.level_count() {
        for slot in 0..slots {
            let values = values_for(dataset, x, x_index, Some((hue, slot)), y);
            if values.is_empty() {
                continue;
            }
            match GaussianKde::fit(&values, 1.0) {
                Some(kde) => {
                    let curve = kde.evaluate(VIOLIN_CUT, GaussianKde::DEFAULT_GRID_SIZE);
                    bodies.push((x_index, slot, values, kde, curve));
                }
                None => warn!(
                    x = x.levels()[x_index],
                    hue = hue.levels()[slot],
                    samples = values.len(),
                    "violin skipped: group has no spread"
                ),
            }
        }
    }

    let peak = bodies
        .iter()
        .flat_map(|(.., curve)| curve.iter().map(|point| point.y))
        .fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        setup_category_axis(ax, x);
        ax.set_ylabel(y.name());
        return;
    }

    let dash = Stroke {
        width: ax.theme().line_width * 0.8,
        color: line_color,
        style: LineStrokeStyle::Dashed,
    };
    let dot = Stroke {
        style: LineStrokeStyle::Dotted,
        ..dash
    };
    for (x_index, slot, values, kde, curve) in &bodies {
        let (center, max_half) = if split {
            (*x_index as f64, GROUP_WIDTH * 0.5)
        } else {
            let (offset, width) = dodge(*slot, slots);
            (*x_index as f64 + offset, width * 0.5)
        };
        // Left half for the first hue level when split, both halves otherwise.
        let sides: &[f64] = match (split, *slot) {
            (true, 0) => &[-1.0],
            (true, _) => &[1.0],
            (false, _) => &[-1.0, 1.0],
        };
        let half_width = |density: f64| density / peak * max_half;

        let side_of = |side: f64| {
            curve
                .iter()
                .map(move |point| DataPoint::new(center + side * half_width(point.y), point.x))
        };
        let mut outline: Vec<DataPoint> = Vec::with_capacity(curve.len() * 2);
        if let [side] = sides {
            outline.extend(side_of(*side));
            outline.push(DataPoint::new(center, curve[curve.len() - 1].x));
            outline.push(DataPoint::new(center, curve[0].x));
        } else {
            outline.extend(side_of(1.0));
            let left: Vec<DataPoint> = side_of(-1.0).collect();
            outline.extend(left.into_iter().rev());
        }
        ax.add(Artist::Path {
            points: outline,
            closed: true,
            fill: Some(colors[*slot]),
            stroke: Some(Stroke::solid(ax.theme().line_width, line_color)),
        });

        let sorted = sorted_finite(values);
        let quartiles =
            [0.25, 0.5, 0.75].map(|q| quantile_sorted(&sorted, q).unwrap_or(kde.support(0.0).0));
        for (index, quartile) in quartiles.into_iter().enumerate() {
            let reach = half_width(kde.density(quartile));
            let (left, right) = match sides {
                [side] if *side < 0.0 => (center - reach, center),
                [_] => (center, center + reach),
                _ => (center - reach, center + reach),
            };
            ax.add(Artist::Line {
                from: DataPoint::new(left, quartile),
                to: DataPoint::new(right, quartile),
                stroke: if index == 1 { dash } else { dot },
            });
        }
    }

    setup_category_axis(ax, x);
    ax.set_ylabel(y.name());
    ax.set_legend(patch_legend(hue, &colors, LegendPlacement::UpperLeft));
}

/// Bar chart of observation counts per level of `x`, dodged by `hue`.
/// Levels without observations keep their slot with a zero-height bar.
pub fn countplot(
    ax: &mut Axes,
    dataset: &TipsDataset,
    x: CategoricalColumn,
    hue: Option<CategoricalColumn>,
    palette: Palette,
) -> CategoryCounts {
    let counts = CategoryCounts::tabulate(dataset, x, hue);
    let slots = hue.map_or(1, CategoricalColumn::level_count);
    let colors = palette.colors(if hue.is_some() { slots } else { x.level_count() });
    let edge = Stroke::solid(0.8, ax.theme().patch_edge_color);

    for (cell_index, (_, _, count)) in counts.iter().enumerate() {
        let (x_index, slot) = (cell_index / slots, cell_index % slots);
        let (offset, width) = dodge(slot, slots);
        let center = x_index as f64 + offset;
        ax.add(Artist::Rect {
            x0: center - width * 0.5,
            x1: center + width * 0.5,
            y0: 0.0,
            y1: count as f64,
            fill: if hue.is_some() { colors[slot] } else { colors[x_index] },
            edge: Some(edge),
        });
    }

    setup_category_axis(ax, x);
    ax.set_ylabel("count");
    ax.y.sticky_zero = true;
    if let Some(column) = hue {
        ax.set_legend(patch_legend(column, &colors, LegendPlacement::UpperLeft));
    }
    counts
}

/// Aggregation applied per category by [`barplot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimator {
    Sum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub center: f64,
    pub width: f64,
    pub value: Decimal,
}

/// Bars drawn by [`barplot`], in level order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarContainer {
    pub bars: Vec<Bar>,
}

/// One bar per level of `x`, colored by level.
pub fn barplot(
    ax: &mut Axes,
    dataset: &TipsDataset,
    x: CategoricalColumn,
    y: NumericColumn,
    estimator: Estimator,
    palette: Palette,
) -> ReportResult<BarContainer> {
    let sums = match estimator {
        Estimator::Sum => CategorySums::tabulate(dataset, x, y)?,
    };
    let colors = palette.colors(x.level_count());
    let edge = Stroke::solid(0.8, ax.theme().patch_edge_color);

    let mut bars = Vec::with_capacity(x.level_count());
    for (index, (label, value)) in sums.iter().enumerate() {
        let height = decimal_to_f64(value, "bar height")?;
        ax.add(Artist::Rect {
            x0: index as f64 - GROUP_WIDTH * 0.5,
            x1: index as f64 + GROUP_WIDTH * 0.5,
            y0: 0.0,
            y1: height,
            fill: colors[index],
            edge: Some(edge),
        });
        bars.push(Bar {
            label,
            center: index as f64,
            width: GROUP_WIDTH,
            value,
        });
    }

    setup_category_axis(ax, x);
    ax.set_ylabel(y.name());
    ax.y.sticky_zero = true;
    Ok(BarContainer { bars })
}

/// Writes each bar's value, rounded to `decimals`, just above the bar.
pub fn bar_label(
    ax: &mut Axes,
    container: &BarContainer,
    decimals: u32,
    style: TextStyle,
) -> ReportResult<()> {
    for bar in &container.bars {
        let rounded = bar.value.round_dp(decimals);
        ax.add(Artist::Text {
            at: DataPoint::new(bar.center, decimal_to_f64(bar.value, "bar label")?),
            offset: (0.0, -3.0),
            text: format!("{rounded:.prec$}", prec = decimals as usize),
            style,
            h_align: TextHAlign::Center,
            v_align: TextVAlign::Bottom,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Estimator, bar_label, barplot, boxplot, countplot, violinplot};
    use crate::chart::{Artist, AxisId, Axes, Palette, Theme};
    use crate::core::PlotRect;
    use crate::dataset::{CategoricalColumn, NumericColumn, TipsDataset};

    fn dataset() -> TipsDataset {
        let csv = "total_bill,tip,sex,smoker,day,time,size\n\
            10.00,1.00,Male,No,Thur,Lunch,2\n\
            12.50,2.00,Male,Yes,Thur,Lunch,2\n\
            14.25,2.50,Male,No,Thur,Lunch,3\n\
            20.00,3.00,Female,Yes,Sun,Dinner,2\n\
            22.00,3.50,Female,No,Sun,Dinner,2\n\
            25.00,2.00,Female,Yes,Sun,Dinner,4\n\
            30.00,5.00,Male,Yes,Sat,Dinner,4\n";
        TipsDataset::from_csv_reader(csv.as_bytes()).expect("dataset")
    }

    fn axes() -> Axes {
        Axes::new(PlotRect::new(40.0, 20.0, 300.0, 200.0), &Theme::darkgrid())
    }

    fn rect_count(ax: &Axes) -> usize {
        ax.artists()
            .iter()
            .filter(|artist| matches!(artist, Artist::Rect { .. }))
            .count()
    }

    #[test]
    fn countplot_keeps_empty_levels() {
        let mut ax = axes();
        let counts = countplot(
            &mut ax,
            &dataset(),
            CategoricalColumn::Day,
            Some(CategoricalColumn::Time),
            Palette::Pastel,
        );
        assert_eq!(rect_count(&ax), 8);
        assert_eq!(counts.get("Thur", Some("Lunch")), 3);
        assert_eq!(counts.get("Fri", Some("Dinner")), 0);
        assert!(ax.legend().is_some());
        assert_eq!(ax.label(AxisId::Y), Some("count"));
    }

    #[test]
    fn barplot_sums_exactly_and_labels_bars() {
        let mut ax = axes();
        let container = barplot(
            &mut ax,
            &dataset(),
            CategoricalColumn::Day,
            NumericColumn::TotalBill,
            Estimator::Sum,
            Palette::Crest,
        )
        .expect("barplot");
        let sums: Vec<_> = container.bars.iter().map(|bar| bar.value).collect();
        assert_eq!(
            sums,
            vec![
                Decimal::new(3675, 2),
                Decimal::ZERO,
                Decimal::new(3000, 2),
                Decimal::new(6700, 2)
            ]
        );

        bar_label(&mut ax, &container, 2, Theme::darkgrid().text_style(10.0)).expect("labels");
        let labels: Vec<_> = ax
            .artists()
            .iter()
            .filter_map(|artist| match artist {
                Artist::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["36.75", "0.00", "30.00", "67.00"]);
    }

    #[test]
    fn boxplot_dodges_hue_levels() {
        let mut ax = axes();
        boxplot(
            &mut ax,
            &dataset(),
            CategoricalColumn::Day,
            NumericColumn::TotalBill,
            Some(CategoricalColumn::Sex),
            Palette::Viridis,
        );
        // Thur/Male, Sat/Male and Sun/Female hold data.
        assert_eq!(rect_count(&ax), 3);
        assert_eq!(ax.view_limits(AxisId::X), (-0.5, 3.5));
    }

    #[test]
    fn split_violin_draws_one_half_per_hue() {
        let mut ax = axes();
        violinplot(
            &mut ax,
            &dataset(),
            CategoricalColumn::Time,
            NumericColumn::TotalBill,
            CategoricalColumn::Sex,
            true,
            Palette::Rocket,
        );
        let bodies: Vec<_> = ax
            .artists()
            .iter()
            .filter_map(|artist| match artist {
                Artist::Path { points, closed: true, .. } => Some(points),
                _ => None,
            })
            .collect();
        // Lunch/Male and Dinner/Female have spread; Dinner/Male is a single row.
        assert_eq!(bodies.len(), 2);
        let lunch_male = bodies[0];
        assert!(lunch_male.iter().all(|point| point.x <= 0.0 + 1e-12));
        let dinner_female = bodies[1];
        assert!(dinner_female.iter().all(|point| point.x >= 1.0 - 1e-12));
    }
}
