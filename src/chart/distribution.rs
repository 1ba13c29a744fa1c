use tracing::warn;

use crate::chart::axes::{Artist, Axes};
use crate::core::{DataPoint, GaussianKde, HistogramBin, histogram};
use crate::error::ReportResult;
use crate::render::{Color, Stroke};

/// Options for [`histplot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistOptions {
    pub bins: usize,
    pub kde: bool,
    pub color: Color,
    pub alpha: f64,
}

impl HistOptions {
    #[must_use]
    pub fn new(bins: usize, color: Color) -> Self {
        Self {
            bins,
            kde: false,
            color,
            alpha: 0.75,
        }
    }

    #[must_use]
    pub fn with_kde(mut self, kde: bool) -> Self {
        self.kde = kde;
        self
    }
}

/// Histogram of `values` with equal-width bins, optionally overlaid by the
/// kernel density curve scaled to counts.
pub fn histplot(
    ax: &mut Axes,
    values: &[f64],
    options: &HistOptions,
) -> ReportResult<Vec<HistogramBin>> {
    let bins = histogram(values, options.bins)?;
    let edge = Stroke::solid(0.8, ax.theme().patch_edge_color);
    for bin in &bins {
        ax.add(Artist::Rect {
            x0: bin.left,
            x1: bin.right,
            y0: 0.0,
            y1: bin.count as f64,
            fill: options.color.with_alpha(options.alpha),
            edge: Some(edge),
        });
    }
    ax.y.sticky_zero = true;
    ax.set_ylabel("Count");

    if options.kde {
        match GaussianKde::fit(values, 1.0) {
            Some(kde) => {
                let bin_width = bins.first().map_or(1.0, |bin| bin.width());
                let scale = kde.sample_count() as f64 * bin_width;
                let points = kde
                    .evaluate(0.0, GaussianKde::DEFAULT_GRID_SIZE)
                    .into_iter()
                    .map(|point| DataPoint::new(point.x, point.y * scale))
                    .collect();
                ax.add(Artist::Path {
                    points,
                    closed: false,
                    fill: None,
                    stroke: Some(Stroke::solid(ax.theme().line_width, options.color)),
                });
            }
            None => warn!(
                samples = values.len(),
                "density curve skipped: samples have no spread"
            ),
        }
    }
    Ok(bins)
}

/// Options for [`kdeplot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdeOptions {
    pub fill: bool,
    pub color: Color,
    pub bw_adjust: f64,
    pub cut: f64,
}

impl KdeOptions {
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            fill: false,
            color,
            bw_adjust: 1.0,
            cut: 3.0,
        }
    }

    #[must_use]
    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }
}

/// Density curve of `values`. Returns `None`, drawing nothing, when the
/// samples cannot support a density.
pub fn kdeplot(
    ax: &mut Axes,
    values: &[f64],
    options: &KdeOptions,
) -> ReportResult<Option<GaussianKde>> {
    ax.set_ylabel("Density");
    let Some(kde) = GaussianKde::fit(values, options.bw_adjust) else {
        warn!(
            samples = values.len(),
            "density plot skipped: samples have no spread"
        );
        return Ok(None);
    };
    let curve: Vec<DataPoint> = kde.evaluate(options.cut, GaussianKde::DEFAULT_GRID_SIZE);
    if options.fill {
        if let (Some(first), Some(last)) = (curve.first().copied(), curve.last().copied()) {
            let mut outline = curve.clone();
            outline.push(DataPoint::new(last.x, 0.0));
            outline.push(DataPoint::new(first.x, 0.0));
            ax.add(Artist::Path {
                points: outline,
                closed: true,
                fill: Some(options.color.with_alpha(0.25)),
                stroke: None,
            });
        }
    }
    ax.add(Artist::Path {
        points: curve,
        closed: false,
        fill: None,
        stroke: Some(Stroke::solid(ax.theme().line_width, options.color)),
    });
    ax.y.sticky_zero = true;
    Ok(Some(kde))
}

#[cfg(test)]
mod tests {
    use super::{HistOptions, KdeOptions, histplot, kdeplot};
    use crate::chart::{Artist, AxisId, Axes, Theme, named};
    use crate::core::PlotRect;

    fn axes() -> Axes {
        Axes::new(PlotRect::new(40.0, 20.0, 300.0, 200.0), &Theme::darkgrid())
    }

    #[test]
    fn histplot_draws_one_bar_per_bin_plus_curve() {
        let mut ax = axes();
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 6.0];
        let bins = histplot(&mut ax, &values, &HistOptions::new(4, named::SKYBLUE).with_kde(true))
            .expect("histogram");
        assert_eq!(bins.len(), 4);
        let bars = ax.artists().iter().filter(|a| matches!(a, Artist::Rect { .. })).count();
        let curves = ax.artists().iter().filter(|a| matches!(a, Artist::Path { .. })).count();
        assert_eq!((bars, curves), (4, 1));
        assert_eq!(ax.view_limits(AxisId::Y).0, 0.0);
    }

    #[test]
    fn constant_samples_skip_the_density() {
        let mut ax = axes();
        let values = [2.0, 2.0, 2.0];
        let kde = kdeplot(&mut ax, &values, &KdeOptions::new(named::LIGHTCORAL).filled())
            .expect("kde");
        assert!(kde.is_none());
        assert!(ax.artists().is_empty());

        histplot(&mut ax, &values, &HistOptions::new(3, named::SKYBLUE).with_kde(true))
            .expect("histogram");
        assert!(ax.artists().iter().all(|a| matches!(a, Artist::Rect { .. })));
    }

    #[test]
    fn filled_kde_adds_area_under_curve() {
        let mut ax = axes();
        let values = [1.0, 1.5, 2.0, 3.5, 5.0];
        kdeplot(&mut ax, &values, &KdeOptions::new(named::LIGHTCORAL).filled()).expect("kde");
        let filled = ax
            .artists()
            .iter()
            .filter(|a| matches!(a, Artist::Path { fill: Some(_), .. }))
            .count();
        assert_eq!(filled, 1);
        assert_eq!(ax.label(AxisId::Y), Some("Density"));
    }
}
