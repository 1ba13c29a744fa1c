//! Estimators behind the chart kinds: binning, kernel density, box summaries,
//! least-squares fits and correlation.

use std::f64::consts::PI;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::statistics::Statistics;

use crate::core::DataPoint;
use crate::error::{ReportError, ReportResult};

#[must_use]
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<OrderedFloat<f64>> = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect();
    sorted.sort_unstable();
    sorted.into_iter().map(OrderedFloat::into_inner).collect()
}

/// Linear-interpolation quantile of already sorted data (`q` in `[0, 1]`).
#[must_use]
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !q.is_finite() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[must_use]
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((low, high)) => Some((low.min(value), high.max(value))),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl HistogramBin {
    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }
}

/// Equal-width bins spanning `[min, max]`; the last bin is closed on the right.
pub fn histogram(values: &[f64], bins: usize) -> ReportResult<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(ReportError::InvalidData(
            "histogram needs at least one bin".to_owned(),
        ));
    }
    let Some((mut low, mut high)) = min_max(values) else {
        return Ok(Vec::new());
    };
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values.iter().copied().filter(|value| value.is_finite()) {
        let index = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            left: low + width * index as f64,
            right: if index + 1 == bins {
                high
            } else {
                low + width * (index + 1) as f64
            },
            count,
        })
        .collect())
}

/// Gaussian kernel density estimate with Scott's bandwidth rule.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    pub const DEFAULT_GRID_SIZE: usize = 200;

    /// Returns `None` when the samples cannot support a density: fewer than
    /// two finite values or zero variance.
    #[must_use]
    pub fn fit(samples: &[f64], bw_adjust: f64) -> Option<Self> {
        let samples = sorted_finite(samples);
        if samples.len() < 2 || !bw_adjust.is_finite() || bw_adjust <= 0.0 {
            return None;
        }
        let std_dev = samples.iter().std_dev();
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return None;
        }
        let scott = (samples.len() as f64).powf(-0.2);
        Some(Self {
            bandwidth: std_dev * scott * bw_adjust,
            samples,
        })
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.samples.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        let sum: f64 = self
            .samples
            .iter()
            .map(|sample| {
                let z = (x - sample) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * sum
    }

    /// Evaluation range: the data range extended by `cut` bandwidths.
    #[must_use]
    pub fn support(&self, cut: f64) -> (f64, f64) {
        let low = self.samples[0];
        let high = self.samples[self.samples.len() - 1];
        (low - cut * self.bandwidth, high + cut * self.bandwidth)
    }

    /// Density sampled on an evenly spaced grid over [`Self::support`].
    #[must_use]
    pub fn evaluate(&self, cut: f64, grid_size: usize) -> Vec<DataPoint> {
        let grid_size = grid_size.max(2);
        let (low, high) = self.support(cut);
        let step = (high - low) / (grid_size - 1) as f64;
        (0..grid_size)
            .map(|index| {
                let x = low + step * index as f64;
                DataPoint::new(x, self.density(x))
            })
            .collect()
    }
}

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub const WHISKER_IQR: f64 = 1.5;

    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted_finite(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let low_fence = q1 - Self::WHISKER_IQR * iqr;
        let high_fence = q3 + Self::WHISKER_IQR * iqr;

        let inside = || sorted.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
        let whisker_low = inside().next().unwrap_or(q1);
        let whisker_high = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
    x_mean: f64,
    sxx: f64,
    residual_std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub x: f64,
    pub lower: f64,
    pub upper: f64,
}

impl LinearFit {
    /// `None` when fewer than two points or all `x` equal.
    #[must_use]
    pub fn fit(points: &[DataPoint]) -> Option<Self> {
        let points: Vec<DataPoint> = points
            .iter()
            .copied()
            .filter(|point| point.x.is_finite() && point.y.is_finite())
            .collect();
        let n = points.len();
        if n < 2 {
            return None;
        }

        let x_mean = points.iter().map(|point| point.x).mean();
        let y_mean = points.iter().map(|point| point.y).mean();
        let sxx: f64 = points.iter().map(|point| (point.x - x_mean).powi(2)).sum();
        if sxx <= 0.0 {
            return None;
        }
        let sxy: f64 = points
            .iter()
            .map(|point| (point.x - x_mean) * (point.y - y_mean))
            .sum();
        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let residual_std = if n > 2 {
            let sse: f64 = points
                .iter()
                .map(|point| (point.y - (intercept + slope * point.x)).powi(2))
                .sum();
            (sse / (n - 2) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            slope,
            intercept,
            n,
            x_mean,
            sxx,
            residual_std,
        })
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Confidence band of the mean response at each `x`, for a two-sided
    /// `level` such as `0.95`. `None` with fewer than three points.
    #[must_use]
    pub fn confidence_band(&self, xs: &[f64], level: f64) -> Option<Vec<BandPoint>> {
        if self.n < 3 || !self.residual_std.is_finite() || !(0.0..1.0).contains(&level) {
            return None;
        }
        let t = StudentsT::new(0.0, 1.0, (self.n - 2) as f64)
            .ok()?
            .inverse_cdf(0.5 + level / 2.0);
        let n = self.n as f64;
        Some(
            xs.iter()
                .map(|x| {
                    let se = self.residual_std
                        * (1.0 / n + (x - self.x_mean).powi(2) / self.sxx).sqrt();
                    let y = self.predict(*x);
                    BandPoint {
                        x: *x,
                        lower: y - t * se,
                        upper: y + t * se,
                    }
                })
                .collect(),
        )
    }
}

/// Pearson correlation; `None` for mismatched lengths, fewer than two pairs
/// or a constant column.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let x_mean = xs.iter().mean();
    let y_mean = ys.iter().mean();
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Symmetric matrix of pairwise Pearson coefficients. Undefined cells hold
/// `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn from_columns(columns: &[(&str, Vec<f64>)]) -> ReportResult<Self> {
        if columns.is_empty() {
            return Err(ReportError::InvalidData(
                "correlation needs at least one column".to_owned(),
            ));
        }
        let rows = columns[0].1.len();
        if columns.iter().any(|(_, values)| values.len() != rows) {
            return Err(ReportError::InvalidData(
                "correlation columns must have equal length".to_owned(),
            ));
        }

        let values = columns
            .iter()
            .map(|(_, a)| {
                columns
                    .iter()
                    .map(|(_, b)| pearson(a, b).unwrap_or(f64::NAN))
                    .collect()
            })
            .collect();
        Ok(Self {
            labels: columns.iter().map(|(name, _)| (*name).to_owned()).collect(),
            values,
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Smallest and largest defined coefficient.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let flat: Vec<f64> = self.values.iter().flatten().copied().collect();
        min_max(&flat)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{
        BoxStats, CorrelationMatrix, GaussianKde, LinearFit, histogram, pearson, quantile_sorted,
    };
    use crate::core::DataPoint;

    #[test]
    fn histogram_closes_last_bin() {
        let bins = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).expect("bins");
        assert_eq!(bins.len(), 4);
        assert_eq!(
            bins.iter().map(|bin| bin.count).collect::<Vec<_>>(),
            vec![1, 1, 1, 2]
        );
        assert_relative_eq!(bins[3].right, 4.0);
    }

    #[test]
    fn histogram_of_constant_values_uses_unit_range() {
        let bins = histogram(&[2.0, 2.0], 2).expect("bins");
        assert_relative_eq!(bins[0].left, 1.5);
        assert_relative_eq!(bins[1].right, 2.5);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn histogram_rejects_zero_bins() {
        assert!(histogram(&[1.0], 0).is_err());
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_sorted(&sorted, 0.25).expect("q1"), 1.75);
        assert_relative_eq!(quantile_sorted(&sorted, 0.5).expect("median"), 2.5);
    }

    #[test]
    fn box_stats_flag_far_values() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).expect("stats");
        assert_eq!(stats.outliers, vec![100.0]);
        assert_relative_eq!(stats.whisker_high, 5.0);
        assert_relative_eq!(stats.whisker_low, 1.0);
    }

    #[test]
    fn kde_needs_spread() {
        assert!(GaussianKde::fit(&[1.0], 1.0).is_none());
        assert!(GaussianKde::fit(&[2.0, 2.0, 2.0], 1.0).is_none());
    }

    #[test]
    fn kde_uses_scott_bandwidth() {
        let kde = GaussianKde::fit(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.0).expect("kde");
        let expected = 2.5f64.sqrt() * 5f64.powf(-0.2);
        assert_relative_eq!(kde.bandwidth(), expected, epsilon = 1e-12);
        let (low, high) = kde.support(0.0);
        assert_relative_eq!(low, 1.0);
        assert_relative_eq!(high, 5.0);
    }

    #[test]
    fn kde_integrates_to_one() {
        let kde = GaussianKde::fit(&[0.0, 1.0, 1.5, 3.0, 7.0], 1.0).expect("kde");
        let grid = kde.evaluate(6.0, 2000);
        let area: f64 = grid
            .windows(2)
            .map(|pair| (pair[1].x - pair[0].x) * (pair[0].y + pair[1].y) * 0.5)
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let points: Vec<DataPoint> = (0..5)
            .map(|i| DataPoint::new(f64::from(i), 1.0 + 2.0 * f64::from(i)))
            .collect();
        let fit = LinearFit::fit(&points).expect("fit");
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);

        let band = fit.confidence_band(&[2.0], 0.95).expect("band");
        assert_relative_eq!(band[0].lower, 5.0, epsilon = 1e-9);
        assert_relative_eq!(band[0].upper, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn confidence_band_widens_away_from_mean() {
        let points = vec![
            DataPoint::new(0.0, 0.2),
            DataPoint::new(1.0, 0.9),
            DataPoint::new(2.0, 2.3),
            DataPoint::new(3.0, 2.8),
            DataPoint::new(4.0, 4.1),
        ];
        let fit = LinearFit::fit(&points).expect("fit");
        let band = fit.confidence_band(&[2.0, 4.0], 0.95).expect("band");
        let center_width = band[0].upper - band[0].lower;
        let edge_width = band[1].upper - band[1].lower;
        assert!(edge_width > center_width);
    }

    #[test]
    fn two_point_fit_has_no_band() {
        let fit = LinearFit::fit(&[DataPoint::new(0.0, 0.0), DataPoint::new(1.0, 1.0)])
            .expect("fit");
        assert!(fit.confidence_band(&[0.5], 0.95).is_none());
    }

    #[test]
    fn pearson_detects_perfect_correlation() {
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).expect("r");
        assert_relative_eq!(r, -1.0);
        assert!(pearson(&[1.0, 1.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let matrix = CorrelationMatrix::from_columns(&[
            ("a", vec![1.0, 2.0, 3.0, 4.0]),
            ("b", vec![2.0, 1.0, 4.0, 3.0]),
        ])
        .expect("matrix");
        assert_eq!(matrix.size(), 2);
        assert_relative_eq!(matrix.values[0][0], 1.0);
        assert_relative_eq!(matrix.values[0][1], matrix.values[1][0]);
        assert_relative_eq!(matrix.values[0][1], 0.6, epsilon = 1e-12);
    }
}
