use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Affine mapping from a data domain onto a pixel range.
///
/// The range may be decreasing, which is how y axes map larger values to
/// smaller page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ReportResult<Self> {
        let (domain_start, domain_end) = domain;
        let (range_start, range_end) = range;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ReportError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ReportError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    pub fn invert(self, pixel: f64) -> ReportResult<f64> {
        if !pixel.is_finite() {
            return Err(ReportError::InvalidData("pixel must be finite".to_owned()));
        }
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Err(ReportError::InvalidData(
                "cannot invert a scale with an empty range".to_owned(),
            ));
        }
        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

/// Picks a tick step from the 1/2/2.5/5 x 10^k ladder so that roughly
/// `target_count` ticks fall inside `[low, high]`.
#[must_use]
pub fn nice_step(low: f64, high: f64, target_count: usize) -> f64 {
    let span = high - low;
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let intervals = target_count.max(2) as f64 - 1.0;
    let raw = span / intervals;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 2.5 {
        2.5
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

#[must_use]
pub fn nice_ticks(low: f64, high: f64, target_count: usize) -> Vec<f64> {
    if !low.is_finite() || !high.is_finite() || high <= low || target_count == 0 {
        return Vec::new();
    }

    let step = nice_step(low, high, target_count);
    let first = (low / step).ceil() * step;
    let tolerance = step * 1e-9;
    let mut ticks = Vec::new();
    let mut index = 0usize;
    loop {
        let tick = first + step * index as f64;
        if tick > high + tolerance {
            break;
        }
        // Snap values like 0.30000000000000004 back onto the ladder.
        let snapped = (tick / step).round() * step;
        ticks.push(if snapped.abs() < tolerance { 0.0 } else { snapped });
        index += 1;
    }
    ticks
}

/// Number of decimals needed to print ticks spaced by `step` without
/// collisions.
#[must_use]
pub fn tick_decimals(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    if step >= 1.0 {
        return usize::from(step.fract().abs() > 1e-9);
    }
    let decimals = (-step.log10()).ceil() as usize;
    let scaled = step * 10f64.powi(decimals as i32);
    if (scaled - scaled.round()).abs() > 1e-9 {
        decimals + 1
    } else {
        decimals
    }
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, nice_step, nice_ticks, tick_decimals};

    #[test]
    fn scale_maps_onto_inverted_range() {
        let scale = LinearScale::new((0.0, 10.0), (400.0, 100.0)).expect("scale");
        assert!((scale.map(0.0) - 400.0).abs() <= 1e-9);
        assert!((scale.map(10.0) - 100.0).abs() <= 1e-9);
        assert!((scale.map(5.0) - 250.0).abs() <= 1e-9);
        let value = scale.invert(250.0).expect("invert");
        assert!((value - 5.0).abs() <= 1e-9);
    }

    #[test]
    fn scale_rejects_empty_domain() {
        assert!(LinearScale::new((3.0, 3.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn nice_step_uses_round_ladder() {
        assert!((nice_step(0.0, 50.0, 6) - 10.0).abs() <= 1e-12);
        assert!((nice_step(0.0, 1500.0, 7) - 250.0).abs() <= 1e-9);
        assert!((nice_step(0.0, 0.9, 5) - 0.25).abs() <= 1e-12);
    }

    #[test]
    fn nice_ticks_stay_inside_bounds() {
        let ticks = nice_ticks(3.07, 50.81, 6);
        assert_eq!(ticks, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn tick_decimals_follow_step() {
        assert_eq!(tick_decimals(10.0), 0);
        assert_eq!(tick_decimals(2.5), 1);
        assert_eq!(tick_decimals(0.25), 2);
        assert_eq!(tick_decimals(0.1), 1);
    }
}
