use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Page size in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Builds a viewport from a figure size expressed in inches.
    pub fn from_inches(width_in: f64, height_in: f64) -> ReportResult<Self> {
        let valid = |value: f64| value.is_finite() && value > 0.0;
        if !valid(width_in) || !valid(height_in) {
            return Err(ReportError::InvalidData(
                "figure size must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            width: (width_in * POINTS_PER_INCH).round() as u32,
            height: (height_in * POINTS_PER_INCH).round() as u32,
        })
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in page coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.left + self.width * 0.5
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Shrinks the rectangle by the given margins, keeping at least one point
    /// on each side.
    #[must_use]
    pub fn inset(self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let width = (self.width - left - right).max(1.0);
        let height = (self.height - top - bottom).max(1.0);
        Self::new(self.left + left, self.top + top, width, height)
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::{PlotRect, Viewport};

    #[test]
    fn viewport_from_inches_uses_pdf_points() {
        let viewport = Viewport::from_inches(12.0, 5.0).expect("viewport");
        assert_eq!(viewport, Viewport::new(864, 360));
    }

    #[test]
    fn viewport_from_inches_rejects_zero() {
        assert!(Viewport::from_inches(0.0, 5.0).is_err());
    }

    #[test]
    fn inset_never_collapses_rect() {
        let rect = PlotRect::new(0.0, 0.0, 10.0, 10.0).inset(8.0, 8.0, 8.0, 8.0);
        assert!(rect.is_valid());
        assert!((rect.width - 1.0).abs() <= 1e-12);
    }
}
