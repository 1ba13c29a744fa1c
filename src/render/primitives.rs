use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds an opaque color from 8-bit channels, e.g. `0x4C, 0x72, 0xB0`.
    #[must_use]
    pub const fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    /// Linear interpolation in RGB space; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self::rgba(
            mix(self.red, other.red),
            mix(self.green, other.green),
            mix(self.blue, other.blue),
            mix(self.alpha, other.alpha),
        )
    }

    /// Scales the RGB channels towards black (`factor < 1`) or white
    /// (`factor > 1`).
    #[must_use]
    pub fn shade(self, factor: f64) -> Self {
        if factor <= 1.0 {
            let factor = factor.max(0.0);
            Self::rgba(
                self.red * factor,
                self.green * factor,
                self.blue * factor,
                self.alpha,
            )
        } else {
            self.lerp(Self::rgb(1.0, 1.0, 1.0).with_alpha(self.alpha), factor - 1.0)
        }
    }

    /// WCAG relative luminance of the opaque color.
    #[must_use]
    pub fn relative_luminance(self) -> f64 {
        let linear = |channel: f64| {
            if channel <= 0.03928 {
                channel / 12.92
            } else {
                ((channel + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.red) + 0.7152 * linear(self.green) + 0.0722 * linear(self.blue)
    }

    pub fn validate(self) -> ReportResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ReportError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStrokeStyle {
    /// Dash lengths for a stroke of `width`, empty for solid lines.
    #[must_use]
    pub fn dash_pattern(self, width: f64) -> Vec<f64> {
        let unit = width.max(0.5);
        match self {
            Self::Solid => Vec::new(),
            Self::Dashed => vec![3.7 * unit, 1.6 * unit],
            Self::Dotted => vec![unit, 1.65 * unit],
        }
    }
}

/// Outline settings shared by paths and markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Color,
    pub style: LineStrokeStyle,
}

impl Stroke {
    #[must_use]
    pub const fn solid(width: f64, color: Color) -> Self {
        Self {
            width,
            color,
            style: LineStrokeStyle::Solid,
        }
    }

    pub fn validate(self) -> ReportResult<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(ReportError::InvalidData(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one line segment in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub stroke_style: LineStrokeStyle,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            stroke_style: LineStrokeStyle::Solid,
        }
    }

    #[must_use]
    pub const fn with_stroke_style(mut self, stroke_style: LineStrokeStyle) -> Self {
        self.stroke_style = stroke_style;
        self
    }

    pub fn validate(self) -> ReportResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ReportError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ReportError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one filled rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub border_width: f64,
    pub border_color: Color,
    pub corner_radius: f64,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            border_width: 0.0,
            border_color: fill_color,
            corner_radius: 0.0,
        }
    }

    #[must_use]
    pub const fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    #[must_use]
    pub const fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    pub fn validate(self) -> ReportResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ReportError::InvalidData(
                "rect coordinates must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0 {
            return Err(ReportError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ReportError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            return Err(ReportError::InvalidData(
                "rect corner radius must be finite and >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Polyline or polygon in page space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl PathPrimitive {
    #[must_use]
    pub fn polyline(points: Vec<(f64, f64)>, stroke: Stroke) -> Self {
        Self {
            points,
            closed: false,
            fill: None,
            stroke: Some(stroke),
        }
    }

    #[must_use]
    pub fn polygon(points: Vec<(f64, f64)>, fill: Color, stroke: Option<Stroke>) -> Self {
        Self {
            points,
            closed: true,
            fill: Some(fill),
            stroke,
        }
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.points.len() < 2 {
            return Err(ReportError::InvalidData(
                "path needs at least two points".to_owned(),
            ));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ReportError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        if self.fill.is_none() && self.stroke.is_none() {
            return Err(ReportError::InvalidData(
                "path must be filled or stroked".to_owned(),
            ));
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Circle,
    Cross,
    Square,
}

/// Scatter marker centered on `(x, y)`; `size` is the marker diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPrimitive {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub shape: MarkerShape,
    pub fill: Color,
    pub edge: Option<Stroke>,
}

impl MarkerPrimitive {
    pub fn validate(self) -> ReportResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ReportError::InvalidData(
                "marker coordinates must be finite".to_owned(),
            ));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ReportError::InvalidData(
                "marker size must be finite and > 0".to_owned(),
            ));
        }
        self.fill.validate()?;
        if let Some(edge) = self.edge {
            edge.validate()?;
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextVAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Draw command for one label in page space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
    pub weight: FontWeight,
    /// Counter-clockwise rotation around the anchor point, in degrees.
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            v_align: TextVAlign::Top,
            weight: FontWeight::Normal,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn with_v_align(mut self, v_align: TextVAlign) -> Self {
        self.v_align = v_align;
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> ReportResult<()> {
        if self.text.is_empty() {
            return Err(ReportError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(ReportError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ReportError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, LineStrokeStyle, PathPrimitive, Stroke};

    #[test]
    fn rgb8_normalizes_channels() {
        let color = Color::rgb8(255, 0, 51);
        assert!((color.red - 1.0).abs() <= 1e-12);
        assert!((color.blue - 0.2).abs() <= 1e-12);
        color.validate().expect("valid");
    }

    #[test]
    fn lerp_clamps_parameter() {
        let black = Color::rgb(0.0, 0.0, 0.0);
        let white = Color::rgb(1.0, 1.0, 1.0);
        assert_eq!(black.lerp(white, 2.0), white);
        assert_eq!(black.lerp(white, -1.0), black);
    }

    #[test]
    fn solid_stroke_has_no_dashes() {
        assert!(LineStrokeStyle::Solid.dash_pattern(1.0).is_empty());
        assert_eq!(LineStrokeStyle::Dashed.dash_pattern(1.0).len(), 2);
    }

    #[test]
    fn path_requires_fill_or_stroke() {
        let path = PathPrimitive {
            points: vec![(0.0, 0.0), (1.0, 1.0)],
            closed: false,
            fill: None,
            stroke: None,
        };
        assert!(path.validate().is_err());

        let stroked = PathPrimitive::polyline(
            vec![(0.0, 0.0), (1.0, 1.0)],
            Stroke::solid(1.0, Color::rgb(0.0, 0.0, 0.0)),
        );
        stroked.validate().expect("valid path");
    }
}
