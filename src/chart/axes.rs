use crate::chart::legend::{Legend, LegendPlacement};
use crate::chart::theme::{TextStyle, Theme, estimate_text_width};
use crate::core::{DataPoint, LinearScale, PlotRect, nice_step, tick_decimals};
use crate::error::{ReportError, ReportResult};
use crate::render::{
    CanvasLayerKind, Color, LinePrimitive, LineStrokeStyle, MarkerPrimitive, MarkerShape,
    PathPrimitive, RectPrimitive, RenderFrame, Stroke, TextHAlign, TextPrimitive, TextVAlign,
};

const DEFAULT_MARGIN: f64 = 0.05;
const TARGET_TICKS: usize = 6;
const TICK_PAD: f64 = 4.0;
const LABEL_PAD: f64 = 6.0;
const TITLE_PAD: f64 = 8.0;

/// Mark expressed in data coordinates, projected when the axes is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Rect {
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        fill: Color,
        edge: Option<Stroke>,
    },
    Path {
        points: Vec<DataPoint>,
        closed: bool,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Marker {
        at: DataPoint,
        size: f64,
        shape: MarkerShape,
        fill: Color,
        edge: Option<Stroke>,
    },
    Line {
        from: DataPoint,
        to: DataPoint,
        stroke: Stroke,
    },
    /// Annotation anchored at a data point and shifted by a page offset. The
    /// anchor is clamped to the axes rectangle.
    Text {
        at: DataPoint,
        offset: (f64, f64),
        text: String,
        style: TextStyle,
        h_align: TextHAlign,
        v_align: TextVAlign,
    },
}

impl Artist {
    fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        match self {
            Self::Rect { x0, x1, y0, y1, .. } => Some((sorted(*x0, *x1), sorted(*y0, *y1))),
            Self::Path { points, .. } => Some((
                finite_span(points.iter().map(|point| point.x))?,
                finite_span(points.iter().map(|point| point.y))?,
            )),
            Self::Marker { at, .. } => Some(((at.x, at.x), (at.y, at.y))),
            Self::Line { from, to, .. } => Some((sorted(from.x, to.x), sorted(from.y, to.y))),
            Self::Text { .. } => None,
        }
    }
}

fn finite_span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            Some((low, high)) => Some((f64::min(low, value), f64::max(high, value))),
            None => Some((value, value)),
        })
}

/// How tick positions are chosen for one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum TickSpec {
    Auto,
    /// Levels drawn at integer positions `0..n`.
    Categories(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub limits: Option<(f64, f64)>,
    pub margin: f64,
    /// Keeps an autoscaled limit at zero when the data touches zero.
    pub sticky_zero: bool,
    pub ticks: TickSpec,
    pub label: Option<(String, TextStyle)>,
    pub inverted: bool,
    pub tick_labels_visible: bool,
    /// Draws ticks on the right (y) or top (x) side.
    pub opposite: bool,
}

impl Default for AxisSpec {
    fn default() -> Self {
        Self {
            limits: None,
            margin: DEFAULT_MARGIN,
            sticky_zero: false,
            ticks: TickSpec::Auto,
            label: None,
            inverted: false,
            tick_labels_visible: true,
            opposite: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLines {
    pub color: Color,
    pub width: f64,
    pub style: LineStrokeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridStyle {
    pub x: Option<GridLines>,
    pub y: Option<GridLines>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisId {
    X,
    Y,
}

/// One plotting area: data-space artists plus the axis decorations around
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    rect: PlotRect,
    theme: Theme,
    artists: Vec<Artist>,
    pub x: AxisSpec,
    pub y: AxisSpec,
    title: Option<(String, TextStyle)>,
    pub grid: GridStyle,
    pub facecolor: Color,
    legend: Option<Legend>,
}

impl Axes {
    #[must_use]
    pub fn new(rect: PlotRect, theme: &Theme) -> Self {
        let grid = GridLines {
            color: theme.grid_color,
            width: theme.grid_width,
            style: LineStrokeStyle::Solid,
        };
        Self {
            rect,
            theme: theme.clone(),
            artists: Vec::new(),
            x: AxisSpec::default(),
            y: AxisSpec::default(),
            title: None,
            grid: GridStyle {
                x: Some(grid),
                y: Some(grid),
            },
            facecolor: theme.axes_background,
            legend: None,
        }
    }

    #[must_use]
    pub fn rect(&self) -> PlotRect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: PlotRect) {
        self.rect = rect;
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn add(&mut self, artist: Artist) {
        self.artists.push(artist);
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn set_title(&mut self, text: impl Into<String>) {
        let style = self.theme.title_style();
        self.set_title_styled(text, style);
    }

    pub fn set_title_styled(&mut self, text: impl Into<String>, style: TextStyle) {
        self.title = Some((text.into(), style));
    }

    pub fn set_xlabel(&mut self, text: impl Into<String>) {
        let style = self.theme.label_style();
        self.x.label = Some((text.into(), style));
    }

    pub fn set_ylabel(&mut self, text: impl Into<String>) {
        let style = self.theme.label_style();
        self.y.label = Some((text.into(), style));
    }

    pub fn set_label_styled(&mut self, axis: AxisId, text: impl Into<String>, style: TextStyle) {
        self.axis_mut(axis).label = Some((text.into(), style));
    }

    #[must_use]
    pub fn label(&self, axis: AxisId) -> Option<&str> {
        self.axis(axis).label.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn set_xlim(&mut self, low: f64, high: f64) {
        self.x.limits = Some((low, high));
    }

    pub fn set_ylim(&mut self, low: f64, high: f64) {
        self.y.limits = Some((low, high));
    }

    pub fn set_categories(&mut self, axis: AxisId, levels: &[&str]) {
        let spec = self.axis_mut(axis);
        spec.ticks = TickSpec::Categories(levels.iter().map(|level| (*level).to_owned()).collect());
        spec.margin = 0.0;
    }

    pub fn set_legend(&mut self, legend: Legend) {
        self.legend = (!legend.is_empty()).then_some(legend);
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    #[must_use]
    pub fn axis(&self, axis: AxisId) -> &AxisSpec {
        match axis {
            AxisId::X => &self.x,
            AxisId::Y => &self.y,
        }
    }

    fn axis_mut(&mut self, axis: AxisId) -> &mut AxisSpec {
        match axis {
            AxisId::X => &mut self.x,
            AxisId::Y => &mut self.y,
        }
    }

    /// Raw data extent along `axis`, ignoring limits and margins.
    #[must_use]
    pub fn data_range(&self, axis: AxisId) -> Option<(f64, f64)> {
        self.artists
            .iter()
            .filter_map(Artist::extent)
            .map(|(xs, ys)| match axis {
                AxisId::X => xs,
                AxisId::Y => ys,
            })
            .reduce(|(low, high), (l, h)| (low.min(l), high.max(h)))
    }

    /// Limits used for projection: explicit limits, category slots, or the
    /// data range padded by the axis margin.
    #[must_use]
    pub fn view_limits(&self, axis: AxisId) -> (f64, f64) {
        let spec = self.axis(axis);
        if let Some(limits) = spec.limits {
            return limits;
        }
        if let TickSpec::Categories(levels) = &spec.ticks {
            return (-0.5, levels.len().max(1) as f64 - 0.5);
        }
        let Some((low, high)) = self.data_range(axis) else {
            return (0.0, 1.0);
        };
        if (high - low).abs() <= f64::EPSILON {
            return (low - 0.5, high + 0.5);
        }
        let pad = (high - low) * spec.margin;
        let mut padded = (low - pad, high + pad);
        if spec.sticky_zero {
            if low == 0.0 {
                padded.0 = 0.0;
            }
            if high == 0.0 {
                padded.1 = 0.0;
            }
        }
        padded
    }

    fn scale(&self, axis: AxisId) -> ReportResult<LinearScale> {
        let (low, high) = self.view_limits(axis);
        let spec = self.axis(axis);
        let range = match axis {
            AxisId::X => (self.rect.left, self.rect.right()),
            AxisId::Y => (self.rect.bottom(), self.rect.top),
        };
        let range = if spec.inverted { (range.1, range.0) } else { range };
        LinearScale::new((low, high), range)
    }

    /// Tick positions and their labels.
    #[must_use]
    pub fn ticks(&self, axis: AxisId) -> Vec<(f64, String)> {
        match &self.axis(axis).ticks {
            TickSpec::Categories(levels) => levels
                .iter()
                .enumerate()
                .map(|(index, level)| (index as f64, level.clone()))
                .collect(),
            TickSpec::Auto => {
                let (low, high) = self.view_limits(axis);
                let (low, high) = (low.min(high), low.max(high));
                let step = nice_step(low, high, TARGET_TICKS);
                let decimals = tick_decimals(step);
                crate::core::nice_ticks(low, high, TARGET_TICKS)
                    .into_iter()
                    .map(|tick| (tick, format!("{tick:.decimals$}")))
                    .collect()
            }
        }
    }

    /// Projects the axes and its artists onto `frame`.
    pub fn draw(&self, frame: &mut RenderFrame) -> ReportResult<()> {
        if !self.rect.is_valid() {
            return Err(ReportError::InvalidData(format!(
                "axes rectangle is degenerate: {:?}",
                self.rect
            )));
        }
        let x_scale = self.scale(AxisId::X)?;
        let y_scale = self.scale(AxisId::Y)?;
        let rect = self.rect;
        let clamp_x = |value: f64| value.clamp(rect.left, rect.right());
        let clamp_y = |value: f64| value.clamp(rect.top, rect.bottom());
        let project = |point: DataPoint| (x_scale.map(point.x), y_scale.map(point.y));

        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(rect.left, rect.top, rect.width, rect.height, self.facecolor),
        );
        self.draw_grid(frame, x_scale, y_scale);

        for artist in &self.artists {
            match artist {
                Artist::Rect {
                    x0,
                    x1,
                    y0,
                    y1,
                    fill,
                    edge,
                } => {
                    let (left, right) =
                        sorted(clamp_x(x_scale.map(*x0)), clamp_x(x_scale.map(*x1)));
                    let (top, bottom) =
                        sorted(clamp_y(y_scale.map(*y0)), clamp_y(y_scale.map(*y1)));
                    let mut primitive =
                        RectPrimitive::new(left, top, right - left, bottom - top, *fill);
                    if let Some(edge) = edge {
                        primitive = primitive.with_border(edge.width, edge.color);
                    }
                    frame.push_rect(CanvasLayerKind::Series, primitive);
                }
                Artist::Path {
                    points,
                    closed,
                    fill,
                    stroke,
                } => {
                    if points.len() < 2 {
                        continue;
                    }
                    let projected: Vec<(f64, f64)> = points.iter().copied().map(project).collect();
                    let pieces = if *closed {
                        let polygon = clip_polygon(rect, &projected);
                        if polygon.len() < 3 { Vec::new() } else { vec![polygon] }
                    } else {
                        clip_polyline(rect, &projected)
                    };
                    for piece in pieces {
                        frame.push_path(
                            CanvasLayerKind::Series,
                            PathPrimitive {
                                points: piece,
                                closed: *closed,
                                fill: *fill,
                                stroke: *stroke,
                            },
                        );
                    }
                }
                Artist::Marker {
                    at,
                    size,
                    shape,
                    fill,
                    edge,
                } => {
                    let (x, y) = (x_scale.map(at.x), y_scale.map(at.y));
                    if !rect.contains(x, y) {
                        continue;
                    }
                    frame.push_marker(
                        CanvasLayerKind::Series,
                        MarkerPrimitive {
                            x,
                            y,
                            size: *size,
                            shape: *shape,
                            fill: *fill,
                            edge: *edge,
                        },
                    );
                }
                Artist::Line { from, to, stroke } => {
                    let Some(((x1, y1), (x2, y2))) =
                        clip_segment(rect, project(*from), project(*to))
                    else {
                        continue;
                    };
                    frame.push_line(
                        CanvasLayerKind::Series,
                        LinePrimitive::new(x1, y1, x2, y2, stroke.width, stroke.color)
                            .with_stroke_style(stroke.style),
                    );
                }
                Artist::Text {
                    at,
                    offset,
                    text,
                    style,
                    h_align,
                    v_align,
                } => {
                    frame.push_text(
                        CanvasLayerKind::Overlay,
                        TextPrimitive::new(
                            text.clone(),
                            clamp_x(x_scale.map(at.x)) + offset.0,
                            clamp_y(y_scale.map(at.y)) + offset.1,
                            style.font_size,
                            style.color,
                            *h_align,
                        )
                        .with_v_align(*v_align)
                        .with_weight(style.weight),
                    );
                }
            }
        }

        self.draw_decorations(frame, x_scale, y_scale);

        if let Some(legend) = &self.legend {
            let (width, _) = legend.size(&self.theme);
            let left = match legend.placement {
                LegendPlacement::UpperLeft => rect.left + 6.0,
                LegendPlacement::UpperRight => rect.right() - width - 6.0,
            };
            legend.draw(frame, left, rect.top + 6.0, &self.theme);
        }
        Ok(())
    }

    fn draw_grid(&self, frame: &mut RenderFrame, x_scale: LinearScale, y_scale: LinearScale) {
        let rect = self.rect;
        if let Some(grid) = self.grid.x {
            for (tick, _) in self.ticks(AxisId::X) {
                let x = x_scale.map(tick);
                if x < rect.left - 0.01 || x > rect.right() + 0.01 {
                    continue;
                }
                frame.push_line(
                    CanvasLayerKind::Grid,
                    LinePrimitive::new(x, rect.top, x, rect.bottom(), grid.width, grid.color)
                        .with_stroke_style(grid.style),
                );
            }
        }
        if let Some(grid) = self.grid.y {
            for (tick, _) in self.ticks(AxisId::Y) {
                let y = y_scale.map(tick);
                if y < rect.top - 0.01 || y > rect.bottom() + 0.01 {
                    continue;
                }
                frame.push_line(
                    CanvasLayerKind::Grid,
                    LinePrimitive::new(rect.left, y, rect.right(), y, grid.width, grid.color)
                        .with_stroke_style(grid.style),
                );
            }
        }
    }

    fn draw_decorations(&self, frame: &mut RenderFrame, x_scale: LinearScale, y_scale: LinearScale) {
        let rect = self.rect;
        let theme = &self.theme;
        let tick_size = theme.tick_font_size;

        let mut x_label_offset = TICK_PAD;
        if self.x.tick_labels_visible {
            let (y, v_align) = if self.x.opposite {
                (rect.top - TICK_PAD, TextVAlign::Bottom)
            } else {
                (rect.bottom() + TICK_PAD, TextVAlign::Top)
            };
            for (tick, text) in self.ticks(AxisId::X) {
                let x = x_scale.map(tick);
                if x < rect.left - 0.5 || x > rect.right() + 0.5 {
                    continue;
                }
                frame.push_text(
                    CanvasLayerKind::Axis,
                    TextPrimitive::new(text, x, y, tick_size, theme.text_color, TextHAlign::Center)
                        .with_v_align(v_align),
                );
            }
            x_label_offset += tick_size * 1.2;
        }
        if let Some((text, style)) = &self.x.label {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    text.clone(),
                    rect.center_x(),
                    rect.bottom() + x_label_offset + LABEL_PAD * 0.5,
                    style.font_size,
                    style.color,
                    TextHAlign::Center,
                )
                .with_weight(style.weight),
            );
        }

        let mut y_label_offset = TICK_PAD;
        if self.y.tick_labels_visible {
            let (x, h_align) = if self.y.opposite {
                (rect.right() + TICK_PAD, TextHAlign::Left)
            } else {
                (rect.left - TICK_PAD, TextHAlign::Right)
            };
            let mut widest: f64 = 0.0;
            for (tick, text) in self.ticks(AxisId::Y) {
                let y = y_scale.map(tick);
                if y < rect.top - 0.5 || y > rect.bottom() + 0.5 {
                    continue;
                }
                widest = widest.max(estimate_text_width(&text, tick_size));
                frame.push_text(
                    CanvasLayerKind::Axis,
                    TextPrimitive::new(text, x, y, tick_size, theme.text_color, h_align)
                        .with_v_align(TextVAlign::Middle),
                );
            }
            y_label_offset += widest;
        }
        if let Some((text, style)) = &self.y.label {
            let center_y = rect.top + rect.height * 0.5;
            let x = if self.y.opposite {
                rect.right() + y_label_offset + LABEL_PAD
            } else {
                rect.left - y_label_offset - LABEL_PAD
            };
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    text.clone(),
                    x,
                    center_y,
                    style.font_size,
                    style.color,
                    TextHAlign::Center,
                )
                .with_v_align(if self.y.opposite {
                    TextVAlign::Top
                } else {
                    TextVAlign::Bottom
                })
                .with_weight(style.weight)
                .with_rotation(90.0),
            );
        }

        if let Some((text, style)) = &self.title {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    text.clone(),
                    rect.center_x(),
                    rect.top - TITLE_PAD,
                    style.font_size,
                    style.color,
                    TextHAlign::Center,
                )
                .with_v_align(TextVAlign::Bottom)
                .with_weight(style.weight),
            );
        }
    }
}

fn sorted(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

type PagePoint = (f64, f64);

/// Part of segment `a`-`b` inside `rect` (Liang-Barsky). Endpoints that lie
/// inside are returned unchanged.
fn clip_segment(rect: PlotRect, a: PagePoint, b: PagePoint) -> Option<(PagePoint, PagePoint)> {
    if ![a.0, a.1, b.0, b.1].iter().all(|value| value.is_finite()) {
        return None;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, a.0 - rect.left),
        (dx, rect.right() - a.0),
        (-dy, a.1 - rect.top),
        (dy, rect.bottom() - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            enter = enter.max(q / p);
        } else {
            exit = exit.min(q / p);
        }
    }
    if enter > exit {
        return None;
    }
    let at = |t: f64| {
        (
            (a.0 + t * dx).clamp(rect.left, rect.right()),
            (a.1 + t * dy).clamp(rect.top, rect.bottom()),
        )
    };
    let start = if enter == 0.0 { a } else { at(enter) };
    let end = if exit == 1.0 { b } else { at(exit) };
    Some((start, end))
}

/// Visible runs of an open polyline. A run ends where the line leaves
/// `rect` and a new one starts where it comes back.
fn clip_polyline(rect: PlotRect, points: &[PagePoint]) -> Vec<Vec<PagePoint>> {
    let mut runs = Vec::new();
    let mut current: Vec<PagePoint> = Vec::new();
    for pair in points.windows(2) {
        match clip_segment(rect, pair[0], pair[1]) {
            Some((start, end)) => {
                if current.last() != Some(&start) {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(start);
                }
                current.push(end);
            }
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

#[derive(Debug, Clone, Copy)]
enum ClipEdge {
    Left(f64),
    Right(f64),
    Top(f64),
    Bottom(f64),
}

impl ClipEdge {
    fn inside(self, (x, y): PagePoint) -> bool {
        match self {
            Self::Left(bound) => x >= bound,
            Self::Right(bound) => x <= bound,
            Self::Top(bound) => y >= bound,
            Self::Bottom(bound) => y <= bound,
        }
    }

    /// Crossing of `a`-`b` with the edge; the points lie on opposite sides.
    fn crossing(self, a: PagePoint, b: PagePoint) -> PagePoint {
        match self {
            Self::Left(bound) | Self::Right(bound) => {
                let t = (bound - a.0) / (b.0 - a.0);
                (bound, a.1 + t * (b.1 - a.1))
            }
            Self::Top(bound) | Self::Bottom(bound) => {
                let t = (bound - a.1) / (b.1 - a.1);
                (a.0 + t * (b.0 - a.0), bound)
            }
        }
    }
}

/// Closed polygon cut to `rect` (Sutherland-Hodgman). Non-finite vertices
/// are dropped.
fn clip_polygon(rect: PlotRect, points: &[PagePoint]) -> Vec<PagePoint> {
    let mut output: Vec<PagePoint> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    for edge in [
        ClipEdge::Left(rect.left),
        ClipEdge::Right(rect.right()),
        ClipEdge::Top(rect.top),
        ClipEdge::Bottom(rect.bottom()),
    ] {
        let Some(&last) = output.last() else {
            break;
        };
        let input = std::mem::take(&mut output);
        let mut previous = last;
        for current in input {
            match (edge.inside(previous), edge.inside(current)) {
                (true, true) => output.push(current),
                (true, false) => output.push(edge.crossing(previous, current)),
                (false, true) => {
                    output.push(edge.crossing(previous, current));
                    output.push(current);
                }
                (false, false) => {}
            }
            previous = current;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{Artist, AxisId, Axes, clip_polygon, clip_segment};
    use crate::chart::Theme;
    use crate::core::{DataPoint, PlotRect, Viewport};
    use crate::render::{CanvasLayerKind, Color, RenderFrame, Stroke};

    fn axes() -> Axes {
        Axes::new(PlotRect::new(50.0, 20.0, 200.0, 100.0), &Theme::darkgrid())
    }

    fn bar(x: f64, height: f64) -> Artist {
        Artist::Rect {
            x0: x - 0.4,
            x1: x + 0.4,
            y0: 0.0,
            y1: height,
            fill: Color::rgb(0.2, 0.3, 0.8),
            edge: None,
        }
    }

    #[test]
    fn auto_limits_pad_the_data_range() {
        let mut ax = axes();
        ax.add(Artist::Line {
            from: DataPoint::new(0.0, 10.0),
            to: DataPoint::new(10.0, 20.0),
            stroke: Stroke::solid(1.0, Color::rgb(0.0, 0.0, 0.0)),
        });
        let (x_low, x_high) = ax.view_limits(AxisId::X);
        assert_relative_eq!(x_low, -0.5, epsilon = 1e-12);
        assert_relative_eq!(x_high, 10.5, epsilon = 1e-12);
        let (y_low, y_high) = ax.view_limits(AxisId::Y);
        assert_relative_eq!(y_low, 9.5, epsilon = 1e-12);
        assert_relative_eq!(y_high, 20.5, epsilon = 1e-12);
    }

    #[test]
    fn sticky_zero_keeps_bar_baseline() {
        let mut ax = axes();
        ax.add(bar(0.0, 4.0));
        ax.y.sticky_zero = true;
        let (low, high) = ax.view_limits(AxisId::Y);
        assert_eq!(low, 0.0);
        assert!(high > 4.0);
    }

    #[test]
    fn category_axes_use_integer_slots() {
        let mut ax = axes();
        ax.set_categories(AxisId::X, &["Thur", "Fri", "Sat", "Sun"]);
        assert_eq!(ax.view_limits(AxisId::X), (-0.5, 3.5));
        let labels: Vec<_> = ax.ticks(AxisId::X).into_iter().map(|(_, label)| label).collect();
        assert_eq!(labels, vec!["Thur", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn explicit_limits_override_data() {
        let mut ax = axes();
        ax.add(bar(0.0, 900.0));
        ax.set_ylim(0.0, 1500.0);
        assert_eq!(ax.view_limits(AxisId::Y), (0.0, 1500.0));
        let ticks: Vec<f64> = ax.ticks(AxisId::Y).into_iter().map(|(tick, _)| tick).collect();
        assert_eq!(ticks.first().copied(), Some(0.0));
        assert_eq!(ticks.last().copied(), Some(1500.0));
    }

    #[test]
    fn draw_places_layers_and_labels() {
        let mut ax = axes();
        ax.add(bar(0.0, 3.0));
        ax.add(bar(1.0, 5.0));
        ax.set_title("Bars");
        ax.set_xlabel("x");
        ax.set_ylabel("y");
        let mut frame = RenderFrame::new(Viewport::new(300, 200));
        ax.draw(&mut frame).expect("draw");

        assert_eq!(frame.layer(CanvasLayerKind::Background).rects.len(), 1);
        assert_eq!(frame.layer(CanvasLayerKind::Series).rects.len(), 2);
        assert!(!frame.layer(CanvasLayerKind::Grid).lines.is_empty());
        let texts: Vec<_> = frame.texts().map(|text| text.text.as_str()).collect();
        assert!(texts.contains(&"Bars"));
        assert!(texts.contains(&"x"));
        assert!(texts.contains(&"y"));
        frame.validate().expect("valid frame");
    }

    #[test]
    fn hidden_tick_labels_are_not_drawn() {
        let mut ax = axes();
        ax.add(bar(0.0, 3.0));
        ax.x.tick_labels_visible = false;
        ax.y.tick_labels_visible = false;
        let mut frame = RenderFrame::new(Viewport::new(300, 200));
        ax.draw(&mut frame).expect("draw");
        assert!(frame.layer(CanvasLayerKind::Axis).texts.is_empty());
    }

    fn black() -> Stroke {
        Stroke::solid(1.0, Color::rgb(0.0, 0.0, 0.0))
    }

    #[test]
    fn curve_past_explicit_limits_is_cut_not_flattened() {
        let mut ax = Axes::new(PlotRect::new(40.0, 20.0, 300.0, 200.0), &Theme::darkgrid());
        ax.add(Artist::Path {
            points: vec![
                DataPoint::new(0.0, 0.5),
                DataPoint::new(5.0, 2.0),
                DataPoint::new(10.0, 0.5),
            ],
            closed: false,
            fill: None,
            stroke: Some(black()),
        });
        ax.set_xlim(0.0, 10.0);
        ax.set_ylim(0.0, 1.0);
        let mut frame = RenderFrame::new(Viewport::new(400, 260));
        ax.draw(&mut frame).expect("draw");

        let paths = &frame.layer(CanvasLayerKind::Series).paths;
        assert_eq!(paths.len(), 2);
        let rising = &paths[0].points;
        let falling = &paths[1].points;
        assert_eq!(rising.len(), 2);
        assert_eq!(falling.len(), 2);
        let expected = [
            (rising[0], (40.0, 120.0)),
            (rising[1], (90.0, 20.0)),
            (falling[0], (290.0, 20.0)),
            (falling[1], (340.0, 120.0)),
        ];
        for ((x, y), (want_x, want_y)) in expected {
            assert_relative_eq!(x, want_x, epsilon = 1e-9);
            assert_relative_eq!(y, want_y, epsilon = 1e-9);
        }
        frame.validate().expect("valid frame");
    }

    #[test]
    fn segments_outside_the_axes_are_dropped() {
        let rect = PlotRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(clip_segment(rect, (-5.0, -1.0), (20.0, -1.0)).is_none());
        assert!(clip_segment(rect, (f64::NAN, 1.0), (2.0, 2.0)).is_none());
        let (start, end) = clip_segment(rect, (-5.0, 5.0), (5.0, 5.0)).expect("crosses left edge");
        assert_eq!(start, (0.0, 5.0));
        assert_eq!(end, (5.0, 5.0));
    }

    #[test]
    fn filled_area_is_cut_at_the_axes_edge() {
        let rect = PlotRect::new(0.0, 0.0, 10.0, 10.0);
        let triangle = [(5.0, -10.0), (10.0, 8.0), (0.0, 8.0)];
        let clipped = clip_polygon(rect, &triangle);
        assert!(clipped.len() >= 4);
        for (x, y) in &clipped {
            assert!((0.0..=10.0).contains(x));
            assert!((0.0..=10.0).contains(y));
        }
        assert_eq!(clipped.iter().filter(|(_, y)| *y == 0.0).count(), 2);
        assert!(clip_polygon(rect, &[(20.0, 20.0), (30.0, 20.0), (25.0, 30.0)]).is_empty());
    }
}
