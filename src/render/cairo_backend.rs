use cairo::Context;
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::{ReportError, ReportResult};
use crate::render::{
    Color, FontWeight, LayerPrimitives, LinePrimitive, LineStrokeStyle, MarkerPrimitive,
    MarkerShape, PathPrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, TextVAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub paths_drawn: usize,
    pub lines_drawn: usize,
    pub markers_drawn: usize,
    pub texts_drawn: usize,
}

/// Renderers that can draw a frame into an externally owned Cairo context
/// (a PDF page or an image surface).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ReportResult<()>;
}

/// Cairo + Pango + PangoCairo frame painter.
///
/// Coordinates are interpreted in the context's user space, which for PDF
/// surfaces is points.
#[derive(Debug)]
pub struct CairoRenderer {
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl Default for CairoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CairoRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ReportResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ReportResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();
        for layer in &frame.layers {
            draw_layer(context, layer, &mut stats)?;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ReportResult<()> {
        self.render_with_context(context, frame)
    }
}

fn draw_layer(
    context: &Context,
    layer: &LayerPrimitives,
    stats: &mut CairoRenderStats,
) -> ReportResult<()> {
    for rect in &layer.rects {
        draw_rect(context, *rect)?;
        stats.rects_drawn += 1;
    }
    for path in &layer.paths {
        draw_path(context, path)?;
        stats.paths_drawn += 1;
    }
    for line in &layer.lines {
        draw_line(context, *line)?;
        stats.lines_drawn += 1;
    }
    for marker in &layer.markers {
        draw_marker(context, *marker)?;
        stats.markers_drawn += 1;
    }
    for text in &layer.texts {
        draw_text(context, text)?;
        stats.texts_drawn += 1;
    }
    Ok(())
}

fn draw_rect(context: &Context, rect: RectPrimitive) -> ReportResult<()> {
    append_rect_path(context, rect);
    apply_color(context, rect.fill_color);
    if rect.border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        apply_color(context, rect.border_color);
        context.set_line_width(rect.border_width);
        context.set_dash(&[], 0.0);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))
    }
}

fn draw_path(context: &Context, path: &PathPrimitive) -> ReportResult<()> {
    context.new_path();
    let mut points = path.points.iter();
    if let Some((x, y)) = points.next() {
        context.move_to(*x, *y);
    }
    for (x, y) in points {
        context.line_to(*x, *y);
    }
    if path.closed {
        context.close_path();
    }

    if let Some(fill) = path.fill {
        apply_color(context, fill);
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill path", err))?;
    }
    if let Some(stroke) = path.stroke {
        apply_color(context, stroke.color);
        apply_stroke_style(context, stroke.width, stroke.style);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke path", err))?;
    }
    context.new_path();
    Ok(())
}

fn draw_line(context: &Context, line: LinePrimitive) -> ReportResult<()> {
    apply_color(context, line.color);
    apply_stroke_style(context, line.stroke_width, line.stroke_style);
    context.move_to(line.x1, line.y1);
    context.line_to(line.x2, line.y2);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke line", err))
}

fn draw_marker(context: &Context, marker: MarkerPrimitive) -> ReportResult<()> {
    let radius = marker.size * 0.5;
    context.new_path();
    match marker.shape {
        MarkerShape::Circle => {
            context.arc(marker.x, marker.y, radius, 0.0, 2.0 * PI);
        }
        MarkerShape::Square => {
            context.rectangle(marker.x - radius, marker.y - radius, marker.size, marker.size);
        }
        MarkerShape::Cross => {
            // Filled "X": a square rotated by 45 degrees with notched edges.
            let arm = radius * 0.35;
            let points = [
                (-radius, -radius + arm),
                (-arm, 0.0),
                (-radius, radius - arm),
                (-radius + arm, radius),
                (0.0, arm),
                (radius - arm, radius),
                (radius, radius - arm),
                (arm, 0.0),
                (radius, -radius + arm),
                (radius - arm, -radius),
                (0.0, -arm),
                (-radius + arm, -radius),
            ];
            context.move_to(marker.x + points[0].0, marker.y + points[0].1);
            for (dx, dy) in &points[1..] {
                context.line_to(marker.x + dx, marker.y + dy);
            }
            context.close_path();
        }
    }

    apply_color(context, marker.fill);
    match marker.edge {
        Some(edge) => {
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill marker", err))?;
            apply_color(context, edge.color);
            apply_stroke_style(context, edge.width, edge.style);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke marker", err))
        }
        None => context
            .fill()
            .map_err(|err| map_backend_error("failed to fill marker", err)),
    }
}

fn draw_text(context: &Context, text: &TextPrimitive) -> ReportResult<()> {
    let layout = pangocairo::functions::create_layout(context);
    let mut font_description = FontDescription::from_string("Sans");
    font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
    if text.weight == FontWeight::Bold {
        font_description.set_weight(pango::Weight::Bold);
    }
    layout.set_font_description(Some(&font_description));
    layout.set_text(&text.text);

    let (text_width, text_height) = layout.pixel_size();
    let dx = match text.h_align {
        TextHAlign::Left => 0.0,
        TextHAlign::Center => -f64::from(text_width) / 2.0,
        TextHAlign::Right => -f64::from(text_width),
    };
    let dy = match text.v_align {
        TextVAlign::Top => 0.0,
        TextVAlign::Middle => -f64::from(text_height) / 2.0,
        TextVAlign::Bottom => -f64::from(text_height),
    };

    context
        .save()
        .map_err(|err| map_backend_error("failed to save context", err))?;
    apply_color(context, text.color);
    context.translate(text.x, text.y);
    if text.rotation_deg != 0.0 {
        context.rotate(-text.rotation_deg.to_radians());
    }
    context.move_to(dx, dy);
    pangocairo::functions::show_layout(context, &layout);
    context
        .restore()
        .map_err(|err| map_backend_error("failed to restore context", err))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_stroke_style(context: &Context, width: f64, style: LineStrokeStyle) {
    context.set_line_width(width);
    context.set_dash(&style.dash_pattern(width), 0.0);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

pub(crate) fn map_backend_error(prefix: &str, err: cairo::Error) -> ReportError {
    ReportError::Rendering(format!("{prefix}: {err}"))
}
