use crate::core::Viewport;
use crate::error::{ReportError, ReportResult};

use super::{
    CanvasLayerKind, LinePrimitive, MarkerPrimitive, PathPrimitive, RectPrimitive, TextPrimitive,
};

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub rects: Vec<RectPrimitive>,
    pub paths: Vec<PathPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub markers: Vec<MarkerPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    fn empty(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            rects: Vec::new(),
            paths: Vec::new(),
            lines: Vec::new(),
            markers: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len() + self.paths.len() + self.lines.len() + self.markers.len() + self.texts.len()
    }
}

/// Backend-agnostic scene for one page of the report.
///
/// Every frame carries the canonical layer stack; backends paint layers in
/// order and, inside a layer, rects, paths, lines, markers, then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub layers: Vec<LayerPrimitives>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: CanvasLayerKind::CANONICAL_ORDER
                .iter()
                .copied()
                .map(LayerPrimitives::empty)
                .collect(),
        }
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> &LayerPrimitives {
        &self.layers[kind.paint_index()]
    }

    fn layer_mut(&mut self, kind: CanvasLayerKind) -> &mut LayerPrimitives {
        &mut self.layers[kind.paint_index()]
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        self.layer_mut(kind).lines.push(line);
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        self.layer_mut(kind).rects.push(rect);
    }

    pub fn push_path(&mut self, kind: CanvasLayerKind, path: PathPrimitive) {
        self.layer_mut(kind).paths.push(path);
    }

    pub fn push_marker(&mut self, kind: CanvasLayerKind, marker: MarkerPrimitive) {
        self.layer_mut(kind).markers.push(marker);
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        self.layer_mut(kind).texts.push(text);
    }

    #[must_use]
    pub fn with_line(mut self, kind: CanvasLayerKind, line: LinePrimitive) -> Self {
        self.push_line(kind, line);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, kind: CanvasLayerKind, rect: RectPrimitive) -> Self {
        self.push_rect(kind, rect);
        self
    }

    #[must_use]
    pub fn with_text(mut self, kind: CanvasLayerKind, text: TextPrimitive) -> Self {
        self.push_text(kind, text);
        self
    }

    /// All texts of the page in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.layers.iter().flat_map(|layer| layer.texts.iter())
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.layers.iter().map(LayerPrimitives::primitive_count).sum()
    }

    pub fn validate(&self) -> ReportResult<()> {
        if !self.viewport.is_valid() {
            return Err(ReportError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for layer in &self.layers {
            for rect in &layer.rects {
                rect.validate()?;
            }
            for path in &layer.paths {
                path.validate()?;
            }
            for line in &layer.lines {
                line.validate()?;
            }
            for marker in &layer.markers {
                marker.validate()?;
            }
            for text in &layer.texts {
                text.validate()?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{CanvasLayerKind, Color, LinePrimitive, TextHAlign, TextPrimitive};

    #[test]
    fn new_frame_carries_canonical_layers() {
        let frame = RenderFrame::new(Viewport::new(100, 100));
        let kinds: Vec<_> = frame.layers.iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, CanvasLayerKind::CANONICAL_ORDER.to_vec());
        assert!(frame.is_empty());
    }

    #[test]
    fn primitives_land_in_requested_layer() {
        let black = Color::rgb(0.0, 0.0, 0.0);
        let frame = RenderFrame::new(Viewport::new(100, 100))
            .with_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(0.0, 0.0, 10.0, 10.0, 1.0, black),
            )
            .with_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new("tick", 5.0, 5.0, 10.0, black, TextHAlign::Center),
            );

        assert_eq!(frame.layer(CanvasLayerKind::Grid).lines.len(), 1);
        assert_eq!(frame.layer(CanvasLayerKind::Axis).texts.len(), 1);
        assert_eq!(frame.primitive_count(), 2);
        frame.validate().expect("valid frame");
    }

    #[test]
    fn validate_rejects_invalid_viewport() {
        let frame = RenderFrame::new(Viewport::new(0, 10));
        assert!(frame.validate().is_err());
    }
}
