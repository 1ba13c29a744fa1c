mod document;
mod frame;
mod layer_stack;
mod null_renderer;
mod primitives;

pub use document::{
    DocumentTarget, DocumentWriter, MemoryDocument, MemoryDocumentTarget, MemoryDocumentWriter,
};
pub use frame::{LayerPrimitives, RenderFrame};
pub use layer_stack::CanvasLayerKind;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, FontWeight, LinePrimitive, LineStrokeStyle, MarkerPrimitive, MarkerShape,
    PathPrimitive, RectPrimitive, Stroke, TextHAlign, TextPrimitive, TextVAlign,
};

use crate::error::ReportResult;

/// Contract implemented by anything that consumes finished pages.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from chart construction.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ReportResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
mod pdf_document;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
#[cfg(feature = "cairo-backend")]
pub use pdf_document::{PdfDocumentInfo, PdfDocumentSummary, PdfDocumentTarget, PdfDocumentWriter};
