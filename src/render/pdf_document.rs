use std::path::{Path, PathBuf};

use cairo::{Context, PdfMetadata, PdfSurface};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{ReportError, ReportResult};
use crate::render::cairo_backend::map_backend_error;
use crate::render::{
    CairoContextRenderer, CairoRenderer, DocumentTarget, DocumentWriter, RenderFrame, Renderer,
};

/// Metadata embedded into the PDF info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocumentInfo {
    pub title: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
}

impl Default for PdfDocumentInfo {
    fn default() -> Self {
        Self {
            title: "Tips dataset visualizations".to_owned(),
            creator: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_owned(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PdfDocumentTarget {
    info: PdfDocumentInfo,
}

impl PdfDocumentTarget {
    #[must_use]
    pub fn new(info: PdfDocumentInfo) -> Self {
        Self { info }
    }
}

impl DocumentTarget for PdfDocumentTarget {
    type Writer = PdfDocumentWriter;

    fn start(&self, path: &Path) -> ReportResult<Self::Writer> {
        PdfDocumentWriter::create(path, &self.info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocumentSummary {
    pub path: PathBuf,
    pub pages: usize,
}

/// Multi-page PDF writer backed by a Cairo PDF surface.
///
/// Each appended frame becomes one page sized to the frame viewport. The file
/// is complete only after `finalize`.
#[derive(Debug)]
pub struct PdfDocumentWriter {
    path: PathBuf,
    surface: PdfSurface,
    renderer: CairoRenderer,
    pages: usize,
}

impl PdfDocumentWriter {
    pub fn create(path: &Path, info: &PdfDocumentInfo) -> ReportResult<Self> {
        // Cairo needs an initial page size; every page resets it.
        let surface = PdfSurface::new(612.0, 792.0, path).map_err(|err| {
            ReportError::DocumentWrite(format!("failed to create `{}`: {err}", path.display()))
        })?;
        surface
            .set_metadata(PdfMetadata::Title, &info.title)
            .map_err(|err| map_backend_error("failed to set pdf title", err))?;
        surface
            .set_metadata(PdfMetadata::Creator, &info.creator)
            .map_err(|err| map_backend_error("failed to set pdf creator", err))?;
        surface
            .set_metadata(
                PdfMetadata::CreateDate,
                &info.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            )
            .map_err(|err| map_backend_error("failed to set pdf creation date", err))?;

        debug!(path = %path.display(), "pdf document started");
        Ok(Self {
            path: path.to_path_buf(),
            surface,
            renderer: CairoRenderer::new(),
            pages: 0,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Renderer for PdfDocumentWriter {
    fn render(&mut self, frame: &RenderFrame) -> ReportResult<()> {
        frame.validate()?;
        self.surface
            .set_size(f64::from(frame.viewport.width), f64::from(frame.viewport.height))
            .map_err(|err| map_backend_error("failed to size pdf page", err))?;

        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.renderer.render_on_cairo_context(&context, frame)?;
        context.show_page().map_err(|err| {
            ReportError::DocumentWrite(format!("failed to emit pdf page: {err}"))
        })?;
        Ok(())
    }
}

impl DocumentWriter for PdfDocumentWriter {
    type Output = PdfDocumentSummary;

    fn append_page(&mut self, page: &RenderFrame) -> ReportResult<()> {
        self.render(page)?;
        self.pages += 1;
        debug!(
            page = self.pages,
            width = page.viewport.width,
            height = page.viewport.height,
            primitives = page.primitive_count(),
            "pdf page appended"
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn finalize(self) -> ReportResult<Self::Output> {
        self.surface.finish();
        self.surface.status().map_err(|err| {
            ReportError::DocumentWrite(format!(
                "failed to finalize `{}`: {err}",
                self.path.display()
            ))
        })?;
        Ok(PdfDocumentSummary {
            path: self.path,
            pages: self.pages,
        })
    }
}
