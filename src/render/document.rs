use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{ReportError, ReportResult};
use crate::render::{NullRenderer, RenderFrame, Renderer};

/// Append-only paginated output.
///
/// Pages are written in call order. A writer that is dropped without
/// `finalize` leaves no guarantee that its output is readable.
pub trait DocumentWriter {
    type Output;

    fn append_page(&mut self, page: &RenderFrame) -> ReportResult<()>;

    fn page_count(&self) -> usize;

    fn finalize(self) -> ReportResult<Self::Output>;
}

/// Factory that opens a [`DocumentWriter`] at a path.
pub trait DocumentTarget {
    type Writer: DocumentWriter;

    fn start(&self, path: &Path) -> ReportResult<Self::Writer>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    pub path: PathBuf,
    pub pages: Vec<RenderFrame>,
}

#[derive(Debug, Default)]
struct MemoryDocumentState {
    path: Option<PathBuf>,
    pages: Vec<RenderFrame>,
    finalized: bool,
    starts: usize,
}

/// In-memory document target.
///
/// The target keeps a shared view of what its writer appended so callers can
/// inspect a run that failed before finalization.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentTarget {
    state: Rc<RefCell<MemoryDocumentState>>,
    fail_on_page: Option<usize>,
    fail_on_finalize: bool,
}

impl MemoryDocumentTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the writer report a write failure when appending page
    /// `page_index` (zero based).
    #[must_use]
    pub fn failing_on_page(mut self, page_index: usize) -> Self {
        self.fail_on_page = Some(page_index);
        self
    }

    /// Makes `finalize` fail after every page was appended.
    #[must_use]
    pub fn failing_on_finalize(mut self) -> Self {
        self.fail_on_finalize = true;
        self
    }

    #[must_use]
    pub fn was_started(&self) -> bool {
        self.state.borrow().starts > 0
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.state.borrow().finalized
    }

    #[must_use]
    pub fn appended_pages(&self) -> usize {
        self.state.borrow().pages.len()
    }

    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.state.borrow().path.clone()
    }
}

impl DocumentTarget for MemoryDocumentTarget {
    type Writer = MemoryDocumentWriter;

    fn start(&self, path: &Path) -> ReportResult<Self::Writer> {
        {
            let mut state = self.state.borrow_mut();
            if state.starts > 0 {
                return Err(ReportError::DocumentWrite(format!(
                    "document `{}` already started",
                    path.display()
                )));
            }
            state.starts += 1;
            state.path = Some(path.to_path_buf());
        }
        Ok(MemoryDocumentWriter {
            path: path.to_path_buf(),
            state: Rc::clone(&self.state),
            renderer: NullRenderer::default(),
            fail_on_page: self.fail_on_page,
            fail_on_finalize: self.fail_on_finalize,
        })
    }
}

#[derive(Debug)]
pub struct MemoryDocumentWriter {
    path: PathBuf,
    state: Rc<RefCell<MemoryDocumentState>>,
    renderer: NullRenderer,
    fail_on_page: Option<usize>,
    fail_on_finalize: bool,
}

impl DocumentWriter for MemoryDocumentWriter {
    type Output = MemoryDocument;

    fn append_page(&mut self, page: &RenderFrame) -> ReportResult<()> {
        let index = self.page_count();
        if self.fail_on_page == Some(index) {
            return Err(ReportError::DocumentWrite(format!(
                "simulated write failure on page {}",
                index + 1
            )));
        }
        self.renderer.render(page)?;
        self.state.borrow_mut().pages.push(page.clone());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.state.borrow().pages.len()
    }

    fn finalize(self) -> ReportResult<Self::Output> {
        if self.fail_on_finalize {
            return Err(ReportError::DocumentWrite(format!(
                "simulated failure finalizing `{}`",
                self.path.display()
            )));
        }
        let mut state = self.state.borrow_mut();
        state.finalized = true;
        Ok(MemoryDocument {
            path: self.path,
            pages: state.pages.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{DocumentTarget, DocumentWriter, MemoryDocumentTarget};
    use crate::core::Viewport;
    use crate::render::RenderFrame;

    #[test]
    fn memory_writer_tracks_pages_until_finalize() {
        let target = MemoryDocumentTarget::new();
        let mut writer = target.start(Path::new("out.pdf")).expect("start");
        writer
            .append_page(&RenderFrame::new(Viewport::new(10, 10)))
            .expect("append");
        assert_eq!(target.appended_pages(), 1);
        assert!(!target.is_finalized());

        let document = writer.finalize().expect("finalize");
        assert_eq!(document.pages.len(), 1);
        assert!(target.is_finalized());
    }

    #[test]
    fn memory_writer_rejects_invalid_page() {
        let target = MemoryDocumentTarget::new();
        let mut writer = target.start(Path::new("out.pdf")).expect("start");
        assert!(
            writer
                .append_page(&RenderFrame::new(Viewport::new(0, 10)))
                .is_err()
        );
        assert_eq!(target.appended_pages(), 0);
    }

    #[test]
    fn failed_finalize_leaves_document_open() {
        let target = MemoryDocumentTarget::new().failing_on_finalize();
        let mut writer = target.start(Path::new("out.pdf")).expect("start");
        writer
            .append_page(&RenderFrame::new(Viewport::new(10, 10)))
            .expect("append");
        assert!(writer.finalize().is_err());
        assert_eq!(target.appended_pages(), 1);
        assert!(!target.is_finalized());
    }

    #[test]
    fn memory_target_starts_once() {
        let target = MemoryDocumentTarget::new();
        let _writer = target.start(Path::new("a.pdf")).expect("first start");
        assert!(target.start(Path::new("a.pdf")).is_err());
    }
}
