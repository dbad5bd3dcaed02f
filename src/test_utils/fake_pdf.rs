//! In-memory PDF engine for tests
//!
//! Pages render as solid colors derived from the page number, so a test can
//! tell which page ended up on a canvas.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::pdf::{
    Bitmap, DocumentLoader, PageSize, PdfDocument, RenderError, RenderResult, Viewport,
    check_page,
};

/// Solid color a fake page renders with
#[must_use]
pub fn page_color(page: usize) -> [u8; 3] {
    [((page * 40) % 256) as u8, 0x20, 0x40]
}

#[derive(Clone, Debug, Default)]
pub struct FakeDocumentSpec {
    pages: Vec<PageSize>,
    failing_pages: HashSet<usize>,
}

impl FakeDocumentSpec {
    /// `count` pages of the same size
    #[must_use]
    pub fn uniform(count: usize, width: f32, height: f32) -> Self {
        Self::with_pages(vec![PageSize::new(width, height); count])
    }

    #[must_use]
    pub fn with_pages(pages: Vec<PageSize>) -> Self {
        Self {
            pages,
            failing_pages: HashSet::new(),
        }
    }

    /// Make rendering `page` fail
    #[must_use]
    pub fn failing_page(mut self, page: usize) -> Self {
        self.failing_pages.insert(page);
        self
    }
}

/// A single render performed by a fake document
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCall {
    pub url: String,
    pub page: usize,
    pub scale: f32,
}

#[derive(Clone, Default)]
pub struct FakeLoader {
    docs: HashMap<String, FakeDocumentSpec>,
    renders: Arc<Mutex<Vec<RenderCall>>>,
}

impl FakeLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, url: &str, spec: FakeDocumentSpec) -> Self {
        self.docs.insert(url.to_string(), spec);
        self
    }

    /// Register a document whose every page fails to render
    #[must_use]
    pub fn with_failing_render(self, url: &str, spec: FakeDocumentSpec) -> Self {
        let count = spec.pages.len();
        let spec = (1..=count).fold(spec, FakeDocumentSpec::failing_page);
        self.with_document(url, spec)
    }

    /// Renders performed so far, in order
    #[must_use]
    pub fn renders(&self) -> Vec<RenderCall> {
        self.renders.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl DocumentLoader for FakeLoader {
    fn open(&self, url: &str) -> RenderResult<Box<dyn PdfDocument>> {
        let spec = self
            .docs
            .get(url)
            .cloned()
            .ok_or_else(|| RenderError::open(url, "no such document"))?;
        Ok(Box::new(FakeDocument {
            url: url.to_string(),
            spec,
            renders: Arc::clone(&self.renders),
        }))
    }
}

struct FakeDocument {
    url: String,
    spec: FakeDocumentSpec,
    renders: Arc<Mutex<Vec<RenderCall>>>,
}

impl PdfDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.spec.pages.len()
    }

    fn page_size(&self, page: usize) -> RenderResult<PageSize> {
        check_page(page, self.page_count())?;
        Ok(self.spec.pages[page - 1])
    }

    fn render(&self, page: usize, viewport: &Viewport) -> RenderResult<Bitmap> {
        check_page(page, self.page_count())?;
        if self.spec.failing_pages.contains(&page) {
            return Err(RenderError::generic(format!("page {page} is corrupt")));
        }
        if let Ok(mut renders) = self.renders.lock() {
            renders.push(RenderCall {
                url: self.url.clone(),
                page,
                scale: viewport.scale,
            });
        }
        let (width, height) = viewport.rounded();
        Ok(Bitmap::filled(width, height, page_color(page)))
    }
}
