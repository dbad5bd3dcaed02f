//! Per-open viewer session state

use crate::pdf::PdfDocument;

/// Direction of a page flip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

impl Direction {
    /// Page reached by moving one step from `page`, if it exists
    #[must_use]
    pub fn step(self, page: usize, total_pages: usize) -> Option<usize> {
        match self {
            Self::Forward if page < total_pages => Some(page + 1),
            Self::Back if page > 1 => Some(page - 1),
            _ => None,
        }
    }
}

/// Loaded document and page position.
///
/// `current_page` is 1-based and always within `1..=total_pages`.
pub struct Session {
    document: Option<Box<dyn PdfDocument>>,
    current_page: usize,
    total_pages: usize,
    animating: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            document: None,
            current_page: 1,
            total_pages: 1,
            animating: false,
        }
    }

    /// Install a freshly opened document and rewind to page 1
    pub fn load(&mut self, document: Box<dyn PdfDocument>) {
        self.total_pages = document.page_count().max(1);
        self.current_page = 1;
        self.animating = false;
        self.document = Some(document);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn document(&self) -> Option<&dyn PdfDocument> {
        self.document.as_deref()
    }

    #[must_use]
    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    /// Target page for a flip in `direction`, or `None` when the flip must
    /// not happen (no document, mid-transition, or out of bounds)
    #[must_use]
    pub fn flip_target(&self, direction: Direction) -> Option<usize> {
        if self.document.is_none() || self.animating {
            return None;
        }
        direction.step(self.current_page, self.total_pages)
    }

    /// Move to `page`, clamped to the document's bounds
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages);
    }
}
