//! The seam between the viewer and a PDF rendering engine
//!
//! The viewer only needs four things from an engine: open a document by URL,
//! look up a page by number, get the page's viewport at scale 1, and render a
//! page at a viewport. Page numbers are 1-based here, matching what the user
//! sees in the page indicator.

use std::path::{Path, PathBuf};

use super::error::{RenderError, RenderResult};
use super::types::{Bitmap, PageSize, Viewport};

/// An opened document
pub trait PdfDocument {
    /// Total number of pages
    fn page_count(&self) -> usize;

    /// Native size of `page` at scale 1
    fn page_size(&self, page: usize) -> RenderResult<PageSize>;

    /// Render `page` at the given viewport
    fn render(&self, page: usize, viewport: &Viewport) -> RenderResult<Bitmap>;
}

/// Opens documents by URL.
///
/// Loaders are shared with thumbnail worker threads, so they must be
/// `Send + Sync`. The documents they return stay on the opening thread.
pub trait DocumentLoader: Send + Sync {
    fn open(&self, url: &str) -> RenderResult<Box<dyn PdfDocument>>;
}

/// Returns an error unless `page` is within `1..=page_count`
pub fn check_page(page: usize, page_count: usize) -> RenderResult<()> {
    if page == 0 || page > page_count {
        return Err(RenderError::PageOutOfRange { page, page_count });
    }
    Ok(())
}

/// Resolve a catalog URL to a local path.
///
/// Accepts `file://` URLs, absolute paths, and paths relative to `base_dir`
/// (or the working directory when there is none).
#[must_use]
pub fn resolve_url(url: &str, base_dir: Option<&Path>) -> PathBuf {
    let raw = url.strip_prefix("file://").unwrap_or(url);
    let path = Path::new(raw);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match base_dir {
        Some(base) => base.join(path),
        None => path.to_path_buf(),
    }
}

/// Returns true for URLs that need a network fetch
#[must_use]
pub fn is_remote_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
