//! PDF rendering infrastructure

mod cache;
mod engine;
mod error;
#[cfg(feature = "pdf")]
mod mupdf_engine;
mod scale;
mod types;

pub use cache::{CacheKey, DEFAULT_PAGE_CACHE_SIZE, PageCache};
pub use engine::{DocumentLoader, PdfDocument, check_page, is_remote_url, resolve_url};
pub use error::{RenderError, RenderResult};
#[cfg(feature = "pdf")]
pub use mupdf_engine::MuPdfLoader;
pub use scale::*;
pub use types::*;
