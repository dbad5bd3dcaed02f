//! Errors from the PDF engine seam

/// Errors from opening or rendering a document
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot open {url}: {detail}")]
    Open { url: String, detail: String },

    #[error("page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("invalid geometry: {detail}")]
    Geometry { detail: String },

    #[error("{detail}")]
    Generic { detail: String },
}

impl RenderError {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry { detail: msg.into() }
    }

    pub fn open(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Open {
            url: url.into(),
            detail: detail.into(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
