//! MuPDF-backed document loader

use std::path::PathBuf;

use log::debug;
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::engine::{DocumentLoader, PdfDocument, check_page, is_remote_url, resolve_url};
use super::error::{RenderError, RenderResult};
use super::types::{Bitmap, PageSize, Viewport};

/// Opens local PDF files with MuPDF
#[derive(Clone, Debug, Default)]
pub struct MuPdfLoader {
    base_dir: Option<PathBuf>,
}

impl MuPdfLoader {
    #[must_use]
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }
}

impl DocumentLoader for MuPdfLoader {
    fn open(&self, url: &str) -> RenderResult<Box<dyn PdfDocument>> {
        if is_remote_url(url) {
            return Err(RenderError::open(url, "remote documents are not supported"));
        }

        let path = resolve_url(url, self.base_dir.as_deref());
        if !path.exists() {
            return Err(RenderError::open(url, format!("{} not found", path.display())));
        }

        let doc = Document::open(path.to_string_lossy().as_ref())?;
        let page_count = usize::try_from(doc.page_count()?).unwrap_or(0);
        if page_count == 0 {
            return Err(RenderError::open(url, "document has no pages"));
        }

        debug!("Opened {} ({page_count} pages)", path.display());
        Ok(Box::new(MuPdfDocument { doc, page_count }))
    }
}

struct MuPdfDocument {
    doc: Document,
    page_count: usize,
}

impl MuPdfDocument {
    fn load(&self, page: usize) -> RenderResult<mupdf::Page> {
        check_page(page, self.page_count)?;
        Ok(self.doc.load_page((page - 1) as i32)?)
    }
}

impl PdfDocument for MuPdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_size(&self, page: usize) -> RenderResult<PageSize> {
        let bounds = self.load(page)?.bounds()?;
        Ok(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
    }

    fn render(&self, page: usize, viewport: &Viewport) -> RenderResult<Bitmap> {
        let loaded = self.load(page)?;
        let transform = Matrix::new_scale(viewport.scale, viewport.scale);
        let rgb = Colorspace::device_rgb();
        let pixmap = loaded.to_pixmap(&transform, &rgb, false, false)?;
        pixmap_to_bitmap(&pixmap)
    }
}

fn pixmap_to_bitmap(pixmap: &Pixmap) -> RenderResult<Bitmap> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(RenderError::generic(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    if samples.len() < stride.saturating_mul(height) || row_bytes > stride {
        return Err(RenderError::generic("Pixmap buffer size mismatch"));
    }

    let mut pixels = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row_start = y * stride;
        let row = &samples[row_start..row_start + row_bytes];
        if n == 3 {
            pixels.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                pixels.extend_from_slice(&px[..3]);
            }
        }
    }

    Ok(Bitmap {
        pixels,
        width: pixmap.width(),
        height: pixmap.height(),
    })
}
