//! First-page thumbnails for catalog cards
//!
//! - `render_thumbnail` - render one thumbnail, falling back to a placeholder
//! - `service` - background workers that render a whole catalog

mod service;

pub use service::{
    DEFAULT_THUMBNAIL_WORKERS, ThumbnailRequest, ThumbnailResponse, ThumbnailService,
};

use log::{debug, error};

use crate::canvas::Canvas;
use crate::pdf::{
    DocumentLoader, RenderResult, THUMBNAIL_FALLBACK_WIDTH, container_width_or, fit_width_scale,
};

pub const PLACEHOLDER_WIDTH: u32 = 600;
pub const PLACEHOLDER_HEIGHT: u32 = 850;
pub const PLACEHOLDER_BACKGROUND: [u8; 3] = [0xF1, 0xF5, 0xF9];
pub const PLACEHOLDER_TEXT_COLOR: [u8; 3] = [0x33, 0x41, 0x55];
pub const PLACEHOLDER_TEXT: &str = "Preview unavailable";
const PLACEHOLDER_TEXT_X: i32 = 20;
const PLACEHOLDER_TEXT_BASELINE: i32 = 44;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Rendered,
    Placeholder,
}

#[derive(Clone, Debug)]
pub struct Thumbnail {
    pub canvas: Canvas,
    pub status: ThumbnailStatus,
}

impl Thumbnail {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.status == ThumbnailStatus::Placeholder
    }
}

/// Render page 1 of `url` fitted to `container_width`.
///
/// Thumbnails are rendered at 1x. Any failure is logged and replaced by a
/// placeholder; there is no retry.
pub fn render_thumbnail(
    loader: &dyn DocumentLoader,
    url: &str,
    container_width: f32,
) -> Thumbnail {
    let mut canvas = Canvas::new();
    match render_first_page(loader, url, container_width, &mut canvas) {
        Ok(()) => Thumbnail {
            canvas,
            status: ThumbnailStatus::Rendered,
        },
        Err(e) => {
            error!("Thumbnail error for {url}: {e}");
            draw_placeholder(&mut canvas);
            Thumbnail {
                canvas,
                status: ThumbnailStatus::Placeholder,
            }
        }
    }
}

fn render_first_page(
    loader: &dyn DocumentLoader,
    url: &str,
    container_width: f32,
    canvas: &mut Canvas,
) -> RenderResult<()> {
    let doc = loader.open(url)?;
    let base = doc.page_size(1)?;

    let width = container_width_or(container_width, THUMBNAIL_FALLBACK_WIDTH);
    let viewport = base.viewport(fit_width_scale(width, base.width)?);
    let (w, h) = viewport.floored();
    canvas.set_size(w, h);

    let bitmap = doc.render(1, &viewport)?;
    canvas.draw_bitmap(&bitmap);
    debug!("Rendered thumbnail for {url} at {w}x{h}");
    Ok(())
}

/// Fixed-size placeholder shown when a preview cannot be rendered
pub fn draw_placeholder(canvas: &mut Canvas) {
    canvas.set_size(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    canvas.reset_display_size();
    canvas.fill(PLACEHOLDER_BACKGROUND);
    canvas.draw_text(
        PLACEHOLDER_TEXT,
        PLACEHOLDER_TEXT_X,
        PLACEHOLDER_TEXT_BASELINE,
        PLACEHOLDER_TEXT_COLOR,
    );
    canvas.set_label(PLACEHOLDER_TEXT, PLACEHOLDER_TEXT_COLOR);
}
