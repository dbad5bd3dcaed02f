//! Owned raster canvases
//!
//! A canvas has two sizes: its pixel size (the backing bitmap) and its
//! display size (how large it is shown). HiDPI renders make the pixel size a
//! multiple of the display size.

use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii},
    pixelcolor::Rgb888,
    prelude::*,
    text::Text,
};

use crate::pdf::Bitmap;

/// Default pixel size of a fresh canvas
pub const DEFAULT_CANVAS_WIDTH: u32 = 300;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 150;

/// Text drawn over a canvas, used by placeholders
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasLabel {
    pub text: String,
    pub color: [u8; 3],
}

#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    display: Option<(u32, u32)>,
    content: Option<Bitmap>,
    label: Option<CanvasLabel>,
    visible: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            display: None,
            content: None,
            label: None,
            visible: true,
        }
    }

    /// Pixel size of the backing store
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Resize the backing store. Like an HTML canvas, this wipes the content.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.content = None;
        self.label = None;
    }

    /// Size the canvas is shown at; defaults to the pixel size
    #[must_use]
    pub fn display_size(&self) -> (u32, u32) {
        self.display.unwrap_or((self.width, self.height))
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = Some((width, height));
    }

    /// Drop the explicit display size
    pub fn reset_display_size(&mut self) {
        self.display = None;
    }

    /// Clear to transparent, keeping the size
    pub fn clear(&mut self) {
        self.content = None;
        self.label = None;
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        self.content = Some(Bitmap::filled(self.width, self.height, rgb));
    }

    /// Rasterize `text` with its alphabetic baseline starting at `(x, y)`.
    /// Does nothing on a canvas without content.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, rgb: [u8; 3]) {
        let Some(target) = self.content.as_mut() else {
            return;
        };
        let style = MonoTextStyle::new(&ascii::FONT_10X20, Rgb888::new(rgb[0], rgb[1], rgb[2]));
        let _ = Text::new(text, Point::new(x, y), style).draw(target);
    }

    /// Draw `bitmap` with its top-left corner at the origin, clipped to the canvas
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap) {
        if bitmap.width == self.width && bitmap.height == self.height && bitmap.is_consistent() {
            self.content = Some(bitmap.clone());
            return;
        }

        let (width, height) = (self.width, self.height);
        let target = self
            .content
            .get_or_insert_with(|| Bitmap::filled(width, height, [0xFF, 0xFF, 0xFF]));

        let copy_w = bitmap.width.min(width) as usize;
        let copy_h = bitmap.height.min(height) as usize;
        let src_stride = bitmap.width as usize * 3;
        let dst_stride = width as usize * 3;
        for y in 0..copy_h {
            let src = &bitmap.pixels[y * src_stride..y * src_stride + copy_w * 3];
            target.pixels[y * dst_stride..y * dst_stride + copy_w * 3].copy_from_slice(src);
        }
    }

    /// Take over another canvas's bitmap and sizes without re-rendering
    pub fn copy_from(&mut self, other: &Canvas) {
        self.set_size(other.width, other.height);
        if let Some(bitmap) = &other.content {
            self.draw_bitmap(bitmap);
        }
        self.label = other.label.clone();
        self.display = other.display;
    }

    #[must_use]
    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.content.as_ref()
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    #[must_use]
    pub fn label(&self) -> Option<&CanvasLabel> {
        self.label.as_ref()
    }

    pub fn set_label(&mut self, text: impl Into<String>, color: [u8; 3]) {
        self.label = Some(CanvasLabel {
            text: text.into(),
            color,
        });
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_rasterized_into_the_bitmap() {
        let mut canvas = Canvas::new();
        canvas.fill([0xFF, 0xFF, 0xFF]);
        canvas.draw_text("Hi", 20, 44, [0, 0, 0]);

        let bitmap = canvas.bitmap().unwrap();
        let inked = (24..44)
            .flat_map(|y| (20..40).map(move |x| (x, y)))
            .filter(|&(x, y)| bitmap.pixel(x, y) == Some([0, 0, 0]))
            .count();
        assert!(inked > 0);
        assert_eq!(bitmap.pixel(0, 0), Some([0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn text_on_empty_canvas_is_ignored() {
        let mut canvas = Canvas::new();
        canvas.draw_text("Hi", 0, 20, [0, 0, 0]);
        assert!(!canvas.has_content());
    }

    #[test]
    fn resizing_wipes_content() {
        let mut canvas = Canvas::new();
        canvas.fill([1, 1, 1]);
        assert!(canvas.has_content());

        canvas.set_size(10, 10);
        assert!(!canvas.has_content());
        assert_eq!(canvas.size(), (10, 10));
    }

    #[test]
    fn display_size_defaults_to_pixel_size() {
        let mut canvas = Canvas::new();
        canvas.set_size(200, 100);
        assert_eq!(canvas.display_size(), (200, 100));

        canvas.set_display_size(100, 50);
        assert_eq!(canvas.display_size(), (100, 50));
        assert_eq!(canvas.size(), (200, 100));
    }

    #[test]
    fn draw_clips_larger_bitmaps() {
        let mut canvas = Canvas::new();
        canvas.set_size(2, 2);
        canvas.draw_bitmap(&Bitmap::filled(4, 4, [9, 8, 7]));

        let bmp = canvas.bitmap().unwrap();
        assert_eq!((bmp.width, bmp.height), (2, 2));
        assert_eq!(bmp.pixel(1, 1), Some([9, 8, 7]));
    }

    #[test]
    fn draw_smaller_bitmap_keeps_background() {
        let mut canvas = Canvas::new();
        canvas.set_size(3, 1);
        canvas.draw_bitmap(&Bitmap::filled(1, 1, [0, 0, 0]));

        let bmp = canvas.bitmap().unwrap();
        assert_eq!(bmp.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(bmp.pixel(2, 0), Some([0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn copy_from_takes_sizes_and_pixels() {
        let mut src = Canvas::new();
        src.set_size(4, 6);
        src.set_display_size(2, 3);
        src.fill([5, 5, 5]);

        let mut dst = Canvas::new();
        dst.copy_from(&src);

        assert_eq!(dst.size(), (4, 6));
        assert_eq!(dst.display_size(), (2, 3));
        assert_eq!(dst.bitmap(), src.bitmap());
    }
}
