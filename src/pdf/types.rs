//! Core types for PDF rendering

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

/// Native page dimensions at scale 1, in PDF points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport describing this page rendered at `scale`
    #[must_use]
    pub fn viewport(self, scale: f32) -> Viewport {
        Viewport {
            scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }
}

/// Scale-and-dimension descriptor for rendering one page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Scale factor relative to the native page size
    pub scale: f32,
    /// Width in pixels (fractional)
    pub width: f32,
    /// Height in pixels (fractional)
    pub height: f32,
}

impl Viewport {
    /// Pixel dimensions rounded to the nearest integer, never zero
    #[must_use]
    pub fn rounded(&self) -> (u32, u32) {
        (round_px(self.width), round_px(self.height))
    }

    /// Pixel dimensions rounded down, never zero
    #[must_use]
    pub fn floored(&self) -> (u32, u32) {
        (
            (self.width.floor() as u32).max(1),
            (self.height.floor() as u32).max(1),
        )
    }
}

fn round_px(value: f32) -> u32 {
    (value.round() as u32).max(1)
}

/// Raw rendered page image.
///
/// Packed RGB pixel data, 3 bytes per pixel, row-major without padding.
/// This is the format produced by the engine and copied between canvases.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Bitmap {
    /// A bitmap filled with a single color
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 3);
        for _ in 0..len {
            pixels.extend_from_slice(&rgb);
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Color at `(x, y)`, or `None` outside the bitmap
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels
            .get(idx..idx + 3)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// True if the pixel buffer length matches the dimensions
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * 3
    }
}

impl DrawTarget for Bitmap {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            let (x, y) = (coord.x as u32, coord.y as u32);
            if x >= self.width || y >= self.height {
                continue;
            }
            let idx = (y as usize * self.width as usize + x as usize) * 3;
            if let Some(px) = self.pixels.get_mut(idx..idx + 3) {
                px.copy_from_slice(&[color.r(), color.g(), color.b()]);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
