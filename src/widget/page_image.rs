//! Draws a canvas into the terminal using half-block cells
//!
//! Each cell shows two vertically stacked display pixels: the upper one as
//! the foreground of `▀`, the lower one as the background. One column is one
//! display pixel wide. Canvases rendered at a device pixel ratio above 1 are
//! sampled down to their display size here.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, style::Style, widgets::Widget};

use crate::canvas::Canvas;
use crate::theme::rgb;
use crate::viewer::Direction;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

/// Second canvas wiped in over the first during a page flip
#[derive(Clone, Copy)]
pub struct Reveal<'a> {
    pub canvas: &'a Canvas,
    pub direction: Direction,
    /// 0.0 = nothing revealed, 1.0 = fully revealed
    pub progress: f32,
}

pub struct PageImage<'a> {
    canvas: &'a Canvas,
    scroll_px: u32,
    fit: bool,
    reveal: Option<Reveal<'a>>,
    background: Color,
}

impl<'a> PageImage<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            scroll_px: 0,
            fit: false,
            reveal: None,
            background: Color::Reset,
        }
    }

    /// Skip `px` display pixels from the top
    pub fn scroll(mut self, px: u32) -> Self {
        self.scroll_px = px;
        self
    }

    /// Scale the canvas to fit the area instead of using its display size
    pub fn fit_to_area(mut self) -> Self {
        self.fit = true;
        self
    }

    pub fn reveal(mut self, reveal: Option<Reveal<'a>>) -> Self {
        self.reveal = reveal;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    fn revealed_at(&self, col: u16, width: u16) -> Option<&'a Canvas> {
        let reveal = self.reveal?;
        let boundary = (f32::from(width) * reveal.progress.clamp(0.0, 1.0)).round() as u16;
        let hit = match reveal.direction {
            Direction::Forward => col >= width.saturating_sub(boundary),
            Direction::Back => col < boundary,
        };
        hit.then_some(reveal.canvas)
    }
}

/// Display size of `canvas` inside `area`, in display pixels
pub fn display_dims(canvas: &Canvas, area: Rect, fit: bool) -> (u32, u32) {
    let (width, height) = canvas.display_size();
    if !fit || width == 0 || height == 0 {
        return (width, height);
    }
    let (w, h) = (u64::from(width), u64::from(height));
    let max_w = u64::from(area.width);
    let max_h = u64::from(area.height) * 2;
    let (fit_w, fit_h) = if max_w * h <= max_h * w {
        (max_w, h * max_w / w)
    } else {
        (w * max_h / h, max_h)
    };
    ((fit_w as u32).max(1), (fit_h as u32).max(1))
}

fn sample(canvas: &Canvas, dims: (u32, u32), x: u32, y: u32) -> Option<Color> {
    let (dw, dh) = dims;
    if x >= dw || y >= dh {
        return None;
    }
    let bitmap = canvas.bitmap()?;
    let bx = u64::from(x) * u64::from(bitmap.width) / u64::from(dw);
    let by = u64::from(y) * u64::from(bitmap.height) / u64::from(dh);
    bitmap.pixel(bx as u32, by as u32).map(rgb)
}

impl Widget for PageImage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let own_dims = display_dims(self.canvas, area, self.fit);
        let reveal_dims = self
            .reveal
            .map(|r| display_dims(r.canvas, area, self.fit))
            .unwrap_or(own_dims);

        for row in 0..area.height {
            for col in 0..area.width {
                let (canvas, dims) = match self.revealed_at(col, area.width) {
                    Some(revealed) => (revealed, reveal_dims),
                    None => (self.canvas, own_dims),
                };
                let offset = u32::from(area.width).saturating_sub(dims.0) / 2;
                let Some(x) = u32::from(col).checked_sub(offset) else {
                    continue;
                };
                let y = self.scroll_px + u32::from(row) * 2;
                let top = sample(canvas, dims, x, y);
                let bottom = sample(canvas, dims, x, y + 1);
                if top.is_none() && bottom.is_none() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(top.unwrap_or(self.background))
                        .set_bg(bottom.unwrap_or(self.background));
                }
            }
        }

        if let Some(label) = self.canvas.label() {
            let bg = self
                .canvas
                .bitmap()
                .and_then(|b| b.pixel(0, 0))
                .map_or(self.background, rgb);
            let text_width = label.text.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(text_width) / 2;
            let y = area.y + area.height.min(3) / 2;
            buf.set_stringn(
                x,
                y,
                &label.text,
                usize::from(area.width),
                Style::default().fg(rgb(label.color)).bg(bg),
            );
        }
    }
}
