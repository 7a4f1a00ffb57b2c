// filepath: src/draw.rs
//! Drawing primitives for oled-status
//!
//! The canvas is a single bi-level plane matching the one-bit-per-pixel
//! panel. Every operation clips to the canvas bounds; nothing here can
//! fail because of coordinates.

use crate::font::{Font, COVERAGE_THRESHOLD};
use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

/// Owned bi-level framebuffer that widgets draw into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pixels: Vec<bool>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create a canvas with every pixel off
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![false; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Get the width of the canvas
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the canvas
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to background
    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// Row-major pixel data, `true` meaning foreground
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// True when no pixel is set
    pub fn is_blank(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// Read a pixel; anything outside the canvas reads as background
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|idx| self.pixels[idx]).unwrap_or(false)
    }

    /// Write a pixel; writes outside the canvas are dropped
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = on;
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Set every pixel of `[x, x+width) × [y, y+height)` that lies on the canvas
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, on: bool) {
        if width <= 0 || height <= 0 {
            return;
        }

        let x_start = x.max(0) as i64;
        let y_start = y.max(0) as i64;
        let x_end = (x as i64 + width as i64).min(self.width as i64);
        let y_end = (y as i64 + height as i64).min(self.height as i64);

        if x_end <= x_start || y_end <= y_start {
            return; // Nothing to draw
        }

        for row in y_start..y_end {
            let offset = row as usize * self.width as usize;
            self.pixels[offset + x_start as usize..offset + x_end as usize].fill(on);
        }
    }

    /// Draw a rectangle covering `[x, x+width) × [y, y+height)`
    ///
    /// `fill` paints the whole area; `outline` alone paints only the
    /// one-pixel border. Non-positive sizes draw nothing.
    pub fn draw_rectangle(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        outline: bool,
        fill: bool,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }

        if fill {
            self.fill_rect(x, y, width, height, true);
            return;
        }

        if outline {
            let right = x.saturating_add(width - 1);
            let bottom = y.saturating_add(height - 1);
            self.fill_rect(x, y, width, 1, true);
            self.fill_rect(x, bottom, width, 1, true);
            self.fill_rect(x, y, 1, height, true);
            self.fill_rect(right, y, 1, height, true);
        }
    }

    /// Draw a single line of text with its top-left corner at `(x, y)`
    ///
    /// `fill` selects foreground ink; `false` draws the glyphs in
    /// background, punching them out of whatever is underneath.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, font: Option<&Font>, fill: bool) {
        let default_font;
        let font = match font {
            Some(font) => font,
            None => {
                default_font = Font::default();
                &default_font
            }
        };

        // Text only extends right and down from its anchor
        if x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        match font {
            Font::Mono(mono) => {
                let style = MonoTextStyle::new(*mono, BinaryColor::from(fill));
                // Drawing into the canvas is infallible
                let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
            }
            Font::Outline { face, px } => {
                let ascent = face
                    .horizontal_line_metrics(*px)
                    .map(|m| m.ascent)
                    .unwrap_or(*px);
                let mut pen_x = x as f32;

                for ch in text.chars() {
                    let (metrics, coverage) = face.rasterize(ch, *px);
                    let glyph_x = (pen_x.round() as i32).saturating_add(metrics.xmin);
                    let glyph_y = y.saturating_add(
                        (ascent - metrics.height as f32 - metrics.ymin as f32).round() as i32,
                    );

                    for (i, &alpha) in coverage.iter().enumerate() {
                        if alpha >= COVERAGE_THRESHOLD {
                            let col = (i % metrics.width) as i32;
                            let row = (i / metrics.width) as i32;
                            self.set_pixel(glyph_x.saturating_add(col), glyph_y.saturating_add(row), fill);
                        }
                    }

                    pen_x += metrics.advance_width;
                }
            }
        }
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}
