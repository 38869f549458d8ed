//! 1-bit label canvas and the rotated drawing pen.
//!
//! ```text
//! local frame (pen)                 device frame (canvas)
//!
//!   0 ──▶ lx                         R90 about (ox, oy):
//!   │                                  (lx, ly) → (ox − ly, oy + lx)
//!   ▼ ly
//! ```
//!
//! Every primitive paints each covered pixel exactly once, so drawing with
//! [`Ink::Invert`] never cancels itself out.

use image::{GrayImage, Luma};

use crate::label::Rotation;

/// How a primitive changes the pixels it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Black,
    White,
    /// XOR: black becomes white and white becomes black.
    Invert,
}

/// Label bitmap, `true` = black dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Canvas {
    /// White canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel value; anything outside the canvas reads as white.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    #[inline]
    fn paint(&mut self, x: i64, y: i64, ink: Ink) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = match ink {
            Ink::Black => true,
            Ink::White => false,
            Ink::Invert => !self.pixels[idx],
        };
    }

    /// Fill the device-space rectangle `[x0, x1) × [y0, y1)`. Edges are
    /// rounded to the nearest pixel boundary, so rectangles that share an
    /// edge never share a pixel.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, ink: Ink) {
        let (left, right) = (x0.min(x1).round() as i64, x0.max(x1).round() as i64);
        let (top, bottom) = (y0.min(y1).round() as i64, y0.max(y1).round() as i64);
        for y in top.max(0)..bottom.min(self.height as i64) {
            for x in left.max(0)..right.min(self.width as i64) {
                self.paint(x, y, ink);
            }
        }
    }

    /// Paint every pixel in the bounding box whose center satisfies
    /// `inside`.
    pub fn fill_where(
        &mut self,
        (x0, y0, x1, y1): (f64, f64, f64, f64),
        ink: Ink,
        inside: impl Fn(f64, f64) -> bool,
    ) {
        let (left, right) = (x0.floor() as i64, x1.ceil() as i64);
        let (top, bottom) = (y0.floor() as i64, y1.ceil() as i64);
        for y in top.max(0)..bottom.min(self.height as i64) {
            for x in left.max(0)..right.min(self.width as i64) {
                if inside(x as f64 + 0.5, y as f64 + 0.5) {
                    self.paint(x, y, ink);
                }
            }
        }
    }

    /// Number of black pixels.
    pub fn ink_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    /// Smallest rectangle `(x0, y0, x1, y1)` (exclusive end) holding all
    /// black pixels.
    pub fn ink_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixels[y * self.width + x] {
                    let b = bounds.get_or_insert((x, y, x + 1, y + 1));
                    b.0 = b.0.min(x);
                    b.1 = b.1.min(y);
                    b.2 = b.2.max(x + 1);
                    b.3 = b.3.max(y + 1);
                }
            }
        }
        bounds
    }

    /// 8-bit grayscale image, black = 0.
    pub fn to_gray_image(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width as u32, self.height as u32);
        for y in 0..self.height {
            for x in 0..self.width {
                let color = if self.pixels[y * self.width + x] {
                    0u8
                } else {
                    255u8
                };
                img.put_pixel(x as u32, y as u32, Luma([color]));
            }
        }
        img
    }
}

/// Local drawing frame: origin at an anchor point, rotated clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub origin: (f64, f64),
    pub rotation: Rotation,
}

impl Pen {
    pub fn new(origin: (f64, f64), rotation: Rotation) -> Self {
        Self { origin, rotation }
    }

    /// Local point to device point.
    pub fn map(&self, lx: f64, ly: f64) -> (f64, f64) {
        let (ox, oy) = self.origin;
        match self.rotation {
            Rotation::R0 => (ox + lx, oy + ly),
            Rotation::R90 => (ox - ly, oy + lx),
            Rotation::R180 => (ox - lx, oy - ly),
            Rotation::R270 => (ox + ly, oy - lx),
        }
    }

    /// Fill a local rectangle.
    pub fn fill_rect(&self, canvas: &mut Canvas, lx: f64, ly: f64, w: f64, h: f64, ink: Ink) {
        let (ax, ay) = self.map(lx, ly);
        let (bx, by) = self.map(lx + w, ly + h);
        canvas.fill_rect(ax, ay, bx, by, ink);
    }
}
