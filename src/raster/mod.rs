//! Raster canvas. An 8-bit grayscale bitmap with the few fills a roll
//! needs: solid rectangles for the margins, rounded slots and round dots
//! for holes.
//!
//! Bounding boxes are inclusive on both ends and clipped to the image.
//! Fills are binary; nothing is anti-aliased.

pub mod encode;

use crate::geometry::HoleShape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RollImage {
    /// A `width` × `height` image filled with `value`.
    pub fn new(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major pixel data, one byte per pixel.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Number of pixels equal to `value`.
    pub fn count(&self, value: u8) -> usize {
        self.pixels.iter().filter(|&&p| p == value).count()
    }

    /// Clip an inclusive span to `0..limit`; `None` if nothing is left.
    fn clip(lo: i64, hi: i64, limit: u32) -> Option<(usize, usize)> {
        let lo = lo.max(0);
        let hi = hi.min(limit as i64 - 1);
        if lo > hi {
            None
        } else {
            Some((lo as usize, hi as usize))
        }
    }

    fn fill_where<F>(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: u8, inside: F)
    where
        F: Fn(i64, i64) -> bool,
    {
        let (Some((cx0, cx1)), Some((cy0, cy1))) = (
            Self::clip(x0, x1, self.width),
            Self::clip(y0, y1, self.height),
        ) else {
            return;
        };
        let width = self.width as usize;
        for y in cy0..=cy1 {
            let row = &mut self.pixels[y * width..(y + 1) * width];
            for x in cx0..=cx1 {
                if inside(x as i64, y as i64) {
                    row[x] = value;
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: u8) {
        self.fill_where(x0, y0, x1, y1, value, |_, _| true);
    }

    /// Rectangle whose corners are quarter circles of `radius`.
    pub fn fill_rounded_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, radius: i64, value: u8) {
        let r = radius.max(0);
        let r2 = r * r;
        self.fill_where(x0, y0, x1, y1, value, |x, y| {
            let dx = (x0 + r - x).max(x - (x1 - r)).max(0);
            let dy = (y0 + r - y).max(y - (y1 - r)).max(0);
            dx * dx + dy * dy <= r2
        });
    }

    /// Ellipse inscribed in the bounding box.
    pub fn fill_ellipse(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: u8) {
        let cx = (x0 + x1) as f64 / 2.0;
        let cy = (y0 + y1) as f64 / 2.0;
        let rx = ((x1 - x0) as f64 / 2.0).max(0.5);
        let ry = ((y1 - y0) as f64 / 2.0).max(0.5);
        self.fill_where(x0, y0, x1, y1, value, |x, y| {
            let nx = (x as f64 - cx) / rx;
            let ny = (y as f64 - cy) / ry;
            nx * nx + ny * ny <= 1.0
        });
    }

    /// Paint the strips left and right of the paper.
    pub fn paint_margins(&mut self, margin_px: i64, roll_width_px: i64, value: u8) {
        let bottom = self.height as i64;
        let right = self.width as i64;
        self.fill_rect(0, 0, margin_px, bottom, value);
        self.fill_rect(margin_px + roll_width_px, 0, right, bottom, value);
    }

    pub fn paint_shape(&mut self, shape: &HoleShape, value: u8) {
        match *shape {
            HoleShape::Dot { x, y, size } => self.fill_ellipse(x, y, x + size, y + size, value),
            HoleShape::Slot { x, top, bottom, width, radius } => {
                self.fill_rounded_rect(x, top, x + width, bottom, radius, value)
            }
        }
    }
}
