// Square 32-bit pixel buffer plus the few anti-aliased primitives the clock needs.
//
// Pixels are stored as 0xAARRGGBB words, which is B, G, R, A in memory on
// little-endian targets (the layout a 32-bit DIB section expects). Drawing
// writes straight alpha; the circular mask premultiplies afterwards.

pub const WHITE: u32 = 0xFFFF_FFFF;
pub const BLACK: u32 = 0xFF00_0000;

#[inline]
pub fn alpha(px: u32) -> u8 {
    (px >> 24) as u8
}

#[inline]
pub fn red(px: u32) -> u8 {
    (px >> 16) as u8
}

#[inline]
pub fn green(px: u32) -> u8 {
    (px >> 8) as u8
}

#[inline]
pub fn blue(px: u32) -> u8 {
    px as u8
}

#[inline]
pub fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Fully transparent `size` x `size` buffer.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![0; (size as usize) * (size as usize)],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.size + x) as usize]
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Composite opaque `color` over the pixel at `idx` with the given coverage.
    fn blend(&mut self, idx: usize, color: u32, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let c = coverage.min(1.0);
        let dst = self.pixels[idx];
        let dst_a = alpha(dst) as f32 / 255.0;
        let out_a = c + dst_a * (1.0 - c);
        if out_a <= 0.0 {
            return;
        }
        let mix = |src: u8, dst: u8| -> u8 {
            let v = (src as f32 * c + dst as f32 * dst_a * (1.0 - c)) / out_a;
            v.round().clamp(0.0, 255.0) as u8
        };
        self.pixels[idx] = pack(
            (out_a * 255.0).round() as u8,
            mix(red(color), red(dst)),
            mix(green(color), green(dst)),
            mix(blue(color), blue(dst)),
        );
    }

    /// Pixel index range covering [lo, hi] on one axis, clipped to the buffer.
    fn span(&self, lo: f64, hi: f64) -> std::ops::Range<u32> {
        let start = lo.floor().max(0.0) as u32;
        let end = (hi.ceil().max(0.0) as u32).min(self.size);
        start.min(end)..end
    }

    /// Anti-aliased filled disk.
    pub fn fill_disk(&mut self, cx: f64, cy: f64, radius: f64, color: u32) {
        let reach = radius + 1.0;
        for y in self.span(cy - reach, cy + reach) {
            for x in self.span(cx - reach, cx + reach) {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = (radius - d + 0.5).clamp(0.0, 1.0) as f32;
                let idx = (y * self.size + x) as usize;
                self.blend(idx, color, coverage);
            }
        }
    }

    /// Anti-aliased circle outline of the given stroke width centered on `radius`.
    pub fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, width: f64, color: u32) {
        let half = width / 2.0;
        let reach = radius + half + 1.0;
        for y in self.span(cy - reach, cy + reach) {
            for x in self.span(cx - reach, cx + reach) {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = (half - (d - radius).abs() + 0.5).clamp(0.0, 1.0) as f32;
                let idx = (y * self.size + x) as usize;
                self.blend(idx, color, coverage);
            }
        }
    }

    /// Anti-aliased line segment with round caps.
    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, thickness: f64, color: u32) {
        let half = thickness / 2.0;
        let reach = half + 1.0;
        let (vx, vy) = (x1 - x0, y1 - y0);
        let len_sq = vx * vx + vy * vy;

        for y in self.span(y0.min(y1) - reach, y0.max(y1) + reach) {
            for x in self.span(x0.min(x1) - reach, x0.max(x1) + reach) {
                let px = x as f64 + 0.5 - x0;
                let py = y as f64 + 0.5 - y0;
                let t = if len_sq > 0.0 {
                    ((px * vx + py * vy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dx = px - vx * t;
                let dy = py - vy * t;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = (half - d + 0.5).clamp(0.0, 1.0) as f32;
                let idx = (y * self.size + x) as usize;
                self.blend(idx, color, coverage);
            }
        }
    }

    /// Clear a `width` x `height` row-major `dst` to transparent and copy
    /// this buffer into its middle. Rows and columns that do not fit are
    /// clipped on the bottom and right.
    pub fn copy_centered_into(&self, dst: &mut [u32], width: usize, height: usize) {
        let Some(dst) = dst.get_mut(..width * height) else {
            return;
        };
        dst.fill(0);

        let size = self.size as usize;
        if size == 0 || width == 0 {
            return;
        }
        let x0 = width.saturating_sub(size) / 2;
        let y0 = height.saturating_sub(size) / 2;
        let cols = size.min(width - x0);

        for (row, src) in self.pixels.chunks_exact(size).enumerate() {
            let y = y0 + row;
            if y >= height {
                break;
            }
            let start = y * width + x0;
            dst[start..start + cols].copy_from_slice(&src[..cols]);
        }
    }
}
