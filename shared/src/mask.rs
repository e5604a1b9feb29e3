// Soft circular silhouette for layered windows that take premultiplied BGRA.

use crate::pixels::{alpha, blue, green, pack, red, PixelBuffer};

/// Width of the anti-aliased ramp at the rim of the circle.
pub const DEFAULT_EDGE_FADE_WIDTH: f32 = 3.0;

#[inline]
fn premultiply(px: u32, a: u8) -> u32 {
    let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
    pack(a, scale(red(px)), scale(green(px)), scale(blue(px)))
}

/// Clip `buffer` to the circle inscribed in it and premultiply every pixel.
///
/// Pixels whose center lies outside the circle become fully transparent, the
/// outer `edge_fade_width` ring ramps alpha down linearly, and the interior
/// keeps its alpha. Runs in place without allocating.
pub fn apply_circular_mask(buffer: &mut PixelBuffer, edge_fade_width: f32) {
    let size = buffer.size();
    let center = size as f32 / 2.0;
    let outer = size as f32 / 2.0;
    let inner = (outer - edge_fade_width.max(0.0)).max(0.0);
    let outer_sq = outer * outer;
    let inner_sq = inner * inner;
    let ramp = outer - inner;

    let pixels = buffer.pixels_mut();
    for y in 0..size {
        let dy = y as f32 + 0.5 - center;
        let row = (y * size) as usize;
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dist_sq = dx * dx + dy * dy;
            let idx = row + x as usize;
            let px = pixels[idx];

            pixels[idx] = if dist_sq >= outer_sq {
                0
            } else if dist_sq >= inner_sq {
                let factor = ((outer - dist_sq.sqrt()) / ramp).clamp(0.0, 1.0);
                let a = (alpha(px) as f32 * factor).round() as u8;
                premultiply(px, a)
            } else {
                premultiply(px, alpha(px))
            };
        }
    }
}
