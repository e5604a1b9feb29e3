// Software clock face renderer targeting a reusable PixelBuffer.

use crate::clock::{hand_endpoint, ClockFace, ClockTime};
use crate::mask::{apply_circular_mask, DEFAULT_EDGE_FADE_WIDTH};
use crate::pixels::{PixelBuffer, BLACK, WHITE};

/// Below this side length the dial degenerates and nothing is drawn.
pub const MIN_CLOCK_SIZE: u32 = 10;

const OUTLINE_WIDTH: f64 = 3.0;
const HOUR_HAND_RATIO: f64 = 0.5;
const HOUR_HAND_THICKNESS: f64 = 4.0;
const MINUTE_HAND_RATIO: f64 = 0.7;
const MINUTE_HAND_THICKNESS: f64 = 2.0;
const PIVOT_DIAMETER: f64 = 8.0;

/// Draws the clock into a buffer it keeps between frames.
#[derive(Debug)]
pub struct ClockRenderer {
    buffer: Option<PixelBuffer>,
    edge_fade_width: f32,
}

impl Default for ClockRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_FADE_WIDTH)
    }
}

impl ClockRenderer {
    pub fn new(edge_fade_width: f32) -> Self {
        Self {
            buffer: None,
            edge_fade_width,
        }
    }

    /// Render a `size` x `size` clock showing `time`.
    ///
    /// Returns `None` and leaves the cached frame alone when `size` is below
    /// [`MIN_CLOCK_SIZE`].
    pub fn render(&mut self, size: u32, time: ClockTime) -> Option<&PixelBuffer> {
        if size < MIN_CLOCK_SIZE {
            return None;
        }

        let buffer = match self.buffer.take() {
            Some(mut buf) if buf.size() == size => {
                buf.clear();
                buf
            }
            _ => PixelBuffer::new(size),
        };
        let buffer = self.buffer.insert(buffer);

        draw_face(buffer, &ClockFace::new(size, time));
        apply_circular_mask(buffer, self.edge_fade_width);
        Some(&*buffer)
    }

    /// Last successfully rendered frame.
    pub fn frame(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    pub fn has_frame(&self) -> bool {
        self.buffer.is_some()
    }

    /// Drop the cached buffer. Returns whether there was one to drop.
    pub fn release(&mut self) -> bool {
        self.buffer.take().is_some()
    }
}

fn draw_face(buffer: &mut PixelBuffer, face: &ClockFace) {
    let (cx, cy) = face.center();
    let radius = face.radius();

    buffer.fill_disk(cx, cy, radius, WHITE);
    buffer.stroke_circle(cx, cy, radius, OUTLINE_WIDTH, BLACK);

    let (hx, hy) = hand_endpoint(cx, cy, face.hour_angle, radius * HOUR_HAND_RATIO);
    buffer.draw_line(cx, cy, hx, hy, HOUR_HAND_THICKNESS, BLACK);

    let (mx, my) = hand_endpoint(cx, cy, face.minute_angle, radius * MINUTE_HAND_RATIO);
    buffer.draw_line(cx, cy, mx, my, MINUTE_HAND_THICKNESS, BLACK);

    buffer.fill_disk(cx, cy, PIVOT_DIAMETER / 2.0, BLACK);
}
