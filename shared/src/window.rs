// Capability the overlay lifecycle needs from a platform window.

use crate::error::SurfaceError;
use crate::pixels::PixelBuffer;
use std::time::Duration;

/// The two periodic callbacks an overlay runs while visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Re-renders the clock so the hands stay current.
    Redraw,
    /// Advances the fade.
    Fade,
}

impl Trigger {
    /// Stable id usable as a platform timer id.
    pub fn id(self) -> usize {
        match self {
            Trigger::Redraw => 1,
            Trigger::Fade => 2,
        }
    }

    pub fn from_id(id: usize) -> Option<Self> {
        match id {
            1 => Some(Trigger::Redraw),
            2 => Some(Trigger::Fade),
            _ => None,
        }
    }
}

/// A top-most, click-through, layered window owned by one overlay.
///
/// Implementations wrap a native window; tests use in-memory doubles.
pub trait OverlayWindow {
    fn is_valid(&self) -> bool;

    /// Size of the area the window covers, in pixels.
    fn screen_size(&self) -> (i32, i32);

    fn start_trigger(&mut self, trigger: Trigger, interval: Duration) -> Result<(), SurfaceError>;

    fn stop_trigger(&mut self, trigger: Trigger);

    /// Show `frame` centered in the window at whole-window `opacity`.
    fn present(&mut self, frame: &PixelBuffer, opacity: u8) -> Result<(), SurfaceError>;

    fn set_opacity(&mut self, opacity: u8) -> Result<(), SurfaceError>;

    /// Free the backing drawing surface. Called once, after triggers stop.
    fn release_surface(&mut self);

    /// Ask the platform to destroy the window.
    fn request_close(&mut self) -> Result<(), SurfaceError>;
}
