// One clock overlay: renders the face, drives the fade, tears itself down
// through its owner rather than by itself.

use crate::clock::{clock_size_for_screen, ClockTime};
use crate::error::OverlayError;
use crate::fade::{FadePhase, FadeState, FadeStep};
use crate::mask::DEFAULT_EDGE_FADE_WIDTH;
use crate::render::ClockRenderer;
use crate::window::{OverlayWindow, Trigger};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Behaviour knobs for a single overlay instance.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub start_opacity: u8,
    pub fade_duration: Duration,
    pub fade_interval: Duration,
    pub redraw_interval: Duration,
    /// Clock side length as a fraction of the smaller screen dimension.
    pub clock_scale: f32,
    pub edge_fade_width: f32,
    /// Keep the hands moving while the overlay fades.
    pub live_hands: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            start_opacity: 128,
            fade_duration: Duration::from_millis(3000),
            fade_interval: Duration::from_millis(30),
            redraw_interval: Duration::from_millis(1000),
            clock_scale: 0.8,
            edge_fade_width: DEFAULT_EDGE_FADE_WIDTH,
            live_hands: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    FadeComplete,
    /// Closed from outside (user action, replacement, shutdown).
    Requested,
    /// The native window disappeared underneath us.
    WindowLost,
    /// The fade trigger could not be started.
    StartFailed,
}

/// Emitted once, on the transition to Closed. The owner drops the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Closed(CloseReason),
}

pub struct Overlay<W: OverlayWindow> {
    id: OverlayId,
    window: W,
    config: OverlayConfig,
    fade: FadeState,
    renderer: ClockRenderer,
    clock_size: u32,
    now: fn() -> ClockTime,
    shown_at: Option<Instant>,
    redraw_running: bool,
    fade_running: bool,
    released: bool,
}

impl<W: OverlayWindow> Overlay<W> {
    pub fn new(id: OverlayId, window: W, config: OverlayConfig) -> Self {
        Self::with_clock(id, window, config, ClockTime::now)
    }

    /// Like [`Overlay::new`] with a custom wall-clock source.
    pub fn with_clock(
        id: OverlayId,
        window: W,
        config: OverlayConfig,
        now: fn() -> ClockTime,
    ) -> Self {
        let (width, height) = window.screen_size();
        let clock_size = clock_size_for_screen(width, height, config.clock_scale);
        Self {
            id,
            fade: FadeState::new(config.start_opacity, config.fade_duration),
            renderer: ClockRenderer::new(config.edge_fade_width),
            clock_size,
            window,
            config,
            now,
            shown_at: None,
            redraw_running: false,
            fade_running: false,
            released: false,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn phase(&self) -> FadePhase {
        if self.released {
            FadePhase::Closed
        } else {
            self.fade.phase()
        }
    }

    pub fn opacity(&self) -> u8 {
        self.fade.opacity()
    }

    pub fn is_closed(&self) -> bool {
        self.released
    }

    pub fn clock_size(&self) -> u32 {
        self.clock_size
    }

    /// Time since [`Overlay::show`], zero before it.
    pub fn elapsed(&self) -> Duration {
        self.shown_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Draw the first frame at start opacity and start both triggers.
    ///
    /// Failing to start the fade trigger would leave a window that never goes
    /// away, so that aborts the overlay and releases what it holds.
    pub fn show(&mut self) -> Result<(), OverlayError> {
        if self.released {
            return Ok(());
        }
        self.shown_at = Some(Instant::now());
        self.draw();

        if let Err(e) = self.window.start_trigger(Trigger::Fade, self.config.fade_interval) {
            error!("{}: cannot start fade timer: {e}", self.id);
            self.close(CloseReason::StartFailed);
            return Err(OverlayError::Create(e));
        }
        self.fade_running = true;

        if self.config.live_hands {
            match self
                .window
                .start_trigger(Trigger::Redraw, self.config.redraw_interval)
            {
                Ok(()) => self.redraw_running = true,
                Err(e) => warn!("{}: redraw timer unavailable, hands stay static: {e}", self.id),
            }
        }

        info!(
            "{} shown: clock {}px, opacity {}, fading over {:?}",
            self.id,
            self.clock_size,
            self.fade.opacity(),
            self.config.fade_duration
        );
        Ok(())
    }

    /// Re-render with the current time so the hands stay current.
    pub fn on_redraw_tick(&mut self) -> Option<OverlayEvent> {
        if self.released {
            return None;
        }
        if !self.window.is_valid() {
            return self.close(CloseReason::WindowLost);
        }
        self.draw();
        None
    }

    /// Advance the fade to `elapsed` since the overlay was shown.
    pub fn on_fade_tick(&mut self, elapsed: Duration) -> Option<OverlayEvent> {
        if self.released {
            return None;
        }
        if !self.window.is_valid() {
            return self.close(CloseReason::WindowLost);
        }

        match self.fade.advance(elapsed) {
            FadeStep::Opacity(opacity) => {
                if let Err(e) = self.window.set_opacity(opacity) {
                    warn!("{}: opacity update to {opacity} failed: {e}", self.id);
                }
                None
            }
            FadeStep::Finished => self.close(CloseReason::FadeComplete),
            FadeStep::Idle => None,
        }
    }

    /// Advance the fade using the wall time since [`Overlay::show`].
    pub fn on_fade_tick_now(&mut self) -> Option<OverlayEvent> {
        let elapsed = self.elapsed();
        self.on_fade_tick(elapsed)
    }

    /// Close immediately, skipping whatever is left of the fade.
    pub fn request_close(&mut self) -> Option<OverlayEvent> {
        self.close(CloseReason::Requested)
    }

    fn draw(&mut self) {
        let time = (self.now)();
        match self.renderer.render(self.clock_size, time) {
            Some(frame) => {
                if let Err(e) = self.window.present(frame, self.fade.opacity()) {
                    warn!("{}: presenting frame failed: {e}", self.id);
                }
            }
            None => debug!(
                "{}: clock size {}px too small, frame skipped",
                self.id, self.clock_size
            ),
        }
    }

    fn close(&mut self, reason: CloseReason) -> Option<OverlayEvent> {
        if self.released {
            return None;
        }
        self.released = true;
        self.fade.close();

        if self.fade_running {
            self.window.stop_trigger(Trigger::Fade);
            self.fade_running = false;
        }
        if self.redraw_running {
            self.window.stop_trigger(Trigger::Redraw);
            self.redraw_running = false;
        }

        self.window.release_surface();
        self.renderer.release();

        if let Err(e) = self.window.request_close() {
            error!("{}: window could not be destroyed and is leaked: {e}", self.id);
        }

        debug!("{} closed: {:?}", self.id, reason);
        Some(OverlayEvent::Closed(reason))
    }
}

impl<W: OverlayWindow> fmt::Debug for Overlay<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("opacity", &self.fade.opacity())
            .field("clock_size", &self.clock_size)
            .finish()
    }
}
