//! Platform-independent core of the Clockveil overlay: the analog clock
//! renderer, its circular alpha mask, and the fade-and-destroy lifecycle.

pub mod clock;
pub mod config;
pub mod error;
pub mod fade;
pub mod mask;
pub mod overlay;
pub mod pixels;
pub mod registry;
pub mod render;
pub mod window;

pub use clock::{ClockFace, ClockTime};
pub use error::{ConfigError, OverlayError, SurfaceError};
pub use fade::{FadePhase, FadeState};
pub use overlay::{CloseReason, Overlay, OverlayConfig, OverlayEvent, OverlayId};
pub use pixels::PixelBuffer;
pub use registry::{OverlayRegistry, ReentryPolicy, Tick, TriggerOutcome};
pub use render::ClockRenderer;
pub use window::{OverlayWindow, Trigger};
