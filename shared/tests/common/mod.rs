#![allow(dead_code)]

use clockveil_shared::{OverlayWindow, PixelBuffer, SurfaceError, Trigger};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

/// Everything a [`RecordingWindow`] saw, plus switches to make its calls fail.
#[derive(Debug, Default)]
pub struct WindowLog {
    pub running: HashSet<Trigger>,
    pub started: Vec<(Trigger, Duration)>,
    pub events: Vec<String>,
    pub opacities: Vec<u8>,
    pub presents: Vec<(u32, u8)>,
    pub surface_live: bool,
    pub surface_releases: usize,
    pub close_requests: usize,
    pub destroyed: bool,
    pub used_after_release: usize,

    pub invalid: bool,
    pub fail_opacity: bool,
    pub fail_present: bool,
    pub fail_destroy: bool,
    pub fail_fade_timer: bool,
    pub fail_redraw_timer: bool,
}

pub type SharedLog = Rc<RefCell<WindowLog>>;

/// In-memory stand-in for a native overlay window that tracks resources.
pub struct RecordingWindow {
    log: SharedLog,
    size: (i32, i32),
}

impl RecordingWindow {
    pub fn new(width: i32, height: i32) -> (Self, SharedLog) {
        let log = SharedLog::default();
        (
            Self {
                log: log.clone(),
                size: (width, height),
            },
            log,
        )
    }

    pub fn with_log(log: SharedLog, width: i32, height: i32) -> Self {
        Self {
            log,
            size: (width, height),
        }
    }
}

impl OverlayWindow for RecordingWindow {
    fn is_valid(&self) -> bool {
        let log = self.log.borrow();
        !log.invalid && !log.destroyed
    }

    fn screen_size(&self) -> (i32, i32) {
        self.size
    }

    fn start_trigger(&mut self, trigger: Trigger, interval: Duration) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.events.push(format!("start:{trigger:?}"));
        let fail = match trigger {
            Trigger::Fade => log.fail_fade_timer,
            Trigger::Redraw => log.fail_redraw_timer,
        };
        if fail {
            return Err(SurfaceError::Timer(format!("{trigger:?} refused")));
        }
        log.running.insert(trigger);
        log.started.push((trigger, interval));
        Ok(())
    }

    fn stop_trigger(&mut self, trigger: Trigger) {
        let mut log = self.log.borrow_mut();
        log.events.push(format!("stop:{trigger:?}"));
        log.running.remove(&trigger);
    }

    fn present(&mut self, frame: &PixelBuffer, opacity: u8) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        if log.surface_releases > 0 {
            log.used_after_release += 1;
        }
        if log.fail_present {
            return Err(SurfaceError::Present("refused".into()));
        }
        log.surface_live = true;
        log.presents.push((frame.size(), opacity));
        Ok(())
    }

    fn set_opacity(&mut self, opacity: u8) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        if log.surface_releases > 0 {
            log.used_after_release += 1;
        }
        if log.fail_opacity {
            return Err(SurfaceError::Opacity("refused".into()));
        }
        log.opacities.push(opacity);
        Ok(())
    }

    fn release_surface(&mut self) {
        let mut log = self.log.borrow_mut();
        log.events.push("release".into());
        log.surface_live = false;
        log.surface_releases += 1;
    }

    fn request_close(&mut self) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.events.push("close".into());
        log.close_requests += 1;
        if log.fail_destroy {
            return Err(SurfaceError::Destroy("refused".into()));
        }
        log.destroyed = true;
        Ok(())
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}
