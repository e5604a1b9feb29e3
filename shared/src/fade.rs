// Linear fade-out state: elapsed time in, window opacity out.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    /// Still at the start opacity.
    Active,
    Fading,
    /// Terminal.
    Closed,
}

/// What a fade tick asks the window to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    Opacity(u8),
    Finished,
    /// The fade was already closed; nothing to do.
    Idle,
}

/// Opacity after `elapsed` of a linear fade from `start` over `duration`.
///
/// Exactly zero at and after `duration`; a zero duration is already finished.
pub fn opacity_at(start: u8, duration: Duration, elapsed: Duration) -> u8 {
    if duration.is_zero() || elapsed >= duration {
        return 0;
    }
    let fraction = elapsed.as_secs_f64() / duration.as_secs_f64();
    (start as f64 * (1.0 - fraction)).round().clamp(0.0, start as f64) as u8
}

#[derive(Debug, Clone)]
pub struct FadeState {
    start_opacity: u8,
    duration: Duration,
    elapsed: Duration,
    opacity: u8,
    phase: FadePhase,
}

impl FadeState {
    pub fn new(start_opacity: u8, duration: Duration) -> Self {
        Self {
            start_opacity,
            duration,
            elapsed: Duration::ZERO,
            opacity: start_opacity,
            phase: FadePhase::Active,
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_closed(&self) -> bool {
        self.phase == FadePhase::Closed
    }

    /// Move the fade to `elapsed` since the window was shown.
    ///
    /// Time never runs backwards: an earlier `elapsed` than already seen is
    /// treated as no progress, so opacity cannot rise again.
    pub fn advance(&mut self, elapsed: Duration) -> FadeStep {
        if self.is_closed() {
            return FadeStep::Idle;
        }

        self.elapsed = self.elapsed.max(elapsed);
        if self.duration.is_zero() || self.elapsed >= self.duration {
            self.opacity = 0;
            self.phase = FadePhase::Closed;
            return FadeStep::Finished;
        }

        self.opacity = opacity_at(self.start_opacity, self.duration, self.elapsed);
        if self.opacity < self.start_opacity {
            self.phase = FadePhase::Fading;
        }
        FadeStep::Opacity(self.opacity)
    }

    /// Force the terminal state. Returns false if it was already closed.
    pub fn close(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.opacity = 0;
        self.phase = FadePhase::Closed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn halfway_is_half_opacity() {
        let op = opacity_at(128, ms(3000), ms(1500));
        assert!((63..=65).contains(&op), "opacity {op}");
    }

    #[test]
    fn reaches_zero_exactly_at_duration() {
        assert_eq!(opacity_at(128, ms(3000), ms(3000)), 0);
        assert_eq!(opacity_at(128, ms(3000), ms(9000)), 0);
        assert_eq!(opacity_at(128, ms(3000), ms(0)), 128);
    }

    #[test]
    fn sixteen_ms_ticks_close_on_time() {
        let mut fade = FadeState::new(128, ms(3000));
        let mut last = fade.opacity();
        let mut t = 0;
        loop {
            t += 16;
            match fade.advance(ms(t)) {
                FadeStep::Opacity(op) => {
                    assert!(op <= last, "opacity rose from {last} to {op} at {t}ms");
                    assert!(t < 3000);
                    last = op;
                    if t == 1504 {
                        assert!((63..=65).contains(&op));
                    }
                }
                FadeStep::Finished => break,
                FadeStep::Idle => panic!("idle before finishing"),
            }
        }
        assert!(t >= 3000);
        assert_eq!(fade.opacity(), 0);
        assert_eq!(fade.phase(), FadePhase::Closed);
        assert_eq!(fade.advance(ms(t + 16)), FadeStep::Idle);
    }

    #[test]
    fn phases_follow_elapsed_time() {
        let mut fade = FadeState::new(200, ms(1000));
        assert_eq!(fade.phase(), FadePhase::Active);
        assert_eq!(fade.advance(ms(0)), FadeStep::Opacity(200));
        assert_eq!(fade.phase(), FadePhase::Active);
        fade.advance(ms(250));
        assert_eq!(fade.phase(), FadePhase::Fading);
        assert_eq!(fade.opacity(), 150);
    }

    #[test]
    fn stays_active_until_opacity_drops() {
        let mut fade = FadeState::new(128, ms(3000));
        assert_eq!(fade.advance(ms(10)), FadeStep::Opacity(128));
        assert_eq!(fade.phase(), FadePhase::Active);
        fade.advance(ms(30));
        assert_eq!(fade.opacity(), 127);
        assert_eq!(fade.phase(), FadePhase::Fading);
    }

    #[test]
    fn backwards_time_does_not_raise_opacity() {
        let mut fade = FadeState::new(100, ms(1000));
        fade.advance(ms(600));
        let op = fade.opacity();
        assert_eq!(fade.advance(ms(100)), FadeStep::Opacity(op));
        assert_eq!(fade.elapsed(), ms(600));
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut fade = FadeState::new(128, Duration::ZERO);
        assert_eq!(fade.advance(Duration::ZERO), FadeStep::Finished);
        assert!(fade.is_closed());
    }

    #[test]
    fn close_is_terminal_and_reported_once() {
        let mut fade = FadeState::new(128, ms(3000));
        fade.advance(ms(100));
        assert!(fade.close());
        assert!(!fade.close());
        assert_eq!(fade.opacity(), 0);
        assert_eq!(fade.advance(ms(200)), FadeStep::Idle);
    }
}
