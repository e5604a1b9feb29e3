// Analog clock geometry: wall-clock time to hand angles and endpoints.

use crate::error::OverlayError;
use chrono::Timelike;

/// Hour and minute of the local wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    /// `hour` in 0..=23, `minute` in 0..=59.
    pub fn new(hour: u32, minute: u32) -> Result<Self, OverlayError> {
        if hour > 23 || minute > 59 {
            return Err(OverlayError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Current local time.
    pub fn now() -> Self {
        let now = chrono::Local::now();
        Self {
            hour: now.hour(),
            minute: now.minute(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

/// Hour hand angle in degrees, clockwise from 12 o'clock. Always in [0, 360).
pub fn hour_angle(time: ClockTime) -> f64 {
    ((time.hour % 12) as f64 + time.minute as f64 / 60.0) * 30.0
}

/// Minute hand angle in degrees, clockwise from 12 o'clock. Always in [0, 354].
pub fn minute_angle(time: ClockTime) -> f64 {
    time.minute as f64 * 6.0
}

/// Endpoint of a hand of `length` starting at (`cx`, `cy`) pointing at `angle` degrees.
pub fn hand_endpoint(cx: f64, cy: f64, angle: f64, length: f64) -> (f64, f64) {
    let radian = (angle - 90.0).to_radians();
    (cx + length * radian.cos(), cy + length * radian.sin())
}

/// Derived description of a single clock frame. Rebuilt for every redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockFace {
    pub size: u32,
    pub time: ClockTime,
    pub hour_angle: f64,
    pub minute_angle: f64,
}

impl ClockFace {
    pub fn new(size: u32, time: ClockTime) -> Self {
        Self {
            size,
            time,
            hour_angle: hour_angle(time),
            minute_angle: minute_angle(time),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        let half = self.size as f64 / 2.0;
        (half, half)
    }

    /// Radius of the dial after the fixed inset margin.
    pub fn radius(&self) -> f64 {
        (self.size as f64 / 2.0 - FACE_MARGIN).max(0.0)
    }
}

/// Inset between the bounding square and the dial outline.
pub const FACE_MARGIN: f64 = 2.0;

/// Side length of the clock for a display of `width` x `height`.
pub fn clock_size_for_screen(width: i32, height: i32, scale: f32) -> u32 {
    let min_dimension = width.min(height).max(0) as f32;
    (min_dimension * scale.clamp(0.0, 1.0)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_cover_every_valid_time() {
        for hour in 0..24 {
            for minute in 0..60 {
                let time = ClockTime::new(hour, minute).unwrap();
                let h = hour_angle(time);
                let m = minute_angle(time);
                let expected = ((hour % 12) as f64 + minute as f64 / 60.0) * 30.0;
                assert!((h - expected).abs() < 1e-9);
                assert!((0.0..360.0).contains(&h), "hour angle {h} at {hour}:{minute}");
                assert_eq!(m, minute as f64 * 6.0);
                assert!((0.0..=354.0).contains(&m));
            }
        }
    }

    #[test]
    fn afternoon_matches_morning() {
        let am = ClockTime::new(3, 30).unwrap();
        let pm = ClockTime::new(15, 30).unwrap();
        assert_eq!(hour_angle(am), hour_angle(pm));
        assert_eq!(hour_angle(pm), 105.0);
    }

    #[test]
    fn out_of_range_time_is_rejected() {
        assert!(ClockTime::new(24, 0).is_err());
        assert!(ClockTime::new(0, 60).is_err());
    }

    #[test]
    fn endpoints_point_clockwise_from_twelve() {
        let (x, y) = hand_endpoint(50.0, 50.0, 0.0, 10.0);
        assert!((x - 50.0).abs() < 1e-9 && (y - 40.0).abs() < 1e-9);

        let (x, y) = hand_endpoint(50.0, 50.0, 90.0, 10.0);
        assert!((x - 60.0).abs() < 1e-9 && (y - 50.0).abs() < 1e-9);

        let (x, y) = hand_endpoint(50.0, 50.0, 180.0, 10.0);
        assert!((x - 50.0).abs() < 1e-9 && (y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn clock_uses_smaller_screen_dimension() {
        assert_eq!(clock_size_for_screen(1920, 1080, 0.8), 864);
        assert_eq!(clock_size_for_screen(800, 1200, 0.5), 400);
        assert_eq!(clock_size_for_screen(-5, 100, 0.8), 0);
    }
}
