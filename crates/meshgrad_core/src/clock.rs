//! Animation time
//!
//! The shader is driven by a single scalar that grows by `speed * delta`
//! every frame. [`FrameTimer`] supplies the wall-clock delta.

use std::time::Instant;

/// Default cap on a single frame's delta, in seconds
pub const DEFAULT_MAX_FRAME_DELTA: f32 = 0.25;

/// Accumulated animation time for one widget instance
///
/// Kept in f64 so long-running instances don't lose increments; the shader
/// receives it as f32.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    time: f64,
}

impl AnimationClock {
    /// A clock at time zero
    pub fn new() -> Self {
        Self { time: 0.0 }
    }

    /// Advance by `speed * delta` and return the new time
    ///
    /// Deltas that are negative or not finite are skipped.
    pub fn advance(&mut self, speed: f32, delta: f32) -> f64 {
        if !delta.is_finite() || delta < 0.0 || !speed.is_finite() {
            return self.time;
        }
        self.time += speed as f64 * delta as f64;
        self.time
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time as uploaded to the shader
    #[inline]
    pub fn time_f32(&self) -> f32 {
        self.time as f32
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

/// Measures the wall-clock time between frames
pub struct FrameTimer {
    last_frame: Instant,
    max_delta: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_FRAME_DELTA)
    }

    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            max_delta,
        }
    }

    /// Seconds since the previous tick, capped at the maximum delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        // Cap dt so a stall (window drag, breakpoint) doesn't jump the animation
        raw_dt.min(self.max_delta)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(AnimationClock::new().time(), 0.0);
    }

    #[test]
    fn test_accumulates_speed_times_delta() {
        let mut clock = AnimationClock::new();
        clock.advance(0.01, 0.5);
        clock.advance(0.01, 0.5);
        assert!((clock.time() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_strictly_increasing_with_positive_speed() {
        let mut clock = AnimationClock::new();
        let mut previous = clock.time();
        for _ in 0..1000 {
            let now = clock.advance(0.01, 1.0 / 60.0);
            assert!(now > previous);
            previous = now;
        }
    }

    #[test]
    fn test_zero_speed_holds_time() {
        let mut clock = AnimationClock::new();
        clock.advance(0.0, 1.0);
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_bad_delta_ignored() {
        let mut clock = AnimationClock::new();
        clock.advance(1.0, f32::NAN);
        clock.advance(1.0, -1.0);
        clock.advance(1.0, f32::INFINITY);
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = AnimationClock::new();
        clock.advance(1.0, 1.0);
        clock.reset();
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_frame_timer_caps_delta() {
        let mut timer = FrameTimer::with_max_delta(0.01);
        std::thread::sleep(std::time::Duration::from_millis(30));
        assert_eq!(timer.tick(), 0.01);
    }
}
