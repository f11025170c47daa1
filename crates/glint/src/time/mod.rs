//! Frame and wall-clock timing.

use std::time::{Duration, Instant};

/// Per-frame timing snapshot produced by [`FrameClock::tick`].
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock was created. Suitable for time-driven
    /// uniforms (rotation angles, animation phases).
    pub elapsed: f32,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Drives per-frame timing for one render loop.
///
/// Keep one clock per window so multi-window applications do not share
/// delta-time state. Delta time is clamped so a debugger pause or a
/// minimized window cannot feed a huge step into animation code.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// A clock with default clamps (0.1ms..250ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// A clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta-time baseline without touching the elapsed origin
    /// or frame counter. Call after a long blocking operation (shader
    /// reload, asset load) to drop the stall from the next delta.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns the frame's timing snapshot.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple elapsed-time measurement for one-off operations (startup,
/// shader compilation, asset loads).
#[derive(Debug, Copy, Clone)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the elapsed time and restarts the watch.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let lap = now.saturating_duration_since(self.start);
        self.start = now;
        lap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_frame_index() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_to_bounds() {
        let min = Duration::from_millis(5);
        let max = Duration::from_millis(50);
        let mut clock = FrameClock::with_clamps(min, max);

        // An immediate tick lands below the minimum clamp.
        let ft = clock.tick();
        assert!(ft.dt >= min.as_secs_f32());
        assert!(ft.dt <= max.as_secs_f32());
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick().elapsed;
        let b = clock.tick().elapsed;
        assert!(b >= a);
    }

    #[test]
    fn reset_does_not_rewind_elapsed() {
        let mut clock = FrameClock::new();
        let before = clock.tick().elapsed;
        clock.reset();
        assert!(clock.tick().elapsed >= before);
    }

    #[test]
    fn stopwatch_lap_restarts() {
        let mut watch = Stopwatch::start();
        std::thread::sleep(Duration::from_millis(1));
        let first = watch.lap();
        assert!(first >= Duration::from_millis(1));
        // After a lap the watch measures from the lap point again.
        assert!(watch.elapsed() < Duration::from_secs(5));
    }
}
