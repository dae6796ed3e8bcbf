use std::time::{Duration, Instant};

/// Raw frame timing sample, fed to [`Clock::update`](super::Clock::update).
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Wall time since the previous sample, in ms, after clamping.
    pub elapsed_ms: f64,

    /// Monotonic timestamp of the sample.
    pub at: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Wall-clock delta source, one per session loop.
///
/// Deltas are clamped so a debugger break, a minimized window or a long
/// stall does not arrive at the logical clock as one enormous step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with the default clamps of 0.1 ms and 250 ms.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta measurement from the current instant.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, at: Instant) {
        self.last = at;
    }

    /// Samples the wall clock.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Samples at a caller-provided instant.
    pub fn tick_at(&mut self, at: Instant) -> FrameTime {
        let dt = at
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = at;

        let sample = FrameTime {
            elapsed_ms: dt.as_nanos() as f64 / 1_000_000.0,
            at,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        sample
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(start: Instant) -> FrameClock {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        clock.reset_at(start);
        clock
    }

    #[test]
    fn reports_delta_in_ms() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        let ft = clock.tick_at(start + Duration::from_millis(16));
        assert_eq!(ft.elapsed_ms, 16.0);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn clamps_long_stalls() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert_eq!(ft.elapsed_ms, 100.0);
    }

    #[test]
    fn clamps_zero_delta_to_minimum() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        let ft = clock.tick_at(start);
        assert_eq!(ft.elapsed_ms, 1.0);
    }

    #[test]
    fn instant_before_baseline_saturates() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = clock_at(start);
        let ft = clock.tick_at(start - Duration::from_millis(500));
        assert_eq!(ft.elapsed_ms, 1.0);
    }

    #[test]
    fn frame_index_increments() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        for i in 0..3u64 {
            let ft = clock.tick_at(start + Duration::from_millis(10 * (i + 1)));
            assert_eq!(ft.frame_index, i);
            assert_eq!(ft.elapsed_ms, 10.0);
        }
        assert_eq!(clock.frame_index(), 3);
    }
}
