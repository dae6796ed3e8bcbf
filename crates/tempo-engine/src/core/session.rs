use std::thread;
use std::time::{Duration, Instant};

use crate::time::{Clock, ClockConfig, ClockConfigError, FrameClock, FrameTime};

use super::app::{App, AppControl};
use super::ctx::FrameCtx;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub clock: ClockConfig,
    /// Frame rate the loop throttles to. `0` runs unthrottled.
    pub target_fps: u32,
    /// Stops the loop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            target_fps: 60,
            max_frames: None,
        }
    }
}

/// Owns the logical clock for one game session and drives it once per frame.
#[derive(Debug)]
pub struct Session {
    clock: Clock,
    frame_clock: FrameClock,
    frame_interval: Duration,
    max_frames: Option<u64>,
    frames: u64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, ClockConfigError> {
        let clock = match Clock::with_config(config.clock) {
            Ok(clock) => clock,
            Err(err) => {
                log::warn!("rejected session config: {err}");
                return Err(err);
            }
        };

        let frame_interval = match config.target_fps {
            0 => Duration::ZERO,
            fps => Duration::from_secs_f64(1.0 / fps as f64),
        };

        Ok(Self {
            clock,
            frame_clock: FrameClock::default(),
            frame_interval,
            max_frames: config.max_frames,
            frames: 0,
        })
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Frames stepped so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Runs one frame: updates the clock exactly once, then hands control to `app`.
    pub fn step<A>(&mut self, time: FrameTime, app: &mut A) -> AppControl
    where
        A: App + ?Sized,
    {
        self.clock.update(time.elapsed_ms);
        self.frames += 1;

        let mut ctx = FrameCtx {
            clock: &mut self.clock,
            time,
        };
        app.on_frame(&mut ctx)
    }

    /// Drives `app` from the wall clock until it exits or the frame budget runs out.
    ///
    /// Returns `AppControl::Exit` when the app asked to stop and
    /// `AppControl::Continue` when `max_frames` was reached.
    pub fn run<A>(&mut self, app: &mut A) -> AppControl
    where
        A: App + ?Sized,
    {
        log::debug!("session loop started (frame interval {:?})", self.frame_interval);
        self.frame_clock.reset();

        loop {
            if self.max_frames.is_some_and(|max| self.frames >= max) {
                log::debug!("frame budget reached after {} frame(s)", self.frames);
                return AppControl::Continue;
            }

            let frame_start = Instant::now();
            let time = self.frame_clock.tick_at(frame_start);

            if self.step(time, app) == AppControl::Exit {
                log::debug!("app requested exit after {} frame(s)", self.frames);
                return AppControl::Exit;
            }

            if let Some(rest) = self.frame_interval.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<f64>,
        exit_after: Option<usize>,
    }

    impl App for Recorder {
        fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
            self.seen.push(ctx.clock.now());
            match self.exit_after {
                Some(n) if self.seen.len() >= n => AppControl::Exit,
                _ => AppControl::Continue,
            }
        }
    }

    fn frame(elapsed_ms: f64, frame_index: u64) -> FrameTime {
        FrameTime { elapsed_ms, at: Instant::now(), frame_index }
    }

    fn unthrottled(max_frames: Option<u64>) -> SessionConfig {
        SessionConfig { target_fps: 0, max_frames, ..Default::default() }
    }

    #[test]
    fn step_updates_clock_before_app() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        let mut app = Recorder::default();

        for i in 0..3 {
            assert_eq!(session.step(frame(16.0, i), &mut app), AppControl::Continue);
        }
        assert_eq!(app.seen, vec![16.0, 32.0, 48.0]);
        assert_eq!(session.frames(), 3);
    }

    #[test]
    fn step_applies_time_scale_changes_from_the_app() {
        struct SlowMo;
        impl App for SlowMo {
            fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
                ctx.clock.time_scale = 0.5;
                AppControl::Continue
            }
        }

        let mut session = Session::new(SessionConfig::default()).unwrap();
        session.step(frame(16.0, 0), &mut SlowMo);
        session.step(frame(16.0, 1), &mut SlowMo);
        assert_eq!(session.clock().now(), 24.0);
    }

    #[test]
    fn invalid_clock_config_is_rejected() {
        let config = SessionConfig {
            clock: ClockConfig { time_scale: -2.0, ..Default::default() },
            ..Default::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn run_stops_at_frame_budget() {
        let mut session = Session::new(unthrottled(Some(3))).unwrap();
        let mut app = Recorder::default();

        assert_eq!(session.run(&mut app), AppControl::Continue);
        assert_eq!(session.frames(), 3);
        assert_eq!(app.seen.len(), 3);
        assert!(session.clock().now() > 0.0);
    }

    #[test]
    fn zero_frame_budget_runs_no_frames() {
        let mut session = Session::new(unthrottled(Some(0))).unwrap();
        let mut app = Recorder::default();

        assert_eq!(session.run(&mut app), AppControl::Continue);
        assert_eq!(session.frames(), 0);
        assert!(app.seen.is_empty());
        assert_eq!(session.clock().now(), 0.0);
    }

    #[test]
    fn run_stops_when_app_exits() {
        let mut session = Session::new(unthrottled(Some(100))).unwrap();
        let mut app = Recorder { exit_after: Some(2), ..Default::default() };

        assert_eq!(session.run(&mut app), AppControl::Exit);
        assert_eq!(session.frames(), 2);
    }

    #[test]
    fn paused_clock_still_steps_frames() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        session.clock_mut().paused = true;
        let mut app = Recorder::default();

        session.step(frame(16.0, 0), &mut app);
        assert_eq!(app.seen, vec![0.0]);
        assert_eq!(session.frames(), 1);
    }
}
