use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};
use tempo_engine::core::{App, AppControl, FrameCtx, Session, SessionConfig};
use tempo_engine::logging::{LoggingConfig, init_logging};
use tempo_engine::time::{Clock, ClockConfig};

/// Launch countdown driven entirely by logical time.
struct Countdown {
    launched:    Rc<Cell<bool>>,
    slow_motion: Rc<Cell<bool>>,
    slowed:      bool,
}

impl App for Countdown {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if self.slow_motion.get() && !self.slowed {
            ctx.clock.time_scale = 0.5;
            self.slowed = true;
            log::info!("slow motion engaged at t={:.0} ms", ctx.clock.now());
        }

        if self.launched.get() {
            log::info!(
                "liftoff at t={:.0} ms (frame {})",
                ctx.clock.now(),
                ctx.time.frame_index
            );
            return AppControl::Exit;
        }

        AppControl::Continue
    }
}

fn schedule_countdown(clock: &mut Clock, launched: &Rc<Cell<bool>>, slow_motion: &Rc<Cell<bool>>) -> Result<()> {
    clock.events_mut().add_loop(1000.0, || log::info!("heartbeat"));

    let id = clock.create(true);
    let timer = clock
        .timer_mut(id)
        .context("countdown timer missing right after creation")?;

    let mut remaining = 5;
    timer.repeat(500.0, 4, move || {
        log::info!("T-{remaining:02}");
        remaining -= 1;
    });

    let slow_motion = Rc::clone(slow_motion);
    timer.add(1200.0, move || slow_motion.set(true));

    let launched = Rc::clone(launched);
    timer.on_complete(move || launched.set(true));

    timer.start_after(250.0);
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = SessionConfig {
        clock: ClockConfig::default(),
        target_fps: 60,
        max_frames: Some(60 * 30),
    };
    let mut session = Session::new(config).context("failed to start session")?;

    let launched = Rc::new(Cell::new(false));
    let slow_motion = Rc::new(Cell::new(false));
    schedule_countdown(session.clock_mut(), &launched, &slow_motion)?;

    let mut app = Countdown {
        launched,
        slow_motion,
        slowed: false,
    };

    match session.run(&mut app) {
        AppControl::Exit => {
            log::info!("countdown finished after {} frame(s)", session.frames());
            Ok(())
        }
        AppControl::Continue => anyhow::bail!("countdown did not finish within the frame budget"),
    }
}
