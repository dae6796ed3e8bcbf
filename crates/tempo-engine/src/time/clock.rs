use super::config::ClockConfig;
use super::error::ClockConfigError;
use super::timer::{ManagedTimer, Timer, TimerStatus};

/// Handle to a timer managed by a [`Clock`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Managed<T> {
    id: TimerId,
    timer: T,
}

/// Logical game clock.
///
/// Accumulates scaled frame deltas into `now` and forwards every frame to a
/// built-in timer plus any number of managed timers. Managed timers that
/// report [`TimerStatus::Finished`] are dropped during the same update.
///
/// Single-threaded: call [`update`](Clock::update) once per frame from the
/// session loop. Timer callbacks have no access to the clock, so an update
/// can never re-enter itself.
#[derive(Debug)]
pub struct Clock<T: ManagedTimer = Timer> {
    now: f64,

    /// Multiplier applied to every incoming delta.
    pub time_scale: f64,

    /// While set, `update` does nothing.
    pub paused: bool,

    /// Built-in timer; never pruned.
    events: T,

    /// Insertion-ordered.
    timers: Vec<Managed<T>>,
    next_id: u64,
    /// Raw frame delta above which a frame counts as a stall.
    time_cap: Option<f64>,
}

impl Clock {
    /// Creates a clock with default settings.
    pub fn new() -> Self {
        Self::build(ClockConfig::default())
    }

    pub fn with_config(config: ClockConfig) -> Result<Self, ClockConfigError> {
        Self::with_timer_type(config)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ManagedTimer> Clock<T> {
    /// Creates a clock that drives timers of type `T`.
    pub fn with_timer_type(config: ClockConfig) -> Result<Self, ClockConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ClockConfig) -> Self {
        let mut clock = Self {
            now: 0.0,
            time_scale: config.time_scale,
            paused: config.paused,
            events: T::new(false, 0.0),
            timers: Vec::new(),
            next_id: 0,
            time_cap: config.time_cap,
        };
        clock.events.start();

        log::debug!(
            "clock created (time_scale={}, paused={})",
            clock.time_scale,
            clock.paused
        );
        clock
    }

    /// Creates a managed timer bound to this clock and returns its handle.
    ///
    /// With `auto_destroy`, the clock drops the timer once it has fired all
    /// of its events.
    pub fn create(&mut self, auto_destroy: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let timer = T::new(auto_destroy, self.now);
        self.timers.push(Managed { id, timer });

        log::debug!("timer {id:?} created (auto_destroy={auto_destroy})");
        id
    }

    /// Shorthand for `create(true)`.
    pub fn create_default(&mut self) -> TimerId {
        self.create(true)
    }

    pub fn timer(&self, id: TimerId) -> Option<&T> {
        self.timers.iter().find(|m| m.id == id).map(|m| &m.timer)
    }

    pub fn timer_mut(&mut self, id: TimerId) -> Option<&mut T> {
        self.timers.iter_mut().find(|m| m.id == id).map(|m| &mut m.timer)
    }

    /// Destroys one managed timer and forgets it.
    ///
    /// Returns `false` if the handle no longer refers to a managed timer.
    pub fn destroy_timer(&mut self, id: TimerId) -> bool {
        let Some(index) = self.timers.iter().position(|m| m.id == id) else {
            return false;
        };

        let mut managed = self.timers.remove(index);
        managed.timer.destroy();
        log::debug!("timer {id:?} destroyed");
        true
    }

    /// Destroys every managed timer and clears the built-in timer's schedule.
    pub fn remove_all(&mut self) {
        let count = self.timers.len();
        for managed in &mut self.timers {
            managed.timer.destroy();
        }
        self.timers.clear();
        self.events.clear();

        log::debug!("removed {count} managed timer(s)");
    }

    /// Advances logical time by `elapsed * time_scale` and ticks every timer.
    ///
    /// Stalls are judged on the raw `elapsed`, so fast-forwarding never looks
    /// like a stall to the timers.
    pub fn update(&mut self, elapsed: f64) {
        if self.paused {
            return;
        }

        self.now += elapsed * self.time_scale;
        let now = self.now;

        let stalled = self.time_cap.is_some_and(|cap| elapsed > cap);
        if stalled {
            log::debug!("frame of {elapsed} ms exceeds the time cap; rebasing timers");
        }

        // The built-in timer is never pruned, whatever it reports.
        let _ = self.events.tick(now, stalled);

        // Stable single pass: every entry is ticked once, survivors keep order.
        let before = self.timers.len();
        self.timers
            .retain_mut(|m| m.timer.tick(now, stalled) == TimerStatus::Alive);

        let pruned = before - self.timers.len();
        if pruned > 0 {
            log::trace!("pruned {pruned} finished timer(s) at {now}");
        }
    }

    /// Logical time elapsed since `since`.
    pub fn elapsed_since(&self, since: f64) -> f64 {
        self.now - since
    }

    /// Rewinds logical time to zero and removes every timer.
    ///
    /// `time_scale` and `paused` are left as they are.
    pub fn reset(&mut self) {
        self.now = 0.0;
        self.remove_all();
        self.events.rebase(self.now);

        log::debug!("clock reset");
    }

    /// Accumulated logical time, in ms.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// The built-in timer.
    pub fn events(&self) -> &T {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut T {
        &mut self.events
    }

    /// Number of managed timers (the built-in timer is not counted).
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Handles of the managed timers, in insertion order.
    pub fn timer_ids(&self) -> impl Iterator<Item = TimerId> + '_ {
        self.timers.iter().map(|m| m.id)
    }
}
