use std::fmt;

/// Default frame gap (ms) above which a tick is treated as a stall.
pub const DEFAULT_TIME_CAP: f64 = 1000.0;

/// Result of advancing a managed timer by one frame.
#[must_use]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimerStatus {
    /// The timer wants further ticks.
    Alive,
    /// The timer has run out of work; its owner may drop it.
    Finished,
}

/// Per-frame contract between a [`Clock`](super::Clock) and the timers it drives.
///
/// Both the clock's built-in timer and user-created timers go through this
/// interface. The clock decides which of them may be pruned on `Finished`.
pub trait ManagedTimer {
    /// Creates a timer bound to a clock whose logical time is currently `now`.
    fn new(auto_destroy: bool, now: f64) -> Self
    where
        Self: Sized;

    /// Starts dispatching scheduled events.
    fn start(&mut self);

    /// Advances the timer to logical time `now`.
    ///
    /// `stalled` marks a frame whose raw, unscaled delta exceeded the owner's
    /// time cap; pending events keep their remaining delay across it.
    fn tick(&mut self, now: f64, stalled: bool) -> TimerStatus;

    /// Drops every scheduled event but keeps the timer usable.
    fn clear(&mut self);

    /// Releases everything the timer holds and stops it.
    fn destroy(&mut self);

    /// Moves the timer's time base to `now`, keeping every pending delay intact.
    fn rebase(&mut self, now: f64);
}

/// Handle to an event scheduled on a [`Timer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EventId(u64);

type Callback = Box<dyn FnMut()>;

/// A callback scheduled on a [`Timer`].
pub struct TimerEvent {
    id: EventId,
    delay: f64,
    tick: f64,
    repeat_count: u32,
    looping: bool,
    pending_delete: bool,
    callback: Callback,
}

impl TimerEvent {
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Interval between firings, in ms.
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Logical time at which the event is next due.
    pub fn due(&self) -> f64 {
        self.tick
    }

    /// Remaining extra firings for a repeating event.
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl fmt::Debug for TimerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEvent")
            .field("id", &self.id)
            .field("delay", &self.delay)
            .field("tick", &self.tick)
            .field("repeat_count", &self.repeat_count)
            .field("looping", &self.looping)
            .field("pending_delete", &self.pending_delete)
            .finish_non_exhaustive()
    }
}

/// Schedules one-shot, repeating and looping callbacks against logical time.
///
/// A timer keeps its own time base: it only learns the current time through
/// [`tick`](Timer::tick), and every delay is measured from that base. Events
/// added before [`start`](Timer::start) are rebased to the start time.
///
/// Each event fires at most once per tick. A looping event that falls several
/// periods behind catches up over the following ticks rather than in a burst.
///
/// Delay units are milliseconds of logical time.
pub struct Timer {
    now: f64,
    started_at: f64,
    paused_at: f64,
    next_tick: f64,

    running: bool,
    paused: bool,
    expired: bool,
    auto_destroy: bool,

    /// Stall threshold for standalone use through [`tick`](Timer::tick).
    time_cap: Option<f64>,

    /// Sorted by due time; ties keep insertion order.
    events: Vec<TimerEvent>,
    next_event_id: u64,
    on_complete: Option<Callback>,
}

impl Timer {
    /// Creates a stopped timer whose time base is `now`.
    pub fn new(auto_destroy: bool, now: f64) -> Self {
        Self {
            now,
            started_at: now,
            paused_at: now,
            next_tick: now,
            running: false,
            paused: false,
            expired: false,
            auto_destroy,
            time_cap: Some(DEFAULT_TIME_CAP),
            events: Vec::new(),
            next_event_id: 0,
            on_complete: None,
        }
    }

    /// Schedules `callback` to run once, `delay` ms from now.
    pub fn add<F>(&mut self, delay: f64, callback: F) -> EventId
    where
        F: FnMut() + 'static,
    {
        self.schedule(delay, 0, false, Box::new(callback))
    }

    /// Schedules `callback` to run once after `delay`, then `repeat_count` more
    /// times, `delay` apart.
    pub fn repeat<F>(&mut self, delay: f64, repeat_count: u32, callback: F) -> EventId
    where
        F: FnMut() + 'static,
    {
        self.schedule(delay, repeat_count, false, Box::new(callback))
    }

    /// Schedules `callback` to run every `delay` ms until removed.
    pub fn add_loop<F>(&mut self, delay: f64, callback: F) -> EventId
    where
        F: FnMut() + 'static,
    {
        self.schedule(delay, 0, true, Box::new(callback))
    }

    /// Sets a callback that runs every time the timer expires.
    ///
    /// A timer revived by a new event runs it again when that event is spent.
    pub fn on_complete<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    fn schedule(&mut self, delay: f64, repeat_count: u32, looping: bool, callback: Callback) -> EventId {
        // `max` also maps NaN to zero.
        let delay = delay.max(0.0);
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;

        self.events.push(TimerEvent {
            id,
            delay,
            tick: self.now + delay,
            repeat_count,
            looping,
            pending_delete: false,
            callback,
        });

        self.order();
        self.expired = false;
        id
    }

    /// Starts the timer immediately.
    pub fn start(&mut self) {
        self.start_after(0.0);
    }

    /// Starts the timer `delay` ms from now. Ignored while already running.
    pub fn start_after(&mut self, delay: f64) {
        if self.running {
            return;
        }

        self.started_at = self.now + delay.max(0.0);
        self.running = true;

        for event in &mut self.events {
            event.tick = self.started_at + event.delay;
        }
        self.order();
    }

    /// Stops dispatching. With `clear_events`, every scheduled event is dropped.
    pub fn stop(&mut self, clear_events: bool) {
        self.running = false;
        if clear_events {
            self.events.clear();
        }
    }

    /// Cancels a scheduled event.
    ///
    /// Returns `false` when the event is unknown or already cancelled.
    pub fn remove(&mut self, id: EventId) -> bool {
        match self.events.iter_mut().find(|e| e.id == id && !e.pending_delete) {
            Some(event) => {
                event.pending_delete = true;
                true
            }
            None => false,
        }
    }

    /// Freezes every pending event until [`resume`](Timer::resume).
    pub fn pause(&mut self) {
        if !self.running || self.expired || self.paused {
            return;
        }
        self.paused_at = self.now;
        self.paused = true;
    }

    /// Resumes a paused timer, pushing every pending event back by the paused span.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }

        let paused_for = self.now - self.paused_at;
        for event in &mut self.events {
            event.tick += paused_for;
        }
        self.next_tick += paused_for;
        self.paused = false;
    }

    /// Drops all events and the completion callback. The timer stays usable.
    pub fn clear(&mut self) {
        self.events.clear();
        self.on_complete = None;
    }

    /// Clears the timer and stops it.
    pub fn destroy(&mut self) {
        self.clear();
        self.running = false;
    }

    /// Advances the timer to `now`, firing every due event.
    ///
    /// Standalone entry point: a step larger than the timer's own time cap
    /// counts as a stall. Owners that scale time should detect stalls on the
    /// raw delta and call [`advance`](Timer::advance) instead.
    pub fn tick(&mut self, now: f64) -> TimerStatus {
        let stalled = self.time_cap.is_some_and(|cap| now - self.now > cap);
        self.advance(now, stalled)
    }

    /// Advances the timer to `now`. With `stalled`, pending events keep the
    /// remaining delay they had at the previous tick.
    pub fn advance(&mut self, now: f64, stalled: bool) -> TimerStatus {
        if self.paused {
            self.now = now;
            return TimerStatus::Alive;
        }

        let previous = self.now;
        self.now = now;

        if stalled {
            self.shift_events_from(previous);
        }

        let before = self.events.len();
        self.events.retain(|e| !e.pending_delete);
        if self.events.len() != before {
            self.order();
        }

        if self.running && !self.events.is_empty() && now >= self.next_tick {
            self.fire_due();
        }

        if self.expired && self.auto_destroy {
            TimerStatus::Finished
        } else {
            TimerStatus::Alive
        }
    }

    fn fire_due(&mut self) {
        let now = self.now;

        for event in &mut self.events {
            if now < event.tick {
                break;
            }

            let next = event.tick + event.delay;
            if event.looping {
                event.tick = next;
            } else if event.repeat_count > 0 {
                event.repeat_count -= 1;
                event.tick = next;
            } else {
                event.pending_delete = true;
            }

            (event.callback)();
        }

        self.events.retain(|e| !e.pending_delete);

        if self.events.is_empty() {
            self.expired = true;
            if let Some(on_complete) = self.on_complete.as_mut() {
                on_complete();
            }
        } else {
            self.order();
        }
    }

    /// Keeps each event's remaining time relative to `base` but measures it from `now`.
    fn shift_events_from(&mut self, base: f64) {
        for event in &mut self.events {
            let remaining = (event.tick - base).max(0.0);
            event.tick = self.now + remaining;
        }
        self.order();
    }

    fn order(&mut self) {
        self.events.sort_by(|a, b| a.tick.total_cmp(&b.tick));
        if let Some(first) = self.events.first() {
            self.next_tick = first.tick;
        }
    }

    /// Moves the time base to `now` without changing any pending delay.
    pub fn rebase(&mut self, now: f64) {
        let shift = now - self.now;
        self.now = now;
        self.started_at += shift;
        self.paused_at += shift;
        self.next_tick += shift;
        for event in &mut self.events {
            event.tick += shift;
        }
    }

    pub fn set_time_cap(&mut self, cap: Option<f64>) {
        self.time_cap = cap;
    }

    pub fn time_cap(&self) -> Option<f64> {
        self.time_cap
    }

    /// Number of scheduled events, including cancelled ones not yet swept.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Scheduled events in due order.
    pub fn events(&self) -> &[TimerEvent] {
        &self.events
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True once every event has fired. Cleared again when a new event is added.
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn auto_destroy(&self) -> bool {
        self.auto_destroy
    }

    /// Due time of the earliest event, if any.
    pub fn next_tick(&self) -> Option<f64> {
        self.events.first().map(|e| e.tick)
    }

    /// Milliseconds until the next event fires; zero when stopped or overdue.
    pub fn duration(&self) -> f64 {
        if self.running && !self.events.is_empty() && self.next_tick > self.now {
            self.next_tick - self.now
        } else {
            0.0
        }
    }

    /// Milliseconds since the timer started; zero when stopped.
    pub fn ms(&self) -> f64 {
        if self.running { self.now - self.started_at } else { 0.0 }
    }

    pub fn seconds(&self) -> f64 {
        self.ms() / 1000.0
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("now", &self.now)
            .field("running", &self.running)
            .field("paused", &self.paused)
            .field("expired", &self.expired)
            .field("auto_destroy", &self.auto_destroy)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl ManagedTimer for Timer {
    fn new(auto_destroy: bool, now: f64) -> Self {
        Timer::new(auto_destroy, now)
    }

    fn start(&mut self) {
        Timer::start(self);
    }

    fn tick(&mut self, now: f64, stalled: bool) -> TimerStatus {
        Timer::advance(self, now, stalled)
    }

    fn clear(&mut self) {
        Timer::clear(self);
    }

    fn destroy(&mut self) {
        Timer::destroy(self);
    }

    fn rebase(&mut self, now: f64) {
        Timer::rebase(self, now);
    }
}
