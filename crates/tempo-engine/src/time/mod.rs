//! Time subsystem.
//!
//! Logical game time and the timers it drives:
//! - `FrameClock` samples raw wall-time deltas once per frame
//! - `Clock` scales and accumulates them into logical time
//! - `Timer` fires one-shot, repeating and looping events against that time

mod clock;
mod config;
mod error;
mod frame_clock;
mod timer;

pub use clock::{Clock, TimerId};
pub use config::ClockConfig;
pub use error::ClockConfigError;
pub use frame_clock::{FrameClock, FrameTime};
pub use timer::{DEFAULT_TIME_CAP, EventId, ManagedTimer, Timer, TimerEvent, TimerStatus};
