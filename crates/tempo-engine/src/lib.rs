//! Tempo engine crate.
//!
//! Logical game time for a frame loop: a scalable, pausable clock that
//! drives managed timers once per frame, plus the session loop that owns it.

pub mod core;
pub mod logging;
pub mod time;
