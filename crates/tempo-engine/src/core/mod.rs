//! Core engine-facing contracts.
//!
//! A `Session` owns the logical clock and drives it from the frame loop;
//! games plug in through the `App` trait and see the clock via `FrameCtx`.

mod app;
mod ctx;
mod session;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use session::{Session, SessionConfig};
