use crate::time::{Clock, FrameTime};

/// Per-frame context passed to `core::App::on_frame`.
///
/// `clock` has already been advanced for this frame. Changes made here
/// (time scale, pause, new timers) take effect from the next frame.
pub struct FrameCtx<'a> {
    pub clock: &'a mut Clock,
    pub time:  FrameTime,
}
