use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Game-side contract driven by a [`Session`](super::Session).
pub trait App {
    /// Called once per frame, after the clock has been updated.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
