use crate::foundation::core::FrameIndex;
use crate::foundation::error::LightshowResult;

/// Shape of the sequence a [`FrameSink`] is about to receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Bytes per frame.
    pub channel_count: u32,
    /// Frames that will be pushed.
    pub frame_count: u32,
    /// Milliseconds per frame.
    pub step_time_ms: u16,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// `push_frame` is called with strictly increasing indices starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> LightshowResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &[u8]) -> LightshowResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> LightshowResult<()>;
}
