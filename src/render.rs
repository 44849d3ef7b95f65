//! Frame rasterizer: effect list to per-frame channel bytes.

pub(crate) mod buffer;
pub(crate) mod rasterize;

pub use buffer::{FrameBuffer, SequenceStats};
pub use rasterize::{
    CHASE_NEIGHBOUR_INTENSITY, PULSE_RAMP, RenderStats, chase_head, pulse_envelope, render,
    render_with_stats,
};
