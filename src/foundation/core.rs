use crate::foundation::error::{LightshowError, LightshowResult};

/// Fixed output rate of every compiled sequence (50 ms per frame).
pub const SEQUENCE_FPS: Fps = Fps { num: 20, den: 1 };

/// Absolute 0-based frame index in sequence timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` in timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> LightshowResult<Self> {
        if start.0 > end.0 {
            return Err(LightshowError::validation(
                "FrameRange start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 >= self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Clip the range to `[0, frame_count)`.
    ///
    /// The result may be empty; it never reaches past `frame_count`.
    pub fn clip_to(self, frame_count: u64) -> Self {
        let end = self.end.0.min(frame_count);
        let start = self.start.0.min(end);
        Self {
            start: FrameIndex(start),
            end: FrameIndex(end),
        }
    }

    /// Iterate the frame indices of the range in increasing order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated frame rate.
    pub fn new(num: u32, den: u32) -> LightshowResult<Self> {
        if den == 0 {
            return Err(LightshowError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LightshowError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Start time of frame `frames` in seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        frames as f64 * f64::from(self.den) / f64::from(self.num)
    }

    /// `floor(secs * fps)`, clamped at zero. Non-finite input maps to frame 0.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        let v = secs * self.as_f64();
        if !v.is_finite() {
            return 0;
        }
        v.floor().max(0.0) as u64
    }

    /// `ceil(secs * fps)`, clamped at zero. Non-finite input maps to zero frames.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        let v = secs * self.as_f64();
        if !v.is_finite() {
            return 0;
        }
        v.ceil().max(0.0) as u64
    }

    /// Frame window covered by `[start_secs, end_secs)`, using floor quantization on both ends.
    pub fn window(self, start_secs: f64, end_secs: f64) -> FrameRange {
        let start = self.secs_to_frames_floor(start_secs);
        let end = self.secs_to_frames_floor(end_secs).max(start);
        FrameRange {
            start: FrameIndex(start),
            end: FrameIndex(end),
        }
    }

    /// Per-frame step time in whole milliseconds, as stored in sequence headers.
    pub fn step_time_ms(self) -> u16 {
        let ms = (1000.0 * self.frame_duration_secs()).round();
        ms.clamp(0.0, f64::from(u16::MAX)) as u16
    }
}

impl Default for Fps {
    fn default() -> Self {
        SEQUENCE_FPS
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
