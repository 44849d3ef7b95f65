use crate::color::Rgb8;

/// Rendered sequence: `frame_count` frames of `channel_count` bytes each.
///
/// The shape is fixed at construction. Writes that fall outside a frame are dropped per byte,
/// so a frame's length always equals the channel count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    frames: Vec<Vec<u8>>,
    channels: usize,
}

/// Summary of how much of a rendered sequence is lit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStats {
    /// Total frames.
    pub frames: u64,
    /// Channels per frame.
    pub channels: u64,
    /// Frames with at least one non-zero channel.
    pub active_frames: u64,
    /// Non-zero channel values across all frames.
    pub lit_values: u64,
}

impl FrameBuffer {
    /// Allocate an all-dark buffer.
    pub fn new(frame_count: usize, channel_count: usize) -> Self {
        Self {
            frames: vec![vec![0; channel_count]; frame_count],
            channels: channel_count,
        }
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Bytes per frame.
    pub fn channel_count(&self) -> usize {
        self.channels
    }

    /// All frames in time order.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// One frame, if `index` is in range.
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    /// Write one RGB triplet starting at byte `offset` of `frame`.
    ///
    /// Bytes at or past the channel count are skipped individually.
    pub(crate) fn put_rgb(&mut self, frame: usize, offset: usize, rgb: Rgb8) {
        let Some(bytes) = self.frames.get_mut(frame) else {
            return;
        };
        for (i, v) in rgb.to_array().into_iter().enumerate() {
            if let Some(slot) = offset.checked_add(i).and_then(|c| bytes.get_mut(c)) {
                *slot = v;
            }
        }
    }

    /// Count active frames and lit channel values.
    pub fn stats(&self) -> SequenceStats {
        SequenceStats::from_frames(self.channels, self.frames.iter().map(Vec::as_slice))
    }
}

impl SequenceStats {
    /// Summarize frames of `channels` bytes each.
    pub fn from_frames<'a>(channels: usize, frames: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut stats = Self {
            channels: channels as u64,
            ..Self::default()
        };
        for frame in frames {
            let lit = frame.iter().filter(|&&v| v != 0).count() as u64;
            stats.frames += 1;
            if lit > 0 {
                stats.active_frames += 1;
            }
            stats.lit_values += lit;
        }
        stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/buffer.rs"]
mod tests;
