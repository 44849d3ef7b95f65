/// Convenience result type used across lightshow.
pub type LightshowResult<T> = Result<T, LightshowError>;

/// Top-level error taxonomy used by the compilation pipeline.
///
/// Only conditions that would corrupt the declared shape of an encoded sequence are
/// surfaced as errors. Unknown effect targets, malformed colors, out-of-range writes and
/// missing timing data all degrade to a smaller (but consistent) output instead.
#[derive(thiserror::Error, Debug)]
pub enum LightshowError {
    /// Invalid user-provided layout, song, or constraint data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Frame buffer shape disagrees with the declared channel/frame counts.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(ShapeMismatch),

    /// Malformed encoded sequence bytes.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Which part of the frame buffer shape disagreed with the declared header values.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// Number of frames differs from the declared frame count.
    #[error("frame count mismatch: expected {expected}, got {actual}")]
    FrameCount {
        /// Declared frame count.
        expected: u64,
        /// Frames actually supplied.
        actual: u64,
    },
    /// One frame's length differs from the declared channel count.
    #[error("frame {frame} channel count mismatch: expected {expected}, got {actual}")]
    ChannelCount {
        /// 0-based index of the offending frame.
        frame: u64,
        /// Declared channel count.
        expected: u64,
        /// Length of the offending frame.
        actual: u64,
    },
}

impl LightshowError {
    /// Build a [`LightshowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LightshowError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`LightshowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return the shape mismatch detail when this is a [`LightshowError::ShapeMismatch`].
    pub fn shape_mismatch(&self) -> Option<ShapeMismatch> {
        match self {
            Self::ShapeMismatch(m) => Some(*m),
            _ => None,
        }
    }
}

impl From<ShapeMismatch> for LightshowError {
    fn from(m: ShapeMismatch) -> Self {
        Self::ShapeMismatch(m)
    }
}

impl From<std::io::Error> for LightshowError {
    fn from(e: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}

impl From<serde_json::Error> for LightshowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
