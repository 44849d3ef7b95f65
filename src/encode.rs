//! Sequence container encoding.

pub(crate) mod pseq;
pub(crate) mod sink;

pub use pseq::{
    PSEQ_HEADER_LEN, PSEQ_MAGIC, PSEQ_MAJOR_VERSION, PSEQ_MINOR_VERSION, PseqFile, PseqHeader,
    PseqWriter, encode, write_frames,
};
pub use sink::{FrameSink, SinkConfig};
