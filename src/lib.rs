//! Lightshow compiles a song analysis and a set of styling constraints into a lighting
//! sequence for a fixed layout of RGB fixtures.
//!
//! The pipeline has three pure stages:
//!
//! - [`plan()`] turns constraints plus beat, downbeat, onset and section timing into an ordered
//!   list of [`Effect`]s using one of three [`Strategy`] algorithms
//! - [`render()`] rasterizes the effects into a [`FrameBuffer`] of per-frame channel bytes at
//!   20 fps
//! - [`encode()`] writes the buffer as an uncompressed PSEQ v2 file
//!
//! [`compile_sequence`] chains the three, and [`compile_variants`] runs every strategy
//! (optionally on a rayon pool) to produce the displayable [`SequenceVariant`]s.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// `#RRGGBB` colors.
pub mod color;
pub mod constraints;
pub mod effect;
pub mod encode;
pub mod layout;
/// Output filename conventions.
pub mod naming;
pub mod pipeline;
/// Effect planning strategies.
pub mod plan;
pub mod render;
/// Song timing analysis.
pub mod song;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, SEQUENCE_FPS};
pub use crate::foundation::error::{LightshowError, LightshowResult, ShapeMismatch};

pub use crate::color::{Rgb8, parse_hex};
pub use crate::constraints::{
    ConstraintParser, Constraints, FallbackRationale, Intensity, RationaleWriter, Speed,
    fallback_rationale, parse_constraints_reply, resolve_constraints, resolve_rationale,
};
pub use crate::effect::{
    ChaseDirection, ChaseParams, Effect, EffectKind, EffectType, PulseParams, SparkleDensity,
    SparkleParams,
};
pub use crate::encode::{
    FrameSink, PseqFile, PseqHeader, PseqWriter, SinkConfig, encode, write_frames,
};
pub use crate::layout::{Layout, Model, SubModel, Vec3};
pub use crate::naming::{sequence_filename, sequence_filename_today, slug};
pub use crate::pipeline::{
    CompileOpts, CompiledSequence, SequenceVariant, VariantThreading, compile_sequence,
    compile_variants,
};
pub use crate::plan::{Strategy, plan};
pub use crate::render::{FrameBuffer, RenderStats, SequenceStats, render, render_with_stats};
pub use crate::song::{Section, SongAnalysis};
