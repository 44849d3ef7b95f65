//! End-to-end compilation: plan, rasterize, encode.

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    constraints::{Constraints, RationaleWriter, resolve_rationale},
    effect::Effect,
    encode::{PseqHeader, encode},
    foundation::{
        core::{Fps, SEQUENCE_FPS},
        error::{LightshowError, LightshowResult},
    },
    layout::Layout,
    plan::{Strategy, plan},
    render::{RenderStats, SequenceStats, render_with_stats},
    song::SongAnalysis,
};

/// Options for [`compile_sequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOpts {
    /// Output frame rate; the header step time is derived from it.
    pub fps: Fps,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self { fps: SEQUENCE_FPS }
    }
}

/// One strategy compiled down to sequence bytes.
#[derive(Clone, Debug)]
pub struct CompiledSequence {
    /// Strategy that produced the plan.
    pub strategy: Strategy,
    /// The plan that was rendered.
    pub effects: Vec<Effect>,
    /// Header written in front of the payload.
    pub header: PseqHeader,
    /// Effect-level counters from the rasterizer.
    pub render: RenderStats,
    /// Lit-channel summary of the rendered frames.
    pub stats: SequenceStats,
    /// Encoded PSEQ v2 bytes.
    pub data: Vec<u8>,
}

/// Plan, render and encode one strategy.
///
/// The only failure is a frame buffer whose shape cannot be expressed in the sequence header.
#[tracing::instrument(skip(constraints, layout, song, opts), fields(song = %song.title))]
pub fn compile_sequence(
    constraints: &Constraints,
    layout: &Layout,
    song: &SongAnalysis,
    strategy: Strategy,
    opts: &CompileOpts,
) -> LightshowResult<CompiledSequence> {
    let fps = Fps::new(opts.fps.num, opts.fps.den)?;

    let effects = plan(constraints, layout, song, strategy);
    let (buf, render) = render_with_stats(&effects, layout, song.duration, fps);
    let stats = buf.stats();

    let channel_count = u32::try_from(buf.channel_count())
        .map_err(|_| LightshowError::validation("channel count does not fit in u32"))?;
    let frame_count = u32::try_from(buf.frame_count())
        .map_err(|_| LightshowError::validation("frame count does not fit in u32"))?;
    let header = PseqHeader::new(channel_count, frame_count, fps.step_time_ms());
    let data = encode(
        buf.frames(),
        header.channel_count,
        header.frame_count,
        header.step_time_ms,
    )?;

    tracing::debug!(
        effects = effects.len(),
        frames = frame_count,
        active_frames = stats.active_frames,
        lit_values = stats.lit_values,
        bytes = data.len(),
        "compiled sequence"
    );

    Ok(CompiledSequence {
        strategy,
        effects,
        header,
        render,
        stats,
        data,
    })
}

/// Threading options for [`compile_variants`].
#[derive(Clone, Debug, Default)]
pub struct VariantThreading {
    /// Compile strategies on a rayon pool instead of one after another.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// One displayable sequence option.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceVariant {
    /// `variant-1`, `variant-2`, ... in strategy order.
    pub id: String,
    /// Strategy that produced it.
    pub strategy: Strategy,
    /// Display name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Short explanation of the interpretation.
    pub rationale: String,
    /// Number of planned effects.
    pub effect_count: usize,
    /// Lit-channel summary.
    pub stats: SequenceStats,
    /// Encoded PSEQ v2 bytes.
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Compile every [`Strategy`] into a [`SequenceVariant`], in [`Strategy::ALL`] order.
///
/// A failing rationale writer falls back to the stock text; it never fails the call.
/// Parallel and sequential runs produce identical results.
pub fn compile_variants(
    constraints: &Constraints,
    layout: &Layout,
    song: &SongAnalysis,
    writer: &(dyn RationaleWriter + Sync),
    opts: &CompileOpts,
    threading: &VariantThreading,
) -> LightshowResult<Vec<SequenceVariant>> {
    let build = |(i, strategy): (usize, Strategy)| -> LightshowResult<SequenceVariant> {
        let compiled = compile_sequence(constraints, layout, song, strategy, opts)?;
        let rationale = resolve_rationale(writer, constraints, song, strategy);
        Ok(SequenceVariant {
            id: format!("variant-{}", i + 1),
            strategy,
            name: strategy.display_name().to_owned(),
            description: strategy.description().to_owned(),
            rationale,
            effect_count: compiled.effects.len(),
            stats: compiled.stats,
            data: compiled.data,
        })
    };

    if !threading.parallel {
        return Strategy::ALL.into_iter().enumerate().map(build).collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    pool.install(|| {
        Strategy::ALL
            .par_iter()
            .copied()
            .enumerate()
            .map(build)
            .collect()
    })
}

fn build_thread_pool(threads: Option<usize>) -> LightshowResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LightshowError::validation(
            "variant threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LightshowError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
