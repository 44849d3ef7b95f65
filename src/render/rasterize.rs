use crate::{
    color::Rgb8,
    effect::{ChaseDirection, ChaseParams, Effect, EffectKind, SparkleParams},
    foundation::{
        core::{Fps, FrameIndex, SEQUENCE_FPS},
        math::noise01,
    },
    layout::{CHANNELS_PER_PIXEL, Layout, Model},
    render::buffer::FrameBuffer,
};

/// Share of a pulse window spent ramping up, and again ramping down.
pub const PULSE_RAMP: f64 = 0.2;
/// Intensity of the two pixels either side of a chase head.
pub const CHASE_NEIGHBOUR_INTENSITY: f64 = 0.5;

/// Per-call counters for [`render_with_stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Effects in the input list.
    pub effects_total: u64,
    /// Effects that resolved to at least one model and had a non-empty window.
    pub effects_rendered: u64,
    /// Degenerate effects, effects with no known target and effects that cover no frame.
    pub effects_skipped: u64,
}

/// Rasterize `effects` onto a dark buffer of `ceil(duration * 20)` frames.
///
/// Effects are applied in list order, so where two overlap on the same channels the later one
/// wins. Unknown targets, malformed colors and writes past the frame width are tolerated.
pub fn render(effects: &[Effect], layout: &Layout, duration: f64) -> FrameBuffer {
    render_with_stats(effects, layout, duration, SEQUENCE_FPS).0
}

/// Same as [`render`] at an arbitrary frame rate, also reporting how many effects were applied.
#[tracing::instrument(
    name = "render",
    skip(effects, layout),
    fields(n_effects = effects.len(), channels = layout.total_channels)
)]
pub fn render_with_stats(
    effects: &[Effect],
    layout: &Layout,
    duration: f64,
    fps: Fps,
) -> (FrameBuffer, RenderStats) {
    let frame_count = fps.secs_to_frames_ceil(duration);
    let mut buf = FrameBuffer::new(frame_count as usize, layout.total_channels as usize);
    let mut stats = RenderStats {
        effects_total: effects.len() as u64,
        ..RenderStats::default()
    };

    for effect in effects {
        if effect.is_degenerate() {
            tracing::debug!(
                kind = effect.effect_type().as_str(),
                start = effect.start_time,
                end = effect.end_time,
                "skipping degenerate effect"
            );
            stats.effects_skipped += 1;
            continue;
        }

        let targets = layout.resolve(&effect.models);
        if targets.is_empty() {
            tracing::warn!(
                models = ?effect.models,
                kind = effect.effect_type().as_str(),
                "no models found for effect; skipping"
            );
            stats.effects_skipped += 1;
            continue;
        }

        let window = fps
            .window(effect.start_time, effect.end_time)
            .clip_to(frame_count);
        if window.is_empty() {
            tracing::debug!(
                kind = effect.effect_type().as_str(),
                start = effect.start_time,
                end = effect.end_time,
                "effect covers no frames; skipping"
            );
            stats.effects_skipped += 1;
            continue;
        }

        let color = Rgb8::from_hex_or_white(&effect.color);
        let span = effect.duration();
        for frame in window.iter() {
            let t = fps.frames_to_secs(frame.0);
            let progress = (t - effect.start_time) / span;
            for &model in &targets {
                paint(&mut buf, frame, model, &effect.kind, color, progress);
            }
        }
        stats.effects_rendered += 1;
    }

    tracing::debug!(
        frames = buf.frame_count(),
        rendered = stats.effects_rendered,
        skipped = stats.effects_skipped,
        "rendered"
    );
    (buf, stats)
}

fn paint(
    buf: &mut FrameBuffer,
    frame: FrameIndex,
    model: &Model,
    kind: &EffectKind,
    color: Rgb8,
    progress: f64,
) {
    let f = frame.0 as usize;
    match kind {
        EffectKind::Fill => fill(buf, f, model, color),
        EffectKind::Fade => fill(buf, f, model, color.scaled(progress)),
        EffectKind::Pulse(_) => fill(buf, f, model, color.scaled(pulse_envelope(progress))),
        EffectKind::Chase(params) => chase(buf, f, model, *params, color, progress),
        EffectKind::Sparkle(params) => sparkle(buf, frame, model, *params, color),
    }
}

/// Pulse brightness at `progress` through the window: ramp up, hold, ramp down.
pub fn pulse_envelope(progress: f64) -> f64 {
    if progress < PULSE_RAMP {
        progress / PULSE_RAMP
    } else if progress > 1.0 - PULSE_RAMP {
        (1.0 - progress) / PULSE_RAMP
    } else {
        1.0
    }
}

/// Index of the fully lit chase pixel, or `None` for a model without pixels.
pub fn chase_head(progress: f64, params: ChaseParams, pixel_count: u32) -> Option<u32> {
    if pixel_count == 0 {
        return None;
    }
    let n = i64::from(pixel_count);
    let travelled = progress * params.speed.multiplier() * f64::from(pixel_count);
    let step = if travelled.is_finite() {
        travelled.floor() as i64
    } else {
        0
    };
    let head = step.rem_euclid(n);
    let head = match params.direction {
        ChaseDirection::Forward => head,
        ChaseDirection::Reverse => n - 1 - head,
    };
    u32::try_from(head).ok()
}

fn fill(buf: &mut FrameBuffer, frame: usize, model: &Model, color: Rgb8) {
    for offset in model.triplet_offsets() {
        buf.put_rgb(frame, offset, color);
    }
}

fn chase(
    buf: &mut FrameBuffer,
    frame: usize,
    model: &Model,
    params: ChaseParams,
    color: Rgb8,
    progress: f64,
) {
    let pixels = model.pixel_count();
    let Some(head) = chase_head(progress, params, pixels) else {
        return;
    };
    let base = model.channel_range().start;
    let at = |p: u32| base + (p * CHANNELS_PER_PIXEL) as usize;

    let dim = color.scaled(CHASE_NEIGHBOUR_INTENSITY);
    buf.put_rgb(frame, at((head + pixels - 1) % pixels), dim);
    buf.put_rgb(frame, at((head + 1) % pixels), dim);
    buf.put_rgb(frame, at(head), color);
}

fn sparkle(
    buf: &mut FrameBuffer,
    frame: FrameIndex,
    model: &Model,
    params: SparkleParams,
    color: Rgb8,
) {
    let seed = model.name.len() as u64;
    let density = params.density.probability();
    for (p, offset) in model.triplet_offsets().enumerate() {
        if noise01(seed, frame.0, p as u64) < density {
            buf.put_rgb(frame.0 as usize, offset, color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/rasterize.rs"]
mod tests;
