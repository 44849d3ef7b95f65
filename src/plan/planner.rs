use crate::{
    constraints::{Constraints, Intensity, Speed},
    effect::{
        ChaseDirection, ChaseParams, Effect, EffectKind, PulseParams, SparkleDensity,
        SparkleParams,
    },
    layout::Layout,
    plan::strategy::Strategy,
    song::SongAnalysis,
};

/// Length of the sparkle accent planted on every onset.
pub const SPARKLE_SECS: f64 = 0.2;
/// How far a section cross-fade reaches into each neighbouring section.
pub const CROSSFADE_SECS: f64 = 2.0;
/// Length of a downbeat pulse in the balanced fallback.
pub const DOWNBEAT_PULSE_SECS: f64 = 1.0;
/// Submodel types the balanced strategy rotates through, one per section.
pub const SUBMODEL_ROTATION: [&str; 3] = ["Star", "Hexagon", "Fletching"];

const FALLBACK_COLOR: &str = "#FFFFFF";

/// Translate constraints plus song timing into an ordered effect plan.
///
/// Pure and total: missing timing data, an empty target set, or an empty palette produce a
/// shorter plan, never an error. Later effects overwrite earlier ones where they overlap, so
/// the order of the returned list is part of the result.
#[tracing::instrument(skip(constraints, layout, song), fields(song = %song.title))]
pub fn plan(
    constraints: &Constraints,
    layout: &Layout,
    song: &SongAnalysis,
    strategy: Strategy,
) -> Vec<Effect> {
    let targets = target_models(constraints, layout);
    if targets.is_empty() {
        tracing::debug!("no target models; planning nothing");
        return Vec::new();
    }
    if song.has_no_timing() {
        tracing::debug!("song has no timing data; planning nothing");
        return Vec::new();
    }
    let palette = Palette(&constraints.color_palette);

    let effects = match strategy {
        Strategy::Energy => energy(&targets, song, palette),
        Strategy::Elegant => elegant(&targets, song, palette),
        Strategy::Balanced => balanced(&targets, layout, song, palette),
    };
    tracing::debug!(effects = effects.len(), "planned");
    effects
}

/// Models an effect plan may address: the spatial focus when given, otherwise every model.
pub fn target_models(constraints: &Constraints, layout: &Layout) -> Vec<String> {
    if constraints.spatial_focus.is_empty() {
        layout.model_names()
    } else {
        constraints.spatial_focus.clone()
    }
}

#[derive(Clone, Copy)]
struct Palette<'a>(&'a [String]);

impl Palette<'_> {
    fn pick(self, i: usize) -> String {
        if self.0.is_empty() {
            return FALLBACK_COLOR.to_owned();
        }
        self.0[i % self.0.len()].clone()
    }
}

fn energy(targets: &[String], song: &SongAnalysis, palette: Palette<'_>) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(song.beats.len() / 2 + song.onsets.len());

    for (pair, beats) in song.beats.chunks_exact(2).enumerate() {
        effects.push(Effect::new(
            EffectKind::Chase(ChaseParams {
                speed: Speed::Fast,
                direction: ChaseDirection::Forward,
            }),
            targets.to_vec(),
            beats[0],
            beats[1],
            palette.pick(pair),
        ));
    }

    // Planned after the chases so the accents overlay them.
    for &onset in &song.onsets {
        effects.push(Effect::new(
            EffectKind::Sparkle(SparkleParams {
                density: SparkleDensity::High,
            }),
            targets.to_vec(),
            onset,
            onset + SPARKLE_SECS,
            palette.pick(0),
        ));
    }

    effects
}

fn elegant(targets: &[String], song: &SongAnalysis, palette: Palette<'_>) -> Vec<Effect> {
    let mut effects = Vec::new();

    for (i, pair) in song.downbeats.windows(2).enumerate() {
        effects.push(Effect::new(
            EffectKind::Pulse(PulseParams {
                intensity: Some(Intensity::Medium),
                submodel: None,
            }),
            vec![targets[i % targets.len()].clone()],
            pair[0],
            pair[1],
            palette.pick(i),
        ));
    }

    // Fades straddle each section boundary and are appended last so they win.
    for (i, pair) in song.sections.windows(2).enumerate() {
        effects.push(Effect::new(
            EffectKind::Fade,
            targets.to_vec(),
            pair[0].end_time - CROSSFADE_SECS,
            pair[1].start_time + CROSSFADE_SECS,
            palette.pick(i),
        ));
    }

    effects
}

fn balanced(
    targets: &[String],
    layout: &Layout,
    song: &SongAnalysis,
    palette: Palette<'_>,
) -> Vec<Effect> {
    let snowflakes: Vec<_> = layout
        .models
        .iter()
        .filter(|m| targets.contains(&m.name) && m.name.to_lowercase().contains("snowflake"))
        .collect();

    if snowflakes.is_empty() {
        return song
            .downbeats
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                Effect::new(
                    EffectKind::Pulse(PulseParams::default()),
                    vec![targets[i % targets.len()].clone()],
                    t,
                    t + DOWNBEAT_PULSE_SECS,
                    palette.pick(i),
                )
            })
            .collect();
    }

    let mut effects = Vec::with_capacity(song.sections.len());
    for (i, section) in song.sections.iter().enumerate() {
        let submodel = SUBMODEL_ROTATION[i % SUBMODEL_ROTATION.len()];
        let models: Vec<String> = snowflakes
            .iter()
            .filter(|m| m.has_submodel_like(submodel))
            .map(|m| m.name.clone())
            .collect();
        if models.is_empty() {
            continue;
        }
        effects.push(Effect::new(
            EffectKind::Pulse(PulseParams {
                intensity: None,
                submodel: Some(submodel.to_owned()),
            }),
            models,
            section.start_time,
            section.end_time,
            palette.pick(i),
        ));
    }
    effects
}

#[cfg(test)]
#[path = "../../tests/unit/plan/planner.rs"]
mod tests;
