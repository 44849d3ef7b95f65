//! Styling constraints and the seams to the collaborators that produce them.
//!
//! Natural-language prompt parsing and rationale writing live outside this crate. They are
//! modelled as [`ConstraintParser`] and [`RationaleWriter`]; the `resolve_*` helpers apply
//! the documented fallbacks when a collaborator fails, so generation never stops on them.

use serde::{Deserialize, Serialize};

use crate::foundation::error::{LightshowError, LightshowResult};
use crate::layout::Layout;
use crate::plan::Strategy;
use crate::song::SongAnalysis;

/// How active the lights should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    /// Subtle.
    Low,
    /// Balanced.
    #[default]
    Medium,
    /// Very active.
    High,
}

/// Pace of effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    /// Half-rate motion.
    Slow,
    /// Normal motion.
    #[default]
    Medium,
    /// Double-rate motion.
    Fast,
}

impl Speed {
    /// Chase progress multiplier for this speed.
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Slow => 0.5,
            Self::Medium => 1.0,
            Self::Fast => 2.0,
        }
    }
}

/// Abstract styling constraints for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Overall feeling, e.g. `energetic`, `calm`, `festive`, `elegant`.
    pub mood: String,
    /// Activity level.
    pub intensity: Intensity,
    /// Model names to focus on; empty means every model.
    #[serde(default)]
    pub spatial_focus: Vec<String>,
    /// `#RRGGBB` palette, expected non-empty.
    pub color_palette: Vec<String>,
    /// Pace of effects.
    pub speed: Speed,
}

impl Constraints {
    /// Constraints used when prompt parsing fails: festive red/green/white at medium pace.
    pub fn fallback() -> Self {
        Self {
            mood: "festive".to_owned(),
            intensity: Intensity::Medium,
            spatial_focus: Vec::new(),
            color_palette: vec![
                "#FF0000".to_owned(),
                "#00FF00".to_owned(),
                "#FFFFFF".to_owned(),
            ],
            speed: Speed::Medium,
        }
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Turns a free-form prompt into [`Constraints`].
pub trait ConstraintParser {
    /// Parse `prompt` in the context of the layout and song.
    fn parse(
        &self,
        prompt: &str,
        layout: &Layout,
        song: &SongAnalysis,
    ) -> anyhow::Result<Constraints>;
}

/// Writes a short display rationale for one variant.
pub trait RationaleWriter {
    /// Explain how `strategy` interprets `constraints` for `song`.
    fn rationale(
        &self,
        constraints: &Constraints,
        song: &SongAnalysis,
        strategy: Strategy,
    ) -> anyhow::Result<String>;
}

/// Rationale writer that always returns the fallback text.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRationale;

impl RationaleWriter for FallbackRationale {
    fn rationale(
        &self,
        constraints: &Constraints,
        song: &SongAnalysis,
        strategy: Strategy,
    ) -> anyhow::Result<String> {
        Ok(fallback_rationale(constraints, song, strategy))
    }
}

/// Rationale shown when the writer fails.
pub fn fallback_rationale(
    constraints: &Constraints,
    song: &SongAnalysis,
    strategy: Strategy,
) -> String {
    format!(
        "This {} variant brings your vision to life with {} patterns synced to {}'s {} BPM rhythm.",
        strategy.as_str(),
        constraints.mood,
        song.title,
        song.bpm
    )
}

/// Run `parser`, falling back to [`Constraints::fallback`] on failure.
pub fn resolve_constraints(
    parser: &dyn ConstraintParser,
    prompt: &str,
    layout: &Layout,
    song: &SongAnalysis,
) -> Constraints {
    match parser.parse(prompt, layout, song) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "constraint parsing failed; using fallback constraints");
            Constraints::fallback()
        }
    }
}

/// Run `writer`, falling back to [`fallback_rationale`] on failure.
pub fn resolve_rationale(
    writer: &dyn RationaleWriter,
    constraints: &Constraints,
    song: &SongAnalysis,
    strategy: Strategy,
) -> String {
    match writer.rationale(constraints, song, strategy) {
        Ok(text) => text.trim().to_owned(),
        Err(e) => {
            tracing::warn!(
                error = %e,
                strategy = strategy.as_str(),
                "rationale writer failed; using fallback text"
            );
            fallback_rationale(constraints, song, strategy)
        }
    }
}

/// Decode a collaborator's JSON reply into constraints.
///
/// Replies wrapped in a markdown code fence (optionally tagged `json`) are unwrapped first.
pub fn parse_constraints_reply(reply: &str) -> LightshowResult<Constraints> {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        let rest = rest.strip_prefix('\n').unwrap_or(rest);
        let rest = rest.trim_end();
        let rest = rest.strip_suffix("```").unwrap_or(rest);
        text = rest.trim();
    }
    let c: Constraints = serde_json::from_str(text)
        .map_err(|e| LightshowError::serde(format!("constraint reply: {e}")))?;
    Ok(c)
}

#[cfg(test)]
#[path = "../tests/unit/constraints.rs"]
mod tests;
