//! Timed, parameterized lighting effects.
//!
//! On the wire an effect is `{type, models, startTime, endTime, color, params}`. In memory the
//! parameters are a closed struct per effect kind so renderers match exhaustively.

use serde::{Deserialize, Serialize};

use crate::constraints::{Intensity, Speed};

/// Effect kind tag as it appears in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    /// Fade in, hold, fade out.
    Pulse,
    /// A lit pixel travelling along the model.
    Chase,
    /// Pseudo-random twinkles.
    Sparkle,
    /// Solid color.
    Fill,
    /// Linear ramp up to full color.
    Fade,
}

impl EffectType {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pulse => "pulse",
            Self::Chase => "chase",
            Self::Sparkle => "sparkle",
            Self::Fill => "fill",
            Self::Fade => "fade",
        }
    }
}

/// Pulse knobs. Both fields are descriptive and do not change the envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseParams {
    /// Requested strength of the pulse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    /// Submodel type the planner targeted, e.g. `"Star"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submodel: Option<String>,
}

/// Travel direction of a chase along the model's pixel order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaseDirection {
    /// First pixel to last.
    #[default]
    Forward,
    /// Last pixel to first.
    Reverse,
}

/// Chase knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseParams {
    /// Sweep rate.
    pub speed: Speed,
    /// Sweep direction.
    pub direction: ChaseDirection,
}

/// How many pixels a sparkle lights per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparkleDensity {
    /// Sparse.
    Low,
    /// Sparse (same rate as `low`).
    #[default]
    Medium,
    /// Dense.
    High,
}

impl SparkleDensity {
    /// Per-frame, per-pixel probability of lighting.
    pub fn probability(self) -> f64 {
        match self {
            Self::High => 0.3,
            Self::Low | Self::Medium => 0.15,
        }
    }
}

/// Sparkle knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkleParams {
    /// Pixel density.
    pub density: SparkleDensity,
}

/// Effect kind together with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// See [`EffectType::Pulse`].
    Pulse(PulseParams),
    /// See [`EffectType::Chase`].
    Chase(ChaseParams),
    /// See [`EffectType::Sparkle`].
    Sparkle(SparkleParams),
    /// See [`EffectType::Fill`].
    Fill,
    /// See [`EffectType::Fade`].
    Fade,
}

impl EffectKind {
    /// The `type` tag of this kind.
    pub fn effect_type(&self) -> EffectType {
        match self {
            Self::Pulse(_) => EffectType::Pulse,
            Self::Chase(_) => EffectType::Chase,
            Self::Sparkle(_) => EffectType::Sparkle,
            Self::Fill => EffectType::Fill,
            Self::Fade => EffectType::Fade,
        }
    }
}

/// A timed animation applied to one or more models.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "EffectDef")]
pub struct Effect {
    /// Kind and parameters.
    pub kind: EffectKind,
    /// Target model names, resolved against the layout at render time.
    pub models: Vec<String>,
    /// Window start in seconds.
    pub start_time: f64,
    /// Window end in seconds.
    pub end_time: f64,
    /// `#RRGGBB` color.
    pub color: String,
}

impl Effect {
    /// Build an effect.
    pub fn new(
        kind: EffectKind,
        models: Vec<String>,
        start_time: f64,
        end_time: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            models,
            start_time,
            end_time,
            color: color.into(),
        }
    }

    /// The `type` tag of this effect.
    pub fn effect_type(&self) -> EffectType {
        self.kind.effect_type()
    }

    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// `true` when the window is empty, inverted, or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.start_time.is_finite() && self.end_time.is_finite())
            || self.end_time <= self.start_time
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EffectDef {
    #[serde(rename = "type")]
    kind: EffectType,
    models: Vec<String>,
    start_time: f64,
    end_time: f64,
    color: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
}

impl TryFrom<EffectDef> for Effect {
    type Error = String;

    fn try_from(def: EffectDef) -> Result<Self, Self::Error> {
        fn params<T: serde::de::DeserializeOwned + Default>(
            v: Option<serde_json::Value>,
            kind: EffectType,
        ) -> Result<T, String> {
            match v {
                None | Some(serde_json::Value::Null) => Ok(T::default()),
                Some(v) => serde_json::from_value(v)
                    .map_err(|e| format!("invalid {} params: {e}", kind.as_str())),
            }
        }

        let kind = match def.kind {
            EffectType::Pulse => EffectKind::Pulse(params(def.params, def.kind)?),
            EffectType::Chase => EffectKind::Chase(params(def.params, def.kind)?),
            EffectType::Sparkle => EffectKind::Sparkle(params(def.params, def.kind)?),
            EffectType::Fill => EffectKind::Fill,
            EffectType::Fade => EffectKind::Fade,
        };
        Ok(Self {
            kind,
            models: def.models,
            start_time: def.start_time,
            end_time: def.end_time,
            color: def.color,
        })
    }
}

#[derive(Serialize)]
struct NoParams {}

#[derive(Serialize)]
#[serde(untagged)]
enum ParamsRef<'a> {
    Pulse(&'a PulseParams),
    Chase(&'a ChaseParams),
    Sparkle(&'a SparkleParams),
    Empty(NoParams),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EffectRef<'a> {
    #[serde(rename = "type")]
    kind: EffectType,
    models: &'a [String],
    start_time: f64,
    end_time: f64,
    color: &'a str,
    params: ParamsRef<'a>,
}

impl Serialize for Effect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let params = match &self.kind {
            EffectKind::Pulse(p) => ParamsRef::Pulse(p),
            EffectKind::Chase(p) => ParamsRef::Chase(p),
            EffectKind::Sparkle(p) => ParamsRef::Sparkle(p),
            EffectKind::Fill | EffectKind::Fade => ParamsRef::Empty(NoParams {}),
        };
        EffectRef {
            kind: self.effect_type(),
            models: &self.models,
            start_time: self.start_time,
            end_time: self.end_time,
            color: &self.color,
            params,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
#[path = "../tests/unit/effect.rs"]
mod tests;
