//! Fixture layout model.
//!
//! A [`Layout`] is produced by an external layout parser and consumed read-only by the
//! planner and rasterizer. Channel numbers are 1-based as in the controller configuration;
//! channel `c` lives at byte index `c - 1` of every frame.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{LightshowError, LightshowResult};

/// Channels per RGB pixel.
pub const CHANNELS_PER_PIXEL: u32 = 3;

/// Static description of the physical fixtures and their channel mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Fixtures in layout order.
    pub models: Vec<Model>,
    /// Width of one output frame in channels.
    pub total_channels: u32,
    /// Named groups of models (group name to member model names).
    #[serde(default)]
    pub model_groups: BTreeMap<String, Vec<String>>,
}

/// One named physical fixture with a contiguous channel range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique model name.
    pub name: String,
    /// Fixture shape as reported by the layout tool.
    #[serde(default)]
    pub display_as: String,
    /// First channel (1-based).
    pub start_channel: u32,
    /// Number of channels, a multiple of 3.
    pub channel_count: u32,
    /// Controller the fixture is wired to.
    #[serde(default)]
    pub controller: String,
    /// Submodel aliases over this model's channels.
    #[serde(default)]
    pub sub_models: Vec<SubModel>,
    /// World position.
    #[serde(default)]
    pub position: Vec3,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: Vec3,
}

/// Named channel-range alias within a parent model. Purely descriptive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubModel {
    /// Submodel name, e.g. `"Star 1"`.
    pub name: String,
    /// Submodel kind as reported by the layout tool (usually `"ranges"`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Node ranges within the parent, e.g. `"24-61"`.
    #[serde(default)]
    pub ranges: String,
}

/// Position or rotation triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Model {
    /// 0-based byte range of this model inside a frame.
    pub fn channel_range(&self) -> Range<usize> {
        let start = self.start_channel.saturating_sub(1) as usize;
        start..start + self.channel_count as usize
    }

    /// Number of whole RGB pixels covered by this model.
    pub fn pixel_count(&self) -> u32 {
        self.channel_count / CHANNELS_PER_PIXEL
    }

    /// Byte offsets of every RGB triplet, in pixel order.
    pub fn triplet_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        let start = self.channel_range().start;
        (0..self.pixel_count() as usize).map(move |p| start + p * CHANNELS_PER_PIXEL as usize)
    }

    /// Return `true` when any submodel name contains `fragment` (case-sensitive).
    pub fn has_submodel_like(&self, fragment: &str) -> bool {
        self.sub_models.iter().any(|sm| sm.name.contains(fragment))
    }
}

impl Layout {
    /// All model names in layout order.
    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }

    /// Models whose name contains `kind`, ignoring case (e.g. `"snowflake"`).
    pub fn models_by_type(&self, kind: &str) -> Vec<&Model> {
        self.models_by_name(kind)
    }

    /// Models whose name contains `pattern`, ignoring case.
    pub fn models_by_name(&self, pattern: &str) -> Vec<&Model> {
        let pattern = pattern.to_lowercase();
        self.models
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&pattern))
            .collect()
    }

    /// Models whose names appear in `names`, in layout order.
    ///
    /// Unknown names are ignored.
    pub fn resolve<'a>(&'a self, names: &[String]) -> Vec<&'a Model> {
        self.models
            .iter()
            .filter(|m| names.contains(&m.name))
            .collect()
    }

    /// Check the structural invariants the external parser is expected to uphold.
    ///
    /// Rendering never calls this; out-of-range writes are clipped regardless.
    pub fn validate(&self) -> LightshowResult<()> {
        let mut seen = BTreeSet::new();
        for m in &self.models {
            if m.name.trim().is_empty() {
                return Err(LightshowError::validation("model name must be non-empty"));
            }
            if !seen.insert(m.name.as_str()) {
                return Err(LightshowError::validation(format!(
                    "duplicate model name '{}'",
                    m.name
                )));
            }
            if m.start_channel == 0 {
                return Err(LightshowError::validation(format!(
                    "model '{}' start_channel must be >= 1",
                    m.name
                )));
            }
            if m.channel_count % CHANNELS_PER_PIXEL != 0 {
                return Err(LightshowError::validation(format!(
                    "model '{}' channel_count {} is not a multiple of 3",
                    m.name, m.channel_count
                )));
            }
            let last = u64::from(m.start_channel) + u64::from(m.channel_count) - 1;
            if m.channel_count > 0 && last > u64::from(self.total_channels) {
                return Err(LightshowError::validation(format!(
                    "model '{}' ends at channel {last}, past total_channels {}",
                    m.name, self.total_channels
                )));
            }
        }
        for (group, members) in &self.model_groups {
            if let Some(missing) = members.iter().find(|n| !seen.contains(n.as_str())) {
                return Err(LightshowError::validation(format!(
                    "group '{group}' references unknown model '{missing}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/layout.rs"]
mod tests;
