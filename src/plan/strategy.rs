use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::LightshowError;

/// One of the three effect-planning algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Chases on beat pairs plus sparkles on onsets, all models at once.
    Energy,
    /// Slow single-model pulses on downbeats plus cross-fades between sections.
    Elegant,
    /// Submodel-aware section pulses on snowflakes, downbeat pulses otherwise.
    Balanced,
}

impl Strategy {
    /// Every strategy, in variant order.
    pub const ALL: [Strategy; 3] = [Strategy::Energy, Strategy::Elegant, Strategy::Balanced];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Energy => "energy",
            Self::Elegant => "elegant",
            Self::Balanced => "balanced",
        }
    }

    /// Display name of the variant this strategy produces.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Energy => "Maximum Energy",
            Self::Elegant => "Elegant Subtlety",
            Self::Balanced => "Creative Balance",
        }
    }

    /// One-line description of the variant this strategy produces.
    pub fn description(self) -> &'static str {
        match self {
            Self::Energy => {
                "Fast chases and sparkles on every beat, high contrast colors, all models active simultaneously"
            }
            Self::Elegant => {
                "Slow pulses and smooth fades, one model group at a time, gentle transitions between sections"
            }
            Self::Balanced => {
                "Strategic use of submodels (Stars, Hexagons, Fletching), alternating patterns, spatial choreography"
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = LightshowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LightshowError::validation(format!(
                    "unknown strategy '{s}' (expected energy, elegant, or balanced)"
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/strategy.rs"]
mod tests;
