use serde::{Deserialize, Serialize};

/// Precomputed timing analysis of one song. All timestamps are seconds, ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAnalysis {
    /// Song title, used in filenames and rationale text.
    pub title: String,
    /// Performing artist.
    #[serde(default)]
    pub artist: String,
    /// Song length in seconds.
    pub duration: f64,
    /// Tempo estimate.
    pub bpm: f64,
    /// Beat timestamps.
    #[serde(default)]
    pub beats: Vec<f64>,
    /// Downbeat timestamps (a subset of the beats).
    #[serde(default)]
    pub downbeats: Vec<f64>,
    /// Onset timestamps.
    #[serde(default)]
    pub onsets: Vec<f64>,
    /// Non-overlapping sections in time order.
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Energy over time.
    #[serde(default)]
    pub energy_envelope: Vec<f64>,
}

/// A named song section, e.g. `intro`, `verse`, `chorus`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section label.
    pub name: String,
    /// Section start in seconds.
    pub start_time: f64,
    /// Section end in seconds.
    pub end_time: f64,
}

impl Section {
    /// Build a section.
    pub fn new(name: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
        }
    }
}

impl SongAnalysis {
    /// Return `true` when the analysis carries no beat, downbeat, onset, or section data.
    pub fn has_no_timing(&self) -> bool {
        self.beats.is_empty()
            && self.downbeats.is_empty()
            && self.onsets.is_empty()
            && self.sections.is_empty()
    }
}
