use serde::{Deserialize, Serialize};

/// Shot technique labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    #[serde(rename = "Smash/Clear", alias = "SmashClear")]
    SmashClear,
    Overhead,
    #[serde(rename = "Net Shot", alias = "NetShot")]
    NetShot,
    Underhand,
    Other,
}

impl ShotType {
    /// Human-readable label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            ShotType::SmashClear => "Smash/Clear",
            ShotType::Overhead => "Overhead",
            ShotType::NetShot => "Net Shot",
            ShotType::Underhand => "Underhand",
            ShotType::Other => "Other",
        }
    }
}

impl std::fmt::Display for ShotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A detected shot with its technique label and form defects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    #[serde(rename = "frame")]
    pub frame_index: usize,
    pub shot_type: ShotType,
    #[serde(rename = "pose_errors", default)]
    pub form_errors: Vec<String>,
}

impl ShotEvent {
    pub fn new(frame_index: usize, shot_type: ShotType) -> Self {
        Self {
            frame_index,
            shot_type,
            form_errors: Vec::new(),
        }
    }

    pub fn has_form_errors(&self) -> bool {
        !self.form_errors.is_empty()
    }
}

/// Which signal produced a candidate shot moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum CandidateSource {
    /// Right-wrist displacement spike, speed in px/frame
    Wrist { speed: f64 },
    /// Vertical direction reversal of the tracked shuttlecock
    Trajectory,
}

/// A candidate shot moment before classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub frame_index: usize,
    #[serde(flatten)]
    pub source: CandidateSource,
}

impl CandidateEvent {
    pub fn wrist(frame_index: usize, speed: f64) -> Self {
        Self {
            frame_index,
            source: CandidateSource::Wrist { speed },
        }
    }

    pub fn trajectory(frame_index: usize) -> Self {
        Self {
            frame_index,
            source: CandidateSource::Trajectory,
        }
    }

    pub fn is_wrist(&self) -> bool {
        matches!(self.source, CandidateSource::Wrist { .. })
    }
}
