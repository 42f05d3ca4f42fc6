use serde::{Deserialize, Serialize};

use super::shot::ShotEvent;
use super::trajectory::TrajectoryReport;

/// Complete analysis result returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub shots: Vec<ShotEvent>,
    /// Coaching prose; a placeholder when the feedback service failed
    pub gemini_feedback: String,
    /// Advisory shuttlecock trajectory, when frames were available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<TrajectoryReport>,
}

impl AnalysisResult {
    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    pub fn shots_with_errors(&self) -> usize {
        self.shots.iter().filter(|s| s.has_form_errors()).count()
    }
}

/// Text rendering of the shot list handed to the feedback generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSummary(String);

impl AnalysisSummary {
    /// Build the summary: a header and one line per shot, or a single
    /// line when nothing was detected
    pub fn from_shots(shots: &[ShotEvent]) -> Self {
        if shots.is_empty() {
            return Self("No clear shots detected in the video.".to_string());
        }

        let mut lines = Vec::with_capacity(shots.len() + 1);
        lines.push(format!("Detected {} shot(s):\n", shots.len()));

        for (i, shot) in shots.iter().enumerate() {
            let outcome = if shot.form_errors.is_empty() {
                "Good form".to_string()
            } else {
                format!("Issues found - {}", shot.form_errors.join("; "))
            };
            lines.push(format!(
                "{}. {} at frame {}: {}",
                i + 1,
                shot.shot_type,
                shot.frame_index,
                outcome
            ));
        }

        Self(lines.join("\n"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
