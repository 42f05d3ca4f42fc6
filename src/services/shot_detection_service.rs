/// Shot Detection Service
///
/// Scans the pose sequence for right-wrist speed spikes and turns them into
/// shot events. Speed is raw pixel displacement per frame; a refractory gap
/// keeps one swing from being counted more than once.
use tracing::{debug, info};

use crate::config::{AnalysisConfig, DetectionConfig};
use crate::models::{CandidateEvent, Joint, PoseSequence, ShotEvent};
use crate::services::shot_classifier::ShotClassifier;

/// Wrist-velocity shot detector
#[derive(Debug, Clone, Default)]
pub struct ShotDetectionService {
    config: DetectionConfig,
    classifier: ShotClassifier,
}

impl ShotDetectionService {
    pub fn new(config: DetectionConfig, classifier: ShotClassifier) -> Self {
        Self { config, classifier }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.detection.clone(),
            ShotClassifier::new(config.classification.clone()),
        )
    }

    pub fn classifier(&self) -> &ShotClassifier {
        &self.classifier
    }

    /// Right-wrist displacement between frame `index - 1` and `index`.
    ///
    /// `None` when either pose or either wrist is missing.
    pub fn wrist_speed(poses: &PoseSequence, index: usize) -> Option<f64> {
        let prev_index = index.checked_sub(1)?;
        let prev = poses.get(prev_index)?.get(Joint::RightWrist)?;
        let curr = poses.get(index)?.get(Joint::RightWrist)?;
        Some(curr.distance_to(&prev))
    }

    /// Find swing moments from the wrist-speed signal.
    ///
    /// Frames are scanned from the second to the second-to-last. A frame is
    /// accepted when its speed exceeds the threshold and it is more than
    /// `min_shot_gap_frames` after the previously accepted frame.
    pub fn detect_candidates(&self, poses: &PoseSequence) -> Vec<CandidateEvent> {
        let mut candidates = Vec::new();
        let mut last_accepted: Option<usize> = None;

        for i in 1..poses.len().saturating_sub(1) {
            let Some(speed) = Self::wrist_speed(poses, i) else {
                continue;
            };

            if speed <= self.config.wrist_speed_threshold {
                continue;
            }

            let clear_of_last =
                last_accepted.map_or(true, |last| i - last > self.config.min_shot_gap_frames);
            if clear_of_last {
                debug!("Wrist spike at frame {} ({:.1} px/frame)", i, speed);
                last_accepted = Some(i);
                candidates.push(CandidateEvent::wrist(i, speed));
            }
        }

        candidates
    }

    /// Classify candidates into shot events with empty form-error lists
    pub fn events_from_candidates(
        &self,
        candidates: &[CandidateEvent],
        poses: &PoseSequence,
    ) -> Vec<ShotEvent> {
        candidates
            .iter()
            .map(|candidate| {
                let shot_type = self.classifier.classify(poses.get(candidate.frame_index));
                ShotEvent::new(candidate.frame_index, shot_type)
            })
            .collect()
    }

    /// Detect and classify shots from the wrist signal alone
    pub fn detect(&self, poses: &PoseSequence) -> Vec<ShotEvent> {
        let candidates = self.detect_candidates(poses);
        let events = self.events_from_candidates(&candidates, poses);
        info!(
            "Detected {} shot(s) across {} frames",
            events.len(),
            poses.len()
        );
        events
    }
}
