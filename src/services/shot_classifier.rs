/// Shot classification from the joint geometry of the contact frame
use crate::config::ClassificationConfig;
use crate::models::{Joint, PoseFrame, ShotType};
use crate::services::geometry::right_elbow_angle;

/// Maps a single pose frame to a shot type
#[derive(Debug, Clone, Default)]
pub struct ShotClassifier {
    config: ClassificationConfig,
}

impl ShotClassifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    /// Classify the shot played at this frame.
    ///
    /// Decision order:
    /// 1. no pose → `Other`
    /// 2. wrist above shoulder → `SmashClear` when the elbow is bent below the
    ///    cutoff, `Overhead` otherwise
    /// 3. wrist below shoulder → `NetShot` when still above the hip, `Underhand`
    ///    otherwise (including when the hip is missing)
    /// 4. wrist exactly level with the shoulder → `Other`
    ///
    /// Missing shoulder or wrist (or elbow, for overhead swings) falls back
    /// to `Other`.
    pub fn classify(&self, pose: Option<&PoseFrame>) -> ShotType {
        let Some(pose) = pose else {
            return ShotType::Other;
        };
        let (Some(shoulder), Some(wrist)) =
            (pose.get(Joint::RightShoulder), pose.get(Joint::RightWrist))
        else {
            return ShotType::Other;
        };

        if wrist.y < shoulder.y {
            match right_elbow_angle(pose) {
                Some(angle) if angle < self.config.smash_elbow_max_deg => ShotType::SmashClear,
                Some(_) => ShotType::Overhead,
                None => ShotType::Other,
            }
        } else if wrist.y > shoulder.y {
            match pose.get(Joint::RightHip) {
                Some(hip) if wrist.y < hip.y => ShotType::NetShot,
                _ => ShotType::Underhand,
            }
        } else {
            ShotType::Other
        }
    }
}
