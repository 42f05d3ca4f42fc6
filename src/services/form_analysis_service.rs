/// Form Analysis Service
///
/// Evaluates a per-shot-type rule table against the pose at the shot frame
/// and produces human-readable defect messages.
///
/// Rules:
/// - Smash/Clear: elbow extension below target, wrist below shoulder
/// - Net Shot: knee too straight for a lunge
/// - Other shot types have no rules yet
use crate::config::FormRuleConfig;
use crate::models::{Joint, PoseFrame, ShotType};
use crate::services::geometry::{right_elbow_angle, right_knee_angle};

/// Geometry measured once from the shot frame and fed to the rules
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShotMeasurements {
    /// Shoulder-elbow-wrist angle in degrees
    pub elbow_angle: Option<f64>,
    /// Hip-knee-ankle angle in degrees
    pub knee_angle: Option<f64>,
    /// Wrist is lower in the image than the shoulder
    pub wrist_below_shoulder: Option<bool>,
}

impl ShotMeasurements {
    pub fn from_pose(pose: &PoseFrame) -> Self {
        let wrist_below_shoulder = match (pose.get(Joint::RightWrist), pose.get(Joint::RightShoulder))
        {
            (Some(wrist), Some(shoulder)) => Some(wrist.y > shoulder.y),
            _ => None,
        };

        Self {
            elbow_angle: right_elbow_angle(pose),
            knee_angle: right_knee_angle(pose),
            wrist_below_shoulder,
        }
    }
}

/// Rule-based form checker
#[derive(Debug, Clone, Default)]
pub struct FormAnalysisService {
    rules: FormRuleConfig,
}

impl FormAnalysisService {
    pub fn new(rules: FormRuleConfig) -> Self {
        Self { rules }
    }

    /// Compare the pose with the expected form for its shot type
    pub fn analyze(&self, pose: &PoseFrame, shot_type: ShotType) -> Vec<String> {
        self.evaluate(shot_type, &ShotMeasurements::from_pose(pose))
    }

    /// Apply the rule table to pre-computed measurements.
    ///
    /// A rule whose measurement is unavailable is skipped.
    pub fn evaluate(&self, shot_type: ShotType, m: &ShotMeasurements) -> Vec<String> {
        let mut errors = Vec::new();

        match shot_type {
            ShotType::SmashClear => {
                let target = self.rules.smash_min_elbow_extension_deg;
                if let Some(angle) = m.elbow_angle {
                    if angle < target {
                        errors.push(format!(
                            "Elbow not fully extended (angle ~{}°, ideal {}°+)",
                            angle.floor() as i64,
                            target
                        ));
                    }
                }

                if m.wrist_below_shoulder == Some(true) {
                    errors.push("Arm not raised high enough for overhead shot".to_string());
                }
            }
            ShotType::NetShot => {
                if let Some(knee) = m.knee_angle {
                    if knee > self.rules.net_shot_max_knee_angle_deg {
                        errors
                            .push("Knees not bent enough for lunge (increase knee bend)".to_string());
                    }
                }
            }
            ShotType::Overhead | ShotType::Underhand | ShotType::Other => {}
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn smash(elbow_angle: f64, wrist_below_shoulder: bool) -> ShotMeasurements {
        ShotMeasurements {
            elbow_angle: Some(elbow_angle),
            knee_angle: None,
            wrist_below_shoulder: Some(wrist_below_shoulder),
        }
    }

    #[test]
    fn test_full_extension_has_no_defect() {
        let service = FormAnalysisService::default();
        assert!(service
            .evaluate(ShotType::SmashClear, &smash(170.0, false))
            .is_empty());
    }

    #[test]
    fn test_one_degree_short_is_a_defect() {
        let service = FormAnalysisService::default();
        let errors = service.evaluate(ShotType::SmashClear, &smash(169.0, false));
        assert_eq!(
            errors,
            vec!["Elbow not fully extended (angle ~169°, ideal 170°+)".to_string()]
        );
    }

    #[test]
    fn test_measured_angle_rounds_down() {
        let service = FormAnalysisService::default();
        let errors = service.evaluate(ShotType::SmashClear, &smash(142.87, false));
        assert!(errors[0].contains("~142°"));
    }

    #[test]
    fn test_low_arm_on_smash() {
        let service = FormAnalysisService::default();
        let errors = service.evaluate(ShotType::SmashClear, &smash(120.0, true));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1], "Arm not raised high enough for overhead shot");
    }

    #[test]
    fn test_net_shot_straight_knee() {
        let service = FormAnalysisService::default();
        let straight = ShotMeasurements {
            knee_angle: Some(170.0),
            ..Default::default()
        };
        let bent = ShotMeasurements {
            knee_angle: Some(110.0),
            ..Default::default()
        };

        assert_eq!(
            service.evaluate(ShotType::NetShot, &straight),
            vec!["Knees not bent enough for lunge (increase knee bend)".to_string()]
        );
        assert!(service.evaluate(ShotType::NetShot, &bent).is_empty());
    }

    #[test]
    fn test_net_shot_without_leg_joints() {
        let pose = PoseFrame::new()
            .with_joint(Joint::RightHip, (0.0, 0.0))
            .with_joint(Joint::RightKnee, (0.0, 100.0));
        assert!(FormAnalysisService::default()
            .analyze(&pose, ShotType::NetShot)
            .is_empty());
    }

    #[test]
    fn test_other_types_have_no_rules() {
        let service = FormAnalysisService::default();
        let bad = smash(10.0, true);
        for shot_type in [ShotType::Overhead, ShotType::Underhand, ShotType::Other] {
            assert!(service.evaluate(shot_type, &bad).is_empty());
        }
    }

    #[test]
    fn test_analyze_from_pose() {
        // ~121 degree elbow with wrist above shoulder
        let pose = PoseFrame::new()
            .with_joint(Joint::RightShoulder, (100.0, 200.0))
            .with_joint(Joint::RightElbow, (100.0, 150.0))
            .with_joint(Joint::RightWrist, (150.0, 120.0));

        let errors = FormAnalysisService::default().analyze(&pose, ShotType::SmashClear);
        assert_eq!(
            errors,
            vec!["Elbow not fully extended (angle ~120°, ideal 170°+)".to_string()]
        );
    }
}
