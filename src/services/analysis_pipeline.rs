/// Analysis Pipeline
///
/// Sequential composition of the analysis stages:
/// poses → wrist candidates (+ trajectory candidates) → merge → classify →
/// form rules → summary → feedback.
///
/// Feedback failures never abort a run; they degrade to a placeholder
/// string. Only an unreadable source aborts, and that is reported apart
/// from a successful run with zero shots.
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::models::{
    AnalysisResult, ObjectPositionSequence, Point2, PoseSequence, ShotEvent, TrajectoryReport,
};
use crate::services::candidate_merge::{merge_candidates, MergePolicy};
use crate::services::feedback_service::{prepare_summary, FeedbackGenerator};
use crate::services::form_analysis_service::FormAnalysisService;
use crate::services::shot_detection_service::ShotDetectionService;
use crate::services::shuttlecock_tracking_service::ShuttlecockTrackingService;
use crate::services::video_source::{FrameSource, PoseEstimator, VideoMetadata};

/// Feedback text used when the generator fails
pub const FEEDBACK_UNAVAILABLE: &str = "Coaching feedback is currently unavailable.";

/// Everything produced from one pass over a video
#[derive(Debug, Clone)]
pub struct VideoAnalysis {
    pub metadata: VideoMetadata,
    pub poses: PoseSequence,
    pub shuttle_positions: ObjectPositionSequence,
    pub result: AnalysisResult,
}

/// End-to-end shot analysis
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    detector: ShotDetectionService,
    form: FormAnalysisService,
    tracker: ShuttlecockTrackingService,
    merge_policy: MergePolicy,
}

impl Default for AnalysisPipeline {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            detector: ShotDetectionService::from_config(&config),
            form: FormAnalysisService::new(config.form.clone()),
            tracker: ShuttlecockTrackingService::new(config.trajectory.clone()),
            merge_policy: MergePolicy::default(),
            config,
        }
    }

    pub fn with_merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = merge_policy;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn tracker(&self) -> &ShuttlecockTrackingService {
        &self.tracker
    }

    /// Detect, classify and score shots.
    ///
    /// Trajectory candidates only contribute under `MergePolicy::Union`.
    pub fn detect_shots(
        &self,
        poses: &PoseSequence,
        trajectory: Option<&TrajectoryReport>,
    ) -> Vec<ShotEvent> {
        let wrist = self.detector.detect_candidates(poses);
        let from_trajectory = trajectory.map(|t| t.candidates()).unwrap_or_default();

        let merged = merge_candidates(
            &wrist,
            &from_trajectory,
            self.merge_policy,
            self.config.detection.min_shot_gap_frames,
        );
        debug!(
            "{} wrist + {} trajectory candidates merged into {} ({:?})",
            wrist.len(),
            from_trajectory.len(),
            merged.len(),
            self.merge_policy
        );

        let mut shots = self.detector.events_from_candidates(&merged, poses);
        for shot in &mut shots {
            if let Some(pose) = poses.get(shot.frame_index) {
                shot.form_errors = self.form.analyze(pose, shot.shot_type);
            }
        }

        info!(
            "Detected {} shot(s), {} with form issues",
            shots.len(),
            shots.iter().filter(|s| s.has_form_errors()).count()
        );
        shots
    }

    /// Analyze pre-extracted poses, with optional shuttlecock positions
    pub async fn analyze_poses<G: FeedbackGenerator>(
        &self,
        poses: &PoseSequence,
        shuttle_positions: Option<&[Option<Point2>]>,
        feedback: &G,
        language: &str,
    ) -> AnalysisResult {
        let trajectory = shuttle_positions.map(ShuttlecockTrackingService::analyze_trajectory);
        let shots = self.detect_shots(poses, trajectory.as_ref());

        let summary = prepare_summary(&shots);
        let gemini_feedback = match feedback.generate(summary.as_str(), language).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Feedback generation failed, continuing without it: {}", e);
                FEEDBACK_UNAVAILABLE.to_string()
            }
        };

        AnalysisResult {
            shots,
            gemini_feedback,
            trajectory,
        }
    }

    /// Read every frame, estimate poses and locate the shuttlecock, then
    /// analyze.
    ///
    /// # Returns
    /// `AnalysisError::VideoUnreadable` when the source yields no frames;
    /// read and estimation failures abort the run
    pub async fn analyze_video<S, E, G>(
        &self,
        source: &mut S,
        estimator: &mut E,
        feedback: &G,
        language: &str,
    ) -> Result<VideoAnalysis, AnalysisError>
    where
        S: FrameSource + ?Sized,
        E: PoseEstimator + ?Sized,
        G: FeedbackGenerator,
    {
        let metadata = source.metadata();
        let mut poses = PoseSequence::new(Vec::new());
        let mut shuttle_positions = ObjectPositionSequence::new();

        while let Some(frame) = source.next_frame()? {
            let index = poses.len();
            let pose = estimator
                .estimate(index, &frame)
                .map_err(|e| AnalysisError::PoseEstimation {
                    frame: index,
                    source: e,
                })?;
            poses.push(pose);
            shuttle_positions.push(self.tracker.locate(&frame));
        }

        if poses.is_empty() {
            return Err(AnalysisError::VideoUnreadable(
                "source produced no frames".to_string(),
            ));
        }

        info!(
            "Extracted poses from {} frames ({} with a body)",
            poses.len(),
            poses.detected_count()
        );

        let result = self
            .analyze_poses(&poses, Some(shuttle_positions.as_slice()), feedback, language)
            .await;

        Ok(VideoAnalysis {
            metadata,
            poses,
            shuttle_positions,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedbackError;
    use crate::models::{Joint, PoseFrame, ShotType};
    use crate::services::feedback_service::NoFeedback;
    use crate::services::video_source::PrecomputedPoses;
    use assert_matches::assert_matches;
    use image::RgbImage;

    struct FailingFeedback;

    impl FeedbackGenerator for FailingFeedback {
        async fn generate(&self, _summary: &str, _language: &str) -> Result<String, FeedbackError> {
            Err(FeedbackError::Service {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    struct EchoFeedback;

    impl FeedbackGenerator for EchoFeedback {
        async fn generate(&self, summary: &str, language: &str) -> Result<String, FeedbackError> {
            Ok(format!("[{}] {}", language, summary))
        }
    }

    struct VecSource {
        frames: Vec<RgbImage>,
    }

    impl FrameSource for VecSource {
        fn metadata(&self) -> VideoMetadata {
            VideoMetadata {
                width: 32,
                height: 32,
                fps: 30.0,
            }
        }

        fn next_frame(&mut self) -> Result<Option<RgbImage>, AnalysisError> {
            if self.frames.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.frames.remove(0)))
            }
        }
    }

    /// Low-arm smash at frame 3: wrist above shoulder, bent elbow, wrist jump
    fn smash_sequence() -> PoseSequence {
        (0..8)
            .map(|i| {
                let wrist_x = if i >= 3 { 150.0 } else { 100.0 };
                Some(
                    PoseFrame::new()
                        .with_joint(Joint::RightShoulder, (100.0, 200.0))
                        .with_joint(Joint::RightElbow, (100.0, 150.0))
                        .with_joint(Joint::RightWrist, (wrist_x, 150.0 - (i as f64))),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_feedback_failure_degrades() {
        let result = AnalysisPipeline::default()
            .analyze_poses(&smash_sequence(), None, &FailingFeedback, "en")
            .await;

        assert_eq!(result.gemini_feedback, FEEDBACK_UNAVAILABLE);
        assert_eq!(result.shots.len(), 1);
    }

    #[tokio::test]
    async fn test_summary_reaches_generator() {
        let result = AnalysisPipeline::default()
            .analyze_poses(&smash_sequence(), None, &EchoFeedback, "fr")
            .await;

        let shot = &result.shots[0];
        assert_eq!(shot.frame_index, 3);
        assert_eq!(shot.shot_type, ShotType::SmashClear);
        assert_eq!(shot.form_errors.len(), 1);
        assert!(result.gemini_feedback.starts_with("[fr] Detected 1 shot(s):"));
        assert!(result.trajectory.is_none());
    }

    #[tokio::test]
    async fn test_zero_shots_is_success() {
        let poses: PoseSequence = (0..10).map(|_| None).collect();
        let result = AnalysisPipeline::default()
            .analyze_poses(&poses, None, &EchoFeedback, "en")
            .await;

        assert!(result.shots.is_empty());
        assert_eq!(
            result.gemini_feedback,
            "[en] No clear shots detected in the video."
        );
    }

    #[tokio::test]
    async fn test_analyze_video() {
        let poses = smash_sequence();
        let mut source = VecSource {
            frames: vec![RgbImage::new(32, 32); poses.len()],
        };
        let mut estimator = PrecomputedPoses::new(poses.clone());

        let analysis = AnalysisPipeline::default()
            .analyze_video(&mut source, &mut estimator, &NoFeedback, "en")
            .await
            .unwrap();

        assert_eq!(analysis.poses, poses);
        assert_eq!(analysis.shuttle_positions.len(), poses.len());
        assert!(analysis.shuttle_positions.iter().all(|p| p.is_none()));
        assert_eq!(analysis.result.shots.len(), 1);
        assert_eq!(analysis.result.trajectory, Some(TrajectoryReport::default()));
    }

    #[tokio::test]
    async fn test_empty_video_is_unreadable() {
        let mut source = VecSource { frames: Vec::new() };
        let mut estimator = PrecomputedPoses::new(PoseSequence::default());

        let result = AnalysisPipeline::default()
            .analyze_video(&mut source, &mut estimator, &NoFeedback, "en")
            .await;
        assert_matches!(result, Err(AnalysisError::VideoUnreadable(_)));
    }

    #[test]
    fn test_union_adds_trajectory_shots() {
        let poses: PoseSequence = (0..40).map(|_| None).collect();
        let report = TrajectoryReport {
            direction_change_frames: vec![12, 14, 30],
            average_speed: 3.0,
            max_speed: 6.0,
        };

        let wrist_only = AnalysisPipeline::default().detect_shots(&poses, Some(&report));
        assert!(wrist_only.is_empty());

        let union = AnalysisPipeline::default()
            .with_merge_policy(MergePolicy::Union)
            .detect_shots(&poses, Some(&report));
        let frames: Vec<usize> = union.iter().map(|s| s.frame_index).collect();
        assert_eq!(frames, vec![12, 30]);
        assert!(union.iter().all(|s| s.shot_type == ShotType::Other));
    }
}
