// Analysis services

pub mod analysis_pipeline;
pub mod annotation_renderer;
pub mod candidate_merge;
pub mod feedback_service;
pub mod form_analysis_service;
pub mod geometry;
pub mod retry;
pub mod shot_classifier;
pub mod shot_detection_service;
pub mod shuttlecock_tracking_service;
pub mod video_source;

pub use analysis_pipeline::{AnalysisPipeline, VideoAnalysis, FEEDBACK_UNAVAILABLE};
pub use annotation_renderer::{
    AnnotatedVideo, AnnotationRenderer, FrameOverlay, OverlayColor, OverlayPainter, ShotHud,
    SkeletonOverlay,
};
pub use candidate_merge::{merge_candidates, MergePolicy};
pub use feedback_service::{prepare_summary, FeedbackGenerator, GeminiFeedbackClient, NoFeedback};
pub use form_analysis_service::{FormAnalysisService, ShotMeasurements};
pub use geometry::joint_angle;
pub use retry::RetryConfig;
pub use shot_classifier::ShotClassifier;
pub use shot_detection_service::ShotDetectionService;
pub use shuttlecock_tracking_service::{ShuttleTrail, ShuttlecockTrackingService, TrailSegment};
pub use video_source::{
    read_all_frames, FrameSource, ImageSequenceSource, PoseEstimator, PrecomputedPoses,
    VideoMetadata,
};
