pub mod analysis;
pub mod feedback;

pub use analysis::{
    AnalysisConfig, ClassificationConfig, DetectionConfig, FormRuleConfig, RenderConfig,
    TrajectoryConfig,
};
pub use feedback::FeedbackConfig;
