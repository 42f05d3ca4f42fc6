use thiserror::Error;

/// Errors that abort an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Video source could not be read: {0}")]
    VideoUnreadable(String),
    #[error("Frame {frame} could not be decoded: {reason}")]
    FrameDecode { frame: usize, reason: String },
    #[error("Pose estimation failed on frame {frame}: {source}")]
    PoseEstimation {
        frame: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Errors from the coaching feedback service.
///
/// These never abort an analysis; the pipeline downgrades them to a
/// placeholder feedback string.
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Feedback service is not configured")]
    NotConfigured,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Feedback service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("Feedback service returned no text")]
    EmptyResponse,
}

impl FeedbackError {
    /// Whether a retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            FeedbackError::Network(_) => true,
            FeedbackError::Service { status, .. } => *status == 429 || *status >= 500,
            FeedbackError::NotConfigured | FeedbackError::EmptyResponse => false,
        }
    }
}
