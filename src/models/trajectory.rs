use serde::{Deserialize, Serialize};

use super::pose::Point2;
use super::shot::CandidateEvent;

/// Per-frame shuttlecock centroids, index-aligned with the video frames
pub type ObjectPositionSequence = Vec<Option<Point2>>;

/// Frame-to-frame displacement of the tracked object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
    pub speed: f64,
}

impl Velocity {
    pub fn between(from: Point2, to: Point2) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        Self {
            dx,
            dy,
            speed: dx.hypot(dy),
        }
    }
}

/// Summary of a shuttlecock trajectory
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryReport {
    #[serde(rename = "direction_changes")]
    pub direction_change_frames: Vec<usize>,
    #[serde(rename = "avg_speed")]
    pub average_speed: f64,
    pub max_speed: f64,
}

impl TrajectoryReport {
    /// Direction changes as candidate shot moments, for merging with the
    /// wrist-speed signal
    pub fn candidates(&self) -> Vec<CandidateEvent> {
        self.direction_change_frames
            .iter()
            .map(|frame| CandidateEvent::trajectory(*frame))
            .collect()
    }
}
