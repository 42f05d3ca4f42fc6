/// Pose models: the fixed joint vocabulary, per-frame joint positions and
/// the index-aligned per-video sequence.
///
/// Coordinates are pixel-space, `y` grows downward.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of joints tracked per frame
pub const JOINT_COUNT: usize = 12;

/// 2-D point in pixel space, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Body joints produced by the pose estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    RightShoulder = 0,
    RightElbow = 1,
    RightWrist = 2,
    LeftShoulder = 3,
    LeftElbow = 4,
    LeftWrist = 5,
    RightHip = 6,
    LeftHip = 7,
    RightKnee = 8,
    LeftKnee = 9,
    RightAnkle = 10,
    LeftAnkle = 11,
}

impl Joint {
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::RightHip,
        Joint::LeftHip,
        Joint::RightKnee,
        Joint::LeftKnee,
        Joint::RightAnkle,
        Joint::LeftAnkle,
    ];

    /// Joint name as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::RightShoulder => "right_shoulder",
            Self::RightElbow => "right_elbow",
            Self::RightWrist => "right_wrist",
            Self::LeftShoulder => "left_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightHip => "right_hip",
            Self::LeftHip => "left_hip",
            Self::RightKnee => "right_knee",
            Self::LeftKnee => "left_knee",
            Self::RightAnkle => "right_ankle",
            Self::LeftAnkle => "left_ankle",
        }
    }

    /// Index of this joint in the 17-point COCO layout
    pub fn coco_index(&self) -> usize {
        match self {
            Self::LeftShoulder => 5,
            Self::RightShoulder => 6,
            Self::LeftElbow => 7,
            Self::RightElbow => 8,
            Self::LeftWrist => 9,
            Self::RightWrist => 10,
            Self::LeftHip => 11,
            Self::RightHip => 12,
            Self::LeftKnee => 13,
            Self::RightKnee => 14,
            Self::LeftAnkle => 15,
            Self::RightAnkle => 16,
        }
    }
}

/// Skeleton connections drawn by the annotation renderer
pub const SKELETON_CONNECTIONS: [(Joint, Joint); 11] = [
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow, Joint::RightWrist),
    (Joint::LeftShoulder, Joint::LeftElbow),
    (Joint::LeftElbow, Joint::LeftWrist),
    (Joint::RightShoulder, Joint::RightHip),
    (Joint::LeftShoulder, Joint::LeftHip),
    (Joint::RightHip, Joint::LeftHip),
    (Joint::RightHip, Joint::RightKnee),
    (Joint::RightKnee, Joint::RightAnkle),
    (Joint::LeftHip, Joint::LeftKnee),
    (Joint::LeftKnee, Joint::LeftAnkle),
];

/// Keypoint as emitted by a COCO-format pose model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CocoKeypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

/// Joint positions for a single video frame.
///
/// Each slot is `None` when the estimator did not place that joint; there is
/// no default coordinate for a missing joint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Joint, Point2>", into = "BTreeMap<Joint, Point2>")]
pub struct PoseFrame {
    joints: [Option<Point2>; JOINT_COUNT],
}

impl PoseFrame {
    /// Create an empty pose frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style joint assignment
    pub fn with_joint(mut self, joint: Joint, point: impl Into<Point2>) -> Self {
        self.set(joint, point.into());
        self
    }

    pub fn set(&mut self, joint: Joint, point: Point2) {
        self.joints[joint as usize] = Some(point);
    }

    pub fn clear(&mut self, joint: Joint) {
        self.joints[joint as usize] = None;
    }

    pub fn get(&self, joint: Joint) -> Option<Point2> {
        self.joints[joint as usize]
    }

    pub fn has(&self, joint: Joint) -> bool {
        self.joints[joint as usize].is_some()
    }

    /// Check that every listed joint is present
    pub fn has_all(&self, joints: &[Joint]) -> bool {
        joints.iter().all(|joint| self.has(*joint))
    }

    /// Present joints in vocabulary order
    pub fn present_joints(&self) -> impl Iterator<Item = (Joint, Point2)> + '_ {
        Joint::ALL
            .iter()
            .filter_map(move |joint| self.get(*joint).map(|point| (*joint, point)))
    }

    pub fn is_empty(&self) -> bool {
        self.joints.iter().all(Option::is_none)
    }

    /// Build a pose frame from a 17-point COCO keypoint list.
    ///
    /// Keypoints below `min_confidence` are left absent. Returns `None` when no
    /// joint of the vocabulary survives, which callers treat as "no body".
    pub fn from_coco_keypoints(keypoints: &[CocoKeypoint], min_confidence: f64) -> Option<Self> {
        let mut frame = Self::new();
        for joint in Joint::ALL {
            if let Some(kp) = keypoints.get(joint.coco_index()) {
                if kp.confidence >= min_confidence {
                    frame.set(joint, Point2::new(kp.x, kp.y));
                }
            }
        }

        if frame.is_empty() {
            None
        } else {
            Some(frame)
        }
    }
}

impl From<BTreeMap<Joint, Point2>> for PoseFrame {
    fn from(map: BTreeMap<Joint, Point2>) -> Self {
        let mut frame = Self::new();
        for (joint, point) in map {
            frame.set(joint, point);
        }
        frame
    }
}

impl From<PoseFrame> for BTreeMap<Joint, Point2> {
    fn from(frame: PoseFrame) -> Self {
        frame.present_joints().collect()
    }
}

/// Per-video pose data, one slot per decoded frame.
///
/// Frames without a detected body hold `None`; slots are never dropped, so
/// index `i` always refers to video frame `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseSequence {
    frames: Vec<Option<PoseFrame>>,
}

impl PoseSequence {
    pub fn new(frames: Vec<Option<PoseFrame>>) -> Self {
        Self { frames }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, frame: Option<PoseFrame>) {
        self.frames.push(frame);
    }

    /// Pose at a frame index; `None` for absent poses and out-of-range indices
    pub fn get(&self, index: usize) -> Option<&PoseFrame> {
        self.frames.get(index).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&PoseFrame>> + '_ {
        self.frames.iter().map(Option::as_ref)
    }

    /// Number of frames with a detected body
    pub fn detected_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }
}

impl FromIterator<Option<PoseFrame>> for PoseSequence {
    fn from_iter<T: IntoIterator<Item = Option<PoseFrame>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_names() {
        assert_eq!(Joint::RightShoulder.name(), "right_shoulder");
        assert_eq!(Joint::LeftAnkle.name(), "left_ankle");
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(*joint as usize, i);
        }
    }

    #[test]
    fn test_pose_frame_presence() {
        let frame = PoseFrame::new()
            .with_joint(Joint::RightWrist, (10.0, 20.0))
            .with_joint(Joint::RightShoulder, (5.0, 40.0));

        assert!(frame.has(Joint::RightWrist));
        assert!(!frame.has(Joint::RightElbow));
        assert!(frame.has_all(&[Joint::RightWrist, Joint::RightShoulder]));
        assert!(!frame.has_all(&[Joint::RightWrist, Joint::RightHip]));
        assert_eq!(frame.get(Joint::RightWrist), Some(Point2::new(10.0, 20.0)));
        assert_eq!(frame.present_joints().count(), 2);
    }

    #[test]
    fn test_pose_frame_json_shape() {
        let frame = PoseFrame::new().with_joint(Joint::RightWrist, (1.5, 2.0));
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json, serde_json::json!({ "right_wrist": [1.5, 2.0] }));

        let parsed: PoseFrame = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_pose_frame_rejects_unknown_joint() {
        let result: Result<PoseFrame, _> =
            serde_json::from_value(serde_json::json!({ "nose": [1.0, 2.0] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_sequence_keeps_absent_slots() {
        let json = serde_json::json!([null, { "right_wrist": [1.0, 1.0] }, null]);
        let seq: PoseSequence = serde_json::from_value(json).unwrap();

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.detected_count(), 1);
        assert!(seq.get(0).is_none());
        assert!(seq.get(1).is_some());
        assert!(seq.get(7).is_none());
    }

    #[test]
    fn test_from_coco_keypoints() {
        let mut keypoints = vec![
            CocoKeypoint {
                x: 0.0,
                y: 0.0,
                confidence: 0.9
            };
            17
        ];
        keypoints[10] = CocoKeypoint {
            x: 320.0,
            y: 100.0,
            confidence: 0.95,
        };
        keypoints[8].confidence = 0.1;

        let frame = PoseFrame::from_coco_keypoints(&keypoints, 0.5).unwrap();
        assert_eq!(frame.get(Joint::RightWrist), Some(Point2::new(320.0, 100.0)));
        assert!(!frame.has(Joint::RightElbow));
        assert!(frame.has(Joint::LeftAnkle));
    }

    #[test]
    fn test_from_coco_keypoints_all_low_confidence() {
        let keypoints = vec![
            CocoKeypoint {
                x: 1.0,
                y: 1.0,
                confidence: 0.2
            };
            17
        ];
        assert!(PoseFrame::from_coco_keypoints(&keypoints, 0.5).is_none());
    }
}
