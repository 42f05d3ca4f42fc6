// Shared pose fixtures for integration tests
#![allow(dead_code)]

use shuttle_coach::models::{Joint, PoseFrame, PoseSequence};

pub struct PoseDataGenerator;

impl PoseDataGenerator {
    /// Right arm with the shoulder at `(x, 300)`, elbow 100px above it and
    /// the wrist 100px from the elbow at the given elbow angle (wrist above
    /// the shoulder for angles past 90°)
    pub fn raised_arm(x: f64, elbow_angle_deg: f64) -> PoseFrame {
        let theta = elbow_angle_deg.to_radians();
        PoseFrame::new()
            .with_joint(Joint::RightShoulder, (x, 300.0))
            .with_joint(Joint::RightElbow, (x, 200.0))
            .with_joint(Joint::RightWrist, (x + 100.0 * theta.sin(), 200.0 + 100.0 * theta.cos()))
            .with_joint(Joint::RightHip, (x, 450.0))
            .with_joint(Joint::LeftShoulder, (x - 60.0, 300.0))
            .with_joint(Joint::LeftHip, (x - 60.0, 450.0))
    }

    /// 40 frames, whole arm shifted 25px right from frame 10 on, 175° elbow
    pub fn overhead_scenario() -> PoseSequence {
        (0..40)
            .map(|i| {
                let x = if i >= 10 { 125.0 } else { 100.0 };
                Some(Self::raised_arm(x, 175.0))
            })
            .collect()
    }

    /// Still arm with wrist jumps of `jump` px at each frame in `spikes`
    pub fn spikes(len: usize, spikes: &[usize], jump: f64) -> PoseSequence {
        let mut x = 100.0;
        (0..len)
            .map(|i| {
                if spikes.contains(&i) {
                    x += jump;
                }
                Some(PoseFrame::new().with_joint(Joint::RightWrist, (x, 100.0)))
            })
            .collect()
    }
}
