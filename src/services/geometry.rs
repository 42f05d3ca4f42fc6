/// Joint geometry helpers shared by classification and form analysis
use crate::models::{Joint, Point2, PoseFrame};

/// Calculate the angle at `point_b` between rays b→a and b→c
///
/// # Arguments
/// * `point_a` - First point (e.g., shoulder)
/// * `point_b` - Joint point (e.g., elbow)
/// * `point_c` - Third point (e.g., wrist)
///
/// # Returns
/// Angle in degrees in [0, 180]. A zero-length ray yields 0.
pub fn joint_angle(point_a: Point2, point_b: Point2, point_c: Point2) -> f64 {
    let vec_ba_x = point_a.x - point_b.x;
    let vec_ba_y = point_a.y - point_b.y;
    let vec_bc_x = point_c.x - point_b.x;
    let vec_bc_y = point_c.y - point_b.y;

    let dot_product = vec_ba_x * vec_bc_x + vec_ba_y * vec_bc_y;
    let mag_ba = vec_ba_x.hypot(vec_ba_y);
    let mag_bc = vec_bc_x.hypot(vec_bc_y);

    if mag_ba * mag_bc == 0.0 {
        return 0.0;
    }

    let cos_angle = (dot_product / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Angle at `b` for three joints of a pose, if all three are present
pub fn pose_angle(pose: &PoseFrame, a: Joint, b: Joint, c: Joint) -> Option<f64> {
    Some(joint_angle(pose.get(a)?, pose.get(b)?, pose.get(c)?))
}

/// Right elbow angle (shoulder-elbow-wrist)
pub fn right_elbow_angle(pose: &PoseFrame) -> Option<f64> {
    pose_angle(
        pose,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
    )
}

/// Right knee angle (hip-knee-ankle)
pub fn right_knee_angle(pose: &PoseFrame) -> Option<f64> {
    pose_angle(pose, Joint::RightHip, Joint::RightKnee, Joint::RightAnkle)
}
