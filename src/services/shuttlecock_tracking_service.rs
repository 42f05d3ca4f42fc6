/// Shuttlecock Tracking Service
///
/// Secondary shot signal built from the shuttlecock itself:
/// - Per-frame localization of a small, round, near-white blob
/// - Trajectory analysis (speeds, vertical direction reversals)
/// - Trail geometry for the annotation overlay
///
/// Output is kept separate from the wrist detector; see
/// `candidate_merge` for how the two streams are fused.
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::distance_transform::Norm;
use imageproc::geometry::arc_length;
use imageproc::morphology::{close, open};
use tracing::debug;

use crate::config::TrajectoryConfig;
use crate::models::{ObjectPositionSequence, Point2, TrajectoryReport, Velocity};

/// Area and centroid of a closed polygon
#[derive(Debug, Clone, Copy, PartialEq)]
struct PolygonMoments {
    area: f64,
    centroid: Option<Point2>,
}

impl PolygonMoments {
    fn of(contour: &Contour<i32>) -> Self {
        let points = &contour.points;
        let n = points.len();
        let (mut m00, mut m10, mut m01) = (0.0f64, 0.0f64, 0.0f64);

        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (x0, y0, x1, y1) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
            let cross = x0 * y1 - x1 * y0;
            m00 += cross;
            m10 += (x0 + x1) * cross;
            m01 += (y0 + y1) * cross;
        }

        m00 /= 2.0;
        m10 /= 6.0;
        m01 /= 6.0;

        let centroid = if m00 != 0.0 {
            Some(Point2::new(
                (m10 / m00).trunc(),
                (m01 / m00).trunc(),
            ))
        } else {
            None
        };

        Self {
            area: m00.abs(),
            centroid,
        }
    }
}

/// Trail segment with its fade factor (0 oldest, towards 1 newest)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSegment {
    pub from: Point2,
    pub to: Point2,
    pub alpha: f64,
}

/// Recent shuttlecock path ending at the current frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShuttleTrail {
    pub segments: Vec<TrailSegment>,
    pub current: Option<Point2>,
}

/// Shuttlecock tracker
#[derive(Debug, Clone, Default)]
pub struct ShuttlecockTrackingService {
    config: TrajectoryConfig,
}

impl ShuttlecockTrackingService {
    pub fn new(config: TrajectoryConfig) -> Self {
        Self { config }
    }

    /// Binary mask of near-white pixels (OpenCV-style HSV, any hue)
    pub fn white_mask(&self, frame: &RgbImage) -> GrayImage {
        let max_s = self.config.white_max_saturation;
        let min_v = self.config.white_min_value;

        GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
            let (s, v) = saturation_value(frame.get_pixel(x, y));
            if s <= max_s && v >= min_v {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }

    /// Locate the shuttlecock in a single frame.
    ///
    /// Cleans the white mask with an opening then a closing, keeps outer
    /// contours whose area and circularity fit a shuttlecock, and returns
    /// the centroid of the smallest one.
    pub fn locate(&self, frame: &RgbImage) -> Option<Point2> {
        let mask = self.white_mask(frame);
        let k = self.config.kernel_radius;
        let mask = close(&open(&mask, Norm::LInf, k), Norm::LInf, k);

        let contours = find_contours::<i32>(&mask);

        contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .filter_map(|c| {
                let moments = PolygonMoments::of(c);
                let area = moments.area;
                if area <= self.config.min_blob_area || area >= self.config.max_blob_area {
                    return None;
                }

                let perimeter = arc_length(&c.points, true);
                if perimeter <= 0.0 {
                    return None;
                }

                let circularity = 4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
                if circularity > self.config.min_circularity {
                    Some(moments)
                } else {
                    None
                }
            })
            .min_by(|a, b| a.area.total_cmp(&b.area))
            .and_then(|m| m.centroid)
    }

    /// Locate the shuttlecock in every frame, index-aligned
    pub fn track(&self, frames: &[RgbImage]) -> ObjectPositionSequence {
        let positions: ObjectPositionSequence = frames.iter().map(|f| self.locate(f)).collect();
        debug!(
            "Shuttlecock found in {} of {} frames",
            positions.iter().filter(|p| p.is_some()).count(),
            frames.len()
        );
        positions
    }

    /// Speeds and vertical direction reversals of a tracked path.
    ///
    /// Velocity `i` is the displacement from frame `i` to `i + 1`. A reversal
    /// is reported at `i` when velocities `i - 1`, `i`, `i + 1` are all defined
    /// and the vertical components of `i - 1` and `i + 1` have opposite signs.
    /// Fewer than three located positions give an empty report.
    pub fn analyze_trajectory(positions: &[Option<Point2>]) -> TrajectoryReport {
        let defined = positions.iter().filter(|p| p.is_some()).count();
        if defined < 3 {
            return TrajectoryReport::default();
        }

        let velocities: Vec<Option<Velocity>> = positions
            .windows(2)
            .map(|pair| match (pair[0], pair[1]) {
                (Some(from), Some(to)) => Some(Velocity::between(from, to)),
                _ => None,
            })
            .collect();

        let mut direction_change_frames = Vec::new();
        for i in 1..velocities.len().saturating_sub(1) {
            if let (Some(before), Some(_), Some(after)) =
                (velocities[i - 1], velocities[i], velocities[i + 1])
            {
                if before.dy * after.dy < 0.0 {
                    direction_change_frames.push(i);
                }
            }
        }

        let speeds: Vec<f64> = velocities.iter().flatten().map(|v| v.speed).collect();
        let (average_speed, max_speed) = if speeds.is_empty() {
            (0.0, 0.0)
        } else {
            (
                speeds.iter().sum::<f64>() / speeds.len() as f64,
                speeds.iter().copied().fold(f64::MIN, f64::max),
            )
        };

        TrajectoryReport {
            direction_change_frames,
            average_speed,
            max_speed,
        }
    }

    /// Trail of up to `trail_length` past positions ending at `current_index`
    pub fn trail(&self, positions: &[Option<Point2>], current_index: usize) -> ShuttleTrail {
        if positions.is_empty() {
            return ShuttleTrail::default();
        }

        let end = current_index.min(positions.len() - 1);
        let start = current_index.saturating_sub(self.config.trail_length).min(end);
        let window = &positions[start..=end];

        let segments = window
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| match (pair[0], pair[1]) {
                (Some(from), Some(to)) => Some(TrailSegment {
                    from,
                    to,
                    alpha: i as f64 / window.len() as f64,
                }),
                _ => None,
            })
            .collect();

        ShuttleTrail {
            segments,
            current: positions.get(current_index).copied().flatten(),
        }
    }
}

/// OpenCV 8-bit HSV saturation and value of an RGB pixel
fn saturation_value(pixel: &Rgb<u8>) -> (u8, u8) {
    let [r, g, b] = pixel.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let s = if max == 0 {
        0
    } else {
        ((255.0 * (max - min) as f64) / max as f64).round() as u8
    };
    (s, max)
}
