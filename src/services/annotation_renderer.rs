/// Annotation Renderer
///
/// Walks the frame sequence once, in order, next to the finished shot list.
/// Planning (what goes on each frame) is separated from painting (pixels) so
/// the timing rules can be tested without images.
///
/// Per frame:
/// - Skeleton whenever a pose exists; alert color while an in-window shot
///   has form errors
/// - Shot HUD for `display_window_frames` frames starting at the shot frame
/// - Optional shuttlecock trail
/// - Running frame counter
use std::collections::BTreeMap;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;
use tracing::{debug, info};

use crate::config::{RenderConfig, TrajectoryConfig};
use crate::models::{
    ObjectPositionSequence, Point2, PoseFrame, PoseSequence, ShotEvent, ShotType,
    SKELETON_CONNECTIONS,
};
use crate::services::shuttlecock_tracking_service::{ShuttleTrail, ShuttlecockTrackingService};
use crate::services::video_source::VideoMetadata;

const SHOT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const COUNTER_COLOR: Rgb<u8> = Rgb([200, 200, 200]);
const HUD_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const SHUTTLE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// HUD and counter font unless `render.font_path` points elsewhere
const DEFAULT_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Skeleton highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayColor {
    Good,
    Alert,
}

impl OverlayColor {
    pub fn rgb(&self) -> Rgb<u8> {
        match self {
            OverlayColor::Good => Rgb([0, 255, 0]),
            OverlayColor::Alert => Rgb([255, 0, 0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonOverlay {
    pub color: OverlayColor,
    pub segments: Vec<(Point2, Point2)>,
    pub joints: Vec<Point2>,
}

impl SkeletonOverlay {
    /// Segments for every connection whose two joints are present
    pub fn from_pose(pose: &PoseFrame, color: OverlayColor) -> Self {
        let segments = SKELETON_CONNECTIONS
            .iter()
            .filter_map(|&(a, b)| Some((pose.get(a)?, pose.get(b)?)))
            .collect();
        let joints = pose.present_joints().map(|(_, p)| p).collect();

        Self {
            color,
            segments,
            joints,
        }
    }
}

/// Shot text shown while a shot is in its display window
#[derive(Debug, Clone, PartialEq)]
pub struct ShotHud {
    pub shot_type: ShotType,
    /// Already capped to `max_errors_shown`
    pub fixes: Vec<String>,
}

impl ShotHud {
    pub fn title(&self) -> String {
        format!("SHOT: {}", self.shot_type)
    }

    pub fn detail_lines(&self) -> Vec<String> {
        if self.fixes.is_empty() {
            vec!["GOOD FORM".to_string()]
        } else {
            self.fixes.iter().map(|f| format!("FIX: {}", f)).collect()
        }
    }
}

/// Everything drawn on one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOverlay {
    pub frame_index: usize,
    pub skeleton: Option<SkeletonOverlay>,
    pub hud: Option<ShotHud>,
    pub trail: Option<ShuttleTrail>,
}

impl FrameOverlay {
    pub fn counter_text(&self) -> String {
        format!("Frame: {}", self.frame_index)
    }
}

/// Rendered output, same length, resolution and order as the input
#[derive(Debug, Clone)]
pub struct AnnotatedVideo {
    pub frames: Vec<RgbImage>,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl AnnotatedVideo {
    /// Write frames as numbered PNGs, returns the number written
    pub fn write_frames(&self, dir: &Path) -> Result<usize> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        for (i, frame) in self.frames.iter().enumerate() {
            let path = dir.join(format!("{:05}.png", i));
            frame
                .save(&path)
                .with_context(|| format!("Failed to write frame {}", path.display()))?;
        }

        Ok(self.frames.len())
    }
}

/// Shots keyed by frame, built once before the render loop
struct ShotIndex<'a> {
    by_frame: BTreeMap<usize, &'a ShotEvent>,
    window: usize,
}

impl<'a> ShotIndex<'a> {
    fn new(shots: &'a [ShotEvent], window: usize) -> Self {
        Self {
            by_frame: shots.iter().map(|s| (s.frame_index, s)).collect(),
            window,
        }
    }

    /// Nearest shot at or before `frame` that is still on screen
    fn active(&self, frame: usize) -> Option<&'a ShotEvent> {
        self.by_frame
            .range(..=frame)
            .next_back()
            .filter(|(shot_frame, _)| frame - **shot_frame < self.window)
            .map(|(_, shot)| *shot)
    }
}

/// Plans and renders annotated frames
#[derive(Debug, Clone, Default)]
pub struct AnnotationRenderer {
    config: RenderConfig,
    shuttle: Option<(ShuttlecockTrackingService, ObjectPositionSequence)>,
}

impl AnnotationRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            shuttle: None,
        }
    }

    /// Also draw the shuttlecock trail from tracked positions
    pub fn with_shuttle_trail(
        mut self,
        positions: ObjectPositionSequence,
        trajectory: TrajectoryConfig,
    ) -> Self {
        self.shuttle = Some((ShuttlecockTrackingService::new(trajectory), positions));
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Decide what to draw on each of `frame_count` frames
    pub fn plan(&self, poses: &PoseSequence, shots: &[ShotEvent], frame_count: usize) -> Vec<FrameOverlay> {
        let index = ShotIndex::new(shots, self.config.display_window_frames);

        (0..frame_count)
            .map(|f| {
                let active = index.active(f);

                let skeleton = poses.get(f).map(|pose| {
                    let color = match active {
                        Some(shot) if shot.has_form_errors() => OverlayColor::Alert,
                        _ => OverlayColor::Good,
                    };
                    SkeletonOverlay::from_pose(pose, color)
                });

                let hud = active.map(|shot| ShotHud {
                    shot_type: shot.shot_type,
                    fixes: shot
                        .form_errors
                        .iter()
                        .take(self.config.max_errors_shown)
                        .cloned()
                        .collect(),
                });

                let trail = self
                    .shuttle
                    .as_ref()
                    .map(|(tracker, positions)| tracker.trail(positions, f))
                    .filter(|t| t.current.is_some() || !t.segments.is_empty());

                FrameOverlay {
                    frame_index: f,
                    skeleton,
                    hud,
                    trail,
                }
            })
            .collect()
    }

    /// Annotate every frame, in order.
    ///
    /// # Arguments
    /// * `frames` - Decoded frames of the source video
    /// * `metadata` - Source properties; a zero fps is replaced by the default
    /// * `poses` - Index-aligned poses
    /// * `shots` - Final shot list
    pub fn render(
        &self,
        frames: Vec<RgbImage>,
        metadata: VideoMetadata,
        poses: &PoseSequence,
        shots: &[ShotEvent],
    ) -> Result<AnnotatedVideo> {
        let painter = OverlayPainter::from_config(&self.config)?;

        let overlays = self.plan(poses, shots, frames.len());
        let fps = metadata.effective_fps(self.config.default_fps);

        let frames: Vec<RgbImage> = frames
            .into_iter()
            .zip(overlays.iter())
            .map(|(mut frame, overlay)| {
                painter.paint(&mut frame, overlay);
                frame
            })
            .collect();

        info!("Rendered {} annotated frames at {} fps", frames.len(), fps);

        Ok(AnnotatedVideo {
            frames,
            width: metadata.width,
            height: metadata.height,
            fps,
        })
    }
}

/// Paints a `FrameOverlay` onto an RGB frame
pub struct OverlayPainter {
    font: FontArc,
}

impl OverlayPainter {
    /// Painter with the bundled DejaVu Sans font
    pub fn new() -> Result<Self> {
        let font = FontArc::try_from_slice(DEFAULT_FONT).context("Bundled HUD font is invalid")?;
        Ok(Self::with_font(font))
    }

    pub fn with_font(font: FontArc) -> Self {
        Self { font }
    }

    pub fn with_font_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .with_context(|| format!("Invalid font file {}", path.display()))?;
        debug!("Loaded HUD font from {}", path.display());
        Ok(Self::with_font(font))
    }

    /// Configured font file, else the bundled one
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        match &config.font_path {
            Some(path) => Self::with_font_file(path),
            None => Self::new(),
        }
    }

    pub fn paint(&self, frame: &mut RgbImage, overlay: &FrameOverlay) {
        if let Some(trail) = &overlay.trail {
            paint_trail(frame, trail);
        }

        if let Some(skeleton) = &overlay.skeleton {
            let color = skeleton.color.rgb();
            for (from, to) in &skeleton.segments {
                draw_thick_line(frame, *from, *to, color);
            }
            for joint in &skeleton.joints {
                draw_filled_circle_mut(frame, (joint.x as i32, joint.y as i32), 4, color);
            }
        }

        let font = &self.font;

        if let Some(hud) = &overlay.hud {
            self.text_with_background(frame, font, &hud.title(), 20, 50, 36.0, SHOT_COLOR);

            let detail_color = if hud.fixes.is_empty() {
                OverlayColor::Good.rgb()
            } else {
                OverlayColor::Alert.rgb()
            };
            let mut baseline = 100;
            for line in hud.detail_lines() {
                self.text_with_background(frame, font, &line, 20, baseline, 22.0, detail_color);
                baseline += 30;
            }
        }

        let counter = overlay.counter_text();
        let x = frame.width() as i32 - 150;
        let y = frame.height() as i32 - 30;
        let scale = PxScale::from(18.0);
        let (_, h) = text_size(scale, font, &counter);
        draw_text_mut(frame, COUNTER_COLOR, x, y - h as i32, scale, font, &counter);
    }

    /// Text with a filled box behind it; `baseline` is the bottom of the text
    #[allow(clippy::too_many_arguments)]
    fn text_with_background(
        &self,
        frame: &mut RgbImage,
        font: &FontArc,
        text: &str,
        x: i32,
        baseline: i32,
        px: f32,
        color: Rgb<u8>,
    ) {
        let scale = PxScale::from(px);
        let (w, h) = text_size(scale, font, text);
        let top = baseline - h as i32;

        draw_filled_rect_mut(
            frame,
            Rect::at(x - 5, top - 5).of_size(w + 10, h + 10),
            HUD_BACKGROUND,
        );
        draw_text_mut(frame, color, x, top, scale, font, text);
    }
}

fn draw_thick_line(frame: &mut RgbImage, from: Point2, to: Point2, color: Rgb<u8>) {
    for offset in [-1.0f32, 0.0, 1.0] {
        draw_line_segment_mut(
            frame,
            (from.x as f32 + offset, from.y as f32),
            (to.x as f32 + offset, to.y as f32),
            color,
        );
        draw_line_segment_mut(
            frame,
            (from.x as f32, from.y as f32 + offset),
            (to.x as f32, to.y as f32 + offset),
            color,
        );
    }
}

fn paint_trail(frame: &mut RgbImage, trail: &ShuttleTrail) {
    for segment in &trail.segments {
        let level = (255.0 * segment.alpha).round() as u8;
        draw_line_segment_mut(
            frame,
            (segment.from.x as f32, segment.from.y as f32),
            (segment.to.x as f32, segment.to.y as f32),
            Rgb([level, level, 0]),
        );
    }
    if let Some(current) = trail.current {
        draw_filled_circle_mut(frame, (current.x as i32, current.y as i32), 5, SHUTTLE_COLOR);
    }
}
