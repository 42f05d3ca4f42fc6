/// Video I/O boundary
///
/// Decoding real video containers stays outside this crate. Frames come in
/// through `FrameSource`, poses through `PoseEstimator`; the directory-backed
/// source reads a numbered PNG/JPEG sequence such as the one `ffmpeg -i in.mp4
/// frames/%05d.png` produces.
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::models::{PoseFrame, PoseSequence};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Properties of the source video
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// As reported by the source; may be 0 for malformed files
    pub fps: f64,
}

impl VideoMetadata {
    /// Frame rate to write with, substituting `default_fps` for a
    /// zero or non-finite report
    pub fn effective_fps(&self, default_fps: u32) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            warn!(
                "Source reports {} fps, falling back to {}",
                self.fps, default_fps
            );
            default_fps as f64
        }
    }
}

/// Sequential frame reader
pub trait FrameSource {
    fn metadata(&self) -> VideoMetadata;

    /// Next frame in order, `None` once the source is exhausted
    fn next_frame(&mut self) -> Result<Option<RgbImage>, AnalysisError>;
}

/// Per-frame pose estimator, called once per frame in order
pub trait PoseEstimator {
    fn estimate(&mut self, frame_index: usize, frame: &RgbImage) -> Result<Option<PoseFrame>>;
}

/// Replays poses that were extracted ahead of time
#[derive(Debug, Clone)]
pub struct PrecomputedPoses {
    poses: PoseSequence,
}

impl PrecomputedPoses {
    pub fn new(poses: PoseSequence) -> Self {
        Self { poses }
    }
}

impl PoseEstimator for PrecomputedPoses {
    fn estimate(&mut self, frame_index: usize, _frame: &RgbImage) -> Result<Option<PoseFrame>> {
        Ok(self.poses.get(frame_index).cloned())
    }
}

/// Directory of still frames read in file-name order
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    cursor: usize,
    metadata: VideoMetadata,
}

impl ImageSequenceSource {
    /// Open a frame directory.
    ///
    /// # Arguments
    /// * `dir` - Directory holding PNG/JPEG frames
    /// * `fps` - Frame rate of the original video, 0 when unknown
    ///
    /// # Returns
    /// `AnalysisError::VideoUnreadable` when the directory cannot be listed,
    /// holds no frames, or the first frame cannot be probed
    pub fn open(dir: &Path, fps: f64) -> Result<Self, AnalysisError> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            AnalysisError::VideoUnreadable(format!("{}: {}", dir.display(), e))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_frame_file(path))
            .collect();
        paths.sort();

        let first = paths.first().ok_or_else(|| {
            AnalysisError::VideoUnreadable(format!("{}: no frames found", dir.display()))
        })?;

        let (width, height) = image::image_dimensions(first).map_err(|e| {
            AnalysisError::VideoUnreadable(format!("{}: {}", first.display(), e))
        })?;

        debug!(
            "Opened {} frames ({}x{}) from {}",
            paths.len(),
            width,
            height,
            dir.display()
        );

        Ok(Self {
            paths,
            cursor: 0,
            metadata: VideoMetadata { width, height, fps },
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn metadata(&self) -> VideoMetadata {
        self.metadata
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, AnalysisError> {
        let Some(path) = self.paths.get(self.cursor) else {
            return Ok(None);
        };
        let frame = self.cursor;
        self.cursor += 1;

        let image = image::open(path).map_err(|e| AnalysisError::FrameDecode {
            frame,
            reason: e.to_string(),
        })?;
        Ok(Some(image.to_rgb8()))
    }
}

/// Drain a source into memory
pub fn read_all_frames<S: FrameSource + ?Sized>(source: &mut S) -> Result<Vec<RgbImage>, AnalysisError> {
    let mut frames = Vec::new();
    while let Some(frame) = source.next_frame()? {
        frames.push(frame);
    }
    Ok(frames)
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
