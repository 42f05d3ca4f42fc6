use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tunable thresholds for the whole analysis run.
///
/// Every field has a serde default, so an empty document yields the stock
/// behavior. Components receive the section they need by reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub form: FormRuleConfig,

    #[serde(default)]
    pub trajectory: TrajectoryConfig,

    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Right-wrist displacement that counts as a swing, in px/frame
    #[serde(default = "default_wrist_speed_threshold")]
    pub wrist_speed_threshold: f64,

    /// Accepted shots must be more than this many frames apart
    #[serde(default = "default_min_shot_gap_frames")]
    pub min_shot_gap_frames: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Overhead swings with an elbow angle below this are smashes/clears
    #[serde(default = "default_smash_elbow_max_deg")]
    pub smash_elbow_max_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRuleConfig {
    /// Minimum elbow extension expected at smash/clear contact
    #[serde(default = "default_smash_min_elbow_extension_deg")]
    pub smash_min_elbow_extension_deg: f64,

    /// Knee angle above which a net-shot lunge is too straight
    #[serde(default = "default_net_shot_max_knee_angle_deg")]
    pub net_shot_max_knee_angle_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Maximum HSV saturation (0-255) for a pixel to count as white
    #[serde(default = "default_white_max_saturation")]
    pub white_max_saturation: u8,

    /// Minimum HSV value (0-255) for a pixel to count as white
    #[serde(default = "default_white_min_value")]
    pub white_min_value: u8,

    /// Exclusive blob area bounds in px²
    #[serde(default = "default_min_blob_area")]
    pub min_blob_area: f64,

    #[serde(default = "default_max_blob_area")]
    pub max_blob_area: f64,

    /// Blobs must be rounder than this (4πA/P²)
    #[serde(default = "default_min_circularity")]
    pub min_circularity: f64,

    /// Half-width of the square morphology kernel (2 => 5x5)
    #[serde(default = "default_kernel_radius")]
    pub kernel_radius: u8,

    /// Past positions drawn as a trail behind the shuttlecock
    #[serde(default = "default_trail_length")]
    pub trail_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Frames a shot's HUD stays on screen after the shot frame
    #[serde(default = "default_display_window_frames")]
    pub display_window_frames: usize,

    /// Defect lines shown per shot; the rest are dropped
    #[serde(default = "default_max_errors_shown")]
    pub max_errors_shown: usize,

    /// Used when the source reports a frame rate of 0
    #[serde(default = "default_fps")]
    pub default_fps: u32,

    /// TrueType font for HUD text; the bundled DejaVu Sans when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

// Default value functions
fn default_wrist_speed_threshold() -> f64 {
    20.0
}

fn default_min_shot_gap_frames() -> usize {
    5
}

fn default_smash_elbow_max_deg() -> f64 {
    160.0
}

fn default_smash_min_elbow_extension_deg() -> f64 {
    170.0
}

fn default_net_shot_max_knee_angle_deg() -> f64 {
    150.0
}

fn default_white_max_saturation() -> u8 {
    30
}

fn default_white_min_value() -> u8 {
    200
}

fn default_min_blob_area() -> f64 {
    20.0
}

fn default_max_blob_area() -> f64 {
    500.0
}

fn default_min_circularity() -> f64 {
    0.5
}

fn default_kernel_radius() -> u8 {
    2
}

fn default_trail_length() -> usize {
    10
}

fn default_display_window_frames() -> usize {
    30
}

fn default_max_errors_shown() -> usize {
    3
}

fn default_fps() -> u32 {
    30
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            wrist_speed_threshold: default_wrist_speed_threshold(),
            min_shot_gap_frames: default_min_shot_gap_frames(),
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            smash_elbow_max_deg: default_smash_elbow_max_deg(),
        }
    }
}

impl Default for FormRuleConfig {
    fn default() -> Self {
        Self {
            smash_min_elbow_extension_deg: default_smash_min_elbow_extension_deg(),
            net_shot_max_knee_angle_deg: default_net_shot_max_knee_angle_deg(),
        }
    }
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            white_max_saturation: default_white_max_saturation(),
            white_min_value: default_white_min_value(),
            min_blob_area: default_min_blob_area(),
            max_blob_area: default_max_blob_area(),
            min_circularity: default_min_circularity(),
            kernel_radius: default_kernel_radius(),
            trail_length: default_trail_length(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            display_window_frames: default_display_window_frames(),
            max_errors_shown: default_max_errors_shown(),
            default_fps: default_fps(),
            font_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse configuration from a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse analysis config")
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize analysis config")
    }
}
