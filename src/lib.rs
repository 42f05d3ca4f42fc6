//! Badminton shot analysis from per-frame body poses.
//!
//! Detects swing moments from right-wrist speed, classifies each shot from
//! the arm geometry at the contact frame, checks it against simple form
//! rules, and renders the findings back onto the video frames.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{AnalysisConfig, FeedbackConfig};
pub use error::{AnalysisError, FeedbackError};
pub use models::{AnalysisResult, Joint, PoseFrame, PoseSequence, ShotEvent, ShotType};
pub use services::{AnalysisPipeline, AnnotationRenderer, MergePolicy};
