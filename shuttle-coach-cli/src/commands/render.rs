use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use shuttle_coach::models::AnalysisResult;
use shuttle_coach::services::{
    read_all_frames, AnnotationRenderer, FrameSource, ImageSequenceSource,
};
use std::fs;
use std::path::PathBuf;

use super::analyze::load_poses;
use super::Context;

#[derive(Args)]
pub struct RenderCommand {
    /// Source frame directory
    #[arg(long)]
    frames: PathBuf,

    /// Pose sequence JSON used for the analysis
    #[arg(long)]
    poses: PathBuf,

    /// Analysis result JSON written by `analyze --output`
    #[arg(long)]
    analysis: PathBuf,

    /// Output directory for annotated frames
    #[arg(long)]
    out: PathBuf,

    /// Frame rate of the source video (0 or unset falls back to the default)
    #[arg(long, default_value_t = 0.0)]
    fps: f64,

    /// Draw the shuttlecock trail
    #[arg(long)]
    trail: bool,
}

impl RenderCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let poses = load_poses(&self.poses)?;
        let contents = fs::read_to_string(&self.analysis)
            .with_context(|| format!("Failed to read {}", self.analysis.display()))?;
        let analysis: AnalysisResult = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.analysis.display()))?;

        let mut source = ImageSequenceSource::open(&self.frames, self.fps)?;
        let metadata = source.metadata();
        let frames = read_all_frames(&mut source)?;

        let analysis_config = &ctx.config.analysis;
        let mut renderer = AnnotationRenderer::new(analysis_config.render.clone());
        if self.trail {
            let tracker = shuttle_coach::services::ShuttlecockTrackingService::new(
                analysis_config.trajectory.clone(),
            );
            let positions = tracker.track(&frames);
            renderer = renderer.with_shuttle_trail(positions, analysis_config.trajectory.clone());
        }

        let video = renderer.render(frames, metadata, &poses, &analysis.shots)?;
        let written = video.write_frames(&self.out)?;

        println!(
            "{} Wrote {} annotated frames ({}x{} @ {} fps) to {}",
            "✓".green(),
            written,
            video.width,
            video.height,
            video.fps,
            self.out.display()
        );

        Ok(())
    }
}
