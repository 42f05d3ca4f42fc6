use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;
use shuttle_coach::models::{AnalysisResult, ObjectPositionSequence, PoseSequence};
use shuttle_coach::services::{
    read_all_frames, AnalysisPipeline, FeedbackGenerator, GeminiFeedbackClient, ImageSequenceSource,
    MergePolicy, NoFeedback,
};
use std::fs;
use std::path::{Path, PathBuf};

use super::Context;

#[derive(Args)]
pub struct AnalyzeCommand {
    /// Pose sequence JSON (one entry per frame, null when no body)
    #[arg(long)]
    poses: PathBuf,

    /// Frame directory for shuttlecock tracking
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Language code for coaching feedback
    #[arg(short, long)]
    language: Option<String>,

    /// How wrist and trajectory candidates are combined (wrist, union)
    #[arg(long)]
    merge: Option<MergePolicy>,

    /// Write the analysis result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the analysis result as JSON instead of a report
    #[arg(long)]
    json: bool,
}

impl AnalyzeCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let poses = load_poses(&self.poses)?;
        let language = self
            .language
            .clone()
            .unwrap_or_else(|| ctx.config.analyze.language.clone());
        let merge = self.merge.unwrap_or(ctx.config.analyze.merge_policy);

        let pipeline = AnalysisPipeline::new(ctx.config.analysis.clone()).with_merge_policy(merge);

        let positions = match &self.frames {
            Some(dir) => Some(track_frames(&pipeline, dir, poses.len())?),
            None => None,
        };

        let feedback = ctx.config.feedback.resolve();
        let result = if ctx.offline || !feedback.is_enabled() {
            if !ctx.offline {
                tracing::info!("GEMINI_API_KEY not set, skipping coaching feedback");
            }
            run(&pipeline, &poses, positions.as_deref(), &NoFeedback, &language).await
        } else {
            let client = GeminiFeedbackClient::new(feedback)?;
            run(&pipeline, &poses, positions.as_deref(), &client, &language).await
        };

        if let Some(path) = &self.output {
            let json = serde_json::to_string_pretty(&result)?;
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_report(&result, poses.len());
            if let Some(path) = &self.output {
                println!();
                println!("{} Result written to {}", "✓".green(), path.display());
            }
        }

        Ok(())
    }
}

async fn run<G: FeedbackGenerator>(
    pipeline: &AnalysisPipeline,
    poses: &PoseSequence,
    positions: Option<&[Option<shuttle_coach::models::Point2>]>,
    feedback: &G,
    language: &str,
) -> AnalysisResult {
    pipeline
        .analyze_poses(poses, positions, feedback, language)
        .await
}

pub(crate) fn load_poses(path: &Path) -> Result<PoseSequence> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pose file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse pose file {}", path.display()))
}

fn track_frames(
    pipeline: &AnalysisPipeline,
    dir: &Path,
    pose_count: usize,
) -> Result<ObjectPositionSequence> {
    let mut source = ImageSequenceSource::open(dir, 0.0)?;
    let frames = read_all_frames(&mut source)?;
    if frames.len() != pose_count {
        tracing::warn!(
            "{} frames but {} poses; positions stay aligned by index",
            frames.len(),
            pose_count
        );
    }
    Ok(pipeline.tracker().track(&frames))
}

fn print_report(result: &AnalysisResult, frame_count: usize) {
    println!("{}", "Shot Analysis".bold());
    println!("────────────────────────────────");
    println!("Frames analyzed: {}", frame_count);
    println!(
        "Shots detected:  {} ({} with form issues)",
        result.shot_count(),
        result.shots_with_errors()
    );
    println!();

    for (i, shot) in result.shots.iter().enumerate() {
        println!(
            "{:>3}. {} at frame {}",
            i + 1,
            shot.shot_type.to_string().cyan().bold(),
            shot.frame_index
        );
        if shot.form_errors.is_empty() {
            println!("     {}", "Good form".green());
        } else {
            for error in &shot.form_errors {
                println!("     {} {}", "✗".red(), error);
            }
        }
    }

    if let Some(trajectory) = &result.trajectory {
        println!();
        println!("{}", "Shuttlecock".bold());
        println!(
            "  Direction changes: {:?}",
            trajectory.direction_change_frames
        );
        println!(
            "  Speed: avg {:.1} px/frame, max {:.1} px/frame",
            trajectory.average_speed, trajectory.max_speed
        );
    }

    if !result.gemini_feedback.is_empty() {
        println!();
        println!("{}", "Coach Feedback".bold());
        println!("{}", result.gemini_feedback);
    }
}
