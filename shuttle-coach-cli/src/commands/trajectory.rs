use anyhow::Result;
use clap::Args;
use colored::Colorize;
use shuttle_coach::services::{read_all_frames, ImageSequenceSource, ShuttlecockTrackingService};
use std::path::PathBuf;

use super::Context;

#[derive(Args)]
pub struct TrajectoryCommand {
    /// Frame directory (PNG/JPEG, read in file-name order)
    #[arg(long)]
    frames: PathBuf,

    /// Print positions and report as JSON
    #[arg(long)]
    json: bool,
}

impl TrajectoryCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let mut source = ImageSequenceSource::open(&self.frames, 0.0)?;
        let frames = read_all_frames(&mut source)?;

        let tracker = ShuttlecockTrackingService::new(ctx.config.analysis.trajectory.clone());
        let positions = tracker.track(&frames);
        let report = ShuttlecockTrackingService::analyze_trajectory(&positions);

        if self.json {
            let value = serde_json::json!({
                "positions": positions,
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        let found = positions.iter().filter(|p| p.is_some()).count();
        println!("{}", "Shuttlecock Trajectory".bold());
        println!("────────────────────────────────");
        println!("Frames:            {}", frames.len());
        println!("Located in:        {} frames", found);
        println!("Direction changes: {:?}", report.direction_change_frames);
        println!("Average speed:     {:.1} px/frame", report.average_speed);
        println!("Max speed:         {:.1} px/frame", report.max_speed);

        if found == 0 {
            println!();
            println!("{}", "No shuttlecock found in any frame".yellow());
        }

        Ok(())
    }
}
