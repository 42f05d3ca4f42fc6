mod analyze;
mod config_cmd;
mod render;
mod trajectory;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

pub use analyze::AnalyzeCommand;
pub use render::RenderCommand;
pub use trajectory::TrajectoryCommand;

#[derive(Parser)]
#[command(name = "shuttle-coach")]
#[command(about = "Badminton shot detection and form feedback from pose data", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the online feedback service
    #[arg(long, global = true)]
    offline: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "SHUTTLE_COACH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, classify and score shots from a pose file
    Analyze(AnalyzeCommand),

    /// Track the shuttlecock through a frame directory
    Trajectory(TrajectoryCommand),

    /// Draw analysis overlays onto frames
    Render(RenderCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Settings shared by every command
pub struct Context {
    pub config: Config,
    pub offline: bool,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
            command => {
                let ctx = Context {
                    config: Config::load(config_path)?,
                    offline: self.offline,
                };
                match command {
                    Commands::Analyze(cmd) => cmd.execute(&ctx).await,
                    Commands::Trajectory(cmd) => cmd.execute(&ctx).await,
                    Commands::Render(cmd) => cmd.execute(&ctx).await,
                    Commands::Config(_) | Commands::Completions { .. } => Ok(()),
                }
            }
        }
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
