use anyhow::{Context, Result};
use clap::Parser;
use logreplay_core::conf::{GroupConfig, PaddleMode, ReplayConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logreplay",
    version,
    about = "Replay a web server access log as a timed simulation"
)]
pub struct Cli {
    /// Access log to replay, or `-` to follow stdin
    pub file: String,

    /// TOML config file; command line options override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Simulation speed (1 to 30)
    #[arg(short = 's', long)]
    pub speed: Option<f64>,

    /// Seconds between summary lane refreshes
    #[arg(short = 'u', long)]
    pub update_rate: Option<f64>,

    /// URL group as NAME,REGEX,PERCENT[,COLOUR]; repeatable, in priority order
    #[arg(short = 'g', long = "group")]
    pub groups: Vec<GroupConfig>,

    /// Paddle assignment: single, vhost, pid or none
    #[arg(long)]
    pub paddle_mode: Option<PaddleMode>,

    /// Begin with the next entry received (stdin only)
    #[arg(long)]
    pub sync: bool,

    /// Start at this fraction of the log (0.0 - 1.0)
    #[arg(short = 'p', long)]
    pub start_position: Option<f64>,

    /// Stop at this fraction of the log (0.0 - 1.0)
    #[arg(long)]
    pub stop_position: Option<f64>,

    #[arg(long)]
    pub disable_progress: bool,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    pub realtime: bool,

    /// Print one JSON frame snapshot per simulated second instead of the dashboard
    #[arg(long)]
    pub json: bool,

    #[arg(long, conflicts_with = "pretty_logs")]
    pub json_logs: bool,

    #[arg(long)]
    pub pretty_logs: bool,
}

impl Cli {
    pub fn load_config(&self) -> Result<ReplayConfig> {
        let mut config = match &self.config {
            Some(path) => ReplayConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ReplayConfig::default(),
        };

        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(rate) = self.update_rate {
            config.update_rate = rate;
        }
        if !self.groups.is_empty() {
            config.groups = self.groups.clone();
        }
        if let Some(mode) = self.paddle_mode {
            config.paddle_mode = mode;
        }
        if let Some(start) = self.start_position {
            config.start_position = start;
        }
        if let Some(stop) = self.stop_position {
            config.stop_position = stop;
        }
        config.sync |= self.sync;
        config.progress &= !self.disable_progress;

        config.validate().context("invalid options")?;

        Ok(config)
    }

    pub fn is_stdin(&self) -> bool {
        self.file == "-"
    }
}
