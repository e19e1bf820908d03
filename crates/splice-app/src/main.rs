//! Splice - timeline editing core
//!
//! Command-line entry point for inspecting, editing, sharing and playing
//! back project files.

mod commands;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use splice_timeline::TimelineConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "splice")]
#[command(about = "Splice - inspect, edit, share and play timeline projects")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Timeline configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print tracks, clips and duration
    Inspect {
        /// Project file path
        project: PathBuf,
    },

    /// Split every clip under a time and save the project
    Split {
        /// Project file path
        project: PathBuf,

        /// Cut position in seconds
        #[arg(value_parser = parse_seconds)]
        time: f64,
    },

    /// Print a share token for the project
    Share {
        /// Project file path
        project: PathBuf,
    },

    /// Rebuild a project file from a share token
    Unshare {
        /// Token produced by `share`
        token: String,

        /// Output project file path
        output: PathBuf,
    },

    /// Run the playback clock and report the cursor
    Play {
        /// Project file path
        project: PathBuf,

        /// Stop after this many seconds (default: play to the end)
        #[arg(value_parser = parse_seconds)]
        seconds: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TimelineConfig::default(),
    };

    match cli.command {
        Commands::Inspect { project } => commands::inspect(&project, config),
        Commands::Split { project, time } => commands::split(&project, time, config),
        Commands::Share { project } => commands::share(&project, config),
        Commands::Unshare { token, output } => commands::unshare(&token, &output, config),
        Commands::Play { project, seconds } => commands::play(&project, seconds, config),
    }
}

fn load_config(path: &Path) -> Result<TimelineConfig> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: TimelineConfig = serde_json::from_slice(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("unusable config {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Seconds on the command line: finite and not negative.
fn parse_seconds(raw: &str) -> std::result::Result<f64, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!(
            "time must be a non-negative number of seconds, got {raw}"
        ));
    }
    Ok(seconds)
}
