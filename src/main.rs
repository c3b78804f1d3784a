use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use block_snake::game::GameConfig;
use block_snake::modes::{HeadlessMode, HumanMode, RandomController};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "block_snake")]
#[command(version, about = "Snake game with a step-based engine")]
struct Cli {
    /// Who drives the snake
    #[arg(long, value_enum, default_value = "human")]
    mode: Mode,

    /// JSON game config; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field width
    #[arg(long)]
    width: Option<i32>,

    /// Field height
    #[arg(long)]
    height: Option<i32>,

    /// Cell size
    #[arg(long)]
    block_size: Option<i32>,

    /// Frames per second in human mode
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for food placement (and the random controller)
    #[arg(long)]
    seed: Option<u64>,

    /// Episodes to play in headless mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Write logs here (human mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Human,
    /// Let a random controller play without a UI
    Headless,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}

/// Logs go to stderr in headless mode; the TUI owns the terminal, so human
/// mode only logs when given a file.
fn init_tracing(mode: Mode, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (log_file, mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Mode::Headless) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        (None, Mode::Human) => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.mode, cli.log_file.as_deref())?;

    let config = cli.game_config()?;
    tracing::debug!(?config, "resolved game config");

    match cli.mode {
        Mode::Human => {
            let mut human_mode = HumanMode::new(config)?;
            human_mode.run().await?;
        }
        Mode::Headless => {
            let controller = RandomController::new(config.seed);
            let mut headless = HeadlessMode::new(config, controller)?;
            headless.run(cli.episodes)?;
        }
    }

    Ok(())
}
