mod apple;
mod board;
mod config;
mod error;
mod game;
mod input;
mod render;
mod score;
mod snake;
mod term;

use std::{fs::File, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{LevelFilter, WriteLogger};

use config::GameConfig;
use error::ConfigError;

pub type TermInt = u16;
pub type Coords = (u16, u16);

#[derive(Parser)]
#[command(name = "snake")]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// TOML file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Size of one grid cell in pixels
    #[arg(long)]
    cell_size: Option<u32>,

    /// Snake moves per second
    #[arg(long)]
    speed: Option<u32>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Where log output goes, the terminal is busy with the game
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Defaults, then the config file, then command line flags.
fn resolve_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.window_width = width;
    }
    if let Some(height) = cli.height {
        config.window_height = height;
    }
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    if let Some(speed) = cli.speed {
        config.snake_speed = speed;
    }
    if let Some(length) = cli.length {
        config.initial_length = length;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level.into(), simplelog::Config::default(), log_file)
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    info!("Starting snake");

    let config = resolve_config(&cli)?;
    let mut game = game::SnakeGame::new(config)?;
    game.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("snake").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&cli(&["--speed", "8", "--width", "200", "--length", "4"])).unwrap();
        assert_eq!(config.snake_speed, 8);
        assert_eq!(config.window_width, 200);
        assert_eq!(config.initial_length, 4);
        assert_eq!(config.window_height, 360);
    }

    #[test]
    fn invalid_flags_are_rejected() {
        assert!(matches!(resolve_config(&cli(&["--cell-size", "0"])), Err(ConfigError::ZeroCellSize)));
        assert!(resolve_config(&cli(&["--config", "no/such/file.toml"])).is_err());
    }

    #[test]
    fn log_level_parses() {
        let parsed = cli(&["--log-level", "debug"]);
        assert_eq!(LevelFilter::from(parsed.log_level), LevelFilter::Debug);
        assert_eq!(cli(&[]).log_file, PathBuf::from("snake.log"));
    }
}
