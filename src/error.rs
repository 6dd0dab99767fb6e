use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cell_size must be greater than zero")]
    ZeroCellSize,

    #[error("snake_speed must be greater than zero")]
    ZeroSpeed,

    #[error("initial_length must be greater than zero")]
    ZeroLength,

    #[error("a {width}x{height} pixel window holds no {cell_size}px cells")]
    GridTooSmall { width: u32, height: u32, cell_size: u32 },

    #[error("a {width}x{height} grid is larger than {max} cells on a side")]
    GridTooLarge { width: u32, height: u32, max: u32 },

    #[error("a snake of length {length} does not fit on a {width}x{height} grid")]
    SnakeDoesNotFit { length: usize, width: i32, height: i32 },
}
