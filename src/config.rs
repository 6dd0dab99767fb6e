use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snake::{Cell, Direction, GridBounds, Snake};

pub type Rgb = [u8; 3];

/// Largest grid side in cells; anything wider cannot be drawn in a terminal anyway.
pub const MAX_GRID_SIDE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub border: Rgb,
    pub snake: Rgb,
    pub apple: Rgb,
    /// Color of the snake once it has crashed.
    pub blood: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [0, 0, 0],
            border: [255, 255, 255],
            snake: [0, 165, 80],
            apple: [110, 203, 60],
            blood: [152, 0, 2],
        }
    }
}

/// Everything the game needs to know before the first tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub caption: String,
    /// Window size in pixels, divided into `cell_size` squares.
    pub window_width: u32,
    pub window_height: u32,
    pub cell_size: u32,
    /// Snake moves per second.
    pub snake_speed: u32,
    pub initial_length: usize,
    pub initial_heading: Direction,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            caption: "Snake".into(),
            window_width: 480,
            window_height: 360,
            cell_size: 10,
            snake_speed: 20,
            initial_length: 3,
            initial_heading: Direction::Right,
            palette: Palette::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data)
    }

    pub fn grid_bounds(&self) -> GridBounds {
        if self.cell_size == 0 {
            return GridBounds::new(0, 0);
        }
        GridBounds::new(
            (self.window_width / self.cell_size) as i32,
            (self.window_height / self.cell_size) as i32,
        )
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.snake_speed.max(1)))
    }

    /// Head position of a fresh snake: a fifth of the way across, halfway down.
    pub fn start_cell(&self) -> Cell {
        let bounds = self.grid_bounds();
        Cell::new(bounds.width / 5, bounds.height / 2)
    }

    pub fn initial_snake(&self) -> Snake {
        Snake::new(self.start_cell(), self.initial_length, self.initial_heading)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.snake_speed == 0 {
            return Err(ConfigError::ZeroSpeed);
        }
        if self.initial_length == 0 {
            return Err(ConfigError::ZeroLength);
        }

        let (cols, rows) = (self.window_width / self.cell_size, self.window_height / self.cell_size);
        if cols > MAX_GRID_SIDE || rows > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge { width: cols, height: rows, max: MAX_GRID_SIDE });
        }

        let bounds = self.grid_bounds();
        if bounds.area() == 0 {
            return Err(ConfigError::GridTooSmall {
                width: self.window_width,
                height: self.window_height,
                cell_size: self.cell_size,
            });
        }

        let does_not_fit = ConfigError::SnakeDoesNotFit {
            length: self.initial_length,
            width: bounds.width,
            height: bounds.height,
        };

        // The apple needs at least one free cell at the start.
        if self.initial_length >= bounds.area() {
            return Err(does_not_fit);
        }

        // The body is a straight line, so head and tail inside means all of it is.
        let head = self.start_cell();
        let (dx, dy) = self.initial_heading.delta();
        let back = self.initial_length as i32 - 1;
        let tail = Cell::new(head.col - dx * back, head.row - dy * back);
        if !bounds.contains(head) || !bounds.contains(tail) {
            return Err(does_not_fit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_settings() {
        let config = GameConfig::default();
        assert_eq!(config.grid_bounds(), GridBounds::new(48, 36));
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
        assert_eq!(config.start_cell(), Cell::new(9, 18));
        assert_eq!(config.initial_length, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = GameConfig::from_toml_str(
            r#"
            snake_speed = 8
            initial_heading = "up"

            [palette]
            apple = [255, 0, 0]
            "#,
        )
        .unwrap();

        assert_eq!(config.snake_speed, 8);
        assert_eq!(config.initial_heading, Direction::Up);
        assert_eq!(config.palette.apple, [255, 0, 0]);
        assert_eq!(config.palette.snake, Palette::default().snake);
        assert_eq!(config.window_width, 480);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = GameConfig::from_toml_str("snake_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GameConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn rejects_degenerate_values() {
        let config = GameConfig { cell_size: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCellSize)));

        let config = GameConfig { snake_speed: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSpeed)));

        let config = GameConfig { initial_length: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLength)));

        let config = GameConfig { window_width: 5, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::GridTooSmall { .. })));
    }

    #[test]
    fn rejects_grid_wider_than_a_terminal() {
        let config = GameConfig { window_width: 327_690, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { width: 32_769, height: 36, max: MAX_GRID_SIDE })
        ));

        let config = GameConfig { window_width: u32::MAX, cell_size: 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::GridTooLarge { .. })));

        let config = GameConfig { window_width: MAX_GRID_SIDE * 10, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn huge_initial_length_is_rejected_up_front() {
        let config = GameConfig { initial_length: 300_000_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::SnakeDoesNotFit { length: 300_000_000, .. })));

        let config = GameConfig { initial_length: usize::MAX, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::SnakeDoesNotFit { .. })));
    }

    #[test]
    fn rejects_snake_that_leaves_the_grid() {
        // start column is 9, so eleven cells heading right would reach column -1
        let config = GameConfig { initial_length: 11, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::SnakeDoesNotFit { .. })));

        let config = GameConfig { initial_length: 10, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
