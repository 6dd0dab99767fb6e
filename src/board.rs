use log::{debug, info};
use rand::Rng;

use crate::apple::Apple;
use crate::config::{GameConfig, Palette};
use crate::error::ConfigError;
use crate::render::{Canvas, Glyph, Renderable, DEAD_SNAKE_CHAR};
use crate::score::{Scorable, ScoreCounter};
use crate::snake::{Direction, GridBounds, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    GameOver(Collision),
    /// The snake covers the whole grid, there is nowhere left for an apple.
    Won,
}

impl Status {
    pub fn is_running(self) -> bool {
        self == Status::Running
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub ate_apple: bool,
    pub status: Status,
}

/// State of one round: the snake, the apple and the field they live on.
pub struct Board<R> {
    snake: Snake,
    apple: Apple,
    bounds: GridBounds,
    status: Status,
    score: ScoreCounter,
    rng: R,
}

impl<R: Rng> Board<R> {
    pub fn new(config: &GameConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let bounds = config.grid_bounds();
        let snake = config.initial_snake();
        let apple = Apple::spawn(snake.cells(), bounds, &mut rng).ok_or(ConfigError::SnakeDoesNotFit {
            length: config.initial_length,
            width: bounds.width,
            height: bounds.height,
        })?;

        Ok(Self::from_parts(snake, apple, bounds, rng))
    }

    pub fn from_parts(snake: Snake, apple: Apple, bounds: GridBounds, rng: R) -> Self {
        Board { snake, apple, bounds, status: Status::Running, score: ScoreCounter::default(), rng }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn apple(&self) -> &Apple {
        &self.apple
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn turn(&mut self, direction: Direction) -> bool {
        if !self.status.is_running() {
            return false;
        }

        let accepted = self.snake.set_direction(direction);
        if !accepted {
            debug!("Ignoring reversal to {:?} while heading {:?}", direction, self.snake.heading());
        }
        accepted
    }

    /// Advances the round by one step: move, eat, then check for collisions.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.status.is_running() {
            return TickOutcome { ate_apple: false, status: self.status };
        }

        // Growing before the move keeps the tail on the same step the apple is eaten.
        let ate_apple = self.snake.next_head() == self.apple.cell();
        if ate_apple {
            self.snake.grow();
        }
        self.snake.advance();

        if ate_apple {
            self.score.record_apple();
            info!("Apple eaten, snake length {}", self.snake.len());

            match self.apple.respawn(self.snake.cells(), self.bounds, &mut self.rng) {
                Some(cell) => debug_assert!(!self.snake.occupies(cell)),
                None => {
                    self.status = Status::Won;
                    info!("Grid is full, round won with score {}", self.score());
                }
            }
        }

        if self.snake.collides_with_wall(self.bounds) {
            self.end(Collision::Wall);
        } else if self.snake.collides_with_self() {
            self.end(Collision::SelfCollision);
        }

        TickOutcome { ate_apple, status: self.status }
    }

    fn end(&mut self, collision: Collision) {
        self.status = Status::GameOver(collision);
        info!("Game over ({:?}) at {:?}, score {}", collision, self.snake.head(), self.score());
    }
}

impl<R> Renderable for Board<R> {
    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        match self.status {
            Status::Running => {
                self.apple.render(canvas, palette);
                self.snake.render(canvas, palette);
            }
            Status::Won => self.snake.render(canvas, palette),
            Status::GameOver(_) => {
                self.apple.render(canvas, palette);
                for &cell in self.snake.cells() {
                    canvas.fill_cell(cell, Glyph::new(DEAD_SNAKE_CHAR, palette.blood));
                }
            }
        }
    }
}
