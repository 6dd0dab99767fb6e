use std::{cmp::max, thread::sleep, time::Instant};

use crate::board::{Board, Status};
use crate::config::GameConfig;
use crate::input::{command_for, Command};
use crate::render::Renderable;
use crate::term::{Session, TermManager};

use anyhow::Result;
use log::{debug, info, warn};
use rand::rngs::ThreadRng;

pub struct SnakeGame {
    config: GameConfig,
    term: TermManager,
    board: Board<ThreadRng>,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Result<Self> {
        let board = Board::new(&config, rand::thread_rng())?;
        let term = TermManager::new(board.bounds(), config.palette)?;
        Ok(SnakeGame { config, term, board })
    }

    /// Plays one round. The terminal is restored however the round ends.
    pub fn run(&mut self) -> Result<()> {
        let SnakeGame { config, term, board } = self;
        let config = &*config;
        in_session(term, &config.caption, |term| play(term, board, config))
    }
}

/// Runs `body` with the terminal in game mode. Restores it afterwards even when setup itself failed half way.
fn in_session<S, F>(session: &mut S, caption: &str, body: F) -> Result<()>
where
    S: Session,
    F: FnOnce(&mut S) -> Result<()>,
{
    let result = session.setup(caption).and_then(|_| body(session));

    if let Err(e) = session.restore() {
        warn!("Could not restore terminal: {:#}", e);
    }
    result
}

fn play(term: &mut TermManager, board: &mut Board<ThreadRng>, config: &GameConfig) -> Result<()> {
    let tick = config.tick_interval();
    let bounds = board.bounds();
    info!(
        "Starting round on a {}x{} grid, tick every {:?}, apple at {:?}",
        bounds.width, bounds.height, tick, board.apple().cell()
    );

    term.clear()?;
    draw(term, board, config)?;

    let mut next_tick = Instant::now() + tick;
    loop {
        let now = Instant::now();
        if next_tick > now {
            sleep(next_tick - now);
        }
        next_tick = max(next_tick, now) + tick;

        for key_ev in term.read_key_events_queue()? {
            match command_for(&key_ev) {
                Command::Quit => {
                    info!("Quit during round, score {}", board.score());
                    return Ok(());
                }
                Command::Turn(dir) => {
                    board.turn(dir);
                }
                Command::Ignore => debug!("Ignoring key {:?}", key_ev.code),
            }
        }

        let outcome = board.tick();
        if outcome.ate_apple {
            debug!("Apple moved to {:?}", board.apple().cell());
        }
        draw(term, board, config)?;

        if !outcome.status.is_running() {
            break;
        }
    }

    let length = board.snake().len();
    match board.status() {
        Status::Won => info!("Round won with score {}", board.score()),
        status => info!("Round ended ({:?}) with score {}, length {}", status, board.score(), length),
    }

    wait_for_quit(term)
}

/// Keeps the final frame on screen until the player quits.
fn wait_for_quit(term: &mut TermManager) -> Result<()> {
    loop {
        if command_for(&term.read_key_blocking()?) == Command::Quit {
            return Ok(());
        }
    }
}

fn draw(term: &mut TermManager, board: &Board<ThreadRng>, config: &GameConfig) -> Result<()> {
    term.begin_frame();
    board.render(term, &config.palette);
    term.present()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    #[derive(Default)]
    struct FakeSession {
        fail_setup: bool,
        fail_restore: bool,
        calls: Vec<&'static str>,
    }

    impl Session for FakeSession {
        fn setup(&mut self, _caption: &str) -> Result<()> {
            self.calls.push("setup");
            if self.fail_setup {
                bail!("raw mode unavailable");
            }
            Ok(())
        }

        fn restore(&mut self) -> Result<()> {
            self.calls.push("restore");
            if self.fail_restore {
                bail!("terminal gone");
            }
            Ok(())
        }
    }

    #[test]
    fn restores_after_body() {
        let mut session = FakeSession::default();
        let result = in_session(&mut session, "Snake", |s| {
            s.calls.push("body");
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(session.calls, vec!["setup", "body", "restore"]);
    }

    #[test]
    fn restores_when_setup_fails() {
        let mut session = FakeSession { fail_setup: true, ..Default::default() };
        let result = in_session(&mut session, "Snake", |s| {
            s.calls.push("body");
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(session.calls, vec!["setup", "restore"]);
    }

    #[test]
    fn body_error_wins_over_restore_error() {
        let mut session = FakeSession { fail_restore: true, ..Default::default() };
        let result = in_session(&mut session, "Snake", |_| bail!("draw failed"));
        assert_eq!(result.unwrap_err().to_string(), "draw failed");
        assert_eq!(session.calls, vec!["setup", "restore"]);
    }
}
