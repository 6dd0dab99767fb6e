use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Quit,
    Ignore,
}

pub fn command_for(key: &KeyEvent) -> Command {
    if is_ctrl_c(key) {
        return Command::Quit;
    }

    match key.code {
        KeyCode::Up => Command::Turn(Direction::Up),
        KeyCode::Down => Command::Turn(Direction::Down),
        KeyCode::Left => Command::Turn(Direction::Left),
        KeyCode::Right => Command::Turn(Direction::Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,
        _ => Command::Ignore,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers, .. } if modifiers.contains(KeyModifiers::CONTROL))
}
