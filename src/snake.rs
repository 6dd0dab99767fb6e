use std::collections::VecDeque;
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use Direction::*;

/// One grid position. Signed so a head that left the grid can still be represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Cell::new(self.col + dx, self.row + dy)
    }
}

/// Size of the playing field in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
}

impl GridBounds {
    pub const fn new(width: i32, height: i32) -> Self {
        GridBounds { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.col) && (0..self.height).contains(&cell.row)
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Row-major iteration over every cell of the grid.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |row| (0..width).map(move |col| Cell::new(col, row)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }

    /// Unit vector in screen coordinates, rows grow downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

pub struct Snake {
    body: VecDeque<Cell>,
    heading: Direction,
    moved_heading: Direction,
    pending_growth: u32,
}

impl Snake {
    /// Builds a straight snake of `length` cells (at least one) trailing behind `head`.
    pub fn new(head: Cell, length: usize, heading: Direction) -> Self {
        let (dx, dy) = heading.delta();
        let length = i32::try_from(length.max(1)).unwrap_or(i32::MAX);

        let body = (0..length)
            .map(|i| Cell::new(head.col - dx * i, head.row - dy * i))
            .collect();
        Snake { body, heading, moved_heading: heading, pending_growth: 0 }
    }

    /// Builds a snake from explicit cells, head first.
    #[cfg(test)]
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I, heading: Direction) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Snake { body, heading, moved_heading: heading, pending_growth: 0 })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Commits a new heading unless it reverses the last move. Returns whether it was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction.is_opposite(self.moved_heading) {
            return false;
        }
        self.heading = new_direction;
        true
    }

    pub fn next_head(&self) -> Cell {
        self.head().step(self.heading)
    }

    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    /// Moves one cell along the heading and returns the new head.
    pub fn advance(&mut self) -> Cell {
        let new_head = self.next_head();
        self.body.push_front(new_head);
        self.moved_heading = self.heading;

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }
        new_head
    }

    pub fn collides_with_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&cell| cell == head)
    }

    pub fn collides_with_wall(&self, bounds: GridBounds) -> bool {
        !bounds.contains(self.head())
    }

    /// Tail glyph pointing the way the tail moves, `None` for a snake that is only a head.
    pub fn tail_char(&self) -> Option<char> {
        let len = self.body.len();
        if len < 2 {
            return None;
        }
        let (tail, before) = (self.body[len - 1], self.body[len - 2]);
        let ch = match (before.col - tail.col, before.row - tail.row) {
            (0, -1) => '╹',
            (0, 1) => '╻',
            (-1, 0) => '╸',
            _ => '╺',
        };
        Some(ch)
    }

    pub fn head_char(&self) -> char {
        match self.heading {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
