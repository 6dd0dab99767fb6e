use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::snake::{Cell, GridBounds};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Apple {
    cell: Cell,
}

impl Apple {
    pub fn at(cell: Cell) -> Self {
        Apple { cell }
    }

    /// Places an apple on a random free cell, or `None` if every cell is occupied.
    pub fn spawn<'a, I, R>(occupied: I, bounds: GridBounds, rng: &mut R) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Cell>,
        R: Rng + ?Sized,
    {
        random_free_cell(occupied, bounds, rng).map(Apple::at)
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Moves the apple to a uniformly chosen free cell and returns it.
    /// With no free cell left the apple stays where it is and `None` is returned.
    pub fn respawn<'a, I, R>(&mut self, occupied: I, bounds: GridBounds, rng: &mut R) -> Option<Cell>
    where
        I: IntoIterator<Item = &'a Cell>,
        R: Rng + ?Sized,
    {
        let cell = random_free_cell(occupied, bounds, rng)?;
        self.cell = cell;
        Some(cell)
    }
}

fn random_free_cell<'a, I, R>(occupied: I, bounds: GridBounds, rng: &mut R) -> Option<Cell>
where
    I: IntoIterator<Item = &'a Cell>,
    R: Rng + ?Sized,
{
    let taken: HashSet<Cell> = occupied.into_iter().copied().collect();
    let choices: Vec<Cell> = bounds.cells().filter(|cell| !taken.contains(cell)).collect();
    choices.choose(rng).copied()
}
