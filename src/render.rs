use crate::apple::Apple;
use crate::config::{Palette, Rgb};
use crate::snake::{Cell, Snake};

pub const SNAKE_BODY_CHAR: char = '█';
pub const APPLE_CHAR: char = '●';
pub const DEAD_SNAKE_CHAR: char = 'X';

/// What gets drawn into a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub color: Rgb,
}

impl Glyph {
    pub fn new(ch: char, color: Rgb) -> Self {
        Glyph { ch, color }
    }
}

/// A grid-addressed drawing surface. Cells outside the surface are ignored.
pub trait Canvas {
    fn fill_cell(&mut self, cell: Cell, glyph: Glyph);
}

pub trait Renderable {
    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette);
}

impl Renderable for Snake {
    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        // Tail first so the head always ends up on top.
        let cells: Vec<&Cell> = self.cells().collect();
        for (i, &&cell) in cells.iter().enumerate().skip(1).rev() {
            let ch = match self.tail_char() {
                Some(tail) if i == cells.len() - 1 => tail,
                _ => SNAKE_BODY_CHAR,
            };
            canvas.fill_cell(cell, Glyph::new(ch, palette.snake));
        }
        canvas.fill_cell(self.head(), Glyph::new(self.head_char(), palette.snake));
    }
}

impl Renderable for Apple {
    fn render(&self, canvas: &mut dyn Canvas, palette: &Palette) {
        canvas.fill_cell(self.cell(), Glyph::new(APPLE_CHAR, palette.apple));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::snake::Direction;

    /// Canvas that remembers the last glyph drawn in every cell.
    #[derive(Default)]
    pub(crate) struct RecordingCanvas {
        pub cells: Vec<(Cell, Glyph)>,
    }

    impl RecordingCanvas {
        pub fn glyph_at(&self, cell: Cell) -> Option<Glyph> {
            self.cells.iter().rev().find(|(c, _)| *c == cell).map(|(_, g)| *g)
        }
    }

    impl Canvas for RecordingCanvas {
        fn fill_cell(&mut self, cell: Cell, glyph: Glyph) {
            self.cells.push((cell, glyph));
        }
    }

    #[test]
    fn snake_draws_head_with_heading_char() {
        let palette = Palette::default();
        let snake = Snake::new(Cell::new(3, 3), 3, Direction::Down);
        let mut canvas = RecordingCanvas::default();
        snake.render(&mut canvas, &palette);

        assert_eq!(canvas.cells.len(), 3);
        assert_eq!(canvas.glyph_at(Cell::new(3, 3)), Some(Glyph::new('v', palette.snake)));
        assert_eq!(canvas.glyph_at(Cell::new(3, 2)), Some(Glyph::new(SNAKE_BODY_CHAR, palette.snake)));
        assert_eq!(canvas.glyph_at(Cell::new(3, 1)), Some(Glyph::new('╻', palette.snake)));
    }

    #[test]
    fn apple_draws_in_apple_color() {
        let palette = Palette::default();
        let mut canvas = RecordingCanvas::default();
        Apple::at(Cell::new(1, 2)).render(&mut canvas, &palette);
        assert_eq!(canvas.glyph_at(Cell::new(1, 2)), Some(Glyph::new(APPLE_CHAR, palette.apple)));
    }
}
