use crate::{Coords, TermInt};
use crate::config::{Palette, Rgb};
use crate::render::{Canvas, Glyph, DEAD_SNAKE_CHAR, SNAKE_BODY_CHAR};
use crate::snake::{Cell, GridBounds};

use std::convert::TryFrom;
use std::io::{Stdout, Write, stdout};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// Terminal columns used to draw one grid cell, so cells come out roughly square.
const CELL_COLUMNS: TermInt = 2;

pub struct TermManager {
    stdout: Stdout,
    grid: GridBounds,
    palette: Palette,
    /// Top-left corner of the border around the playfield.
    origin: Coords,
    /// Playfield size in terminal cells, border included.
    size: Coords,
    frame: Vec<Option<Glyph>>,
    shown: Vec<Option<Glyph>>,
    redraw_all: bool,
}

impl TermManager {
    pub fn new(grid: GridBounds, palette: Palette) -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read terminal size")?;
        let (needed_w, needed_h) = match required_size(grid) {
            Some(size) => size,
            None => bail!("A {}x{} grid is too large for any terminal", grid.width, grid.height),
        };

        if width < needed_w || height < needed_h {
            bail!(
                "Terminal is {}x{} but a {}x{} grid needs at least {}x{}",
                width, height, grid.width, grid.height, needed_w, needed_h
            );
        }

        let origin = ((width - needed_w) / 2, (height - needed_h) / 2);
        let cells = grid.area();
        Ok(TermManager {
            stdout: stdout(),
            grid,
            palette,
            origin,
            size: (needed_w, needed_h),
            frame: vec![None; cells],
            shown: vec![None; cells],
            redraw_all: true,
        })
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read().context("Failed to read input")? {
                return Ok(ev);
            }
        }
    }

    /// Every key event that is already waiting, without blocking.
    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0)).context("Failed to poll input")? {
            if let Event::Key(ev) = read().context("Failed to read input")? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    /// Paints the whole screen with the background color and draws the border.
    pub fn clear(&mut self) -> Result<()> {
        let bg = color(self.palette.background);
        queue!(self.stdout, style::SetBackgroundColor(bg)).context("Failed to set background")?;
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Failed to clear terminal")?;
        self.draw_borders()?;
        self.redraw_all = true;
        Ok(())
    }

    pub fn begin_frame(&mut self) {
        for slot in self.frame.iter_mut() {
            *slot = None;
        }
    }

    /// Writes the cells that changed since the last frame and flushes.
    pub fn present(&mut self) -> Result<()> {
        for (i, cell) in self.grid.cells().enumerate() {
            let glyph = self.frame[i];
            if self.redraw_all || glyph != self.shown[i] {
                self.draw_cell(cell, glyph)?;
            }
        }

        self.shown.copy_from_slice(&self.frame);
        self.redraw_all = false;
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush terminal")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) -> Result<()> {
        let (needed_w, needed_h) = self.size;
        let (left, top) = self.origin;
        let (right, bottom) = (left + needed_w - 1, top + needed_h - 1);

        let fg = color(self.palette.border);
        let bg = color(self.palette.background);
        queue!(self.stdout, style::SetForegroundColor(fg), style::SetBackgroundColor(bg))
            .context("Failed to set border color")?;

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        self.flush()
    }

    fn draw_cell(&mut self, cell: Cell, glyph: Option<Glyph>) -> Result<()> {
        let pos = self.screen_pos(cell);
        let (text, fg) = match glyph {
            Some(Glyph { ch, color: fg }) if ch == SNAKE_BODY_CHAR || ch == DEAD_SNAKE_CHAR => {
                (format!("{}{}", ch, ch), fg)
            }
            Some(Glyph { ch, color: fg }) => (format!("{} ", ch), fg),
            None => ("  ".to_string(), self.palette.background),
        };
        let fg = color(fg);
        let bg = color(self.palette.background);

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(bg),
            style::Print(text)
        )
        .context("Failed to draw cell")
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch)).context("Failed to draw border")
    }

    fn screen_pos(&self, cell: Cell) -> Coords {
        // one column and one row of border before the first cell
        (
            self.origin.0 + 1 + cell.col as TermInt * CELL_COLUMNS,
            self.origin.1 + 1 + cell.row as TermInt,
        )
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.grid.contains(cell) {
            Some(cell.row as usize * self.grid.width as usize + cell.col as usize)
        } else {
            None
        }
    }
}

/// Switching the terminal into game mode and back.
pub trait Session {
    fn setup(&mut self, caption: &str) -> Result<()>;
    fn restore(&mut self) -> Result<()>;
}

impl Session for TermManager {
    fn setup(&mut self, caption: &str) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(caption))
            .context("Failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Failed to hide cursor")?;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        Ok(())
    }
}

impl Canvas for TermManager {
    fn fill_cell(&mut self, cell: Cell, glyph: Glyph) {
        if let Some(i) = self.index(cell) {
            self.frame[i] = Some(glyph);
        }
    }
}

/// Terminal size needed for a grid plus its border, `None` if it does not fit in terminal coordinates.
pub fn required_size(grid: GridBounds) -> Option<Coords> {
    let width = u32::try_from(grid.width).ok()?
        .checked_mul(u32::from(CELL_COLUMNS))?
        .checked_add(2)?;
    let height = u32::try_from(grid.height).ok()?.checked_add(2)?;
    Some((TermInt::try_from(width).ok()?, TermInt::try_from(height).ok()?))
}

fn color(rgb: Rgb) -> style::Color {
    let [r, g, b] = rgb;
    style::Color::Rgb { r, g, b }
}
