use std::{
    io::{Stdout, Write},
    sync::mpsc::Receiver,
};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::maze::{CellState, Coord, Grid, GridEvent};

/// Draws grid events as they arrive and keeps a few status rows under the grid.
pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Current grid dimensions (rows, cols)
    grid_dims: Option<(usize, usize)>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Rows reserved under the grid for status and help text
    pub const NUM_STATUS_ROWS: u16 = 3;

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            grid_dims: None,
        }
    }

    fn to_screen(coord: Coord) -> (u16, u16) {
        let x = u16::try_from(coord.1).unwrap_or(u16::MAX / CellState::CELL_WIDTH);
        let y = u16::try_from(coord.0).unwrap_or(u16::MAX);
        (x.saturating_mul(CellState::CELL_WIDTH), y)
    }

    fn status_row(&self) -> u16 {
        self.grid_dims
            .map_or(0, |(rows, _)| u16::try_from(rows).unwrap_or(u16::MAX))
    }

    /// Whether the terminal can show a `rows x cols` grid plus the status rows.
    pub fn fits(rows: usize, cols: usize) -> std::io::Result<bool> {
        Ok(Renderer::fits_within(rows, cols, terminal::size()?))
    }

    fn fits_within(rows: usize, cols: usize, (term_width, term_height): (u16, u16)) -> bool {
        cols * CellState::CELL_WIDTH as usize <= term_width as usize
            && rows + Renderer::NUM_STATUS_ROWS as usize <= term_height as usize
    }

    /// Render every pending grid event without blocking.
    pub fn drain(&mut self, grid_event_rx: &Receiver<GridEvent>) -> std::io::Result<()> {
        let mut dirty = false;
        for event in grid_event_rx.try_iter() {
            self.render_grid_event(&event)?;
            dirty = true;
        }
        if dirty {
            self.stdout.flush()?;
        }
        Ok(())
    }

    fn render_grid_event(&mut self, event: &GridEvent) -> std::io::Result<()> {
        match *event {
            GridEvent::Initial { rows, cols, fill } => {
                self.grid_dims = Some((rows, cols));
                queue!(
                    self.stdout,
                    terminal::Clear(ClearType::All),
                    cursor::MoveTo(0, 0)
                )?;
                for row in 0..rows {
                    queue!(self.stdout, cursor::MoveTo(0, Renderer::to_screen((row, 0)).1))?;
                    for _col in 0..cols {
                        queue!(self.stdout, style::Print(fill))?;
                    }
                }
            }
            GridEvent::Update { coord, new, .. } => {
                // Skip updates that arrive before the grid dimensions are known
                if self.grid_dims.is_some() {
                    let (x, y) = Renderer::to_screen(coord);
                    queue!(self.stdout, cursor::MoveTo(x, y), style::Print(new))?;
                }
            }
        }
        Ok(())
    }

    /// Repaint a single cell, e.g. where the edit cursor just left.
    pub fn draw_cell(&mut self, coord: Coord, state: CellState) -> std::io::Result<()> {
        let (x, y) = Renderer::to_screen(coord);
        queue!(self.stdout, cursor::MoveTo(x, y), style::Print(state))?;
        self.stdout.flush()
    }

    /// Paint the edit cursor over a cell, in reverse video.
    pub fn draw_cursor(&mut self, coord: Coord, state: CellState) -> std::io::Result<()> {
        let (x, y) = Renderer::to_screen(coord);
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            style::SetAttribute(Attribute::Reverse),
            style::Print(state),
            style::SetAttribute(Attribute::NoReverse)
        )?;
        self.stdout.flush()
    }

    /// Repaint the whole grid, e.g. after a terminal resize.
    pub fn redraw(&mut self, grid: &Grid) -> std::io::Result<()> {
        self.grid_dims = Some((grid.rows(), grid.cols()));
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        for row in 0..grid.rows() {
            queue!(self.stdout, cursor::MoveTo(0, Renderer::to_screen((row, 0)).1))?;
            for col in 0..grid.cols() {
                queue!(self.stdout, style::Print(grid[(row, col)]))?;
            }
        }
        self.stdout.flush()
    }

    /// Write the status rows below the grid, each cut to the terminal width.
    pub fn status(&mut self, message: &str, help: &str) -> std::io::Result<()> {
        let width = terminal::size().map_or(80, |(w, _)| w) as usize;
        let row = self.status_row();
        let (message, _) = message.unicode_truncate(width);
        let (help, _) = help.unicode_truncate(width);
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::FromCursorDown),
            style::PrintStyledContent(message.with(Color::Yellow).attribute(Attribute::Bold)),
            cursor::MoveTo(0, row.saturating_add(1)),
            style::PrintStyledContent(help.with(Color::DarkGrey)),
        )?;
        self.stdout.flush()
    }

    /// Show a multi-line text block (e.g. the results table) over the grid until
    /// the next redraw.
    pub fn overlay(&mut self, text: &str) -> std::io::Result<()> {
        let width = terminal::size().map_or(80, |(w, _)| w) as usize;
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for line in text.lines() {
            let (line, _) = line.unicode_truncate(width);
            queue!(self.stdout, style::Print(line), style::Print("\r\n"))?;
        }
        queue!(
            self.stdout,
            style::PrintStyledContent(
                "Press any key to return to the maze...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            )
        )?;
        self.stdout.flush()
    }
}
