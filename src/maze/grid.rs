use std::sync::mpsc::Sender;

use super::Coord;
use super::cell::CellState;

/// A change notification emitted by a [`Grid`] that carries an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// The grid was (re)built with every cell set to `fill`.
    Initial {
        rows: usize,
        cols: usize,
        fill: CellState,
    },
    /// A single cell changed state.
    Update {
        coord: Coord,
        old: CellState,
        new: CellState,
    },
}

/// Row-major `rows x cols` storage of cell states.
pub struct Grid {
    data: Box<[CellState]>,
    rows: usize,
    cols: usize,
    sender: Option<Sender<GridEvent>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize, fill: CellState) -> Self {
        Grid {
            data: vec![fill; rows * cols].into_boxed_slice(),
            rows,
            cols,
            sender: None,
        }
    }

    /// Attach an observer. The observer first receives a snapshot of the whole
    /// grid (one `Initial` event followed by an `Update` per cell that differs
    /// from the fill), then every subsequent change.
    pub fn observe(&mut self, sender: Sender<GridEvent>) {
        let fill = CellState::Wall;
        // Observer may already be gone; nothing to do then
        let _ = sender.send(GridEvent::Initial {
            rows: self.rows,
            cols: self.cols,
            fill,
        });
        for (coord, state) in self.cells() {
            if state != fill {
                let _ = sender.send(GridEvent::Update {
                    coord,
                    old: fill,
                    new: state,
                });
            }
        }
        self.sender = Some(sender);
    }

    /// Hand the observer over to another grid, e.g. when a new maze replaces this one.
    pub fn take_observer(&mut self) -> Option<Sender<GridEvent>> {
        self.sender.take()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        coord.0 * self.cols + coord.1
    }

    pub fn get(&self, coord: Coord) -> Option<CellState> {
        if self.is_in_bounds(coord) {
            Some(self.data[self.ravel_index(coord)])
        } else {
            None
        }
    }

    /// Set the state of a cell and return its previous state.
    /// Panics if `coord` is out of bounds.
    pub fn set(&mut self, coord: Coord, state: CellState) -> CellState {
        let idx = self.ravel_index(coord);
        let old = self.data[idx];
        if old != state {
            self.data[idx] = state;
            if let Some(sender) = &self.sender {
                let _ = sender.send(GridEvent::Update {
                    coord,
                    old,
                    new: state,
                });
            }
        }
        old
    }

    /// Set every cell to `state`.
    pub fn fill(&mut self, state: CellState) {
        (0..self.rows).for_each(|row| {
            (0..self.cols).for_each(|col| {
                self.set((row, col), state);
            })
        });
    }

    /// Iterate over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, CellState)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &state)| ((i / self.cols, i % self.cols), state))
    }

    /// First coordinate (row-major) holding `state`.
    pub fn find(&self, state: CellState) -> Option<Coord> {
        self.cells()
            .find(|&(_, cell)| cell == state)
            .map(|(coord, _)| coord)
    }

    pub fn count(&self, state: CellState) -> usize {
        self.data.iter().filter(|&&cell| cell == state).count()
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = CellState;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.data[self.ravel_index(index)]
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish_non_exhaustive()
    }
}

/// Unstyled dump, one line per row.
impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                write!(f, "{}", self[(row, col)].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Grid {
    type Err = crate::error::MazeError;

    /// Parse a layout made of [`CellState::symbol`] characters, one row per line.
    /// Blank lines and surrounding whitespace are ignored. At most one `S` and
    /// one `E` may appear.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use crate::error::MazeError;

        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());
        if rows == 0 || cols == 0 {
            return Err(MazeError::MalformedLayout("layout is empty".to_string()));
        }

        let mut grid = Grid::new(rows, cols, CellState::Path);
        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(MazeError::MalformedLayout(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.chars().count(),
                    cols
                )));
            }
            for (col, symbol) in line.chars().enumerate() {
                let state = CellState::from_symbol(symbol).ok_or_else(|| {
                    MazeError::MalformedLayout(format!(
                        "unknown symbol {:?} at ({}, {})",
                        symbol, row, col
                    ))
                })?;
                if matches!(state, CellState::Start | CellState::End) {
                    if let Some(first) = grid.find(state) {
                        return Err(MazeError::MalformedLayout(format!(
                            "second {:?} at ({}, {}), first at {:?}",
                            state, row, col, first
                        )));
                    }
                }
                grid.set((row, col), state);
            }
        }
        Ok(grid)
    }
}
