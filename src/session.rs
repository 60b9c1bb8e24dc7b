use std::sync::mpsc::Sender;

use crate::{
    config::Config,
    error::{MazeError, Result},
    generators::{self, Generator},
    maze::{CellState, Coord, Grid, GridEvent},
    playback::{Phase, Playback, SolveRequest, StepOutcome},
    results::AlgorithmResult,
    solvers::{SolveResult, Solver, timed_solve},
};

/// Exclusive owner of one grid. Generating, editing, solving and replaying all go
/// through the session, so only one of them touches the grid at a time.
pub struct Session {
    grid: Grid,
    start: Option<Coord>,
    end: Option<Coord>,
    solver: Solver,
    playback: Playback,
}

impl Session {
    /// Empty editing board: every cell open, no endpoints.
    pub fn new(rows: usize, cols: usize, config: &Config) -> Result<Self> {
        generators::validate_size(rows, cols)?;
        Ok(Self::from_grid(Grid::new(rows, cols, CellState::Path), config))
    }

    /// Wrap an existing grid, picking up its `Start` and `End` cells if present.
    pub fn from_grid(grid: Grid, config: &Config) -> Self {
        Self {
            start: grid.find(CellState::Start),
            end: grid.find(CellState::End),
            grid,
            solver: Solver::default(),
            playback: Playback::new(config.explore_interval, config.solution_interval),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn phase(&self) -> Phase {
        self.playback.phase()
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Forward every grid change, including those of future regenerated mazes.
    pub fn observe(&mut self, sender: Sender<GridEvent>) {
        self.grid.observe(sender);
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.playback.is_animating() {
            Err(MazeError::PlaybackBusy)
        } else {
            Ok(())
        }
    }

    fn ensure_in_bounds(&self, coord: Coord) -> Result<()> {
        if self.grid.is_in_bounds(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds(coord))
        }
    }

    /// Replace the board with a fresh `size x size` maze.
    pub fn generate(&mut self, size: usize, seed: Option<u64>) -> Result<()> {
        self.ensure_idle()?;
        let mut grid = generators::generate_maze(size, size, Generator::default(), seed)?;
        if let Some(sender) = self.grid.take_observer() {
            grid.observe(sender);
        }
        self.start = grid.find(CellState::Start);
        self.end = grid.find(CellState::End);
        self.grid = grid;
        self.playback.reset(&mut self.grid);
        tracing::info!("[session] new {}x{} maze", size, size);
        Ok(())
    }

    pub fn set_start(&mut self, coord: Coord) -> Result<()> {
        self.ensure_idle()?;
        self.ensure_in_bounds(coord)?;
        self.playback.reset(&mut self.grid);
        if let Some(old) = self.start.take() {
            if self.grid[old] == CellState::Start {
                self.grid.set(old, CellState::Path);
            }
        }
        if self.end == Some(coord) {
            self.end = None;
        }
        self.grid.set(coord, CellState::Start);
        self.start = Some(coord);
        Ok(())
    }

    pub fn set_end(&mut self, coord: Coord) -> Result<()> {
        self.ensure_idle()?;
        self.ensure_in_bounds(coord)?;
        self.playback.reset(&mut self.grid);
        if let Some(old) = self.end.take() {
            if self.grid[old] == CellState::End {
                self.grid.set(old, CellState::Path);
            }
        }
        if self.start == Some(coord) {
            self.start = None;
        }
        self.grid.set(coord, CellState::End);
        self.end = Some(coord);
        Ok(())
    }

    /// Flip an open cell to a wall or back. Endpoints are left alone.
    /// Returns the state of the cell afterwards.
    pub fn toggle_wall(&mut self, coord: Coord) -> Result<CellState> {
        self.ensure_idle()?;
        self.ensure_in_bounds(coord)?;
        self.playback.reset(&mut self.grid);
        let new = match self.grid[coord] {
            CellState::Path => CellState::Wall,
            CellState::Wall => CellState::Path,
            other => other,
        };
        self.grid.set(coord, new);
        Ok(new)
    }

    /// Open every cell and forget the endpoints.
    pub fn clear_board(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.playback.reset(&mut self.grid);
        self.grid.fill(CellState::Path);
        self.start = None;
        self.end = None;
        Ok(())
    }

    /// Stop any replay and remove its marks. Always allowed.
    pub fn clear_solution(&mut self) {
        self.playback.reset(&mut self.grid);
    }

    pub fn select_solver(&mut self, solver: Solver) -> Result<()> {
        self.ensure_idle()?;
        if solver != self.solver {
            self.playback.reset(&mut self.grid);
            self.solver = solver;
        }
        Ok(())
    }

    fn request(&self) -> Result<SolveRequest> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(SolveRequest {
                solver: self.solver,
                start,
                end,
            }),
            _ => Err(MazeError::MissingEndpoints),
        }
    }

    /// Run the selected solver to completion without touching the board.
    pub fn solve(&self) -> Result<(SolveResult, AlgorithmResult)> {
        let request = self.request()?;
        let (result, elapsed) = timed_solve(&self.grid, request.start, request.end, request.solver);
        let record = AlgorithmResult::new(request.solver.name(), elapsed, result.path_length());
        tracing::info!(
            "[session] {} took {:?}, path length {}",
            request.solver,
            elapsed,
            result.path_length()
        );
        Ok((result, record))
    }

    /// Advance the manual replay by one cell.
    pub fn step(&mut self) -> Result<StepOutcome> {
        self.ensure_idle()?;
        let request = self.request()?;
        self.playback.step(&mut self.grid, &request)
    }

    /// Solve with timing, then hand the result to the animated replay.
    pub fn start_animation(&mut self) -> Result<AlgorithmResult> {
        self.ensure_idle()?;
        let (result, record) = self.solve()?;
        self.playback.start_animation(&mut self.grid, result)?;
        Ok(record)
    }

    /// One timer tick of the animated replay.
    pub fn tick(&mut self) -> Option<StepOutcome> {
        self.playback.tick(&mut self.grid)
    }
}
