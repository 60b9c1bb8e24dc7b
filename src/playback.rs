//! Step-by-step replay of a [`SolveResult`] onto a grid.
//!
//! A solver runs to completion first; the playback then marks one cell per step,
//! first every explored cell as `Visited`, then every solution cell as `Solution`.
//! The controller never sleeps: manual callers step on demand, animated callers
//! step on a timer whose period is reported by [`Playback::tick_interval`].

use std::time::Duration;

use crate::{
    error::{MazeError, Result},
    maze::{CellState, Coord, Grid},
    solvers::{SolveResult, Solver, solve_maze},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No result cached.
    Idle,
    /// Marking explored cells.
    Exploring,
    /// Marking solution cells.
    WalkingSolution,
    /// Nothing left to replay.
    Done,
}

/// Surfaced exactly once, on the step that completes the replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Exploration finished without reaching the end.
    NoSolution,
    /// The whole solution path has been walked.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The cell consumed by this step. `None` when the step was a no-op.
    pub cell: Option<Coord>,
    /// Phase after the step.
    pub phase: Phase,
    pub finished: bool,
    pub solution_found: bool,
    pub notice: Option<Notice>,
}

/// What to solve when a step arrives with nothing cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveRequest {
    pub solver: Solver,
    pub start: Coord,
    pub end: Coord,
}

pub struct Playback {
    phase: Phase,
    result: Option<SolveResult>,
    explore_index: usize,
    solution_index: usize,
    /// Set while a timer drives the replay; manual steps are refused meanwhile
    animating: bool,
    explore_interval: Duration,
    solution_interval: Duration,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(Duration::from_millis(20), Duration::from_millis(50))
    }
}

impl Playback {
    pub fn new(explore_interval: Duration, solution_interval: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            result: None,
            explore_index: 0,
            solution_index: 0,
            animating: false,
            explore_interval,
            solution_interval,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&SolveResult> {
        self.result.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Cache a result and start exploring it. Replaces whatever was cached.
    pub fn load(&mut self, result: SolveResult) {
        self.result = Some(result);
        self.explore_index = 0;
        self.solution_index = 0;
        self.phase = Phase::Exploring;
    }

    /// Manual step. The first step from `Idle` runs the solver described by
    /// `request` and already marks the first explored cell.
    pub fn step(&mut self, grid: &mut Grid, request: &SolveRequest) -> Result<StepOutcome> {
        if self.animating {
            return Err(MazeError::PlaybackBusy);
        }
        if self.phase == Phase::Idle {
            tracing::debug!("[playback] arming with {}", request.solver);
            self.load(solve_maze(grid, request.start, request.end, request.solver));
        }
        Ok(self.advance(grid))
    }

    /// Clear previous marks and let a timer replay `result` through [`Playback::tick`].
    pub fn start_animation(&mut self, grid: &mut Grid, result: SolveResult) -> Result<()> {
        if self.animating {
            return Err(MazeError::PlaybackBusy);
        }
        self.reset(grid);
        self.load(result);
        self.animating = true;
        tracing::debug!("[playback] animation started");
        Ok(())
    }

    /// One timer tick of an animated replay. Returns `None` when no animation runs.
    pub fn tick(&mut self, grid: &mut Grid) -> Option<StepOutcome> {
        if !self.animating {
            return None;
        }
        let outcome = self.advance(grid);
        if outcome.finished {
            self.animating = false;
            tracing::debug!("[playback] animation finished");
        }
        Some(outcome)
    }

    /// Timer period for the next tick: fast while exploring, slower on the solution.
    pub fn tick_interval(&self) -> Option<Duration> {
        if !self.animating {
            return None;
        }
        match self.phase {
            Phase::WalkingSolution => Some(self.solution_interval),
            _ => Some(self.explore_interval),
        }
    }

    /// Drop the cached result and restore every replay mark to `Path`.
    /// Safe to call in any phase, any number of times.
    pub fn reset(&mut self, grid: &mut Grid) {
        let marked = grid
            .cells()
            .filter(|&(_, state)| state.is_replay_mark())
            .map(|(coord, _)| coord)
            .collect::<Vec<_>>();
        for coord in marked {
            grid.set(coord, CellState::Path);
        }
        self.result = None;
        self.explore_index = 0;
        self.solution_index = 0;
        self.animating = false;
        self.phase = Phase::Idle;
    }

    fn advance(&mut self, grid: &mut Grid) -> StepOutcome {
        let Some(result) = self.result.as_ref() else {
            // Nothing cached: nothing to replay
            return self.outcome(None, None);
        };
        let solution_found = result.is_solution_found();

        match self.phase {
            Phase::Exploring => {
                let cell = result.explored_cells().get(self.explore_index).copied();
                if let Some(coord) = cell {
                    self.explore_index += 1;
                    if grid[coord] == CellState::Path {
                        grid.set(coord, CellState::Visited);
                    }
                }

                let mut notice = None;
                if self.explore_index >= result.explored_cells().len() {
                    if solution_found {
                        self.phase = Phase::WalkingSolution;
                    } else {
                        tracing::debug!("[playback] exploration done, no solution");
                        self.phase = Phase::Done;
                        notice = Some(Notice::NoSolution);
                    }
                }
                self.outcome(cell, notice)
            }
            Phase::WalkingSolution => {
                let cell = result.solution_path().get(self.solution_index).copied();
                if let Some(coord) = cell {
                    self.solution_index += 1;
                    if !matches!(grid[coord], CellState::Start | CellState::End) {
                        grid.set(coord, CellState::Solution);
                    }
                }

                let mut notice = None;
                if self.solution_index >= result.solution_path().len() {
                    tracing::debug!("[playback] solution walked");
                    self.phase = Phase::Done;
                    notice = Some(Notice::Finished);
                }
                self.outcome(cell, notice)
            }
            Phase::Idle | Phase::Done => self.outcome(None, None),
        }
    }

    fn outcome(&self, cell: Option<Coord>, notice: Option<Notice>) -> StepOutcome {
        StepOutcome {
            cell,
            phase: self.phase,
            finished: matches!(self.phase, Phase::Done) || self.result.is_none(),
            solution_found: self
                .result
                .as_ref()
                .is_some_and(SolveResult::is_solution_found),
            notice,
        }
    }
}
