use std::time::{Duration, Instant};

mod frontier;
mod recursive;

use frontier::frontier_search;
use recursive::{RecursiveStyle, search_on_sized_stack};

use crate::{
    error::MazeError,
    maze::{Coord, Grid},
};

/// The outcome of one solver run: every cell the search touched, in order, and the
/// path from start to end (inclusive). The path is empty when the end is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveResult {
    explored_cells: Vec<Coord>,
    solution_path: Vec<Coord>,
}

impl SolveResult {
    pub fn new(explored_cells: Vec<Coord>, solution_path: Vec<Coord>) -> Self {
        Self {
            explored_cells,
            solution_path,
        }
    }

    pub fn explored_cells(&self) -> &[Coord] {
        &self.explored_cells
    }

    pub fn solution_path(&self) -> &[Coord] {
        &self.solution_path
    }

    pub fn is_solution_found(&self) -> bool {
        !self.solution_path.is_empty()
    }

    /// Number of cells on the solution path, 0 if there is none.
    pub fn path_length(&self) -> usize {
        self.solution_path.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Solver {
    /// FIFO frontier. Shortest path in cells.
    #[default]
    Bfs,
    /// LIFO frontier. Some path, usually not the shortest.
    Dfs,
    /// Recursion trying only down then right, with permanent visited marks.
    /// Misses any end that needs an upward or leftward move.
    RecursiveSimple,
    /// Recursion in all four directions with permanent visited marks.
    RecursiveFull,
    /// Recursion in all four directions that clears a cell's visited mark when
    /// it turns out to be a dead end, so it can be re-entered from another parent.
    RecursiveFullBacktrack,
}

impl Solver {
    pub const ALL: [Solver; 5] = [
        Solver::Bfs,
        Solver::Dfs,
        Solver::RecursiveSimple,
        Solver::RecursiveFull,
        Solver::RecursiveFullBacktrack,
    ];

    /// Name used in menus and in persisted result records.
    pub fn name(self) -> &'static str {
        match self {
            Solver::Bfs => "BFS",
            Solver::Dfs => "DFS",
            Solver::RecursiveSimple => "Recursive",
            Solver::RecursiveFull => "Recursive Full",
            Solver::RecursiveFullBacktrack => "Recursive Full BT",
        }
    }

    /// The next solver in menu order, wrapping around.
    pub fn next(self) -> Solver {
        let idx = Solver::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Solver::ALL[(idx + 1) % Solver::ALL.len()]
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Solver {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "bfs" => Ok(Solver::Bfs),
            "dfs" => Ok(Solver::Dfs),
            "recursive" | "recursive simple" => Ok(Solver::RecursiveSimple),
            "recursive full" => Ok(Solver::RecursiveFull),
            "recursive full bt" | "recursive full backtrack" => {
                Ok(Solver::RecursiveFullBacktrack)
            }
            _ => Err(MazeError::UnknownSolver(s.to_string())),
        }
    }
}

/// Run `solver` from `start` to `end`. The grid is only read.
///
/// A start or end outside the grid yields an empty result; locating the
/// endpoints is the caller's job.
pub fn solve_maze(grid: &Grid, start: Coord, end: Coord, solver: Solver) -> SolveResult {
    if !grid.is_in_bounds(start) || !grid.is_in_bounds(end) {
        tracing::debug!(
            "[solve] {} skipped: endpoint {:?} -> {:?} outside {}x{} grid",
            solver,
            start,
            end,
            grid.rows(),
            grid.cols()
        );
        return SolveResult::default();
    }

    let result = match solver {
        Solver::Bfs => frontier_search::<std::collections::VecDeque<Coord>>(grid, start, end),
        Solver::Dfs => frontier_search::<Vec<Coord>>(grid, start, end),
        Solver::RecursiveSimple => {
            search_on_sized_stack(grid, start, end, RecursiveStyle::DownRightOnly)
        }
        Solver::RecursiveFull => {
            search_on_sized_stack(grid, start, end, RecursiveStyle::AllDirections)
        }
        Solver::RecursiveFullBacktrack => {
            search_on_sized_stack(grid, start, end, RecursiveStyle::AllDirectionsWithUndo)
        }
    };

    tracing::debug!(
        "[solve] {} explored {} cells, path length {}",
        solver,
        result.explored_cells().len(),
        result.path_length()
    );
    result
}

/// [`solve_maze`] plus the wall-clock time the search took.
pub fn timed_solve(
    grid: &Grid,
    start: Coord,
    end: Coord,
    solver: Solver,
) -> (SolveResult, Duration) {
    let started = Instant::now();
    let result = solve_maze(grid, start, end, solver);
    (result, started.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{CellState, is_adjacent};

    /// 5x5 open board with a wall column at col 2, rows 0..=3.
    fn gap_grid() -> Grid {
        "S.#.E
         ..#..
         ..#..
         ..#..
         ....."
            .parse()
            .unwrap()
    }

    fn assert_valid_path(result: &SolveResult, start: Coord, end: Coord, grid: &Grid) {
        let path = result.solution_path();
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for pair in path.windows(2) {
            assert!(is_adjacent(pair[0], pair[1]), "{:?} not adjacent", pair);
        }
        for &cell in path {
            assert!(grid[cell].is_traversable());
        }
    }

    #[test]
    fn test_bfs_goes_around_the_gap() {
        let grid = gap_grid();
        let result = solve_maze(&grid, (0, 0), (0, 4), Solver::Bfs);
        assert!(result.is_solution_found());
        assert_valid_path(&result, (0, 0), (0, 4), &grid);
        // Down 4, right 4, up 4: 13 cells
        assert_eq!(result.path_length(), 13);

        // The gap row is explored before the end is reached
        let explored = result.explored_cells();
        let gap = explored.iter().position(|&c| c == (4, 2)).unwrap();
        let end = explored.iter().position(|&c| c == (0, 4)).unwrap();
        assert!(gap < end);
        assert_eq!(explored.last(), Some(&(0, 4)));
    }

    #[test]
    fn test_complete_solvers_find_a_path() {
        let grid = gap_grid();
        for solver in [Solver::Bfs, Solver::Dfs, Solver::RecursiveFull, Solver::RecursiveFullBacktrack] {
            let result = solve_maze(&grid, (0, 0), (0, 4), solver);
            assert!(result.is_solution_found(), "{solver} found no path");
            assert_valid_path(&result, (0, 0), (0, 4), &grid);
        }
    }

    #[test]
    fn test_explored_cells_are_unique_for_marking_solvers() {
        let grid = gap_grid();
        for solver in [Solver::Bfs, Solver::Dfs, Solver::RecursiveSimple, Solver::RecursiveFull] {
            let result = solve_maze(&grid, (0, 0), (0, 4), solver);
            let unique = result
                .explored_cells()
                .iter()
                .collect::<std::collections::HashSet<_>>();
            assert_eq!(unique.len(), result.explored_cells().len(), "{solver}");
        }
    }

    #[test]
    fn test_start_equals_end() {
        let grid = gap_grid();
        for solver in Solver::ALL {
            let result = solve_maze(&grid, (2, 1), (2, 1), solver);
            assert_eq!(result.explored_cells(), &[(2, 1)], "{solver}");
            assert_eq!(result.solution_path(), &[(2, 1)], "{solver}");
        }
    }

    #[test]
    fn test_unreachable_end() {
        let grid: Grid = "S.#..
                          ..#..
                          ###..
                          ....E
                          ....."
            .parse()
            .unwrap();
        for solver in Solver::ALL {
            let result = solve_maze(&grid, (0, 0), (3, 4), solver);
            assert!(!result.is_solution_found(), "{solver}");
            assert!(result.solution_path().is_empty());
            assert!(!result.explored_cells().is_empty());
        }
        // BFS and DFS touch exactly the start's enclosure
        let result = solve_maze(&grid, (0, 0), (3, 4), Solver::Bfs);
        assert_eq!(result.explored_cells().len(), 4);
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = gap_grid();
        for solver in Solver::ALL {
            let result = solve_maze(&grid, (0, 0), (9, 9), solver);
            assert!(result.explored_cells().is_empty());
            assert!(result.solution_path().is_empty());
        }
    }

    #[test]
    fn test_solvers_ignore_replay_marks() {
        let mut grid = gap_grid();
        grid.set((4, 2), CellState::Visited);
        grid.set((3, 1), CellState::Solution);
        let result = solve_maze(&grid, (0, 0), (0, 4), Solver::Bfs);
        assert_eq!(result.path_length(), 13);
    }

    #[test]
    fn test_solver_names() {
        for solver in Solver::ALL {
            assert_eq!(solver.name().parse::<Solver>().unwrap(), solver);
        }
        assert_eq!("recursive-full-bt".parse::<Solver>().unwrap(), Solver::RecursiveFullBacktrack);
        assert!(matches!("astar".parse::<Solver>(), Err(MazeError::UnknownSolver(_))));
        assert_eq!(Solver::RecursiveFullBacktrack.next(), Solver::Bfs);
    }
}
