use super::SolveResult;
use crate::maze::{CellState, Coord, Direction, Grid};

/// Stack reserved per open cell. Every frame on the stack holds a distinct marked
/// cell, so the recursion is never deeper than the number of open cells.
const STACK_BYTES_PER_CELL: usize = if cfg!(debug_assertions) { 1024 } else { 512 };
/// Searches needing at most this much stack stay on the calling thread.
const INLINE_STACK_BYTES: usize = 256 * 1024;
/// Headroom on top of the per-cell estimate for the thread itself.
const STACK_BASE_BYTES: usize = 1024 * 1024;

/// How a [`RecursiveSearch`] moves and how it treats dead ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursiveStyle {
    /// Down then right; visited marks are permanent.
    DownRightOnly,
    /// Down, up, right, left; visited marks are permanent.
    AllDirections,
    /// Down, up, right, left; a dead end is unmarked before returning.
    AllDirectionsWithUndo,
}

impl RecursiveStyle {
    fn directions(self) -> &'static [Direction] {
        match self {
            RecursiveStyle::DownRightOnly => &[Direction::Down, Direction::Right],
            RecursiveStyle::AllDirections | RecursiveStyle::AllDirectionsWithUndo => &[
                Direction::Down,
                Direction::Up,
                Direction::Right,
                Direction::Left,
            ],
        }
    }

    fn undo_on_dead_end(self) -> bool {
        self == RecursiveStyle::AllDirectionsWithUndo
    }
}

/// Run a [`RecursiveSearch`] on a thread whose stack is sized for the grid.
///
/// Small grids are searched in place. Larger ones get a dedicated thread with
/// room for one frame per open cell, so no valid grid can overflow the stack.
/// If that thread cannot be spawned the search is skipped and an empty result
/// is returned.
pub fn search_on_sized_stack(
    grid: &Grid,
    start: Coord,
    end: Coord,
    style: RecursiveStyle,
) -> SolveResult {
    let open_cells = grid.rows() * grid.cols() - grid.count(CellState::Wall);
    let needed = open_cells.saturating_mul(STACK_BYTES_PER_CELL);
    if needed <= INLINE_STACK_BYTES {
        return RecursiveSearch::new(grid, end, style).run(start);
    }

    let stack_size = needed.saturating_add(STACK_BASE_BYTES);
    tracing::debug!(
        "[solve] {:?} search over {} open cells on a {} KiB stack",
        style,
        open_cells,
        stack_size / 1024
    );
    std::thread::scope(|scope| {
        let handle = std::thread::Builder::new()
            .name("recursive-search".to_string())
            .stack_size(stack_size)
            .spawn_scoped(scope, || RecursiveSearch::new(grid, end, style).run(start));
        match handle {
            Ok(handle) => handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic)),
            Err(e) => {
                tracing::error!(
                    "[solve] cannot spawn a {} KiB search thread: {}",
                    stack_size / 1024,
                    e
                );
                SolveResult::default()
            }
        }
    })
}

/// Depth-first search whose frontier is the call stack.
///
/// Recursion depth grows with the length of the current path. Callers outside
/// this module go through [`search_on_sized_stack`].
pub struct RecursiveSearch<'a> {
    grid: &'a Grid,
    end: Coord,
    style: RecursiveStyle,
    visited: Vec<Vec<bool>>,
    explored: Vec<Coord>,
    /// Filled end-first while the recursion unwinds
    path: Vec<Coord>,
}

impl<'a> RecursiveSearch<'a> {
    pub fn new(grid: &'a Grid, end: Coord, style: RecursiveStyle) -> Self {
        Self {
            grid,
            end,
            style,
            visited: vec![vec![false; grid.cols()]; grid.rows()],
            explored: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn run(mut self, start: Coord) -> SolveResult {
        if self.find_path(start) {
            self.path.reverse();
        }
        SolveResult::new(self.explored, self.path)
    }

    fn find_path(&mut self, coord: Coord) -> bool {
        let (row, col) = coord;
        if !self.grid[coord].is_traversable() || self.visited[row][col] {
            return false;
        }

        self.visited[row][col] = true;
        self.explored.push(coord);

        if coord == self.end {
            self.path.push(coord);
            return true;
        }

        for &direction in self.style.directions() {
            let Some(next) = direction.offset(coord, 1, self.grid) else {
                continue;
            };
            if self.find_path(next) {
                self.path.push(coord);
                return true;
            }
        }

        if self.style.undo_on_dead_end() {
            self.visited[row][col] = false;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(layout: &str, style: RecursiveStyle) -> SolveResult {
        let grid: Grid = layout.parse().unwrap();
        let start = grid.find(CellState::Start).unwrap();
        let end = grid.find(CellState::End).unwrap();
        RecursiveSearch::new(&grid, end, style).run(start)
    }

    #[test]
    fn test_down_right_only_misses_upward_routes() {
        // The end is reachable, but only by moving up from the start
        let layout = ".....
                      .#E#.
                      .###.
                      .#S..
                      .####";
        let simple = run(layout, RecursiveStyle::DownRightOnly);
        assert!(!simple.is_solution_found());
        assert_eq!(simple.explored_cells(), &[(3, 2), (3, 3), (3, 4)]);

        let full = run(layout, RecursiveStyle::AllDirections);
        assert!(full.is_solution_found());
        assert_eq!(full.solution_path().first(), Some(&(3, 2)));
        assert_eq!(full.solution_path().last(), Some(&(1, 2)));
    }

    #[test]
    fn test_down_right_only_follows_staircase() {
        let layout = "S.###
                      #..##
                      ##..#
                      ###..
                      ####E";
        let result = run(layout, RecursiveStyle::DownRightOnly);
        assert_eq!(
            result.solution_path(),
            &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2), (2, 3), (3, 3), (3, 4), (4, 4)]
        );
    }

    #[test]
    fn test_undo_reenters_dead_ends() {
        // The end hangs above the start, but down is tried first, so the whole
        // lower pocket is searched before the single upward move
        let layout = "#E#
                      .S.
                      ...
                      ...";
        let marked = run(layout, RecursiveStyle::AllDirections);
        assert_eq!(marked.solution_path(), &[(1, 1), (0, 1)]);
        assert_eq!(marked.explored_cells().len(), 10);

        let undo = run(layout, RecursiveStyle::AllDirectionsWithUndo);
        assert_eq!(undo.solution_path(), &[(1, 1), (0, 1)]);
        let unique = undo
            .explored_cells()
            .iter()
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(unique.len(), 10);
        // Pocket cells unmarked after failing are entered again from other parents
        assert!(undo.explored_cells().len() > marked.explored_cells().len());
    }

    #[test]
    fn test_deep_recursion_on_open_board() {
        // Down first: the search snakes through every column before stepping
        // into the corner, so the recursion is about 90k frames deep
        let mut grid = Grid::new(300, 300, CellState::Path);
        grid.set((0, 0), CellState::Start);
        grid.set((299, 299), CellState::End);
        for style in [
            RecursiveStyle::AllDirections,
            RecursiveStyle::AllDirectionsWithUndo,
        ] {
            let result = search_on_sized_stack(&grid, (0, 0), (299, 299), style);
            assert_eq!(result.explored_cells().len(), 299 * 300 + 1, "{style:?}");
            assert_eq!(result.path_length(), 299 * 300 + 1, "{style:?}");
            assert_eq!(result.solution_path().last(), Some(&(299, 299)));
        }
    }

    #[test]
    fn test_small_grids_match_direct_search() {
        let grid: Grid = "S...
                          .##.
                          ...E"
            .parse()
            .unwrap();
        let direct = RecursiveSearch::new(&grid, (2, 3), RecursiveStyle::AllDirections).run((0, 0));
        let sized = search_on_sized_stack(&grid, (0, 0), (2, 3), RecursiveStyle::AllDirections);
        assert_eq!(direct, sized);
    }
}
