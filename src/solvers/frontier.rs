use std::collections::{HashMap, VecDeque};

use super::SolveResult;
use crate::maze::{Coord, Grid, get_neighbors};

/// Pending cells of a graph search. The pop order decides the traversal.
pub trait Frontier: Default {
    fn push(&mut self, coord: Coord);
    fn pop(&mut self) -> Option<Coord>;
}

/// First in, first out: breadth-first.
impl Frontier for VecDeque<Coord> {
    fn push(&mut self, coord: Coord) {
        self.push_back(coord);
    }

    fn pop(&mut self) -> Option<Coord> {
        self.pop_front()
    }
}

/// Last in, first out: depth-first.
impl Frontier for Vec<Coord> {
    fn push(&mut self, coord: Coord) {
        Vec::push(self, coord);
    }

    fn pop(&mut self) -> Option<Coord> {
        Vec::pop(self)
    }
}

/// Generic frontier search over traversable cells.
///
/// A cell enters the frontier at most once: the parent map doubles as the
/// "already discovered" set, so the exploration trace never repeats a cell.
pub fn frontier_search<F: Frontier>(grid: &Grid, start: Coord, end: Coord) -> SolveResult {
    if !grid[start].is_traversable() {
        return SolveResult::default();
    }

    let mut frontier = F::default();
    frontier.push(start);

    // Maps a discovered cell to the cell it was discovered from
    let mut parents: HashMap<Coord, Option<Coord>> = HashMap::from([(start, None)]);
    let mut explored = Vec::new();
    let mut found = false;

    while let Some(current) = frontier.pop() {
        explored.push(current);

        if current == end {
            found = true;
            break;
        }

        let neighbors = get_neighbors(current, grid)
            .filter(|&n| grid[n].is_traversable() && !parents.contains_key(&n))
            .collect::<Vec<_>>();
        for neighbor in neighbors {
            parents.insert(neighbor, Some(current));
            frontier.push(neighbor);
        }
    }

    let solution = if found {
        reconstruct_path(&parents, end)
    } else {
        Vec::new()
    };
    SolveResult::new(explored, solution)
}

/// Walk the parent links back from `end` and return the path start-first.
fn reconstruct_path(parents: &HashMap<Coord, Option<Coord>>, end: Coord) -> Vec<Coord> {
    let mut path = vec![end];
    let mut step = end;
    while let Some(&Some(parent)) = parents.get(&step) {
        path.push(parent);
        step = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::CellState;

    #[test]
    fn test_bfs_visits_by_distance() {
        let grid = Grid::new(5, 5, CellState::Path);
        let result = frontier_search::<VecDeque<Coord>>(&grid, (2, 2), (0, 0));
        let explored = result.explored_cells();
        // Start, then its four neighbors in up/down/left/right order
        assert_eq!(&explored[..5], &[(2, 2), (1, 2), (3, 2), (2, 1), (2, 3)]);
        // Manhattan distance never decreases along the trace
        let dist = |c: &Coord| c.0.abs_diff(2) + c.1.abs_diff(2);
        assert!(explored.windows(2).all(|w| dist(&w[0]) <= dist(&w[1])));
        assert_eq!(result.path_length(), 5);
    }

    #[test]
    fn test_dfs_follows_last_discovered() {
        let grid = Grid::new(5, 5, CellState::Path);
        let result = frontier_search::<Vec<Coord>>(&grid, (2, 2), (4, 4));
        let explored = result.explored_cells();
        // Right is pushed last, so it is popped first
        assert_eq!(&explored[..3], &[(2, 2), (2, 3), (2, 4)]);
        assert!(result.is_solution_found());
    }

    #[test]
    fn test_wall_start_explores_nothing() {
        let mut grid = Grid::new(5, 5, CellState::Path);
        grid.set((0, 0), CellState::Wall);
        let result = frontier_search::<VecDeque<Coord>>(&grid, (0, 0), (4, 4));
        assert!(result.explored_cells().is_empty());
        assert!(!result.is_solution_found());
    }

    #[test]
    fn test_reconstruct_path() {
        let parents = HashMap::from([
            ((0, 0), None),
            ((0, 1), Some((0, 0))),
            ((1, 1), Some((0, 1))),
        ]);
        assert_eq!(reconstruct_path(&parents, (1, 1)), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(reconstruct_path(&parents, (0, 0)), vec![(0, 0)]);
    }
}
