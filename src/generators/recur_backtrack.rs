use rand::{Rng, rngs::StdRng};

use crate::maze::{CellState, Coord, Direction, Grid};

/// Randomized depth-first carving on the even-coordinate lattice.
///
/// Every lattice cell `(even, even)` becomes a path, and each carving step opens
/// the single wall cell between two lattice cells, so corridors always stay one
/// wall apart. The lattice graph is connected and every cell is entered exactly
/// once, which makes the result a spanning tree: a perfect maze.
///
/// Requires the grid to be at least 5x5.
pub fn recursive_backtrack(grid: &mut Grid, rng: &mut StdRng) {
    grid.fill(CellState::Wall);

    // Picking the start among lattice cells keeps (0, 0) on the carved lattice
    let start: Coord = (
        rng.random_range(0..=(grid.rows() - 1) / 2) * 2,
        rng.random_range(0..=(grid.cols() - 1) / 2) * 2,
    );
    grid.set(start, CellState::Path);

    // The stack only holds carved lattice cells
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        let neighbors = get_unvisited_neighbors(cell, grid);

        if neighbors.is_empty() {
            // Dead end, backtrack
            stack.pop();
            continue;
        }

        let neighbor = neighbors[rng.random_range(0..neighbors.len())];
        let wall = (
            cell.0.min(neighbor.0) + cell.0.abs_diff(neighbor.0) / 2,
            cell.1.min(neighbor.1) + cell.1.abs_diff(neighbor.1) / 2,
        );
        grid.set(wall, CellState::Path);
        grid.set(neighbor, CellState::Path);
        stack.push(neighbor);
    }

    let end = (grid.rows() - 1, grid.cols() - 1);
    connect_corner(grid, end);

    grid.set((0, 0), CellState::Start);
    grid.set(end, CellState::End);
}

/// Lattice cells two steps away (up, down, left, right) that are still walls.
fn get_unvisited_neighbors(coord: Coord, grid: &Grid) -> Vec<Coord> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| direction.offset(coord, 2, grid))
        .filter(|&c| grid[c] == CellState::Wall)
        .collect()
}

/// With an even side length the bottom-right corner sits off the lattice and is
/// never carved. Join it to the lattice with a dead-end stub through cells no
/// carving step can reach, so no cycle is introduced.
fn connect_corner(grid: &mut Grid, corner: Coord) {
    if grid[corner] != CellState::Wall {
        return;
    }
    let (row, col) = corner;
    if row % 2 == 1 && col % 2 == 1 {
        // (row - 1, col - 1) is a lattice cell; step right from it, then down
        grid.set((row - 1, col), CellState::Path);
    }
    // Otherwise the corner is directly below or right of a lattice cell
    grid.set(corner, CellState::Path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::get_neighbors;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    fn carve(rows: usize, cols: usize, seed: u64) -> Grid {
        let mut grid = Grid::new(rows, cols, CellState::Path);
        let mut rng = StdRng::seed_from_u64(seed);
        recursive_backtrack(&mut grid, &mut rng);
        grid
    }

    /// Returns (reachable open cells, number of open-open adjacencies).
    fn open_component(grid: &Grid) -> (usize, usize) {
        let start = grid.find(CellState::Start).unwrap();
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for n in get_neighbors(cell, grid) {
                if grid[n].is_traversable() && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        let edges = grid
            .cells()
            .filter(|&(_, s)| s.is_traversable())
            .map(|(c, _)| {
                get_neighbors(c, grid)
                    .filter(|&n| grid[n].is_traversable())
                    .count()
            })
            .sum::<usize>()
            / 2;
        (seen.len(), edges)
    }

    #[test]
    fn test_perfect_maze_odd_and_even_sizes() {
        for (rows, cols) in [(5, 5), (6, 6), (7, 10), (10, 7), (21, 21), (30, 30)] {
            for seed in 0..5 {
                let grid = carve(rows, cols, seed);
                let open = rows * cols - grid.count(CellState::Wall);
                let (reachable, edges) = open_component(&grid);
                // Connected
                assert_eq!(reachable, open, "{rows}x{cols} seed {seed} is disconnected");
                // A connected graph with V - 1 edges is a tree
                assert_eq!(edges, open - 1, "{rows}x{cols} seed {seed} has a cycle");
            }
        }
    }

    #[test]
    fn test_corners_hold_endpoints() {
        for size in 5..12 {
            let grid = carve(size, size, 7);
            assert_eq!(grid[(0, 0)], CellState::Start);
            assert_eq!(grid[(size - 1, size - 1)], CellState::End);
            assert_eq!(grid.count(CellState::Start), 1);
            assert_eq!(grid.count(CellState::End), 1);
        }
    }

    #[test]
    fn test_odd_lattice_cells_stay_walls() {
        let grid = carve(9, 9, 3);
        for row in (1..9).step_by(2) {
            for col in (1..9).step_by(2) {
                assert_eq!(grid[(row, col)], CellState::Wall);
            }
        }
    }
}
