pub mod cell;
pub mod grid;

pub use cell::CellState;
pub use grid::{Grid, GridEvent};

/// A cell coordinate as `(row, col)`. Coordinates, not cell states, identify cells,
/// so they are used directly as set and map keys.
pub type Coord = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor order used by the frontier searches.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Move `steps` cells from `coord`. Returns `None` when the move leaves the grid.
    pub fn offset(self, coord: Coord, steps: usize, grid: &Grid) -> Option<Coord> {
        let (row, col) = coord;
        let next = match self {
            Direction::Up => (row.checked_sub(steps)?, col),
            Direction::Down => (row.checked_add(steps)?, col),
            Direction::Left => (row, col.checked_sub(steps)?),
            Direction::Right => (row, col.checked_add(steps)?),
        };
        grid.is_in_bounds(next).then_some(next)
    }
}

/// Get neighbors of a cell, in the order up, down, left, right.
/// A neighbor is considered a cell that is one step away and inside the grid.
pub fn get_neighbors(coord: Coord, grid: &Grid) -> impl Iterator<Item = Coord> + '_ {
    let in_bounds = grid.is_in_bounds(coord);
    Direction::ALL
        .into_iter()
        .filter(move |_| in_bounds)
        .filter_map(move |direction| direction.offset(coord, 1, grid))
}

/// Whether two coordinates are 4-adjacent.
pub fn is_adjacent(a: Coord, b: Coord) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_neighbors() {
        let grid = Grid::new(5, 5, CellState::Path);
        let neighbors = get_neighbors((2, 2), &grid).collect::<Vec<_>>();
        assert_eq!(neighbors, vec![(1, 2), (3, 2), (2, 1), (2, 3)]);

        // Corners only have two neighbors, still in up/down/left/right order
        let neighbors = get_neighbors((0, 0), &grid).collect::<Vec<_>>();
        assert_eq!(neighbors, vec![(1, 0), (0, 1)]);
        let neighbors = get_neighbors((4, 4), &grid).collect::<Vec<_>>();
        assert_eq!(neighbors, vec![(3, 4), (4, 3)]);

        assert_eq!(get_neighbors((5, 5), &grid).count(), 0);
    }

    #[test]
    fn test_two_step_offsets() {
        let grid = Grid::new(7, 7, CellState::Wall);
        assert_eq!(Direction::Up.offset((1, 3), 2, &grid), None);
        assert_eq!(Direction::Down.offset((1, 3), 2, &grid), Some((3, 3)));
        assert_eq!(Direction::Right.offset((1, 5), 2, &grid), None);
        assert_eq!(Direction::Left.offset((1, 5), 2, &grid), Some((1, 3)));
    }

    #[test]
    fn test_adjacency() {
        assert!(is_adjacent((1, 1), (1, 2)));
        assert!(is_adjacent((1, 1), (0, 1)));
        assert!(!is_adjacent((1, 1), (2, 2)));
        assert!(!is_adjacent((1, 1), (1, 1)));
    }
}
