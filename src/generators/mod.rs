use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;

use recur_backtrack::recursive_backtrack;

use crate::{
    error::{MazeError, Result},
    maze::{CellState, Grid},
};

/// Smallest accepted side length is one more than this.
pub const MIN_EXCLUSIVE_SIZE: usize = 4;

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Generator {
    #[default]
    RecursiveBacktracker,
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecursiveBacktracker => write!(f, "Randomized Depth-First Carving"),
        }
    }
}

/// Reject sizes the carving lattice cannot work with.
pub fn validate_size(rows: usize, cols: usize) -> Result<()> {
    if rows > MIN_EXCLUSIVE_SIZE && cols > MIN_EXCLUSIVE_SIZE {
        Ok(())
    } else {
        Err(MazeError::InvalidSize { rows, cols })
    }
}

/// Build a `rows x cols` perfect maze with `Start` at the top-left corner and
/// `End` at the bottom-right corner.
pub fn generate_maze(
    rows: usize,
    cols: usize,
    generator: Generator,
    seed: Option<u64>,
) -> Result<Grid> {
    validate_size(rows, cols)?;
    let mut grid = Grid::new(rows, cols, CellState::Wall);
    carve_maze(&mut grid, generator, seed)?;
    Ok(grid)
}

/// Square maze of side `size`.
pub fn generate_square(size: usize, seed: Option<u64>) -> Result<Grid> {
    generate_maze(size, size, Generator::default(), seed)
}

/// Carve a maze into an existing grid, overwriting every cell. Lets a grid that
/// carries an observer be regenerated in place.
pub fn carve_maze(grid: &mut Grid, generator: Generator, seed: Option<u64>) -> Result<()> {
    validate_size(grid.rows(), grid.cols())?;
    let mut rng = get_rng(seed);
    match generator {
        Generator::RecursiveBacktracker => recursive_backtrack(grid, &mut rng),
    }
    tracing::debug!(
        "[generate] {} carved a {}x{} maze with {} open cells",
        generator,
        grid.rows(),
        grid.cols(),
        grid.rows() * grid.cols() - grid.count(CellState::Wall)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_small_sizes() {
        assert!(matches!(
            generate_square(4, Some(0)),
            Err(MazeError::InvalidSize { rows: 4, cols: 4 })
        ));
        assert!(generate_maze(10, 3, Generator::default(), Some(0)).is_err());
        assert!(generate_square(5, Some(0)).is_ok());
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate_square(15, Some(42)).unwrap();
        let b = generate_square(15, Some(42)).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }
}
