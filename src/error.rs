use thiserror::Error;

use crate::maze::Coord;

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("Maze dimensions must both be greater than 4 (got {rows}x{cols})")]
    InvalidSize { rows: usize, cols: usize },
    #[error("Set both a start and an end cell before solving")]
    MissingEndpoints,
    #[error("Coordinate {0:?} is outside the grid")]
    OutOfBounds(Coord),
    #[error("An animated playback is still running")]
    PlaybackBusy,
    #[error("Unknown solver: {0}")]
    UnknownSolver(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Malformed grid layout: {0}")]
    MalformedLayout(String),
    #[error("Malformed result record: {0}")]
    MalformedRecord(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
