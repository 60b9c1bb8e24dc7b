pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod maze;
pub mod playback;
pub mod results;
pub mod session;
pub mod solvers;

pub use error::{MazeError, Result};
