//! Abelian sandpile simulation on a rectangular grid with an absorbing
//! ("sink") border, stabilized in parallel with a fork/join decomposition.

pub mod grid;
pub mod io;
pub mod sim;

pub use grid::SandpileGrid;
pub use io::{png, read_csv, write_csv};
pub use sim::{Simulation, SEQUENTIAL_THRESHOLD};

use thiserror::Error;

pub type Cell = u32;
pub type Grid = Vec<Vec<Cell>>;

#[derive(Debug, Error)]
pub enum SandpileError {
	#[error("invalid input: {0}")]
	InvalidInput(String),
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
	#[error("sequential threshold must be positive")]
	InvalidThreshold,
}
