use std::{fmt, mem};

use crate::{Cell, Grid, SandpileError};

/// Double-buffered sandpile grid. The logical `rows x cols` interior is
/// stored inside a `(rows+2) x (cols+2)` buffer whose outermost cells form
/// the sink border: they stay 0 forever and absorb grains toppled off the
/// edge. `cells` is the current generation, `update` the one being written.
#[derive(Debug, Clone)]
pub struct SandpileGrid {
	cells: Vec<Vec<Cell>>,
	update: Vec<Vec<Cell>>,
	rows: usize,
	cols: usize,
}

impl SandpileGrid {
	pub fn new(rows: usize, cols: usize) -> Result<SandpileGrid, SandpileError> {
		if rows == 0 || cols == 0 {
			return Err(SandpileError::InvalidInput("grid dimensions must be positive".to_owned()));
		}
		Ok(SandpileGrid {
			cells: vec![vec![0; cols + 2]; rows + 2],
			update: vec![vec![0; cols + 2]; rows + 2],
			rows,
			cols,
		})
	}

	pub fn from_grid(grid: Grid) -> Result<SandpileGrid, SandpileError> {
		if grid.is_empty() {
			return Err(SandpileError::InvalidInput("empty grid".to_owned()));
		}
		let cols = grid[0].len();
		for row in &grid {
			if row.len() != cols {
				return Err(SandpileError::InvalidInput("rows of unequal lengths".to_owned()));
			}
		}
		let mut g = SandpileGrid::new(grid.len(), cols)?;
		// don't copy over the sink border
		for (i, row) in grid.into_iter().enumerate() {
			for (j, v) in row.into_iter().enumerate() {
				g.cells[i + 1][j + 1] = v;
			}
		}
		Ok(g)
	}

	pub fn rows(&self) -> usize {
		self.rows
	}

	pub fn cols(&self) -> usize {
		self.cols
	}

	/// Value of interior cell `(i, j)`, 0-based, border excluded.
	pub fn get(&self, i: usize, j: usize) -> Cell {
		self.cells[i + 1][j + 1]
	}

	pub fn set(&mut self, i: usize, j: usize, value: Cell) {
		self.cells[i + 1][j + 1] = value;
	}

	pub fn set_all(&mut self, value: Cell) {
		// borders are always 0
		for i in 1..=self.rows {
			for j in 1..=self.cols {
				self.cells[i][j] = value;
			}
		}
	}

	/// Exchange the roles of the two buffers. O(1), no element copies.
	pub fn swap(&mut self) {
		mem::swap(&mut self.cells, &mut self.update);
	}

	/// Read view of the current generation and write view of the next one.
	/// Callers partition the write view by disjoint row ranges; the read
	/// view is frozen until `swap`.
	pub(crate) fn buffers_mut(&mut self) -> (&[Vec<Cell>], &mut [Vec<Cell>]) {
		(&self.cells, &mut self.update)
	}

	pub fn into_grid(self) -> Grid {
		let cols = self.cols;
		self.cells
			.into_iter()
			.skip(1)
			.take(self.rows)
			.map(|row| row.into_iter().skip(1).take(cols).collect())
			.collect()
	}
}

impl fmt::Display for SandpileGrid {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let frame = |f: &mut fmt::Formatter| {
			write!(f, "+")?;
			for _ in 0..self.cols {
				write!(f, "  --")?;
			}
			writeln!(f, "+")
		};
		frame(f)?;
		for i in 0..self.rows {
			write!(f, "|")?;
			for j in 0..self.cols {
				let v = self.get(i, j);
				if v > 0 {
					write!(f, "{:4}", v)?;
				} else {
					write!(f, "    ")?;
				}
			}
			writeln!(f, "|")?;
		}
		frame(f)
	}
}
