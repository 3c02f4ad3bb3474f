use crate::grid::SandpileGrid;
use crate::{Cell, Grid, SandpileError};

/// Row-band size at or below which a range is toppled sequentially instead
/// of being split further. A performance knob only; results are identical
/// for any positive value.
pub const SEQUENTIAL_THRESHOLD: usize = 32;

/// Apply one generation of the toppling rule to the band of `next` rows
/// starting at absolute row `first_row`. A cell keeps its grain count mod 4
/// and collects one grain from each neighbour holding 4 or more. Only
/// `current` is read, only the given band of `next` is written, so disjoint
/// bands may run concurrently over the same frozen `current`.
pub fn update_range(current: &[Vec<Cell>], next: &mut [Vec<Cell>], first_row: usize) -> bool {
	let mut changed = false;
	for (k, row) in next.iter_mut().enumerate() {
		let i = first_row + k;
		let above = &current[i - 1];
		let here = &current[i];
		let below = &current[i + 1];
		// border columns are never written
		for j in 1..here.len() - 1 {
			let v = here[j] % 4 + above[j] / 4 + below[j] / 4 + here[j - 1] / 4 + here[j + 1] / 4;
			if v != here[j] {
				changed = true;
			}
			row[j] = v;
		}
	}
	changed
}

/// Recursively split the band of `next` rows at its midpoint, toppling one
/// half on a forked task and the other on the current one. Produces output
/// bit-identical to a single `update_range` call over the whole band.
pub fn update_parallel(
	current: &[Vec<Cell>],
	next: &mut [Vec<Cell>],
	first_row: usize,
	threshold: usize,
) -> bool {
	if next.len() <= threshold {
		return update_range(current, next, first_row);
	}
	let mid = next.len() / 2;
	let (low, high) = next.split_at_mut(mid);
	let (low_changed, high_changed) = rayon::join(
		|| update_parallel(current, low, first_row, threshold),
		|| update_parallel(current, high, first_row + mid, threshold),
	);
	// plain `|`: both halves have already run, only the flags combine
	low_changed | high_changed
}

/// Drives a grid to its stable configuration, one synchronous generation at
/// a time, swapping buffers after every generation that changed a cell.
pub struct Simulation {
	grid: SandpileGrid,
	threshold: usize,
	steps: u64,
}

impl Simulation {
	pub fn new(grid: SandpileGrid) -> Simulation {
		Simulation {
			grid,
			threshold: SEQUENTIAL_THRESHOLD,
			steps: 0,
		}
	}

	pub fn with_threshold(grid: SandpileGrid, threshold: usize) -> Result<Simulation, SandpileError> {
		if threshold == 0 {
			return Err(SandpileError::InvalidThreshold);
		}
		Ok(Simulation {
			grid,
			threshold,
			steps: 0,
		})
	}

	/// Run one generation. Returns false once the grid is stable; the
	/// buffers are swapped only when something changed, so a stable grid
	/// is left exactly as it was.
	pub fn step(&mut self) -> bool {
		let changed = {
			let (current, next) = self.grid.buffers_mut();
			let interior_end = next.len() - 1;
			update_parallel(current, &mut next[1..interior_end], 1, self.threshold)
		};
		if changed {
			self.grid.swap();
			self.steps += 1;
		}
		changed
	}

	/// Iterate generations until the grid stops changing. Returns the total
	/// number of generations taken.
	pub fn run(&mut self) -> u64 {
		while self.step() {}
		self.steps
	}

	pub fn steps(&self) -> u64 {
		self.steps
	}

	pub fn grid(&self) -> &SandpileGrid {
		&self.grid
	}

	pub fn into_grid(self) -> Grid {
		self.grid.into_grid()
	}
}
