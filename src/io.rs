use std::{
	fs::File,
	io::{BufRead, BufReader, BufWriter, Write},
	path::Path,
};

use crate::{Cell, Grid, SandpileError};

/// Read a grid from its delimited text form: a `width,height` header record
/// followed by `height` records of `width` comma-separated grain counts.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Grid, SandpileError> {
	let file = File::open(path)?;
	let mut lines = BufReader::new(file).lines();
	let header = match lines.next() {
		Some(line) => line?,
		None => return Err(SandpileError::InvalidInput("empty input file".to_owned())),
	};
	let dims: Vec<&str> = header.trim().split(',').collect();
	if dims.len() != 2 {
		return Err(SandpileError::InvalidInput(format!(
			"expected 'width,height' header, got: {}",
			header
		)));
	}
	let width = parse_dimension(dims[0])?;
	let height = parse_dimension(dims[1])?;
	let mut grid = Vec::with_capacity(height);
	for line in lines {
		let line = line?;
		if line.trim().is_empty() {
			continue;
		}
		let mut row = Vec::with_capacity(width);
		for s in line.trim().split(',') {
			let v: Cell = s.trim().parse().map_err(|_| {
				SandpileError::InvalidInput(format!("non-numeric cell value: {}", s))
			})?;
			row.push(v);
		}
		if row.len() != width {
			return Err(SandpileError::InvalidInput(format!(
				"expected {} values per row, got {}",
				width,
				row.len()
			)));
		}
		grid.push(row);
	}
	if grid.len() != height {
		return Err(SandpileError::InvalidInput(format!(
			"expected {} rows, got {}",
			height,
			grid.len()
		)));
	}
	Ok(grid)
}

fn parse_dimension(s: &str) -> Result<usize, SandpileError> {
	match s.trim().parse::<usize>() {
		Ok(n) if n > 0 => Ok(n),
		_ => Err(SandpileError::InvalidInput(format!(
			"grid dimension must be a positive integer, got: {}",
			s
		))),
	}
}

/// Write a grid in the same delimited format the reader accepts.
pub fn write_csv<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), SandpileError> {
	if grid.is_empty() {
		return Err(SandpileError::InvalidInput("empty grid".to_owned()));
	}
	let mut out = BufWriter::new(File::create(path)?);
	writeln!(out, "{},{}", grid[0].len(), grid.len())?;
	for row in grid {
		let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
		writeln!(out, "{}", cells.join(","))?;
	}
	Ok(())
}

/// Encode a stable grid as a PNG. Grain counts map to fixed colors:
/// 0 black, 1 green, 2 blue, 3 red; a stable grid holds nothing above 3.
pub fn png<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), SandpileError> {
	if grid.is_empty() {
		return Err(SandpileError::InvalidInput("empty grid".to_owned()));
	}
	let colors = [
		[0, 0, 0, 255],
		[0, 255, 0, 255],
		[0, 0, 255, 255],
		[255, 0, 0, 255],
	];
	let mut pixels = vec![0; grid.len() * grid[0].len() * 4];
	let mut p = 0;
	for row in grid.iter() {
		for el in row {
			let color = colors.get(*el as usize).unwrap_or(&colors[0]);
			pixels[p..p + 4].copy_from_slice(color);
			p += 4;
		}
	}
	repng::encode(
		File::create(path)?,
		grid[0].len() as u32,
		grid.len() as u32,
		&pixels,
	)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::{env, fs, path::PathBuf};

	fn temp_path(name: &str) -> PathBuf {
		env::temp_dir().join(format!("sandgrid-{}-{}", std::process::id(), name))
	}

	#[test]
	fn csv_round_trip() {
		let grid = vec![vec![0, 1, 2], vec![3, 4, 100]];
		let path = temp_path("round-trip.csv");
		write_csv(&grid, &path).unwrap();
		let read = read_csv(&path).unwrap();
		fs::remove_file(&path).unwrap();
		assert_eq!(read, grid);
	}

	#[test]
	fn rejects_bad_header() {
		let path = temp_path("bad-header.csv");
		fs::write(&path, "3\n1,2,3\n").unwrap();
		let err = read_csv(&path);
		fs::remove_file(&path).unwrap();
		assert!(matches!(err, Err(SandpileError::InvalidInput(_))));
	}

	#[test]
	fn rejects_non_numeric_cell() {
		let path = temp_path("bad-cell.csv");
		fs::write(&path, "2,1\n1,x\n").unwrap();
		let err = read_csv(&path);
		fs::remove_file(&path).unwrap();
		assert!(matches!(err, Err(SandpileError::InvalidInput(_))));
	}

	#[test]
	fn rejects_dimension_mismatch() {
		let short = temp_path("short.csv");
		fs::write(&short, "2,2\n1,2\n").unwrap();
		let err = read_csv(&short);
		fs::remove_file(&short).unwrap();
		assert!(matches!(err, Err(SandpileError::InvalidInput(_))));

		let ragged = temp_path("ragged.csv");
		fs::write(&ragged, "2,2\n1,2\n1,2,3\n").unwrap();
		let err = read_csv(&ragged);
		fs::remove_file(&ragged).unwrap();
		assert!(matches!(err, Err(SandpileError::InvalidInput(_))));
	}

	#[test]
	fn missing_file_is_io_error() {
		let err = read_csv(temp_path("does-not-exist.csv"));
		assert!(matches!(err, Err(SandpileError::Io(_))));
	}

	#[test]
	fn png_writes_a_file() {
		let grid = vec![vec![0, 1], vec![2, 3]];
		let path = temp_path("out.png");
		png(&grid, &path).unwrap();
		let meta = fs::metadata(&path).unwrap();
		fs::remove_file(&path).unwrap();
		assert!(meta.len() > 0);
	}
}
