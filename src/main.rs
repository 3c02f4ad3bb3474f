use sandgrid::{png, read_csv, write_csv, SandpileError, SandpileGrid, Simulation};

use std::{env, path::Path, process, time::Instant};

fn main() {
	let args: Vec<String> = env::args().collect();
	if args.len() != 3 {
		eprintln!("Incorrect number of command line arguments provided.");
		eprintln!("Usage: sandgrid <input.csv> <output.png>");
		process::exit(1);
	}
	if let Err(e) = run(&args[1], &args[2]) {
		eprintln!("{}", e);
		process::exit(1);
	}
}

fn run(input_path: &str, output_path: &str) -> Result<(), SandpileError> {
	let initial = read_csv(input_path)?;
	println!("Rows: {}, Columns: {}", initial.len(), initial[0].len());
	let grid = SandpileGrid::from_grid(initial)?;

	let mut sim = Simulation::new(grid);
	let start = Instant::now();
	let steps = sim.run();
	let elapsed = start.elapsed();

	println!("Simulation complete, writing image...");
	let stable = sim.into_grid();
	png(&stable, output_path)?;
	write_csv(&stable, Path::new(output_path).with_extension("csv"))?;

	println!("Number of steps to stable state: {}", steps);
	println!("Time: {} ms", elapsed.as_millis());
	Ok(())
}
