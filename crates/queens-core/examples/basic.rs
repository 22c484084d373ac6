//! Basic example of using the queens engine

use queens_core::{Generator, GeneratorConfig, Solver};

fn main() {
    // Sample partitions until one has a unique solution
    println!("Searching for a unique 7x7 puzzle...\n");
    let mut generator = Generator::with_config(GeneratorConfig {
        max_attempts: 5000,
        want: 1,
    });

    let report = match generator.find_unique(7, 7) {
        Ok(report) => report,
        Err(e) => {
            println!("Generation failed: {}", e);
            return;
        }
    };

    let Some(puzzle) = report.puzzles.first() else {
        println!(
            "No unique-solution puzzle found after {} attempts.",
            report.attempts
        );
        return;
    };

    println!("Found after {} attempts. Regions:", report.attempts);
    println!("{}", puzzle.regions);

    println!("Solution crowns:");
    for crown in &puzzle.solution {
        println!("  {}", crown);
    }

    // Re-check uniqueness with an exhaustive count
    let solver = Solver::new();
    let outcome = solver.solve(&puzzle.regions, None);
    println!("\nExhaustive solution count: {}", outcome.count);
}
