//! Benchmark for rota generation throughput.
//!
//! Run with: cargo run --release --bin bench

use shift_rota::demo_data::{self, DemoData};
use shift_rota::RotaAssigner;
use std::time::Instant;

const RUNS: u64 = 200;

fn main() {
    let (employees, config) = demo_data::generate(DemoData::Large);
    let n_employees = employees.len();
    let n_days = config.num_days;

    println!("Benchmark: Greedy Rota Assignment");
    println!("  Employees: {}", n_employees);
    println!("  Days: {}", n_days);
    println!();

    let assigner = match RotaAssigner::new(employees, config.clone()) {
        Ok(assigner) => assigner,
        Err(err) => {
            eprintln!("Demo data rejected: {}", err);
            std::process::exit(1);
        }
    };
    let reference = assigner.assign();

    let bench_start = Instant::now();
    let mut cells: u64 = 0;
    for seed in 0..RUNS {
        let seeded = RotaAssigner::new(assigner.employees().to_vec(), config.clone().with_seed(seed));
        if let Ok(seeded) = seeded {
            let rota = seeded.assign();
            cells += (rota.grid.len() * rota.num_days()) as u64;
        }
    }

    let elapsed = bench_start.elapsed();
    let cells_per_sec = cells as f64 / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Runs: {}", RUNS);
    println!("  Time: {:.2?}", elapsed);
    println!("  Cells/sec: {:.0}", cells_per_sec);

    // Same seed must reproduce the reference rota exactly
    let again = assigner.assign();
    assert_eq!(reference, again, "Rota not reproducible!");
    println!("  Warnings in reference run: {} (verified)", reference.warnings.len());
}
