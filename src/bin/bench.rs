//! Benchmark for solve throughput.
//!
//! Run with: cargo run --release --bin bench

use station_scheduling::demo_data::{self, DemoData};
use station_scheduling::model::OptimizationModel;
use station_scheduling::solver;
use std::time::Instant;

fn main() {
    let snapshot = demo_data::generate(DemoData::Large);

    println!("Benchmark: exact assignment solve");
    println!("  Personnel: {}", snapshot.personnel.len());
    println!("  Stations: {}", snapshot.stations.len());
    println!();

    let build_start = Instant::now();
    let model = OptimizationModel::build(&snapshot).expect("demo snapshot is valid");
    println!("Model build: {:?}", build_start.elapsed());

    const ROUNDS: u32 = 100;
    let bench_start = Instant::now();
    let mut first_objective = None;

    for _ in 0..ROUNDS {
        let solution = solver::solve(&model, None).expect("demo snapshot is feasible");
        match first_objective {
            None => first_objective = Some(solution.objective),
            Some(expected) => assert_eq!(solution.objective, expected, "objective drifted!"),
        }
    }

    let elapsed = bench_start.elapsed();

    println!("Results:");
    println!("  Rounds: {}", ROUNDS);
    println!("  Time: {:.2?}", elapsed);
    println!("  Solves/sec: {:.0}", ROUNDS as f64 / elapsed.as_secs_f64());
    if let Some(objective) = first_objective {
        println!("  Objective: {} (stable across rounds)", objective);
    }
}
