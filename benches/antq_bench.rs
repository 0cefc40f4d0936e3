//! Criterion benchmarks for the Ant-Q engine.
//!
//! Uses random Euclidean TSP instances and a layered sequencing instance
//! to measure tour construction and pheromone update overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_antq::antq::{AntqConfig, AntqRunner, PrecedenceMatrix};
use u_antq::problems::{SequencingProblem, TspProblem};
use u_antq::random::create_rng;

// ===========================================================================
// Instances
// ===========================================================================

fn random_tsp(n: usize, seed: u64) -> TspProblem {
    let mut rng = create_rng(seed);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
        .collect();
    TspProblem::from_coordinates(&points)
}

/// Jobs in layers of `width`; every job depends on the job directly above it.
fn layered_sequencing(layers: usize, width: usize, seed: u64) -> SequencingProblem {
    let n = layers * width;
    let mut rng = create_rng(seed);
    let mut precedence = PrecedenceMatrix::new(n);
    for job in width..n {
        precedence
            .require(job, job - width)
            .expect("index in range");
    }
    let durations = (0..n).map(|_| rng.random_range(1.0..10.0)).collect();
    let weights = (0..n).map(|_| rng.random_range(0.0..5.0)).collect();
    SequencingProblem::new(durations, weights, precedence).expect("valid instance")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_antq_tsp(c: &mut Criterion) {
    let mut group = c.benchmark_group("antq_tsp");
    group.sample_size(10);

    for (n, iterations) in [(10usize, 50usize), (30, 20), (60, 10)] {
        let problem = random_tsp(n, 42);
        let config = AntqConfig::default()
            .with_iterations(iterations)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_i{}", n, iterations), n),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = AntqRunner::run(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_antq_sequencing(c: &mut Criterion) {
    let mut group = c.benchmark_group("antq_sequencing");
    group.sample_size(10);

    for &(layers, width) in &[(4usize, 5usize), (8, 5)] {
        let problem = layered_sequencing(layers, width, 7);
        let config = AntqConfig::default().with_iterations(20).with_seed(7);
        group.bench_with_input(
            BenchmarkId::from_parameter(layers * width),
            &(problem, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = AntqRunner::run_constrained(black_box(p), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_antq_tsp, bench_antq_sequencing);
criterion_main!(benches);
