//! Benchmarks for mine layout generation.
//!
//! # Benchmarks
//!
//! - **`generator_beginner`**: 9×9 with 10 mines, started in the middle.
//! - **`generator_expert`**: 30×16 with 99 mines, started in a corner. Dense
//!   enough that most layouts need several rounds of perturbation.
//! - **`generator_any`**: 30×16 with 99 mines without the uniqueness
//!   requirement, which measures mine placement alone.
//!
//! # Test Data
//!
//! Uses three fixed seeds so every run generates the same layouts:
//!
//! - **`seed_0`**: `c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1`
//! - **`seed_1`**: `a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3`
//! - **`seed_2`**: `1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef`
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench generator
//! ```

use std::{hint, str::FromStr as _, time::Duration};

use criterion::{
    BatchSize, BenchmarkId, Criterion, PlottingBackend, criterion_group, criterion_main,
};
use mines_core::{GameParams, Position};
use mines_generator::{LayoutGenerator, LayoutSeed};

const SEEDS: [&str; 3] = [
    "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1",
    "a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3",
    "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef",
];

fn bench_params(c: &mut Criterion, name: &str, params: GameParams, start: Position) {
    let generator = LayoutGenerator::default();

    for (i, seed) in SEEDS.into_iter().enumerate() {
        let seed = LayoutSeed::from_str(seed).unwrap();
        c.bench_with_input(
            BenchmarkId::new(name, format!("seed_{i}")),
            &seed,
            |b, seed| {
                b.iter_batched(
                    || hint::black_box(*seed),
                    |seed| generator.generate_with_seed(&params, start, seed),
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

fn bench_generator_beginner(c: &mut Criterion) {
    bench_params(
        c,
        "generator_beginner",
        GameParams::new(9, 9, 10, true),
        Position::new(4, 4),
    );
}

fn bench_generator_expert(c: &mut Criterion) {
    bench_params(
        c,
        "generator_expert",
        GameParams::new(30, 16, 99, true),
        Position::new(0, 0),
    );
}

fn bench_generator_any(c: &mut Criterion) {
    bench_params(
        c,
        "generator_any",
        GameParams::new(30, 16, 99, false),
        Position::new(0, 0),
    );
}

criterion_group!(
    name = benches;
    config =
        Criterion::default()
            .plotting_backend(PlottingBackend::Plotters)
            .measurement_time(Duration::from_secs(12));
    targets =
        bench_generator_beginner,
        bench_generator_expert,
        bench_generator_any
);
criterion_main!(benches);
