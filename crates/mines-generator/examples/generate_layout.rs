//! Example demonstrating mine layout generation.
//!
//! This example shows how to:
//! - Generate a layout from a parameters string
//! - Reproduce a layout from its seed
//! - Write batch and interactive game descriptors
//! - Measure how many attempts generation needs, in parallel
//!
//! # Usage
//!
//! ```sh
//! cargo run --example generate_layout -- --params 16x16n40
//! ```
//!
//! Reproduce a layout from a seed and starting cell:
//!
//! ```sh
//! cargo run --example generate_layout -- --seed <HEX> --start 3,4
//! ```
//!
//! Sample many layouts and report attempt statistics (set `RUST_LOG=debug` to
//! see every rejected layout):
//!
//! ```sh
//! cargo run --release --example generate_layout -- --params 30x16n170 --samples 100
//! ```

use std::process;

use clap::Parser;
use mines_core::{GameParams, Position};
use mines_generator::{
    GeneratedLayout, LayoutGenerator, LayoutSeed, describe_layout, new_game_description,
};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Parameters string, `<w>x<h>n<mines>[a]`.
    #[arg(short, long, value_name = "PARAMS", default_value = "9x9n10")]
    params: GameParams,

    /// Seed to generate from. Random if omitted.
    #[arg(long, value_name = "HEX")]
    seed: Option<LayoutSeed>,

    /// Starting cell as `x,y`. The middle of the grid if omitted.
    #[arg(long, value_name = "X,Y", value_parser = parse_position)]
    start: Option<Position>,

    /// Print an interactive (unresolved) descriptor instead of a layout.
    #[arg(long)]
    interactive: bool,

    /// Number of layouts to sample for attempt statistics.
    #[arg(long, value_name = "COUNT")]
    samples: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let generator = LayoutGenerator::default();
    let params = args.params;

    if args.interactive {
        match new_game_description(&generator, &params, &mut rand::rng(), true) {
            Ok(desc) => println!("{params}:{desc}"),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        return;
    }

    let start = args
        .start
        .unwrap_or_else(|| Position::new(params.width / 2, params.height / 2));

    if let Some(samples) = args.samples {
        sample(&generator, &params, start, samples);
        return;
    }

    let seed = args.seed.unwrap_or_else(LayoutSeed::random);
    match generator.generate_with_seed(&params, start, seed) {
        Ok(layout) => print_layout(&params, seed, &layout),
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

fn sample(generator: &LayoutGenerator, params: &GameParams, start: Position, samples: usize) {
    if samples == 0 {
        eprintln!("--samples must be at least 1.");
        process::exit(1);
    }

    let attempts = (0..samples)
        .into_par_iter()
        .map(|_| {
            generator
                .generate_with_seed(params, start, LayoutSeed::random())
                .map(|layout| layout.attempts)
        })
        .collect::<Vec<_>>();
    let succeeded = attempts.iter().filter_map(|a| a.as_ref().ok()).collect::<Vec<_>>();

    println!("Parameters:");
    println!("  {params}");
    println!();
    println!("Attempts:");
    println!("  samples: {samples}");
    println!("  failed: {}", samples - succeeded.len());
    if let Some(max) = succeeded.iter().copied().max() {
        let total: usize = succeeded.iter().copied().sum();
        #[expect(clippy::cast_precision_loss)]
        let mean = total as f64 / succeeded.len() as f64;
        println!("  max: {max}");
        println!("  mean: {mean:.2}");
    }
}

fn print_layout(params: &GameParams, seed: LayoutSeed, layout: &GeneratedLayout) {
    println!("Seed:");
    println!("  {seed}");
    println!();
    println!("Game ID:");
    println!("  {params}:{}", describe_layout(&layout.field, layout.start, true));
    println!();
    println!("Layout (start {}, {} attempts):", layout.start, layout.attempts);
    for line in layout.field.to_string().lines() {
        println!("  {line}");
    }
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("invalid x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("invalid y: {e}"))?;
    Ok(Position::new(x, y))
}
