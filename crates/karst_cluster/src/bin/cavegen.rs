//! Cave generation demo.
//!
//! Generates one map under either scheduler and reports geometry totals.
//! Rendering is someone else's job; this binary exists to exercise a full
//! run from the command line.
//!
//! ```text
//! cavegen [--workers N] [--seed S] [--parallel] [--config FILE]
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use karst_cluster::{run_distributed, run_parallel};
use karst_contour::wall_triangles;
use karst_core::{MapConfig, MapSeed};

struct Options {
    config: MapConfig,
    seed: MapSeed,
    workers: usize,
    parallel: bool,
}

fn parse_options() -> Result<Options, String> {
    let mut config = MapConfig::default();
    let mut seed = None;
    let mut workers = 4;
    let mut parallel = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--workers" => {
                let value = args.next().ok_or("--workers needs a value")?;
                workers = value.parse().map_err(|_| format!("bad worker count: {value}"))?;
            }
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                let raw: u64 = value.parse().map_err(|_| format!("bad seed: {value}"))?;
                seed = Some(MapSeed::new(raw));
            }
            "--parallel" => parallel = true,
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {path}: {e}"))?;
                config = MapConfig::from_toml_str(&text).map_err(|e| e.to_string())?;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    // Wall-clock seed when none was given, like any throwaway run wants.
    let seed = seed.unwrap_or_else(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        MapSeed::new(nanos)
    });

    Ok(Options { config, seed, workers, parallel })
}

fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    if options.parallel {
        let output = run_parallel(&options.config, options.seed, options.workers)?;
        let triangles = wall_triangles(&output.grid, options.config.tile_size);
        tracing::info!(
            "parallel run done: {} segments, {} wall cells, {} triangle vertices",
            output.segments.len(),
            output.grid.wall_count(),
            triangles.len()
        );
    } else {
        let gathered = run_distributed(&options.config, options.seed, options.workers)?;
        tracing::info!(
            "distributed run done: {} segments from {} workers",
            gathered.total_segments(),
            gathered.segment_counts().len()
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = match parse_options() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: cavegen [--workers N] [--seed S] [--parallel] [--config FILE]");
            std::process::exit(2);
        }
    };

    if let Err(error) = run(&options) {
        tracing::error!("generation failed: {error}");
        std::process::exit(1);
    }
}
