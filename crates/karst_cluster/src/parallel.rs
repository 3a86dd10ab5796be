//! # Shared-Memory Runner
//!
//! The same algorithm as the distributed runner, scheduled as parallel
//! loops over one grid. Each iteration writes into a single next-state
//! buffer through disjoint per-worker row chunks; the swap happens only
//! after every thread has joined, so no worker can ever read a neighbor
//! cell that was already updated this iteration.
//!
//! Initialization seeds each worker's private stream by index via seed
//! derivation rather than by global offset: with only one partition in
//! play there is no cross-count reproducibility to preserve, and a single
//! shared stream would serialize the fill.

use std::mem;

use parking_lot::Mutex;

use karst_contour::{extract_with, LineSegment};
use karst_core::{smooth_rows_into, Cell, Grid, Halo, MapConfig, MapSeed, NoiseStream, Partition};

use crate::error::{ClusterError, ClusterResult};

/// Result of a shared-memory run: the smoothed grid (for filled-quad
/// visualization via `karst_contour::wall_triangles`) plus the contour
/// segments. Segment order across workers is unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelOutput {
    /// The final smoothed map.
    pub grid: Grid,
    /// Extracted contour segments, merged from all workers.
    pub segments: Vec<LineSegment>,
}

/// Generates a cave over one shared grid with `worker_count` parallel
/// workers.
///
/// # Errors
///
/// Rejects invalid configurations and a zero worker count; the in-memory
/// schedule itself has no protocol failures.
pub fn run_parallel(
    config: &MapConfig,
    seed: MapSeed,
    worker_count: usize,
) -> ClusterResult<ParallelOutput> {
    config.validate()?;
    if worker_count == 0 {
        return Err(ClusterError::NoWorkers);
    }

    let width = config.width as usize;
    let height = config.height as usize;
    tracing::info!(
        "parallel run: {} workers, map {}x{}, seed {}",
        worker_count,
        config.width,
        config.height,
        seed.value()
    );

    if height == 0 {
        return Ok(ParallelOutput { grid: Grid::new(width, 0), segments: Vec::new() });
    }

    let partitions = Partition::split(height, worker_count);
    let mut grid = initial_grid(config, seed, &partitions);

    for _ in 0..config.smoothing_iterations {
        grid = smoothed(&grid, &partitions);
    }

    let segments = extract_parallel(&grid, &partitions, config.tile_size);
    tracing::info!("parallel run extracted {} segments", segments.len());
    Ok(ParallelOutput { grid, segments })
}

/// Parallel noise fill: disjoint row chunks, one derived stream per worker.
fn initial_grid(config: &MapConfig, seed: MapSeed, partitions: &[Partition]) -> Grid {
    let width = config.width as usize;
    let height: usize = partitions.iter().map(|p| p.local_height).sum();
    let fill = config.fill_probability;

    let mut cells = vec![Cell::Open; width * height];
    std::thread::scope(|scope| {
        let mut rest = cells.as_mut_slice();
        for (index, partition) in partitions.iter().enumerate() {
            let (chunk, tail) = mem::take(&mut rest).split_at_mut(partition.local_height * width);
            rest = tail;
            if partition.is_empty() {
                continue;
            }
            let worker_seed = seed.derive(index as u64);
            scope.spawn(move || {
                let mut stream = NoiseStream::new(worker_seed);
                for cell in chunk {
                    *cell = if stream.next_unit() < fill { Cell::Wall } else { Cell::Open };
                }
            });
        }
    });

    Grid::from_cells(width, height, cells)
}

/// One smoothing iteration: everyone reads `src`, everyone writes its own
/// disjoint chunk of the next buffer. Joining the scope is the barrier;
/// only then does the new grid replace the old.
fn smoothed(src: &Grid, partitions: &[Partition]) -> Grid {
    let width = src.width();
    let height = src.height();

    let mut next = vec![Cell::Open; width * height];
    std::thread::scope(|scope| {
        let mut rest = next.as_mut_slice();
        for partition in partitions {
            let (chunk, tail) = mem::take(&mut rest).split_at_mut(partition.local_height * width);
            rest = tail;
            if partition.is_empty() {
                continue;
            }
            let rows = partition.global_row_offset..partition.end_row();
            scope.spawn(move || {
                // Neighbor rows beyond the chunk still live in src; only
                // the true map edges fall back to the wall sentinel.
                smooth_rows_into(src, rows, &Halo::Absent, &Halo::Absent, chunk);
            });
        }
    });

    Grid::from_cells(width, height, next)
}

/// Parallel extraction over band block-rows, merged under a mutex.
///
/// Each worker scans its own rows of 2x2 blocks; a non-terminal band
/// includes the one block-row straddling its lower boundary, reading the
/// neighbor row straight from the shared grid.
fn extract_parallel(grid: &Grid, partitions: &[Partition], tile_size: f32) -> Vec<LineSegment> {
    let last_active = partitions.iter().rposition(|p| !p.is_empty());
    let segments = Mutex::new(Vec::new());

    std::thread::scope(|scope| {
        let segments = &segments;
        for (index, partition) in partitions.iter().enumerate() {
            if partition.is_empty() {
                continue;
            }
            let partition = *partition;
            let is_last = Some(index) == last_active;
            scope.spawn(move || {
                let rows = partition.local_height + usize::from(!is_last);
                let offset = partition.global_row_offset;
                let local = extract_with(grid.width(), rows, tile_size, offset, |x, y| {
                    grid.get(x, offset + y)
                });
                segments.lock().extend(local);
            });
        }
    });

    segments.into_inner()
}
