//! # Distributed Runner
//!
//! Spawns one thread per worker, wires adjacent bands with halo channels,
//! and collects the counted gather. Workers share nothing but the barrier
//! and their channel endpoints; the grid itself never leaves its band.
//!
//! The run either delivers every worker's report or fails as a whole.
//! Worker errors win over collector errors when both occur, since the
//! worker's error names the root cause.

use std::sync::Arc;

use crossbeam_channel::unbounded;

use karst_core::{MapConfig, MapSeed, Partition};

use crate::error::{ClusterError, ClusterResult};
use crate::gather::GatheredSegments;
use crate::halo::{link_bands, NeighborLinks};
use crate::sync::{AbortGuard, RunBarrier};
use crate::worker::{run_worker, WorkerContext};

/// Generates a cave with `worker_count` message-passing workers and
/// gathers every band's contour segments.
///
/// Reproducibility contract: the gathered segments are identical for any
/// `worker_count`, because initial noise is positioned by global cell
/// index and band extraction is seam-free.
///
/// # Errors
///
/// Rejects invalid configurations before any worker starts; any halo or
/// gather protocol violation aborts the whole run.
pub fn run_distributed(
    config: &MapConfig,
    seed: MapSeed,
    worker_count: usize,
) -> ClusterResult<GatheredSegments> {
    config.validate()?;
    if worker_count == 0 {
        return Err(ClusterError::NoWorkers);
    }

    let height = config.height as usize;
    let partitions = Partition::split(height, worker_count);

    // The seed broadcast: one value, shared by every worker before any
    // initialization begins.
    tracing::info!(
        "distributed run: {} workers, map {}x{}, seed {}",
        worker_count,
        config.width,
        config.height,
        seed.value()
    );
    for (i, part) in partitions.iter().enumerate() {
        tracing::info!(
            "  worker {}: {} rows from global row {}",
            i,
            part.local_height,
            part.global_row_offset
        );
    }

    if height == 0 {
        tracing::info!("empty map, nothing to generate");
        return Ok(GatheredSegments::empty(worker_count));
    }

    // Starved bands are a suffix; only the active prefix gets links.
    let active = partitions.iter().filter(|p| !p.is_empty()).count();
    let mut links = link_bands(active);
    links.resize_with(worker_count, NeighborLinks::default);

    execute(config, seed, &partitions, links)
}

/// Spawns one thread per band over prebuilt links and joins the run.
///
/// Every worker failure poisons the shared barrier, so the surviving
/// workers abort instead of parking forever at a wait that can never
/// complete. When picking the error to report, a worker's own failure wins
/// over the abort echoes of the workers it took down, and any worker error
/// wins over the collector's, so the result names the root cause.
fn execute(
    config: &MapConfig,
    seed: MapSeed,
    partitions: &[Partition],
    links: Vec<NeighborLinks>,
) -> ClusterResult<GatheredSegments> {
    let worker_count = partitions.len();
    let barrier = Arc::new(RunBarrier::new(worker_count));
    let (gather_tx, gather_rx) = unbounded();

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        for (index, (partition, links)) in partitions.iter().zip(links).enumerate() {
            let ctx = WorkerContext {
                worker_index: index,
                config: *config,
                seed,
                partition: *partition,
                links,
                barrier: Arc::clone(&barrier),
                gather_tx: gather_tx.clone(),
            };
            let barrier = Arc::clone(&barrier);
            handles.push(scope.spawn(move || {
                let guard = AbortGuard::new(&barrier);
                let result = run_worker(ctx);
                if result.is_ok() {
                    guard.disarm();
                }
                result
            }));
        }
        drop(gather_tx);

        let gathered = GatheredSegments::collect(&gather_rx, worker_count);

        let mut failure: Option<ClusterError> = None;
        for (index, handle) in handles.into_iter().enumerate() {
            let error = match handle.join() {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => error,
                Err(_) => ClusterError::WorkerFailed { worker: index },
            };
            let supersedes = match &failure {
                None => true,
                Some(ClusterError::Aborted { .. }) => {
                    !matches!(error, ClusterError::Aborted { .. })
                }
                Some(_) => false,
            };
            if supersedes {
                failure = Some(error);
            }
        }
        if let Some(error) = failure {
            return Err(error);
        }

        let gathered = gathered?;
        tracing::info!("gather complete: {} segments", gathered.total_segments());
        Ok(gathered)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use karst_core::CoreError;

    fn small_config() -> MapConfig {
        MapConfig { width: 20, height: 15, ..MapConfig::default() }
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = run_distributed(&small_config(), MapSeed::new(1), 0).unwrap_err();
        assert_eq!(err, ClusterError::NoWorkers);
    }

    #[test]
    fn invalid_config_is_rejected_before_any_worker() {
        let config = MapConfig { width: 0, ..small_config() };
        let err = run_distributed(&config, MapSeed::new(1), 2).unwrap_err();
        assert_eq!(err, ClusterError::Config(CoreError::InvalidWidth(0)));
    }

    #[test]
    fn empty_map_completes_with_no_segments() {
        let config = MapConfig { height: 0, ..small_config() };
        let gathered = run_distributed(&config, MapSeed::new(1), 3).unwrap();
        assert_eq!(gathered.total_segments(), 0);
        assert_eq!(gathered.segment_counts(), &[0, 0, 0]);
    }

    #[test]
    fn single_worker_run_produces_contours() {
        let gathered = run_distributed(&small_config(), MapSeed::new(42), 1).unwrap();
        assert!(gathered.total_segments() > 0);
    }

    #[test]
    fn failing_worker_aborts_the_run_with_its_own_error() {
        use crate::halo::HaloMessage;
        use karst_core::Cell;

        let config = MapConfig { width: 12, height: 12, ..MapConfig::default() };
        let partitions = Partition::split(12, 3);
        let links = link_bands(3);

        // A malformed row queued ahead of worker 1's real top halo: worker 1
        // fails its first receive, and without barrier poisoning workers 0
        // and 2 would park forever waiting for its next arrival.
        links[0]
            .to_next
            .as_ref()
            .unwrap()
            .send(HaloMessage { iteration: 0, row: vec![Cell::Wall; 3] })
            .unwrap();

        let err = execute(&config, MapSeed::new(4), &partitions, links).unwrap_err();
        assert_eq!(err, ClusterError::HaloLength { worker: 1, expected: 12, got: 3 });
    }
}
