//! One distributed worker's run loop.
//!
//! Phases mirror the protocol exactly: seeded init, then per iteration
//! send-both-rows / receive-both-halos / smooth / barrier, then the
//! one-shot boundary borrow, extraction, and the gather report. The
//! barrier after each iteration is the protocol's central correctness
//! requirement: without it a fast worker could pair its iteration-k
//! computation with a neighbor's iteration-k+1 row.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use karst_contour::{extract_segments, flatten_segments};
use karst_core::{BandGenerator, Cell, Halo, MapConfig, MapSeed, Partition};

use crate::error::{ClusterError, ClusterResult};
use crate::gather::WorkerReport;
use crate::halo::{HaloMessage, NeighborLinks};
use crate::sync::RunBarrier;

/// How long a worker waits on a neighbor before declaring the run dead.
/// In-process neighbors answer in microseconds; hitting this means a
/// neighbor already failed.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything one worker needs; no other state is shared.
pub(crate) struct WorkerContext {
    pub worker_index: usize,
    pub config: MapConfig,
    pub seed: MapSeed,
    pub partition: Partition,
    pub links: NeighborLinks,
    pub barrier: Arc<RunBarrier>,
    pub gather_tx: Sender<WorkerReport>,
}

/// Runs one worker to completion.
pub(crate) fn run_worker(ctx: WorkerContext) -> ClusterResult<()> {
    let worker = ctx.worker_index;

    if ctx.partition.is_empty() {
        return run_starved(&ctx);
    }

    let width = ctx.config.width as usize;
    let mut band = BandGenerator::new(&ctx.config, ctx.partition, ctx.seed);
    band.initialize(ctx.config.fill_probability);
    wait_or_abort(&ctx.barrier, worker)?;

    for iteration in 0..ctx.config.smoothing_iterations {
        send_row(&ctx.links.to_next, band.last_row(), iteration, worker)?;
        send_row(&ctx.links.to_prev, band.first_row(), iteration, worker)?;

        let top = recv_halo(ctx.links.from_prev.as_ref(), iteration, width, worker)?;
        let bottom = recv_halo(ctx.links.from_next.as_ref(), iteration, width, worker)?;

        band.smooth_iteration(&top, &bottom);
        tracing::debug!("worker {} finished smoothing iteration {}", worker, iteration);
        wait_or_abort(&ctx.barrier, worker)?;
    }

    // One-shot borrow: give the previous band our first row, take the next
    // band's first row for seam-free extraction.
    if let Some(tx) = &ctx.links.borrow_to_prev {
        let row = band.first_row().map(<[Cell]>::to_vec).unwrap_or_default();
        tx.send(row)
            .map_err(|_| ClusterError::NeighborDisconnected { worker })?;
    }
    let borrowed = match &ctx.links.borrow_from_next {
        Some(rx) => Some(recv_borrowed_row(rx, width, worker)?),
        None => None,
    };
    wait_or_abort(&ctx.barrier, worker)?;

    let segments = extract_segments(
        band.grid(),
        borrowed.as_deref(),
        ctx.config.tile_size,
        ctx.partition.global_row_offset,
    );
    tracing::debug!("worker {} extracted {} segments", worker, segments.len());

    let report = WorkerReport {
        worker_index: worker,
        segment_count: segments.len(),
        data: flatten_segments(&segments),
    };
    ctx.gather_tx
        .send(report)
        .map_err(|_| ClusterError::NeighborDisconnected { worker })?;
    Ok(())
}

/// A starved worker owns no rows but still holds up its end of the
/// protocol: every barrier, plus an empty gather report.
fn run_starved(ctx: &WorkerContext) -> ClusterResult<()> {
    wait_or_abort(&ctx.barrier, ctx.worker_index)?;
    for _ in 0..ctx.config.smoothing_iterations {
        wait_or_abort(&ctx.barrier, ctx.worker_index)?;
    }
    wait_or_abort(&ctx.barrier, ctx.worker_index)?;

    ctx.gather_tx
        .send(WorkerReport::empty(ctx.worker_index))
        .map_err(|_| ClusterError::NeighborDisconnected { worker: ctx.worker_index })?;
    Ok(())
}

/// Waits at the run barrier, translating a poisoned run into an abort.
fn wait_or_abort(barrier: &RunBarrier, worker: usize) -> ClusterResult<()> {
    if barrier.wait() {
        Ok(())
    } else {
        Err(ClusterError::Aborted { worker })
    }
}

fn send_row(
    link: &Option<Sender<HaloMessage>>,
    row: Option<&[Cell]>,
    iteration: u32,
    worker: usize,
) -> ClusterResult<()> {
    if let (Some(tx), Some(row)) = (link, row) {
        tx.send(HaloMessage { iteration, row: row.to_vec() })
            .map_err(|_| ClusterError::NeighborDisconnected { worker })?;
    }
    Ok(())
}

fn recv_halo(
    link: Option<&Receiver<HaloMessage>>,
    iteration: u32,
    width: usize,
    worker: usize,
) -> ClusterResult<Halo> {
    let Some(rx) = link else {
        // No neighbor on this side: the global edge.
        return Ok(Halo::Absent);
    };
    let message = rx
        .recv_timeout(EXCHANGE_TIMEOUT)
        .map_err(|_| ClusterError::NeighborDisconnected { worker })?;
    if message.row.len() != width {
        return Err(ClusterError::HaloLength {
            worker,
            expected: width,
            got: message.row.len(),
        });
    }
    if message.iteration != iteration {
        return Err(ClusterError::HaloIteration {
            worker,
            expected: iteration,
            got: message.iteration,
        });
    }
    Ok(Halo::Row(message.row))
}

fn recv_borrowed_row(
    rx: &Receiver<Vec<Cell>>,
    width: usize,
    worker: usize,
) -> ClusterResult<Vec<Cell>> {
    let row = rx
        .recv_timeout(EXCHANGE_TIMEOUT)
        .map_err(|_| ClusterError::NeighborDisconnected { worker })?;
    if row.len() != width {
        return Err(ClusterError::HaloLength { worker, expected: width, got: row.len() });
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn absent_link_yields_absent_halo() {
        let halo = recv_halo(None, 0, 8, 0).unwrap();
        assert!(halo.is_absent());
    }

    #[test]
    fn wrong_length_row_is_fatal() {
        let (tx, rx) = unbounded();
        tx.send(HaloMessage { iteration: 0, row: vec![Cell::Wall; 3] }).unwrap();

        let err = recv_halo(Some(&rx), 0, 8, 1).unwrap_err();
        assert_eq!(err, ClusterError::HaloLength { worker: 1, expected: 8, got: 3 });
    }

    #[test]
    fn stale_iteration_tag_is_fatal() {
        let (tx, rx) = unbounded();
        tx.send(HaloMessage { iteration: 2, row: vec![Cell::Open; 4] }).unwrap();

        let err = recv_halo(Some(&rx), 3, 4, 0).unwrap_err();
        assert_eq!(err, ClusterError::HaloIteration { worker: 0, expected: 3, got: 2 });
    }

    #[test]
    fn valid_message_becomes_a_present_halo() {
        let (tx, rx) = unbounded();
        let row = vec![Cell::Open, Cell::Wall, Cell::Open];
        tx.send(HaloMessage { iteration: 1, row: row.clone() }).unwrap();

        let halo = recv_halo(Some(&rx), 1, 3, 0).unwrap();
        assert_eq!(halo, Halo::Row(row));
    }

    #[test]
    fn disconnected_neighbor_is_fatal() {
        let (tx, rx) = unbounded::<HaloMessage>();
        drop(tx);

        let err = recv_halo(Some(&rx), 0, 4, 2).unwrap_err();
        assert_eq!(err, ClusterError::NeighborDisconnected { worker: 2 });
    }

    #[test]
    fn borrowed_row_length_is_validated() {
        let (tx, rx) = unbounded();
        tx.send(vec![Cell::Wall; 5]).unwrap();
        assert!(recv_borrowed_row(&rx, 5, 0).is_ok());

        let (tx, rx) = unbounded();
        tx.send(vec![Cell::Wall; 4]).unwrap();
        assert!(recv_borrowed_row(&rx, 5, 0).is_err());
    }
}
