//! # Cluster Error Types
//!
//! Every variant here is fatal for the whole run. Smoothing against a
//! stale or malformed halo silently corrupts the automaton, so there is no
//! retry and no partial-result mode; the run either completes every
//! iteration or reports why it could not.

use thiserror::Error;

use karst_contour::TransportError;
use karst_core::CoreError;

/// Errors that can occur while running a generation under either scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// Invalid generation parameters, rejected before any worker starts.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Segment transport data disagreed with its declared count.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// At least one worker is required.
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// A halo row arrived with the wrong width.
    #[error("worker {worker} received a halo row of {got} cells, expected {expected}")]
    HaloLength {
        /// Worker that received the row.
        worker: usize,
        /// Expected row width.
        expected: usize,
        /// Received row width.
        got: usize,
    },

    /// A halo message carried the wrong iteration tag.
    #[error("worker {worker} received a halo for iteration {got}, expected {expected}")]
    HaloIteration {
        /// Worker that received the message.
        worker: usize,
        /// Iteration the worker is computing.
        expected: u32,
        /// Iteration stamped on the message.
        got: u32,
    },

    /// An expected neighbor stopped responding mid-protocol.
    #[error("worker {worker} lost contact with a neighbor")]
    NeighborDisconnected {
        /// Worker whose exchange failed.
        worker: usize,
    },

    /// The collector did not receive every worker's report.
    #[error("gather incomplete: received {received} of {expected} worker reports")]
    GatherIncomplete {
        /// Reports received before the collector gave up.
        received: usize,
        /// Reports expected.
        expected: usize,
    },

    /// Two reports claimed the same worker index.
    #[error("duplicate gather report from worker {worker}")]
    DuplicateReport {
        /// Offending worker index.
        worker: usize,
    },

    /// A report named a worker index outside the run.
    #[error("gather report from unknown worker {worker}")]
    UnknownWorker {
        /// Offending worker index.
        worker: usize,
    },

    /// A worker thread panicked.
    #[error("worker {worker} panicked")]
    WorkerFailed {
        /// Worker that died.
        worker: usize,
    },

    /// Another worker failed; this worker stopped at a poisoned barrier.
    #[error("worker {worker} aborted after another worker failed")]
    Aborted {
        /// Worker that observed the poisoned barrier.
        worker: usize,
    },
}

/// Result type for cluster operations.
pub type ClusterResult<T> = Result<T, ClusterError>;
